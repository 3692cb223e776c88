mod parser;

pub use parser::{parse_retry_delay_ms, retry_after_secs};
