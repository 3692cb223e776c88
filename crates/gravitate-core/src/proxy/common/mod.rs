pub mod headers;
pub mod model_mapping;
pub mod random_id;
pub mod sse;

pub use headers::sanitize_upstream_headers;
pub use model_mapping::map_claude_model_to_gemini;
pub use sse::{SseFramer, MAX_BUFFER_SIZE};
