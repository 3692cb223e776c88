mod part_processor;
mod state;
mod state_finish;
mod transcoder;

pub use part_processor::PartProcessor;
pub use state::{BlockType, StreamingState};
pub use transcoder::ClaudeStreamTranscoder;
