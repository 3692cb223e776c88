// Claude mapper module
// Handles Claude ↔ Gemini protocol transformation

pub mod claude_models;
pub mod claude_response;
pub mod content_block;
pub mod gemini_models;
pub mod models;
pub mod request;
pub mod response;
pub mod sse_stream;
pub mod streaming;
pub mod turn;

#[cfg(test)]
mod tests_request;

pub use models::*;
pub use request::{
    prepare_claude_request, transform_claude_request_in, PreparedRequest, RequestOptions,
    TransformedRequest,
};
pub use response::transform_response;
pub use sse_stream::{create_claude_sse_stream, ClaudeSseStream};
pub use streaming::ClaudeStreamTranscoder;
pub use turn::find_turn_start;
