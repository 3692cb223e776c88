pub use super::claude_models::*;
pub use super::claude_response::*;
pub use super::content_block::*;
pub use super::gemini_models::*;
