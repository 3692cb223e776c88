pub mod stream;
pub mod validation;
pub mod wrapper;

pub use stream::{create_unwrap_stream, UnwrapTranscoder};
pub use validation::{is_image_model, validate_image_signatures};
pub use wrapper::{unwrap_response, wrap_request, WrappedRequest, DEFAULT_MAX_OUTPUT_TOKENS};
