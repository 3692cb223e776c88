mod contents;
mod generation_config;
mod system_instruction;
mod tool_result_handler;
mod tools_builder;
mod transform;

pub use contents::{merge_adjacent_roles, DUMMY_SIGNATURE};
pub use transform::{
    prepare_claude_request, transform_claude_request_in, PreparedRequest, RequestOptions,
    TransformedRequest,
};
