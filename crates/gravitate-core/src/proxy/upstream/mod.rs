pub mod agent_defaults;
pub mod client;
pub mod limiter;

pub use agent_defaults::{apply_agent_defaults, ensure_system_instruction};
pub use client::{CallOptions, UpstreamClient};
pub use limiter::{ConcurrencyLimiter, LimiterPermit, RequestLimiter, Unlimited};
