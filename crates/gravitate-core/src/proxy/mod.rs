// proxy module - Claude / Gemini bridge over Cloud Code v1internal

pub mod auth;
pub mod common;
pub mod handlers;
pub mod mappers;
pub mod rate_limit;
pub mod signature_cache;
pub mod signature_metrics;
pub mod upstream;

pub use auth::{CredentialSource, StaticCredentials};
pub use handlers::ProxyState;
pub use signature_cache::SignatureCache;
pub use upstream::UpstreamClient;
