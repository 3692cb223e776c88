//! # Gravitate Core
//!
//! Protocol bridge between Claude-style Messages clients, native Gemini
//! clients and the Cloud Code `v1internal` backend.
//!
//! ```text
//! gravitate-core/src/proxy/
//! ├── mappers/claude/   # Claude ↔ Gemini request/response/stream transformation
//! ├── mappers/gemini/   # v1internal envelope wrap/unwrap, image signature guard
//! ├── upstream/         # endpoint failover, agent defaults, concurrency limiter
//! ├── rate_limit/       # quota reset delay parsing
//! ├── signature_cache   # tool_use id → thoughtSignature correlation
//! └── handlers/         # axum response producers (no router)
//! ```

#![allow(
    clippy::too_many_arguments,
    reason = "Protocol transformation functions carry several context parameters"
)]
#![allow(
    clippy::significant_drop_tightening,
    reason = "RwLock guards in cache code are held for single map operations"
)]
#![cfg_attr(test, allow(clippy::panic, clippy::float_cmp, clippy::assertions_on_result_states))]

pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;

pub use error::{AppError, AppResult};
pub use gravitate_types::{BridgeConfig, ProxyError};
