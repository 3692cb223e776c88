//! # Gravitate Types
//!
//! Error and configuration types for the Gravitate protocol bridge.
//!
//! - **`error`** - Typed error hierarchy for proxy operations and configuration
//! - **`config`** - Bridge configuration (endpoints, signature cache, limits)
//!
//! ## Architecture Role
//!
//! ```text
//!     gravitate-types (this crate)
//!             │
//!             ▼
//!      gravitate-core
//! ```
//!
//! All types are serializable via serde and cheap to clone across async
//! boundaries.

pub mod config;
pub mod error;

pub use config::{BridgeConfig, SignatureCacheConfig};
pub use error::{ConfigError, ProxyError, Result, TypedError};
