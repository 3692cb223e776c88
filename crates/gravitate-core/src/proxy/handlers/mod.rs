//! axum response producers. Routing is left to the host.

pub mod claude;
mod errors;
pub mod gemini;
mod upstream_response;

use std::sync::Arc;
use std::time::Duration;

use gravitate_types::BridgeConfig;

use crate::error::AppResult;
use crate::proxy::auth::CredentialSource;
use crate::proxy::signature_cache::SignatureCache;
use crate::proxy::upstream::UpstreamClient;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ProxyState {
    pub upstream: Arc<UpstreamClient>,
    pub signatures: Arc<SignatureCache>,
    pub credentials: Arc<dyn CredentialSource>,
    pub config: Arc<BridgeConfig>,
}

impl ProxyState {
    pub fn new(config: BridgeConfig, credentials: Arc<dyn CredentialSource>) -> AppResult<Self> {
        let upstream = UpstreamClient::from_config(&config)?;
        Ok(Self::with_upstream(config, credentials, upstream))
    }

    pub fn with_upstream(
        config: BridgeConfig,
        credentials: Arc<dyn CredentialSource>,
        upstream: UpstreamClient,
    ) -> Self {
        Self {
            upstream: Arc::new(upstream),
            signatures: Arc::new(SignatureCache::from_config(&config.signature_cache)),
            credentials,
            config: Arc::new(config),
        }
    }

    pub(crate) fn stream_read_timeout(&self) -> Option<Duration> {
        self.config.stream_read_timeout_secs.map(Duration::from_secs)
    }
}
