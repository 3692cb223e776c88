//! Admission control in front of the upstream gateway.

use std::sync::Arc;

use async_trait::async_trait;
use gravitate_types::ProxyError;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Held for the duration of one upstream call.
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: Option<OwnedSemaphorePermit>,
}

impl LimiterPermit {
    pub fn unbounded() -> Self {
        Self { _permit: None }
    }
}

#[async_trait]
pub trait RequestLimiter: Send + Sync {
    async fn acquire(&self) -> Result<LimiterPermit, ProxyError>;
}

/// Caps in-flight upstream calls with a tokio semaphore.
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
}

impl ConcurrencyLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        Self { semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))) }
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[async_trait]
impl RequestLimiter for ConcurrencyLimiter {
    async fn acquire(&self) -> Result<LimiterPermit, ProxyError> {
        let permit = self.semaphore.clone().acquire_owned().await.map_err(|_| {
            ProxyError::Upstream { message: "request limiter closed".to_string() }
        })?;
        Ok(LimiterPermit { _permit: Some(permit) })
    }
}

/// Admits everything.
pub struct Unlimited;

#[async_trait]
impl RequestLimiter for Unlimited {
    async fn acquire(&self) -> Result<LimiterPermit, ProxyError> {
        Ok(LimiterPermit::unbounded())
    }
}
