//! Source of upstream credentials.
//!
//! Token refresh and account selection live with the host; the bridge only
//! asks for a bearer token and the Cloud Code project to bill.

use async_trait::async_trait;
use gravitate_types::ProxyError;

#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn access_token(&self) -> Result<String, ProxyError>;
    async fn project_id(&self) -> Result<String, ProxyError>;
}

/// Fixed token and project, for single-account hosts and tests.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    access_token: String,
    project_id: String,
}

impl StaticCredentials {
    pub fn new(access_token: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), project_id: project_id.into() }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn access_token(&self) -> Result<String, ProxyError> {
        if self.access_token.is_empty() {
            return Err(ProxyError::Credentials { message: "access token is empty".to_string() });
        }
        Ok(self.access_token.clone())
    }

    async fn project_id(&self) -> Result<String, ProxyError> {
        if self.project_id.is_empty() {
            return Err(ProxyError::Credentials { message: "project id is empty".to_string() });
        }
        Ok(self.project_id.clone())
    }
}
