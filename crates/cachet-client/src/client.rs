//! Cachet API client
//!
//! Cachet authenticates API calls with an `X-Cachet-Token` header and exposes
//! component updates as `PUT {base_url}/components/{id}` with a JSON body.

use std::time::Duration;

use async_trait::async_trait;
use check_runner_core::{CachetSettings, ComponentId, ComponentStatus, StatusPage};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CachetError;
use crate::Result;

/// Header carrying the API key
pub const TOKEN_HEADER: &str = "X-Cachet-Token";

/// Cachet configuration
#[derive(Clone)]
pub struct CachetConfig {
    /// API root, e.g. `https://status.example.org/api/v1`
    pub base_url: String,
    /// API key sent with every request
    pub api_token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for CachetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachetConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CachetConfig {
    /// Create config for a specific server
    pub fn new(base_url: &str, api_token: &str) -> Self {
        CachetConfig {
            base_url: base_url.to_string(),
            api_token: api_token.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&CachetSettings> for CachetConfig {
    fn from(settings: &CachetSettings) -> Self {
        CachetConfig::new(&settings.base_url, &settings.api_key).with_timeout(settings.timeout)
    }
}

#[derive(Debug, Serialize)]
struct ComponentUpdate {
    status: i32,
}

/// Cachet client for component status updates
#[derive(Debug, Clone)]
pub struct CachetClient {
    config: CachetConfig,
    base_url: Url,
    http_client: reqwest::Client,
}

impl CachetClient {
    /// Create a new Cachet client
    pub fn new(config: CachetConfig) -> Result<Self> {
        let normalized = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| CachetError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("check-runner/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(CachetClient {
            config,
            base_url,
            http_client,
        })
    }

    pub fn config(&self) -> &CachetConfig {
        &self.config
    }

    /// URL of a single component resource
    pub fn component_url(&self, id: ComponentId) -> Result<Url> {
        self.base_url
            .join(&format!("components/{}", id))
            .map_err(|e| CachetError::InvalidBaseUrl {
                url: self.config.base_url.clone(),
                reason: e.to_string(),
            })
    }

    /// Set the status of a component
    pub async fn put_component_status(&self, id: ComponentId, status: ComponentStatus) -> Result<()> {
        let url = self.component_url(id)?;
        debug!(url = %url, status = status.as_i32(), "updating Cachet component");

        let response = self
            .http_client
            .put(url)
            .header(TOKEN_HEADER, &self.config.api_token)
            .json(&ComponentUpdate {
                status: status.as_i32(),
            })
            .send()
            .await?;

        let code = response.status();
        if code.is_success() {
            return Ok(());
        }

        if code == StatusCode::UNAUTHORIZED || code == StatusCode::FORBIDDEN {
            warn!(status = code.as_u16(), "Cachet rejected the API key");
            return Err(CachetError::Unauthorized {
                status: code.as_u16(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = code.as_u16(), body = %body, "Cachet update failed");
        Err(CachetError::Api {
            status: code.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl StatusPage for CachetClient {
    type Error = CachetError;

    async fn update_component(
        &self,
        component: ComponentId,
        status: ComponentStatus,
    ) -> Result<()> {
        self.put_component_status(component, status).await
    }
}
