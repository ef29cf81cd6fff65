use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{ImportError, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("inspire-import/", env!("CARGO_PKG_VERSION"));

// ─── ProviderClient ──────────────────────────────────────────────────────────

/// One GET per call. No retries, no backoff.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: reqwest::Client,
}

impl ProviderClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub async fn get_json(&self, url: &str) -> Result<Value> {
        debug!(%url, "provider request");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ImportError::Api {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| ImportError::Parse(e.to_string()))
    }
}
