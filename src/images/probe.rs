use crate::error::{ContentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Existence check for an image URL.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn check(&self, url: &str) -> Result<()>;
}

/// `HEAD` request bounded by a short timeout. Any success status passes.
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContentError::Config(format!("Failed to build probe client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn check(&self, url: &str) -> Result<()> {
        let unreachable = |reason: String| ContentError::ImageUnreachable {
            url: url.to_string(),
            reason,
        };

        let response = self.client.head(url).send().await.map_err(|e| {
            if e.is_timeout() {
                unreachable("timed out".to_string())
            } else {
                unreachable(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            log::debug!("Image probe ok ({}): {}", status, url);
            Ok(())
        } else {
            Err(unreachable(format!("status {}", status)))
        }
    }
}
