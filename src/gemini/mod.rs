pub mod text_client;

pub use text_client::GeminiTextClient;

use crate::error::Result;
use async_trait::async_trait;

/// A hosted model that answers a single text prompt with text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}
