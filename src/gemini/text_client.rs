use super::TextGenerator;
use crate::config::GeminiConfig;
use crate::error::{ContentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiTextClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiTextClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ContentError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        let generation_config =
            if self.config.temperature.is_some() || self.config.max_output_tokens.is_some() {
                Some(GenerationConfig {
                    temperature: self.config.temperature,
                    max_output_tokens: self.config.max_output_tokens,
                })
            } else {
                None
            };

        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiTextClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = self.build_request(prompt);

        log::info!("Invoking model: {}", self.config.model);
        log::debug!("Prompt length: {} chars", prompt.chars().count());

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                log::error!("Gemini request failed: {}", e);
                if e.is_timeout() {
                    ContentError::ServiceCallFailed("request timed out".to_string())
                } else {
                    ContentError::ServiceCallFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Gemini API error {}: {}", status, body);
            return Err(ContentError::ServiceCallFailed(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                ContentError::ServiceCallFailed(format!("unreadable reply: {}", e.without_url()))
            })?;

        if let Some(reason) = reply.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ContentError::ServiceCallFailed(format!(
                "prompt blocked: {}",
                reason
            )));
        }

        let text: String = reply
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ContentError::ServiceCallFailed(
                "no content generated".to_string(),
            ));
        }

        log::debug!("Received {} chars from {}", text.chars().count(), self.config.model);
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("k").with_api_base("http://localhost:1234/v1beta/models/");
        let client = GeminiTextClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let client = GeminiTextClient::new(GeminiConfig::new("k")).unwrap();
        let body = serde_json::to_value(client.build_request("hello")).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert!(body.get("generationConfig").is_none());

        let client =
            GeminiTextClient::new(GeminiConfig::new("k").with_max_output_tokens(800)).unwrap();
        let body = serde_json::to_value(client.build_request("hello")).unwrap();
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 800);
        assert!(body["generationConfig"].get("temperature").is_none());
    }
}
