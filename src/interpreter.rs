//! Turns a free-form model reply into a [`ContentResult`].
//!
//! The reply is expected to carry a JSON object somewhere in its text. The
//! object is delimited by the first `{` and the last `}`; anything around it is
//! ignored. A delimited region that is not valid JSON degrades to a result that
//! keeps the whole reply as its body.

use crate::error::{ContentError, Result};
use crate::images::{ImageResolution, ImageResolver, ImageSource};
use crate::models::{
    ContentResult, Payload, DEFAULT_HASHTAGS, DEGRADED_TITLE, NO_CONTENT, NO_HASHTAGS, NO_TITLE,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Parsed(Payload),
    /// Braces were found but did not delimit a JSON object.
    Malformed { reason: String },
}

pub fn extract_payload(raw: &str) -> Result<Extraction> {
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => (start, end),
        _ => {
            return Err(ContentError::NoStructuredPayload {
                raw: raw.to_string(),
            })
        }
    };

    let candidate = &raw[start..=end];
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(Extraction::Parsed(Payload::from_map(map))),
        Ok(other) => Ok(Extraction::Malformed {
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
        Err(e) => Ok(Extraction::Malformed {
            reason: e.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed,
    Degraded { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub result: ContentResult,
    pub outcome: ParseOutcome,
    pub image_source: ImageSource,
}

impl Interpretation {
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, ParseOutcome::Degraded { .. })
    }
}

pub struct ResponseInterpreter {
    resolver: ImageResolver,
}

impl ResponseInterpreter {
    pub fn new(resolver: ImageResolver) -> Self {
        Self { resolver }
    }

    pub fn with_static_placeholder(self, url: &str) -> Self {
        Self {
            resolver: self.resolver.with_static_placeholder(url),
        }
    }

    pub fn static_placeholder(&self) -> &str {
        self.resolver.static_placeholder()
    }

    /// `fallback_image` is the candidate chosen before the generation call.
    pub async fn interpret(&self, raw: &str, fallback_image: &str) -> Result<Interpretation> {
        match extract_payload(raw)? {
            Extraction::Parsed(payload) => {
                let image = self
                    .resolver
                    .resolve(payload.image_url().as_deref(), fallback_image)
                    .await;
                Ok(Interpretation {
                    result: normalize(&payload, image.url),
                    outcome: ParseOutcome::Parsed,
                    image_source: image.source,
                })
            }
            Extraction::Malformed { reason } => {
                log::warn!(
                    "{}",
                    ContentError::MalformedPayload(format!("{}; keeping raw reply", reason))
                );
                let image = self.resolver.resolve(None, fallback_image).await;
                Ok(degraded(raw, image, reason))
            }
        }
    }
}

fn normalize(payload: &Payload, image_url: String) -> ContentResult {
    ContentResult {
        title: payload.title().unwrap_or_else(|| NO_TITLE.to_string()),
        body: payload.content().unwrap_or_else(|| NO_CONTENT.to_string()),
        hashtags: payload.hashtag().unwrap_or_else(|| NO_HASHTAGS.to_string()),
        image_url,
    }
}

fn degraded(raw: &str, image: ImageResolution, reason: String) -> Interpretation {
    Interpretation {
        result: ContentResult {
            title: DEGRADED_TITLE.to_string(),
            body: raw.to_string(),
            hashtags: DEFAULT_HASHTAGS.to_string(),
            image_url: image.url,
        },
        outcome: ParseOutcome::Degraded { reason },
        image_source: image.source,
    }
}
