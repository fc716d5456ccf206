use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NO_TITLE: &str = "No title";
pub const NO_CONTENT: &str = "No content";
pub const NO_HASHTAGS: &str = "No hashtags";

pub const DEGRADED_TITLE: &str = "Generated content";
pub const DEFAULT_HASHTAGS: &str = "#car #fun";

/// The JSON object pulled out of a model reply. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
}

impl Payload {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn title(&self) -> Option<String> {
        self.text("title")
    }

    pub fn content(&self) -> Option<String> {
        self.text("content")
    }

    pub fn hashtag(&self) -> Option<String> {
        self.text("hashtag")
    }

    pub fn image_url(&self) -> Option<String> {
        self.text("image_url").filter(|url| !url.trim().is_empty())
    }

    // Strings are taken as-is; any other JSON value is kept as its JSON text.
    fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Array(items) if items.iter().all(Value::is_string) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResult {
    pub title: String,
    pub body: String,
    pub hashtags: String,
    pub image_url: String,
}

impl ContentResult {
    pub fn metrics(&self) -> ContentMetrics {
        ContentMetrics {
            words: self.body.split_whitespace().count(),
            characters: self.body.chars().count(),
            hashtags: self
                .hashtags
                .split_whitespace()
                .filter(|tag| tag.starts_with('#') && tag.len() > 1)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentMetrics {
    pub words: usize,
    pub characters: usize,
    pub hashtags: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Idle,
    Submitted,
    AwaitingService,
    ParsedOk,
    Degraded,
    HardFailed,
    Displayed,
}

impl RequestState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: RequestState) -> bool {
        use RequestState::*;
        matches!(
            (self, next),
            (Idle, Submitted)
                | (Submitted, AwaitingService)
                | (AwaitingService, ParsedOk)
                | (AwaitingService, Degraded)
                | (AwaitingService, HardFailed)
                | (ParsedOk, Displayed)
                | (Degraded, Displayed)
                | (HardFailed, Displayed)
        )
    }
}
