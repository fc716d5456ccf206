use crate::config::DEFAULT_LANGUAGE;
use crate::models::GenerationRequest;

pub const DEFAULT_PERSONA: &str =
    "You are an AI content generator specialized in car-related humor and infotainment.";
pub const DEFAULT_TONE: &str = "Witty, engaging, internet-friendly";
pub const MAX_WORDS: usize = 300;

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl PromptBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn build(&self, request: &GenerationRequest) -> String {
        let persona = request.persona_text().unwrap_or(DEFAULT_PERSONA);
        let tone = request
            .tone()
            .map(|t| t.describe())
            .unwrap_or(DEFAULT_TONE);

        let image_rule = match request.image_hint() {
            Some(url) => format!(
                "For 'image_url', copy this exact URL verbatim and do not change it: {}",
                url
            ),
            None => "Leave 'image_url' as an empty string.".to_string(),
        };

        format!(
            r##"{persona}
Create a piece of content in the following structure (JSON format):
{{
  "title": "...",
  "content": "...",
  "hashtag": "#car #fun",
  "image_url": "..."
}}
Topic context: Related to either real cars or 1:64 scale model cars.
User-selected style: {style}
Language: {language}
Tone: {tone}
Length: Max {max_words} words
Ensure the output is valid JSON.
{image_rule}"##,
            persona = persona,
            style = request.style().label(),
            language = self.language,
            tone = tone,
            max_words = MAX_WORDS,
            image_rule = image_rule,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentStyle, Tone};

    #[test]
    fn test_default_prompt_sections() {
        let prompt = PromptBuilder::default().build(&GenerationRequest::new(ContentStyle::Fact));

        assert!(prompt.starts_with(DEFAULT_PERSONA));
        for field in ["\"title\"", "\"content\"", "\"hashtag\"", "\"image_url\""] {
            assert!(prompt.contains(field), "missing {}", field);
        }
        assert!(prompt.contains("1:64 scale model cars"));
        assert!(prompt.contains("User-selected style: Fact"));
        assert!(prompt.contains("Language: Vietnamese"));
        assert!(prompt.contains(&format!("Tone: {}", DEFAULT_TONE)));
        assert!(prompt.contains("Max 300 words"));
    }

    #[test]
    fn test_model_is_not_asked_to_invent_a_url() {
        let prompt = PromptBuilder::default().build(&GenerationRequest::new(ContentStyle::Fun));
        assert!(!prompt.contains("unsplash"));
        assert!(prompt.contains("Leave 'image_url' as an empty string."));
    }

    #[test]
    fn test_image_hint_is_echoed_verbatim() {
        let url = "https://loremflickr.com/600/400/porsche?lock=17";
        let request = GenerationRequest::new(ContentStyle::ShortJoke).with_image_hint(url);
        let prompt = PromptBuilder::default().build(&request);
        assert!(prompt.contains(&format!("copy this exact URL verbatim and do not change it: {}", url)));
    }

    #[test]
    fn test_persona_tone_and_language_overrides() {
        let request = GenerationRequest::new(ContentStyle::DarkJoke)
            .with_tone(Tone::Nostalgic)
            .with_persona("You are a retired rally driver.");
        let prompt = PromptBuilder::new("English").build(&request);

        assert!(prompt.starts_with("You are a retired rally driver."));
        assert!(!prompt.contains(DEFAULT_PERSONA));
        assert!(prompt.contains(Tone::Nostalgic.describe()));
        assert!(prompt.contains("User-selected style: Dark joke"));
        assert!(prompt.contains("Language: English"));
    }
}
