use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ContentStyle {
    ShortJoke,
    Fact,
    Fun,
    DarkJoke,
}

impl ContentStyle {
    pub const ALL: [ContentStyle; 4] = [
        ContentStyle::ShortJoke,
        ContentStyle::Fact,
        ContentStyle::Fun,
        ContentStyle::DarkJoke,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentStyle::ShortJoke => "Short Joke",
            ContentStyle::Fact => "Fact",
            ContentStyle::Fun => "Fun",
            ContentStyle::DarkJoke => "Dark joke",
        }
    }
}

impl fmt::Display for ContentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Witty,
    Sarcastic,
    Nostalgic,
    Informative,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Witty, Tone::Sarcastic, Tone::Nostalgic, Tone::Informative];

    /// Phrase placed on the prompt's tone line.
    pub fn describe(&self) -> &'static str {
        match self {
            Tone::Witty => "Witty, playful, quick punchlines",
            Tone::Sarcastic => "Sarcastic, deadpan, tongue-in-cheek",
            Tone::Nostalgic => "Nostalgic, warm, reminiscing about classic cars",
            Tone::Informative => "Informative, clear, lightly humorous",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Witty => "Witty",
            Tone::Sarcastic => "Sarcastic",
            Tone::Nostalgic => "Nostalgic",
            Tone::Informative => "Informative",
        };
        f.write_str(name)
    }
}

/// One user submission. Builder methods consume `self`, so a built request
/// is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    style: ContentStyle,
    tone: Option<Tone>,
    persona_text: Option<String>,
    image_hint: Option<String>,
}

impl GenerationRequest {
    pub fn new(style: ContentStyle) -> Self {
        Self {
            style,
            tone: None,
            persona_text: None,
            image_hint: None,
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    /// Blank text leaves the default persona in place.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        let persona = persona.into();
        let trimmed = persona.trim();
        self.persona_text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn with_image_hint(mut self, url: impl Into<String>) -> Self {
        self.image_hint = Some(url.into());
        self
    }

    pub fn style(&self) -> ContentStyle {
        self.style
    }

    pub fn tone(&self) -> Option<Tone> {
        self.tone
    }

    pub fn persona_text(&self) -> Option<&str> {
        self.persona_text.as_deref()
    }

    pub fn image_hint(&self) -> Option<&str> {
        self.image_hint.as_deref()
    }
}
