pub mod config;
pub mod display;
pub mod error;
pub mod gemini;
pub mod images;
pub mod interpreter;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod session;

pub use config::{AppConfig, GeminiConfig, ImageConfig};
pub use display::{ContentRenderer, TerminalRenderer};
pub use error::{ContentError, Result};
pub use gemini::{GeminiTextClient, TextGenerator};
pub use images::{
    HttpImageProbe, ImageCandidatePool, ImageCandidates, ImageProbe, ImageResolver, RandomSource,
    SeededRandom, STATIC_PLACEHOLDER,
};
pub use interpreter::{extract_payload, Extraction, Interpretation, ParseOutcome, ResponseInterpreter};
pub use models::*;
pub use prompt::PromptBuilder;
pub use session::{ContentSession, RequestReport};
