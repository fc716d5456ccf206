use crate::error::{ContentError, Result};
use crate::models::{ContentMetrics, ContentResult};
use colored::*;
use reqwest::Url;
use std::io::Write;

pub const APP_TITLE: &str = "🚗 AutoContent Generator 🏎️";
pub const APP_TAGLINE: &str = "Unique car and model-car content, written by Gemini.";

/// Surface that shows one request's outcome.
pub trait ContentRenderer {
    fn render_header(&mut self) -> Result<()>;
    fn render_content(&mut self, result: &ContentResult) -> Result<()>;
    fn render_metrics(&mut self, metrics: &ContentMetrics) -> Result<()>;
    fn render_image(&mut self, url: &str) -> Result<()>;
    fn render_notice(&mut self, message: &str) -> Result<()>;
    fn render_error(&mut self, message: &str, guidance: Option<&str>) -> Result<()>;
    fn render_raw(&mut self, raw: &str) -> Result<()>;
}

/// Colored plain-text rendering onto any writer (stdout by default).
pub struct TerminalRenderer<W: Write> {
    out: W,
    colors: bool,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout(), true)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, colors: bool) -> Self {
        Self { out, colors }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.out, "{}", text.as_ref()).map_err(|e| ContentError::Render(e.to_string()))
    }

    fn paint(&self, text: &str, style: fn(ColoredString) -> ColoredString) -> String {
        if self.colors {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> ContentRenderer for TerminalRenderer<W> {
    fn render_header(&mut self) -> Result<()> {
        let title = self.paint(APP_TITLE, |s| s.bold());
        self.line(title)?;
        self.line(APP_TAGLINE)?;
        self.line("")
    }

    fn render_content(&mut self, result: &ContentResult) -> Result<()> {
        let title = self.paint(&result.title, |s| s.bright_white().bold());
        let label = self.paint("Hashtags:", |s| s.bold());
        let tags = self.paint(&result.hashtags, |s| s.bright_cyan());
        self.line(title)?;
        self.line("")?;
        self.line(&result.body)?;
        self.line("")?;
        self.line(format!("{} {}", label, tags))
    }

    fn render_metrics(&mut self, metrics: &ContentMetrics) -> Result<()> {
        let row = format!(
            "Words: {}  |  Characters: {}  |  Hashtags: {}",
            metrics.words, metrics.characters, metrics.hashtags
        );
        let row = self.paint(&row, |s| s.bright_black());
        self.line(row)
    }

    /// Terminals cannot draw the image; the URL is validated and printed.
    fn render_image(&mut self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|e| ContentError::Render(format!("invalid image URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ContentError::Render(format!(
                "unsupported image URL scheme '{}'",
                parsed.scheme()
            )));
        }
        let label = self.paint("Illustration:", |s| s.bold());
        let link = self.paint(parsed.as_str(), |s| s.underline());
        self.line(format!("{} {}", label, link))
    }

    fn render_notice(&mut self, message: &str) -> Result<()> {
        let notice = self.paint(message, |s| s.yellow());
        self.line(notice)
    }

    fn render_error(&mut self, message: &str, guidance: Option<&str>) -> Result<()> {
        let banner = self.paint(&format!("Error: {}", message), |s| s.red().bold());
        self.line(banner)?;
        if let Some(guidance) = guidance {
            self.line(guidance)?;
        }
        Ok(())
    }

    fn render_raw(&mut self, raw: &str) -> Result<()> {
        let label = self.paint("Raw reply:", |s| s.bold());
        self.line(label)?;
        self.line(raw)
    }
}
