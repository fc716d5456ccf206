use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    /// The reply contained no `{ ... }` region at all.
    #[error("No structured payload found in the model reply")]
    NoStructuredPayload { raw: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Image unreachable: {url} ({reason})")]
    ImageUnreachable { url: String, reason: String },

    #[error("Generation service call failed: {0}")]
    ServiceCallFailed(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl ContentError {
    /// Kinds that end the current request without showing content.
    pub fn blocks_display(&self) -> bool {
        matches!(
            self,
            ContentError::NoStructuredPayload { .. }
                | ContentError::ServiceCallFailed(_)
                | ContentError::MissingCredential(_)
        )
    }

    pub fn is_fatal_to_process(&self) -> bool {
        matches!(self, ContentError::MissingCredential(_))
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_kinds() {
        assert!(ContentError::NoStructuredPayload { raw: String::new() }.blocks_display());
        assert!(ContentError::ServiceCallFailed("quota".into()).blocks_display());
        assert!(!ContentError::MalformedPayload("eof".into()).blocks_display());
        assert!(!ContentError::ImageUnreachable {
            url: "http://dead.example/x".into(),
            reason: "timeout".into()
        }
        .blocks_display());
        assert!(!ContentError::Render("bad scheme".into()).blocks_display());
    }

    #[test]
    fn test_only_missing_credential_is_fatal() {
        assert!(ContentError::MissingCredential("GEMINI_API_KEY".into()).is_fatal_to_process());
        assert!(!ContentError::ServiceCallFailed("401".into()).is_fatal_to_process());
    }
}
