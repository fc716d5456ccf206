use crate::error::{ContentError, Result};
use crate::logger::LogLevel;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const SECRETS_FILE_VAR: &str = "AUTOCONTENT_SECRETS_FILE";
pub const DEFAULT_SECRETS_FILE: &str = ".secrets.env";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_LANGUAGE: &str = "Vietnamese";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub probe_enabled: bool,
    pub probe_timeout: Duration,
    pub static_placeholder: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            probe_enabled: true,
            probe_timeout: Duration::from_secs(5),
            static_placeholder: crate::images::STATIC_PLACEHOLDER.to_string(),
        }
    }
}

/// Process-wide settings, built once at startup and handed to the session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub images: ImageConfig,
    pub language: String,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
    /// JSON lines in the log file instead of formatted text.
    pub log_json: bool,
}

impl AppConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        AppConfig {
            gemini: GeminiConfig::new(api_key),
            images: ImageConfig::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            log_level: LogLevel::Info,
            log_file: None,
            log_json: false,
        }
    }

    /// Secrets file first, then `.env` and the process environment.
    pub fn load() -> Result<Self> {
        let secrets_path =
            env::var(SECRETS_FILE_VAR).unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string());
        let secrets = read_secrets_file(Path::new(&secrets_path))?;

        match dotenv::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(_) => log::debug!("No .env file found, using process environment"),
        }

        Self::from_lookup(|key| secrets.get(key).cloned().or_else(|| env::var(key).ok()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or_else(|| {
            ContentError::MissingCredential(format!(
                "{} not found. Set it in the secrets file or a .env file.",
                API_KEY_VAR
            ))
        })?;

        let mut config = AppConfig::new(api_key.trim());

        if let Some(model) = get("GEMINI_MODEL") {
            config.gemini = config.gemini.with_model(model);
        }
        if let Some(base) = get("GEMINI_API_BASE") {
            config.gemini = config.gemini.with_api_base(base);
        }
        if let Some(value) = get("GEMINI_TEMPERATURE") {
            let temperature = value.trim().parse::<f32>().map_err(|_| {
                ContentError::Config(format!("GEMINI_TEMPERATURE must be a number, got '{}'", value))
            })?;
            config.gemini = config.gemini.with_temperature(temperature);
        }
        if let Some(value) = get("GEMINI_MAX_OUTPUT_TOKENS") {
            let tokens = value.trim().parse::<u32>().map_err(|_| {
                ContentError::Config(format!(
                    "GEMINI_MAX_OUTPUT_TOKENS must be a positive integer, got '{}'",
                    value
                ))
            })?;
            config.gemini = config.gemini.with_max_output_tokens(tokens);
        }
        if let Some(secs) = get("AUTOCONTENT_TIMEOUT_SECS") {
            config.gemini = config
                .gemini
                .with_timeout(parse_secs("AUTOCONTENT_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = get("AUTOCONTENT_PROBE_TIMEOUT_SECS") {
            config.images.probe_timeout = parse_secs("AUTOCONTENT_PROBE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(flag) = get("AUTOCONTENT_PROBE_IMAGES") {
            config.images.probe_enabled = !matches!(flag.as_str(), "false" | "0" | "no");
        }
        if let Some(language) = get("AUTOCONTENT_LANGUAGE") {
            config.language = language;
        }
        config.log_file = get("AUTOCONTENT_LOG_FILE");
        config.log_json = get("AUTOCONTENT_LOG_JSON")
            .map(|flag| matches!(flag.trim(), "true" | "1" | "yes"))
            .unwrap_or(false);
        if let Some(level) = get("AUTOCONTENT_LOG_LEVEL") {
            config.log_level = level
                .parse()
                .map_err(|e: String| ContentError::Config(e))?;
        }

        Ok(config)
    }

    pub fn with_probe(mut self, enabled: bool) -> Self {
        self.images.probe_enabled = enabled;
        self
    }
}

/// A missing secrets file is not an error; an unreadable one is.
fn read_secrets_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let iter = dotenv::from_path_iter(path)
        .map_err(|e| ContentError::Config(format!("{}: {}", path.display(), e)))?;

    let mut secrets = HashMap::new();
    for item in iter {
        let (key, value) =
            item.map_err(|e| ContentError::Config(format!("{}: {}", path.display(), e)))?;
        secrets.insert(key, value);
    }
    log::debug!("Loaded {} secret(s) from {}", secrets.len(), path.display());
    Ok(secrets)
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ContentError::Config(format!("{} must be a number of seconds, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_missing_credential() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ContentError::MissingCredential(_)));
        assert!(err.is_fatal_to_process());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ContentError::MissingCredential(_)));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "k-123")])).unwrap();
        assert_eq!(config.gemini.api_key, "k-123");
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
        assert_eq!(config.language, DEFAULT_LANGUAGE);
        assert!(config.images.probe_enabled);
        assert_eq!(config.images.probe_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("GEMINI_API_BASE", "http://localhost:9000/models/"),
            ("AUTOCONTENT_TIMEOUT_SECS", "12"),
            ("AUTOCONTENT_PROBE_IMAGES", "false"),
            ("AUTOCONTENT_LANGUAGE", "English"),
            ("AUTOCONTENT_LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.gemini.api_base, "http://localhost:9000/models");
        assert_eq!(config.gemini.timeout, Duration::from_secs(12));
        assert!(!config.images.probe_enabled);
        assert_eq!(config.language, "English");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.gemini.temperature, None);
        assert!(!config.log_json);
    }

    #[test]
    fn test_generation_settings() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            ("GEMINI_TEMPERATURE", "0.7"),
            ("GEMINI_MAX_OUTPUT_TOKENS", "800"),
            ("AUTOCONTENT_LOG_FILE", "/tmp/autocontent.log"),
            ("AUTOCONTENT_LOG_JSON", "true"),
        ]))
        .unwrap();
        assert_eq!(config.gemini.temperature, Some(0.7));
        assert_eq!(config.gemini.max_output_tokens, Some(800));
        assert_eq!(config.log_file.as_deref(), Some("/tmp/autocontent.log"));
        assert!(config.log_json);

        let err = AppConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            ("GEMINI_MAX_OUTPUT_TOKENS", "-5"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            ("AUTOCONTENT_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }

    #[test]
    fn test_secrets_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GEMINI_API_KEY=from-secrets").unwrap();
        let secrets = read_secrets_file(file.path()).unwrap();
        assert_eq!(secrets.get(API_KEY_VAR).map(String::as_str), Some("from-secrets"));
    }

    #[test]
    fn test_absent_secrets_file_is_empty() {
        let secrets = read_secrets_file(Path::new("/nonexistent/autocontent.env")).unwrap();
        assert!(secrets.is_empty());
    }
}
