use super::probe::ImageProbe;
use super::STATIC_PLACEHOLDER;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// The model's `image_url`, accepted (probed or probing disabled).
    Payload,
    /// No `image_url` in the payload; the pre-selected candidate was used.
    Fallback,
    /// The model's URL failed the probe.
    StaticPlaceholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolution {
    pub url: String,
    pub source: ImageSource,
}

/// Three-tier image policy: payload URL if reachable, static placeholder if
/// not, pre-selected fallback if the payload had none.
#[derive(Clone)]
pub struct ImageResolver {
    probe: Option<Arc<dyn ImageProbe>>,
    static_placeholder: String,
}

impl ImageResolver {
    pub fn new(probe: Option<Arc<dyn ImageProbe>>) -> Self {
        Self {
            probe,
            static_placeholder: STATIC_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_static_placeholder(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.trim().is_empty() {
            self.static_placeholder = url;
        }
        self
    }

    pub fn static_placeholder(&self) -> &str {
        &self.static_placeholder
    }

    pub async fn resolve(&self, payload_url: Option<&str>, fallback: &str) -> ImageResolution {
        let url = match payload_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => url,
            None => return self.fallback_or_static(fallback),
        };

        let probe = match &self.probe {
            Some(probe) => probe,
            None => {
                return ImageResolution {
                    url: url.to_string(),
                    source: ImageSource::Payload,
                }
            }
        };

        match probe.check(url).await {
            Ok(()) => ImageResolution {
                url: url.to_string(),
                source: ImageSource::Payload,
            },
            Err(e) => {
                log::warn!("{}; using static placeholder", e);
                ImageResolution {
                    url: self.static_placeholder.clone(),
                    source: ImageSource::StaticPlaceholder,
                }
            }
        }
    }

    fn fallback_or_static(&self, fallback: &str) -> ImageResolution {
        if fallback.trim().is_empty() {
            ImageResolution {
                url: self.static_placeholder.clone(),
                source: ImageSource::StaticPlaceholder,
            }
        } else {
            ImageResolution {
                url: fallback.to_string(),
                source: ImageSource::Fallback,
            }
        }
    }
}
