use crate::config::AppConfig;
use crate::display::ContentRenderer;
use crate::error::{ContentError, Result};
use crate::gemini::{GeminiTextClient, TextGenerator};
use crate::images::{
    HttpImageProbe, ImageCandidatePool, ImageProbe, ImageResolver, RandomSource,
};
use crate::interpreter::{Interpretation, ParseOutcome, ResponseInterpreter};
use crate::logger;
use crate::models::{GenerationRequest, RequestState};
use crate::prompt::PromptBuilder;
use std::sync::Arc;
use uuid::Uuid;

pub const SERVICE_GUIDANCE: &str =
    "Please try again, or check your API key and network connection.";

/// How many pool draws are probed when vetting the fallback candidate.
const FALLBACK_DRAWS: usize = 3;

#[derive(Debug)]
pub struct RequestReport {
    pub request_id: Uuid,
    pub request: GenerationRequest,
    pub prompt: String,
    pub fallback_image: String,
    pub outcome: std::result::Result<Interpretation, ContentError>,
    pub states: Vec<RequestState>,
}

impl RequestReport {
    pub fn state(&self) -> RequestState {
        self.states.last().copied().unwrap_or(RequestState::Idle)
    }
}

/// Drives one user submission at a time through the generation pipeline.
pub struct ContentSession {
    generator: Arc<dyn TextGenerator>,
    probe: Option<Arc<dyn ImageProbe>>,
    prompts: PromptBuilder,
    pool: ImageCandidatePool,
    interpreter: ResponseInterpreter,
}

impl ContentSession {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        probe: Option<Arc<dyn ImageProbe>>,
        prompts: PromptBuilder,
    ) -> Self {
        let resolver = ImageResolver::new(probe.clone());
        Self {
            generator,
            probe,
            prompts,
            pool: ImageCandidatePool::default(),
            interpreter: ResponseInterpreter::new(resolver),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let generator = Arc::new(GeminiTextClient::new(config.gemini.clone())?);
        let probe: Option<Arc<dyn ImageProbe>> = if config.images.probe_enabled {
            Some(Arc::new(HttpImageProbe::new(config.images.probe_timeout)?))
        } else {
            None
        };

        let session = Self::new(generator, probe, PromptBuilder::new(&config.language))
            .with_static_placeholder(&config.images.static_placeholder);
        Ok(session)
    }

    pub fn with_pool(mut self, pool: ImageCandidatePool) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_static_placeholder(mut self, url: &str) -> Self {
        self.interpreter = self.interpreter.with_static_placeholder(url);
        self
    }

    /// Picks the fallback image before the model is called. With a probe the
    /// first reachable draw wins, otherwise a single draw is taken as-is.
    pub async fn preselect_image(&self, random: &mut dyn RandomSource) -> String {
        match &self.probe {
            Some(probe) => {
                self.pool
                    .candidates(random, FALLBACK_DRAWS)
                    .first_accepted(probe.as_ref())
                    .await
            }
            None => self.pool.pick(random),
        }
    }

    pub fn build_prompt(&self, request: &GenerationRequest) -> String {
        self.prompts.build(request)
    }

    pub async fn submit(
        &self,
        request: GenerationRequest,
        random: &mut dyn RandomSource,
    ) -> RequestReport {
        let request_id = Uuid::new_v4();
        let mut states = vec![RequestState::Idle];
        advance(&mut states, RequestState::Submitted);
        log::info!("[req:{}] Submitted style={}", request_id, request.style());

        // A caller-chosen image is the fallback as-is; the pool is not drawn.
        let hint = request.image_hint().map(str::to_string);
        let (fallback_image, request) = match hint {
            Some(hint) => (hint, request),
            None => {
                let image = self.preselect_image(random).await;
                (image.clone(), request.with_image_hint(image))
            }
        };
        let prompt = self.prompts.build(&request);

        advance(&mut states, RequestState::AwaitingService);
        let reply = {
            let _timer = logger::timer(&format!("generation call {}", request_id));
            self.generator.generate(&prompt).await
        };

        let outcome = match reply {
            Ok(raw) => self.interpreter.interpret(&raw, &fallback_image).await,
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(interpretation) => match &interpretation.outcome {
                ParseOutcome::Parsed => advance(&mut states, RequestState::ParsedOk),
                ParseOutcome::Degraded { reason } => {
                    log::warn!("[req:{}] Degraded result: {}", request_id, reason);
                    advance(&mut states, RequestState::Degraded)
                }
            },
            Err(e) => {
                log::error!("[req:{}] {}", request_id, e);
                advance(&mut states, RequestState::HardFailed)
            }
        }

        RequestReport {
            request_id,
            request,
            prompt,
            fallback_image,
            outcome,
            states,
        }
    }

    /// Renders a finished request. A failing image render is replaced by the
    /// static placeholder and never aborts the rest of the output.
    pub fn display(
        &self,
        report: &mut RequestReport,
        renderer: &mut dyn ContentRenderer,
    ) -> Result<()> {
        if report.state() == RequestState::Displayed {
            log::debug!("[req:{}] Already displayed", report.request_id);
            return Ok(());
        }

        match &report.outcome {
            Ok(interpretation) => {
                let result = &interpretation.result;
                if interpretation.is_degraded() {
                    renderer.render_notice(
                        "The reply was not valid JSON; showing the full text instead.",
                    )?;
                }
                renderer.render_content(result)?;
                renderer.render_metrics(&result.metrics())?;
                if let Err(e) = renderer.render_image(&result.image_url) {
                    log::warn!(
                        "[req:{}] Image render failed ({}); using static placeholder",
                        report.request_id,
                        e
                    );
                    if let Err(e) = renderer.render_image(self.interpreter.static_placeholder()) {
                        log::warn!("[req:{}] Placeholder render failed: {}", report.request_id, e);
                        renderer.render_notice("Could not load the illustration.")?;
                    }
                }
            }
            Err(ContentError::NoStructuredPayload { raw }) => {
                renderer.render_error(
                    "Could not parse the model reply as JSON. Please try again.",
                    None,
                )?;
                renderer.render_raw(raw)?;
            }
            Err(e) if e.blocks_display() => {
                renderer.render_error(&e.to_string(), Some(SERVICE_GUIDANCE))?;
            }
            Err(e) => {
                log::warn!("[req:{}] {}", report.request_id, e);
                renderer.render_notice(&e.to_string())?;
            }
        }

        advance(&mut report.states, RequestState::Displayed);
        Ok(())
    }

    pub async fn run(
        &self,
        request: GenerationRequest,
        random: &mut dyn RandomSource,
        renderer: &mut dyn ContentRenderer,
    ) -> Result<RequestReport> {
        let mut report = self.submit(request, random).await;
        self.display(&mut report, renderer)?;
        Ok(report)
    }
}

fn advance(states: &mut Vec<RequestState>, next: RequestState) {
    let current = states.last().copied().unwrap_or(RequestState::Idle);
    debug_assert!(
        current.can_advance_to(next),
        "illegal transition {:?} -> {:?}",
        current,
        next
    );
    states.push(next);
}
