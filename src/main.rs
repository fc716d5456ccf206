use autocontent::logger::{self, LoggerConfig};
use autocontent::session::SERVICE_GUIDANCE;
use autocontent::{
    AppConfig, ContentError, ContentRenderer, ContentSession, ContentStyle, GenerationRequest,
    RandomSource, RequestReport, SeededRandom, TerminalRenderer, Tone,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "autocontent", version, about = "Generate car-themed posts with Gemini")]
struct Cli {
    /// Content style. Asked interactively when omitted.
    #[arg(short, long, value_enum)]
    style: Option<ContentStyle>,

    #[arg(short, long, value_enum)]
    tone: Option<Tone>,

    /// Replaces the default persona preamble of the prompt.
    #[arg(short, long)]
    persona: Option<String>,

    /// Skip the reachability check of image URLs.
    #[arg(long)]
    no_probe: bool,

    /// Seed for image candidate selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the result as JSON instead of formatted text.
    #[arg(long)]
    json: bool,

    /// Print the prompt that would be sent and exit.
    #[arg(long)]
    print_prompt: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The credential check happens before anything else is shown.
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            let mut renderer = TerminalRenderer::stdout();
            let guidance = (!e.is_fatal_to_process())
                .then_some("Check the values in your .env or secrets file.");
            let _ = renderer.render_error(&e.to_string(), guidance);
            return ExitCode::from(2);
        }
    };

    let mut logger_config = if cli.verbose {
        LoggerConfig::development()
    } else if cli.json {
        LoggerConfig::quiet()
    } else {
        LoggerConfig::default().with_level(config.log_level)
    };
    if let Some(path) = &config.log_file {
        logger_config = logger_config
            .with_file_output(path)
            .with_json_output(config.log_json);
    }
    if let Err(e) = logger::init_with_config(logger_config) {
        eprintln!("{}", e);
    }
    log::debug!(
        "Model: {}, language: {}, image probe: {}",
        config.gemini.model,
        config.language,
        config.images.probe_enabled && !cli.no_probe
    );

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = if cli.no_probe {
        config.with_probe(false)
    } else {
        config
    };
    let session = ContentSession::from_config(&config)?;

    let mut random: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(SeededRandom::from_seed(seed)),
        None => Box::new(SeededRandom::from_entropy()),
    };

    let mut renderer = TerminalRenderer::stdout();
    if !cli.json {
        renderer.render_header()?;
    }

    let style = match cli.style {
        Some(style) => style,
        None => ask_style()?,
    };

    let mut request = GenerationRequest::new(style);
    if let Some(tone) = cli.tone {
        request = request.with_tone(tone);
    }
    if let Some(persona) = cli.persona {
        request = request.with_persona(persona);
    }

    if cli.print_prompt {
        let image = session.preselect_image(random.as_mut()).await;
        println!("{}", session.build_prompt(&request.with_image_hint(image)));
        return Ok(ExitCode::SUCCESS);
    }

    if cli.json {
        let report = session.submit(request, random.as_mut()).await;
        let body = match &report.outcome {
            Ok(interpretation) => serde_json::json!({
                "request_id": report.request_id,
                "state": report.state(),
                "degraded": interpretation.is_degraded(),
                "result": interpretation.result,
                "metrics": interpretation.result.metrics(),
            }),
            Err(ContentError::NoStructuredPayload { raw }) => serde_json::json!({
                "request_id": report.request_id,
                "state": report.state(),
                "error": "no structured payload in the model reply",
                "raw": raw,
            }),
            Err(e) => serde_json::json!({
                "request_id": report.request_id,
                "state": report.state(),
                "error": e.to_string(),
                "guidance": SERVICE_GUIDANCE,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(exit_code(&report));
    }

    let report = session.run(request, random.as_mut(), &mut renderer).await?;
    Ok(exit_code(&report))
}

fn exit_code(report: &RequestReport) -> ExitCode {
    match &report.outcome {
        Err(e) if e.blocks_display() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

fn ask_style() -> io::Result<ContentStyle> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "Choose a content style:")?;
    for (i, style) in ContentStyle::ALL.iter().enumerate() {
        writeln!(stdout, "  {}. {}", i + 1, style)?;
    }

    loop {
        write!(stdout, "Style [1-{}]: ", ContentStyle::ALL.len())?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no style selected",
            ));
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=ContentStyle::ALL.len()).contains(&n) => {
                return Ok(ContentStyle::ALL[n - 1])
            }
            _ => writeln!(stdout, "Please enter a number between 1 and {}.", ContentStyle::ALL.len())?,
        }
    }
}
