use std::io::{self, Read, Write};
use std::process::ExitCode;

use courier_rank::config::{LoggingSettings, Settings};
use courier_rank::core::{Orchestrator, RankingError};
use courier_rank::models::{ErrorResponse, RankingRequest, RankingResponse};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use validator::Validate;

/// Failures of the batch front end
#[derive(Debug, Error)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

impl CliError {
    fn to_response(&self) -> ErrorResponse {
        match self {
            Self::Ranking(err) => ErrorResponse::from(err),
            Self::Config(_) => ErrorResponse::new("invalid_config", self.to_string()),
            Self::Io(_) => ErrorResponse::new("io_error", self.to_string()),
            Self::Json(_) => ErrorResponse::new("invalid_json", self.to_string()),
            Self::Validation(_) => ErrorResponse::new("validation_failed", self.to_string()),
        }
    }
}

fn init_logging(settings: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(io::stderr);

    match settings.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.init(),
    }
}

/// Read the request document from the given path, or stdin for `-`/no path
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(p) => std::fs::read_to_string(p),
    }
}

fn run(settings: &Settings, input_path: Option<&str>) -> Result<(), CliError> {
    let orchestrator = Orchestrator::new(settings.ahp.build_engine()?);
    info!("AHP weight engine initialized");

    let input = read_input(input_path)?;
    let document: RankingRequest = serde_json::from_str(&input)?;
    document.validate()?;

    let defaults = settings.ranking.default_options();
    defaults.validate()?;

    let (request, candidates, options) = document.into_parts(&settings.vehicles, defaults)?;

    let outcome = orchestrator.rank(&request, &candidates, &options)?;
    let response = RankingResponse::from(outcome);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &response)?;
    writeln!(stdout)?;

    Ok(())
}

fn fail(err: CliError) -> ExitCode {
    error!("{}", err);
    match serde_json::to_string_pretty(&err.to_response()) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize error response: {}", e),
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            return fail(e.into());
        }
    };

    init_logging(&settings.logging);
    info!("Configuration loaded successfully");

    let input_path = std::env::args().nth(1);

    match run(&settings, input_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}
