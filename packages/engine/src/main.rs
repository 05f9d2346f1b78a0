use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use quizpath_engine::config::EngineConfig;
use quizpath_engine::logging;
use quizpath_engine::{
    BetaSamplerKind, CatalogSnapshot, EngineRequest, InMemoryRepository, SelectionEngine,
    SelectionError,
};

/// Run one selection request against a catalog snapshot and print the JSON result.
#[derive(Parser, Debug)]
#[command(name = "quizpath-engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Adaptive question and study-content selection")]
struct Cli {
    /// Catalog snapshot (categories, questions, profiles, responses)
    snapshot: PathBuf,

    /// Request JSON: {"mode": "questions" | "timeBudget", "request": {...}}
    request: PathBuf,

    /// tracing filter directives
    #[arg(long, env = "RUST_LOG", default_value = logging::DEFAULT_FILTER)]
    log_level: String,

    /// Beta sampler for mastery draws (exact, normal); overrides QUIZPATH_SAMPLER
    #[arg(long, value_parser = parse_sampler)]
    sampler: Option<BetaSamplerKind>,
}

fn parse_sampler(raw: &str) -> Result<BetaSamplerKind, String> {
    BetaSamplerKind::from_str(raw).ok_or_else(|| format!("unknown sampler `{raw}`"))
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let _log_guard = logging::init_tracing(&cli.log_level);

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(code = err.code(), error = %err, "selection failed");
            let body = serde_json::to_string_pretty(&err.to_response())
                .unwrap_or_else(|_| err.to_string());
            println!("{body}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, SelectionError> {
    let mut config = EngineConfig::from_env();
    if let Some(kind) = cli.sampler {
        config.sampler = kind;
    }

    let snapshot = CatalogSnapshot::from_path(&cli.snapshot)?;
    let request = read_request(&cli.request)?;

    tracing::info!(
        categories = snapshot.categories.len(),
        questions = snapshot.questions.len(),
        "snapshot loaded"
    );
    let engine = SelectionEngine::from_repository(Arc::new(InMemoryRepository::new(snapshot)), config)?;

    let rendered = match request {
        EngineRequest::Questions(request) => {
            serde_json::to_string_pretty(&engine.select_questions(&request)?)
        }
        EngineRequest::TimeBudget(request) => {
            serde_json::to_string_pretty(&engine.select_categories_for_time_budget(&request)?)
        }
    };
    rendered.map_err(|e| SelectionError::invalid(format!("render result: {e}")))
}

fn read_request(path: &Path) -> Result<EngineRequest, SelectionError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SelectionError::invalid(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| SelectionError::invalid(format!("invalid request json: {e}")))
}
