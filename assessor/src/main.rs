//! Entry point for the assessor binary
//!
//! Loads a survey CSV, assesses every individual against the host countries
//! with the configured oracles and writes the results directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::info;

use assessor::{AssessmentConfig, AssessmentOrchestrator, CsvDatasetLoader, RealResultWriter, ResultWriter, TracingReporter};
use oracle::{
    parse_base_url, LlmSelector, LlmValidator, OracleMode, OracleSettings, PerformanceTracker, PermissiveValidator,
    ProviderClient, RandomSelector, RealPerformanceTracker, RealProviderClient, Selector, Validator,
};
use shared::logging;

const COMPONENT: &str = "assessor";

/// Multi-perspective host country assessment
#[derive(Parser)]
#[command(name = "assessor")]
#[command(about = "Assesses survey respondents against host countries from emotional, cultural and ethical perspectives")]
pub struct Args {
    /// Input survey CSV
    #[arg(long)]
    pub input: PathBuf,

    /// Output directory for results
    #[arg(long, default_value = "./results")]
    pub output: PathBuf,

    /// Only assess the first N rows
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Column holding a row identifier (defaults to the row index)
    #[arg(long)]
    pub id_column: Option<String>,

    /// Comma-separated host countries, in tie-break order
    #[arg(long, value_delimiter = ',')]
    pub countries: Option<Vec<String>>,

    /// Selector/validator rounds per (perspective, country)
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Oracle backend (ollama, openai, random); overrides ASSESS_ORACLE
    #[arg(long)]
    pub oracle: Option<OracleMode>,

    /// Model name; overrides ASSESS_MODEL
    #[arg(long)]
    pub model: Option<String>,

    /// Provider base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seed for the random oracle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Perspective assessments in flight per individual
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Individuals processed at once
    #[arg(long)]
    pub individual_concurrency: Option<usize>,

    /// Minimum gap between oracle calls (default 500 for LLM oracles, 0 for random)
    #[arg(long)]
    pub min_call_spacing_ms: Option<u64>,

    /// Per-call oracle timeout
    #[arg(long)]
    pub oracle_timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn oracle_settings(args: &Args) -> anyhow::Result<OracleSettings> {
    let mut settings = OracleSettings::from_env().context("failed to read oracle settings")?;

    if let Some(mode) = args.oracle {
        if mode != settings.mode {
            let api_key = settings.api_key.take();
            settings = OracleSettings::for_mode(mode);
            settings.api_key = api_key;
        }
    }
    if let Some(model) = &args.model {
        settings.model = model.clone();
    }
    if let Some(url) = &args.base_url {
        settings.base_url = parse_base_url(url)?;
    }
    if let Some(secs) = args.oracle_timeout_secs {
        settings.request_timeout = Duration::from_secs(secs);
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    Ok(settings)
}

fn assessment_config(args: &Args, settings: &OracleSettings) -> AssessmentConfig {
    let mut config = AssessmentConfig::default();

    if let Some(countries) = &args.countries {
        config = config.with_countries(countries.iter().map(|c| c.trim().to_string()).collect());
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency.max_in_flight = concurrency;
    }
    if let Some(individuals) = args.individual_concurrency {
        config.concurrency.individual_concurrency = individuals;
    }
    config.concurrency.min_call_spacing = match (args.min_call_spacing_ms, settings.mode) {
        (Some(ms), _) => Duration::from_millis(ms),
        (None, OracleMode::Random) => Duration::ZERO,
        (None, _) => config.concurrency.min_call_spacing,
    };
    config.oracle_timeout = settings.request_timeout;

    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let settings = oracle_settings(&args)?;
    let config = assessment_config(&args, &settings);

    logging::log_startup(
        COMPONENT,
        &format!(
            "{} oracle ({}), {} host countries, input {}",
            settings.mode,
            settings.model,
            config.countries.len(),
            args.input.display()
        ),
    );

    let tracker = Arc::new(RealPerformanceTracker::new());

    let (selector, validator): (Arc<dyn Selector>, Arc<dyn Validator>) = match settings.mode {
        OracleMode::Random => (Arc::new(RandomSelector::new(settings.seed)), Arc::new(PermissiveValidator)),
        OracleMode::Ollama | OracleMode::OpenAi => {
            let client: Arc<dyn ProviderClient> =
                Arc::new(RealProviderClient::new(settings.clone()).context("failed to create oracle client")?);
            (
                Arc::new(LlmSelector::new(client.clone(), tracker.clone())),
                Arc::new(LlmValidator::new(client, tracker.clone())),
            )
        }
    };

    let orchestrator = AssessmentOrchestrator::new(config, selector, validator, Arc::new(TracingReporter))
        .context("invalid assessment configuration")?;

    let mut loader = CsvDatasetLoader::new(&args.input);
    if let Some(column) = &args.id_column {
        loader = loader.with_id_column(column.clone());
    }
    if let Some(size) = args.sample_size {
        loader = loader.with_sample_size(size);
    }
    let rows = loader
        .load()
        .with_context(|| format!("failed to load dataset {}", args.input.display()))?;

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => logging::log_shutdown(COMPONENT, "Received Ctrl+C signal, writing partial results"),
            Err(err) => {
                logging::log_error(COMPONENT, "Signal handling", &err);
                std::future::pending::<()>().await;
            }
        }
    };
    let report = orchestrator.assess_dataset_until(rows, shutdown).await;

    let writer = RealResultWriter::new(&args.output);
    let written = writer.write(&report).await.context("failed to write results")?;

    let summary = &report.summary;
    info!(
        total = report.total_records,
        assessed = report.assessments.len(),
        rejected = report.rejected.len(),
        errored = report.failures.len(),
        interrupted = report.interrupted,
        "Assessment complete"
    );
    if report.total_records > 0 {
        info!(
            "Success rate: {:.1}%",
            report.assessments.len() as f64 / report.total_records as f64 * 100.0
        );
    }
    for (country, count) in &summary.country_recommendations {
        info!(country = %country, count, "Recommendations");
    }

    if settings.mode != OracleMode::Random {
        for (role, stats) in tracker.get_stats().await? {
            info!(
                %role,
                requests = stats.total_requests,
                failed = stats.failed_requests,
                tokens = stats.total_tokens,
                avg_ms = stats.average_response_time_ms().unwrap_or(0),
                "Oracle usage"
            );
        }
    }

    logging::log_success(
        COMPONENT,
        &format!("Wrote {} files to {}", written.len(), args.output.display()),
    );
    Ok(())
}
