use anyhow::{Context, bail};
use clap::Parser;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_client::{AssessmentClient, ClientConfig, base_url_from_env_value};
use triage_core::assess_values;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Fetch patient vitals, classify risk, and optionally submit the assessment")]
struct Cli {
    /// POST the results to the assessment API
    #[arg(long)]
    submit: bool,
    /// Page size for GET /api/patients (max 20)
    #[arg(long, default_value_t = 20)]
    limit: u32,
    /// API key sent as x-api-key
    #[arg(long, env = "ASSESSMENT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Base URL of the assessment API
    #[arg(long, env = "ASSESSMENT_BASE_URL")]
    base_url: Option<String>,
    /// Read patient records from a JSON file instead of fetching them
    #[arg(long)]
    input: Option<PathBuf>,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Main entry point for the triage CLI
///
/// Fetches every patient page (or reads `--input`), prints the assessment as JSON on stdout,
/// and with `--submit` posts it and prints the endpoint's response.
///
/// # Environment Variables
/// - `ASSESSMENT_API_KEY`: API key, if `--api-key` is not given
/// - `ASSESSMENT_BASE_URL`: API base URL (default: "https://assessment.ksensetech.com")
/// - `RUST_LOG`: extra log filter directives
///
/// A `.env` file in the working directory is loaded first.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.debug { "triage=debug" } else { "triage=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let patients = match &cli.input {
        Some(path) => load_patients(path)?,
        None => connect(&cli)?
            .fetch_patients()
            .await
            .context("failed to fetch patients")?,
    };
    tracing::info!("Fetched {} patient records", patients.len());

    let result = assess_values(&patients);
    tracing::info!(
        "{} high risk, {} fever, {} data quality issue(s)",
        result.high_risk_patients.len(),
        result.fever_patients.len(),
        result.data_quality_issues.len()
    );

    println!("{}", serde_json::to_string_pretty(&result)?);

    if cli.submit {
        let response = connect(&cli)?
            .submit(&result)
            .await
            .context("failed to submit assessment")?;
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}

/// Build an API client from the command line and environment.
fn connect(cli: &Cli) -> anyhow::Result<AssessmentClient> {
    let api_key = cli
        .api_key
        .clone()
        .context("an API key is required (use --api-key or set ASSESSMENT_API_KEY)")?;

    let cfg = ClientConfig::new(base_url_from_env_value(cli.base_url.clone()), api_key, cli.limit)?
        .with_request_timeout(Duration::from_secs(cli.timeout));
    tracing::debug!("client config: {:?}", cfg);

    Ok(AssessmentClient::new(Arc::new(cfg))?)
}

fn load_patients(path: &Path) -> anyhow::Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    records_from_document(document)
}

/// Accepts either a bare array of records or a page object with a `data` array.
fn records_from_document(document: Value) -> anyhow::Result<Vec<Value>> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(mut page) => match page.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            _ => bail!("expected a `data` array in the input object"),
        },
        _ => bail!("expected a JSON array of patient records"),
    }
}
