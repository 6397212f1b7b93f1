//! Drives one page session from the command line: pick a file, validate it,
//! optionally write its preview, then classify it.

mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use upload_core::{ClientConfig, PageLayout, PageSession, UploadCandidate};

#[derive(Debug, Parser)]
#[command(
    name = "poultry-classify",
    version = env!("POULTRY_CLASSIFY_VERSION"),
    about = "Validate a poultry image and send it to the classification service"
)]
pub struct Args {
    /// Image to classify.
    pub file: PathBuf,
    /// TOML config file (base_url, alert_ttl_secs).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Overrides `base_url` from the config.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Write the preview data URL to this file.
    #[arg(long)]
    pub preview_out: Option<PathBuf>,
    /// Stop after validation.
    #[arg(long)]
    pub validate_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rejected,
    Validated,
    Classified,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Rejected => ExitCode::from(2),
            Outcome::Validated | Outcome::Classified => ExitCode::SUCCESS,
        }
    }
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    Ok(config)
}

pub async fn run(args: Args) -> Result<Outcome> {
    let config = load_config(&args)?;
    tracing::debug!(base_url = %config.base_url, "session configured");
    let mut session = PageSession::from_config(&config, PageLayout::default());

    let candidate = UploadCandidate::from_path(&args.file)?;
    let now = Instant::now();
    let verdict = session.select_file(candidate, now);
    if !verdict.is_accepted() {
        for alert in session.alerts(now) {
            eprintln!("{}", report::alert_line(alert));
        }
        return Ok(Outcome::Rejected);
    }

    if let Some(out) = &args.preview_out {
        match session.settle_preview().await {
            Some(preview) => tokio::fs::write(out, preview.data_url)
                .await
                .with_context(|| format!("cannot write preview to {}", out.display()))?,
            None => tracing::warn!("preview unavailable; nothing written"),
        }
    }

    if args.validate_only {
        println!("{}", serde_json::to_string(&verdict)?);
        return Ok(Outcome::Validated);
    }

    let result = session.classify_current().await?;
    if let Some(line) = report::summary(&result) {
        eprintln!("{line}");
    }
    println!("{}", report::result_json(&result)?);
    Ok(Outcome::Classified)
}
