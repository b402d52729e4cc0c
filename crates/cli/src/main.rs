//! `piiveil` command-line front end
//!
//! Loads configuration, wires the optional HTTP capabilities into the
//! pipeline and runs one document through it.

mod request;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use piiveil_core::RedactionService;
use piiveil_domain::Config;
use piiveil_infra::{config, init_logging, media, HttpEntityRecognizer, HttpPolicyAdvisor};
use serde::Serialize;
use tracing::{info, warn};

use crate::request::DocumentRequest;

#[derive(Parser)]
#[command(name = "piiveil")]
#[command(about = "Detect and redact PII in OCR'd documents", version)]
struct Cli {
    /// Config file (TOML or JSON); probed in standard locations when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Redact a document request and, optionally, its page images
    Redact {
        /// JSON request: `{"pages": [[word...]...]}` or `{"text", "tokens"?}`
        #[arg(long)]
        input: PathBuf,

        /// Page images in page order
        #[arg(long = "page")]
        pages: Vec<PathBuf>,

        /// Directory for report.json and redacted pages; report goes to
        /// stdout when omitted
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// List detected entities in a plain text file
    Detect {
        #[arg(long)]
        text_file: PathBuf,
    },
}

#[derive(Serialize)]
struct DetectedEntity<'a> {
    #[serde(rename = "type")]
    pii_type: &'a str,
    start: usize,
    end: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = config::load(cli.config).context("loading configuration")?;
    init_logging(&config.logging).context("initializing logging")?;

    let service = build_service(&config)?;

    match cli.command {
        Commands::Redact { input, pages, out_dir } => {
            redact(&service, &input, &pages, out_dir.as_deref()).await
        }
        Commands::Detect { text_file } => detect(&service, &text_file).await,
    }
}

fn build_service(config: &Config) -> Result<RedactionService> {
    let mut service = RedactionService::from_config(config).context("building pipeline")?;

    if let Some(recognizer) = HttpEntityRecognizer::from_config(&config.detection.ner) {
        service = service.with_recognizer(Arc::new(recognizer));
    }
    if let Some(advisor) = HttpPolicyAdvisor::from_config(&config.policy.advisory) {
        service = service.with_advisor(Arc::new(advisor));
    } else if config.policy.advisory.enabled {
        warn!(
            fail_action = %config.policy.fail_action,
            "policy advisory enabled but unavailable; applying the fail action"
        );
    }

    Ok(service)
}

async fn redact(
    service: &RedactionService,
    input: &Path,
    pages: &[PathBuf],
    out_dir: Option<&Path>,
) -> Result<()> {
    let document = DocumentRequest::read(input)?.into_input();
    let report = service.process(document).await?;

    let rasters = pages
        .iter()
        .map(|path| media::read_page(path).with_context(|| format!("page {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let Some(out_dir) = out_dir else {
        if !rasters.is_empty() {
            warn!(pages = rasters.len(), "page images ignored without --out-dir");
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    std::fs::write(out_dir.join("report.json"), serde_json::to_vec_pretty(&report)?)?;
    std::fs::write(out_dir.join("redacted.txt"), &report.redacted_text)?;

    let redacted = service.redact_media(rasters, &report);
    for (index, page) in redacted.iter().enumerate() {
        media::write_png(&out_dir.join(format!("page-{index}.png")), page)?;
    }

    info!(
        out_dir = %out_dir.display(),
        entities = report.decisions.len(),
        boxes = report.boxes.len(),
        pages = redacted.len(),
        "redaction written"
    );
    Ok(())
}

async fn detect(service: &RedactionService, text_file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(text_file)
        .with_context(|| format!("reading {}", text_file.display()))?;
    let entities = service.detect(&text).await?;

    let listed: Vec<DetectedEntity<'_>> = entities
        .iter()
        .map(|e| DetectedEntity { pii_type: e.pii_type.as_str(), start: e.start, end: e.end })
        .collect();
    println!("{}", serde_json::to_string_pretty(&listed)?);
    Ok(())
}
