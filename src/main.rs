use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use quotemark::{annotate, Claim, Segment, SegmentIndex};

#[derive(Parser, Debug)]
#[command(name = "quotemark")]
#[command(about = "Locates claim quotes inside segmented article text for highlighting")]
#[command(version)]
struct Args {
    /// Document file: JSON array of {"id", "text"} segments in reading order
    document: PathBuf,

    /// Claims file: JSON array of {"quote", "stance", "why_polarising", ...}
    claims: PathBuf,

    /// Write the results JSON here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print the results JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Validate inputs early to fail with a clear error
    if !args.document.exists() {
        anyhow::bail!("Document file does not exist: {}", args.document.display());
    }
    if !args.claims.exists() {
        anyhow::bail!("Claims file does not exist: {}", args.claims.display());
    }

    let document_json = tokio::fs::read_to_string(&args.document)
        .await
        .with_context(|| format!("Failed to read document file {}", args.document.display()))?;
    let claims_json = tokio::fs::read_to_string(&args.claims)
        .await
        .with_context(|| format!("Failed to read claims file {}", args.claims.display()))?;

    let segments: Vec<Segment> = serde_json::from_str(&document_json)
        .context("Document file is not a JSON array of segments")?;
    let claims: Vec<Claim> =
        serde_json::from_str(&claims_json).context("Claims file is not a JSON array of claims")?;

    info!(segments = segments.len(), claims = claims.len(), "Inputs loaded");

    let index = SegmentIndex::build(segments);
    let report = annotate(&index, &claims);

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &args.out {
        Some(path) => {
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            info!(out = %path.display(), "Results written");
        }
        None => println!("{rendered}"),
    }

    eprintln!("Matched {} of {} quotes", report.matched, report.total);
    Ok(())
}
