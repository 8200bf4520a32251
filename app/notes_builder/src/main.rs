mod config;

use std::path::{Path, PathBuf};

use clap::Parser;
use config::NotesBuilderConfig;
use minpair_core::{FfmpegTool, FptTtsClient, Pipeline};
use tracing::{error, info};

/// Build a minimal-pairs flashcard deck: per-word TTS audio plus a notes CSV.
#[derive(Parser, Debug)]
#[command(name = "notes_builder")]
struct Args {
    /// API key for the speech service
    api_key: String,

    /// Media directory scanned for already-combined clips
    media_dir: PathBuf,

    /// Input listing; defaults to <base_dir>/minimal-pair-components.csv
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,minpair_core=info,notes_builder=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    // Load configuration (defaults + env + optional TOML overlay), then let
    // the CLI arguments win
    let mut cfg = NotesBuilderConfig::load();
    cfg.tts.api_key = args.api_key;
    cfg.pipeline.media_dir = args.media_dir;

    let input_path = args
        .input
        .unwrap_or_else(|| cfg.pipeline.base_dir.join("minimal-pair-components.csv"));

    if let Err(e) = run(cfg, &input_path).await {
        error!(target = "notes_builder", error = %e, "Run failed");
        std::process::exit(1);
    }
}

async fn run(cfg: NotesBuilderConfig, input_path: &Path) -> minpair_core::Result<()> {
    info!(
        target = "notes_builder",
        input = %input_path.display(),
        "Starting notes build"
    );

    let input = tokio::fs::read_to_string(input_path).await?;
    let speech = FptTtsClient::new(cfg.tts)?;
    let media = FfmpegTool::new(cfg.media);
    let pipeline = Pipeline::new(cfg.pipeline, speech, media);

    let export_dir = pipeline.run(&input).await?;
    info!(
        target = "notes_builder",
        export_dir = %export_dir.display(),
        "Export bundle written"
    );
    Ok(())
}
