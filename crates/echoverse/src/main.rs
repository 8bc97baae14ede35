//! echoverse: audiobook creator
//!
//! Usage:
//!   echoverse --text "..." [--tone inspiring]   - Convert text once
//!   echoverse --file story.txt [--voice ID]     - Convert a .txt file once
//!   echoverse                                   - Start interactive mode
//!   echoverse --status                          - Show which voice engine is active

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use echoverse_core::{Config, Orchestrator, Submission, UploadedFile};
use tracing_subscriber::EnvFilter;

/// EchoVerse - audiobook creator
#[derive(Debug, Parser)]
#[command(name = "echoverse", version, about)]
struct Args {
    /// Text to convert
    #[arg(short, long)]
    text: Option<String>,

    /// .txt file to convert (takes precedence over --text)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Tone: neutral, suspenseful or inspiring
    #[arg(long, default_value = "neutral")]
    tone: String,

    /// Premium voice (ignored by the free engine)
    #[arg(short, long)]
    voice: Option<String>,

    /// Where to write the MP3 (default: audiobook.mp3)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (default: echoverse.toml or .streamlit/secrets.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show system status and exit
    #[arg(long)]
    status: bool,

    /// List premium voices and exit
    #[arg(long)]
    list_voices: bool,

    /// Start interactive mode even when input is given
    #[arg(short, long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => Config::from_toml_file(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    let synthesizer = echoverse_voice::build_synthesizer(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create speech backends: {}", e))?;
    let orchestrator = Orchestrator::new(Arc::new(config.tts.clone()), synthesizer);

    if args.list_voices {
        cli::print_voices(&orchestrator);
        return Ok(ExitCode::SUCCESS);
    }

    if args.status {
        cli::print_status(&orchestrator, &config);
        return Ok(ExitCode::SUCCESS);
    }

    let tone = cli::parse_tone(&args.tone);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.file_name));

    if args.interactive || (args.text.is_none() && args.file.is_none()) {
        tracing::info!("Running in interactive mode");
        let settings = cli::ReplSettings {
            tone,
            voice: args.voice,
            output,
        };
        cli::run_interactive(&orchestrator, &config, settings).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let file = match &args.file {
        Some(path) => Some(
            UploadedFile::from_path(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        ),
        None => None,
    };

    let submission = Submission {
        text: args.text,
        file,
        tone,
        voice_id: args.voice,
    };

    let outcome = orchestrator.submit(submission).await;
    if cli::render_outcome(outcome, &output)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
