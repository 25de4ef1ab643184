//! `asrt-client`: recognize WAV files against an ASRT server.
//!
//! ```text
//! asrt-client [--config <settings.toml>] [--speech] <file.wav>...
//! asrt-client [--config <settings.toml>] --language ni3 hao3 a1
//! ```
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`SdkConfig`] (explicit path, or the platform default; falls back
//!    to defaults on error).
//! 3. Create the tokio runtime (multi-thread, 2 workers).
//! 4. Connect the recognizer and run each request in turn.

use std::path::PathBuf;

use anyhow::{Context, Result};
use asrt_sdk::{
    config::SdkConfig,
    recognizer::{connect, SpeechRecognizer},
    wave::Wave,
};
use clap::Parser;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "asrt-client")]
#[command(about = "Recognize WAV files with an ASRT server", long_about = None)]
#[command(version)]
struct Args {
    /// Settings file (defaults to the platform config dir)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Acoustic model only: print pinyin instead of text
    #[arg(short, long)]
    speech: bool,

    /// Pinyin sequence for the language model
    #[arg(short, long, value_name = "PINYIN", num_args = 1..)]
    language: Vec<String>,

    /// WAV files to recognize
    #[arg(required_unless_present = "language")]
    files: Vec<PathBuf>,
}

fn load_config(path: Option<&std::path::Path>) -> SdkConfig {
    let loaded = match path {
        Some(p) => SdkConfig::load_from(p),
        None => SdkConfig::load(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        SdkConfig::default()
    })
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn run(recognizer: &dyn SpeechRecognizer, args: &Args) -> Result<()> {
    if !args.language.is_empty() {
        let response = recognizer.recognize_language(&args.language).await?;
        println!("{}", response.result);
    }

    for path in &args.files {
        if args.speech {
            let wave = Wave::load(path).with_context(|| format!("reading {}", path.display()))?;
            let response = recognizer
                .recognize_speech(
                    &wave.raw_samples(),
                    wave.frame_rate(),
                    wave.channels(),
                    wave.sample_width(),
                )
                .await?;
            println!("{}: {}", path.display(), response.result);
            continue;
        }

        let responses = recognizer
            .recognize_file(path)
            .await
            .with_context(|| format!("recognizing {}", path.display()))?;
        let text: String = responses
            .iter()
            .map(|r| r.result.to_string())
            .collect();
        println!("{}: {text}", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // 2. Configuration
    let config = load_config(args.config.as_deref());

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Recognizer
    let recognizer = connect(&config)?;
    rt.block_on(run(recognizer.as_ref(), &args))
}
