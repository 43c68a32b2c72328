//! ClipScribe CLI
//!
//! Headless caption tooling: imports any supported transcript format and
//! emits the canonical document and/or the WebVTT subtitle track.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use clipscribe_core::core::{
    document::{import_canonical, serialize_transcript, StructuralValidator},
    formats::{export_vtt, parse_auto_transcript, parse_plain_text, parse_timed_blocks},
    transcript::Transcript,
    video::VideoRef,
};

/// ClipScribe main parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose engine logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a transcript file and emit caption output
    Convert {
        /// Input file to import
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(short, long, value_enum)]
        format: InputFormat,

        /// Video URL (required for formats that don't carry one)
        #[arg(short, long)]
        url: Option<String>,

        /// Language tag for formats that don't carry one
        #[arg(short, long, default_value = "en")]
        language: String,

        /// What to emit
        #[arg(short, long, value_enum, default_value_t = Emit::Vtt)]
        emit: Emit,
    },

    /// Import a transcript file and print its per-speaker presentation hints
    Speakers {
        /// Input file to import
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(short, long, value_enum)]
        format: InputFormat,

        /// Video URL (required for formats that don't carry one)
        #[arg(short, long)]
        url: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    /// Canonical structured document (JSON)
    Canonical,
    /// Auto-transcript XML (timed-text elements)
    YoutubeXml,
    /// Blank-line-separated time-coded text blocks
    Blocks,
    /// Plain newline-delimited text
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Emit {
    /// WebVTT subtitle track
    Vtt,
    /// Canonical document JSON
    Canonical,
    /// Both, track first
    Both,
}

async fn import(input: &PathBuf, format: InputFormat, url: Option<&str>, language: &str) -> anyhow::Result<Transcript> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let video = || -> anyhow::Result<VideoRef> {
        let url = url.context("--url is required for this input format")?;
        Ok(VideoRef::parse(url)?)
    };

    let transcript = match format {
        InputFormat::Canonical => import_canonical(&raw, &StructuralValidator).await?,
        InputFormat::YoutubeXml => {
            Transcript::from_lines(video()?, language, parse_auto_transcript(&raw)?)
        }
        InputFormat::Blocks => {
            Transcript::from_lines(video()?, language, parse_timed_blocks(&raw)?)
        }
        InputFormat::Text => Transcript::from_lines(video()?, language, parse_plain_text(&raw)),
    };
    Ok(transcript)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match &cli.command {
        Commands::Convert {
            input,
            format,
            url,
            language,
            emit,
        } => {
            let transcript = import(input, *format, url.as_deref(), language).await?;

            if matches!(emit, Emit::Vtt | Emit::Both) {
                println!("{}", export_vtt(&transcript));
            }
            if matches!(emit, Emit::Both) {
                println!();
            }
            if matches!(emit, Emit::Canonical | Emit::Both) {
                let document = serialize_transcript(&transcript);
                println!("{}", serde_json::to_string_pretty(&document)?);
            }
        }

        Commands::Speakers { input, format, url } => {
            let transcript = import(input, *format, url.as_deref(), "en").await?;

            let mut presets = clipscribe_core::core::transcript::SpeakerPresetStore::new();
            presets.seed_from(&transcript);

            let view = presets.grouped_view();
            if view.is_empty() {
                println!("No speaker presentation hints found");
            } else {
                for (speaker, hints) in view {
                    let mut fields = Vec::new();
                    if let Some(position) = hints.position {
                        fields.push(format!("position:{position}%"));
                    }
                    if let Some(line) = hints.line {
                        fields.push(format!("line:{line}%"));
                    }
                    if let Some(size) = hints.size {
                        fields.push(format!("size:{size}%"));
                    }
                    if let Some(align) = hints.align {
                        fields.push(format!("align:{align}"));
                    }
                    println!("{speaker}: {}", fields.join(" "));
                }
            }
        }
    }

    Ok(())
}
