use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cardsight::{CardRecognizer, RecognizerConfig};

#[derive(Parser)]
#[command(name = "cardsight")]
#[command(about = "Recognize playing cards in an image")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON file overriding calibrated thresholds
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Save rectified card images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => RecognizerConfig::from_json_file(path)?,
        None => RecognizerConfig::default(),
    };

    tracing::info!(path = ?args.image_path, "loading image");
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    let recognition = CardRecognizer::new().with_config(config).recognize(&img)?;

    if let Some(debug_dir) = &args.debug_out {
        recognition.save_debug(debug_dir)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recognition)?);
        return Ok(());
    }

    if recognition.cards.is_empty() {
        println!("No card detected.");
    } else {
        for card in &recognition.cards {
            let bbox = &card.bounding_box;
            println!(
                "{}{} at ({}, {}) {}x{}",
                card.value,
                card.suit.letter(),
                bbox.x,
                bbox.y,
                bbox.width,
                bbox.height
            );
        }
    }

    for failure in &recognition.failures {
        println!("  candidate {} skipped: {}", failure.index + 1, failure.reason);
    }

    Ok(())
}
