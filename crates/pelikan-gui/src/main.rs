//! # pelikan-gui
//!
//! Desktop front end for the icon pipeline in `pelikan-core`.
//!
//! ```bash
//! cargo run -p pelikan-gui -- path/to/logo.png
//! ```
//!
//! Drop an image onto the window (or open one), adjust canvas, scale, radius
//! and shape, then save a PNG or a `.icns` next to its `.iconset`. The last
//! used parameters and folders are remembered between runs.

mod app;
mod editor;

use clap::Parser;
use pelikan_core::Settings;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pelikan-gui")]
#[command(about = "Icon Pelikan: a tiny brutalist icon generator")]
#[command(version)]
struct Args {
    /// Image to open on startup
    image: Option<PathBuf>,

    /// Settings file to use instead of the per-user one
    #[arg(long, conflicts_with = "no_settings")]
    settings: Option<PathBuf>,

    /// Don't read or write any settings file
    #[arg(long)]
    no_settings: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging();

    let settings_path = if args.no_settings {
        None
    } else {
        match args.settings {
            Some(path) => Some(path),
            None => Settings::default_path()
                .inspect_err(|e| warn!("settings disabled: {}", e))
                .ok(),
        }
    };

    app::run(settings_path, args.image).map_err(|e| e.into())
}
