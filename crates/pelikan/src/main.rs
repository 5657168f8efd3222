use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use pelikan::options::{BackendArg, ParamArgs};
use pelikan_core::bundle::{format_size, BundleOptions, DEFAULT_APP_NAME, DEFAULT_IDENTIFIER};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pelikan")]
#[command(about = "Turn a square image into macOS-style app icons")]
#[command(version)]
struct Cli {
    /// More log output (-v for debug, -vv for trace). RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single masked icon PNG
    Render {
        /// Source image (png, jpeg, webp, tiff, bmp)
        input: PathBuf,
        /// Path to write the PNG to
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Export an Apple .iconset folder, optionally packed into .icns
    Iconset {
        /// Source image (png, jpeg, webp, tiff, bmp)
        input: PathBuf,
        /// Folder that receives <name>.iconset (and <name>.icns)
        #[arg(short, long)]
        output: PathBuf,
        /// Base name of the iconset and .icns
        #[arg(long, default_value = "icon")]
        name: String,
        /// Also produce the .icns file
        #[arg(long)]
        icns: bool,
        /// How to pack the .icns
        #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
        backend: BackendArg,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Wrap a built executable into a macOS .app bundle
    Bundle {
        /// The executable to bundle
        #[arg(long)]
        executable: PathBuf,
        /// App icon: an .icns file or any image to convert
        #[arg(long)]
        icon: Option<PathBuf>,
        /// Directory that receives <name>.app
        #[arg(short, long, default_value = "dist")]
        output: PathBuf,
        /// App name shown in Finder and the menu bar
        #[arg(long, default_value = DEFAULT_APP_NAME)]
        name: String,
        /// Bundle identifier
        #[arg(long, default_value = DEFAULT_IDENTIFIER)]
        identifier: String,
        /// Bundle version
        #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
        version: String,
        /// Directory copied into Contents/Resources/assets
        #[arg(long)]
        resources: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            params,
        } => match pelikan::commands::render::run(&input, &output, &params.to_params()) {
            Ok(()) => {
                println!("Saved -> {}", output.display());
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(2);
            }
        },
        Commands::Iconset {
            input,
            output,
            name,
            icns,
            backend,
            params,
        } => {
            let backend = icns.then(|| backend.into());
            match pelikan::commands::iconset::run(&input, &output, &name, &params.to_params(), backend) {
                Ok(result) => {
                    println!("Iconset written to {}", result.iconset.display());
                    if let Some(icns) = result.icns {
                        println!(".icns generated at {}", icns.display());
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(2);
                }
            }
        }
        Commands::Bundle {
            executable,
            icon,
            output,
            name,
            identifier,
            version,
            resources,
        } => {
            let options = BundleOptions {
                executable,
                icon,
                output_dir: output,
                name,
                identifier,
                version,
                resources,
            };
            match pelikan::commands::bundle::run(&options) {
                Ok(report) => {
                    println!("App bundle created at: {}", report.path.display());
                    println!("App bundle size: {}", format_size(report.size_bytes));
                    println!("You can run it with: open '{}'", report.path.display());
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(2);
                }
            }
        }
    }
}
