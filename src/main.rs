// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use pocketpix::Config;
use pocketpix::backends::camera::SourceSpec;
use pocketpix::storage;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "pocketpix")]
#[command(about = "A 2000s pocket digicam for the terminal")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Capture source: `pattern`, a device index, a /dev/video* node or an image file
    #[arg(short, long, global = true)]
    source: Option<SourceSpec>,

    /// Config file (default: ~/.config/pocketpix/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive camera in the terminal (default)
    Terminal,

    /// List available cameras and filters
    List,

    /// Take one photo and save the plain and stamped copies
    Snap {
        /// Filter index (from 'pocketpix list')
        #[arg(short, long, default_value = "0")]
        filter: usize,

        /// Do not mirror the photo
        #[arg(long)]
        no_mirror: bool,

        /// Output directory (default: the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Terminal));
    init_logging(interactive)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    match cli.command {
        None | Some(Commands::Terminal) => {
            let source = cli.source.unwrap_or_else(|| config.source());
            pocketpix::terminal::run(&config, source)
        }
        Some(Commands::List) => Ok(cli::list_cameras()?),
        Some(Commands::Snap {
            filter,
            no_mirror,
            output,
        }) => Ok(cli::take_photo(
            &config,
            cli::SnapOptions {
                source: cli.source,
                filter,
                no_mirror,
                output,
            },
        )?),
    }
}

/// Set RUST_LOG to control the log level, e.g. RUST_LOG=pocketpix=debug
///
/// The terminal camera owns the screen, so it logs to a file in the cache
/// directory instead of stderr.
fn init_logging(interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if interactive {
        let dir = storage::ensure_directory(storage::log_directory())?;
        let file = std::fs::File::create(dir.join("pocketpix.log"))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .init();
    }
    Ok(())
}
