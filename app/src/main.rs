#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CommandStrategy, InfoStrategy, InitStrategy, ScanInput, ScanStrategy, ShowInput,
    ShowStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "pngcard")]
#[command(about = "Browse character cards embedded in PNG images", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the character cards found in a folder
    Scan {
        /// Folder to scan (defaults to the last scanned folder)
        dir: Option<PathBuf>,

        /// Descend into subfolders
        #[arg(short, long)]
        recursive: bool,

        /// Print the cards as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Show one character card
    Show {
        /// Image file holding the card
        file: PathBuf,

        /// Greeting to print, starting at 1
        #[arg(short = 'g', long, default_value_t = 1)]
        greeting: usize,

        /// Print the card as JSON
        #[arg(long)]
        json: bool,
    },
    /// Initialize configuration
    Init,
    /// Show configuration and exiftool status
    Info,
    /// Show version
    Version,
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Scan {
            dir,
            recursive,
            json,
        } => {
            ScanStrategy
                .execute(ScanInput {
                    dir,
                    recursive,
                    json,
                })
                .await?;
        }
        Commands::Show {
            file,
            greeting,
            json,
        } => {
            ShowStrategy
                .execute(ShowInput {
                    file,
                    greeting,
                    json,
                })
                .await?;
        }
        Commands::Init => InitStrategy.execute(()).await?,
        Commands::Info => InfoStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}
