//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is its own strategy type with its own input, dispatched
//! statically from `main`.

use std::path::Path;
use std::time::Duration;

use pngcard_config::ExtractorConfig;
use pngcard_extract::{ExifTool, ExtractorOptions, MetadataExtractor};
use tracing::debug;

mod info;
mod init;
mod scan;
mod show;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use scan::{ScanInput, ScanStrategy};
pub use show::{ShowInput, ShowStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy names its own input type, so `main` passes typed arguments
/// without boxing or casting.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error for configuration or usage problems. Files that fail
    /// to extract or decode are reported, not returned as errors.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

fn extractor_options(config: &ExtractorConfig) -> ExtractorOptions {
    ExtractorOptions {
        batch_size: config.batch_size,
        per_file_workers: config.per_file_workers,
        extensions: config.extensions.clone(),
        primary_tag: config.primary_tag.clone(),
        fallback_tag: config.fallback_tag.clone(),
    }
}

fn locate_exiftool(config: &ExtractorConfig) -> ExifTool {
    ExifTool::locate(config.exiftool_path.as_deref().map(Path::new)).with_timeouts(
        Duration::from_secs(config.batch_timeout_secs),
        Duration::from_secs(config.single_timeout_secs),
    )
}

/// Extractor wired to the configured exiftool and options.
fn build_extractor(config: &ExtractorConfig) -> MetadataExtractor<ExifTool> {
    let tool = locate_exiftool(config);
    debug!("Using exiftool at {}", tool.program().display());
    MetadataExtractor::with_options(tool, extractor_options(config))
}

/// Last path component of a source identity, for compact listings.
fn display_name(identity: &str) -> &str {
    Path::new(identity)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(identity)
}
