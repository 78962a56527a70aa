use pngcard_config::Config;
use tracing::info;

use super::{extractor_options, locate_exiftool};

/// Strategy for displaying the effective configuration.
///
/// This strategy outputs:
/// - where the config file lives and whether it exists
/// - the resolved exiftool and its version, or why it could not run
/// - extractor and viewer settings
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        let mut config = Config::load()?;

        println!("=== pngcard Configuration ===\n");

        println!("Config File:");
        println!("  Path: {}", config_path.display());
        if config_path.exists() {
            println!("  Status: Loaded");
        } else {
            println!("  Status: Not found, using defaults (run 'pngcard init')");
        }
        println!();

        let tool = locate_exiftool(&config.extractor);
        println!("Exiftool:");
        println!("  Program: {}", tool.program().display());
        info!("Checking exiftool version");
        match tool.version().await {
            Ok(version) => println!("  Version: {version}"),
            Err(e) => {
                println!("  Status: Not usable");
                println!("  Error: {e}");
            }
        }
        println!();

        let options = extractor_options(&config.extractor);
        println!("Extractor:");
        println!("  Batch Size: {}", options.batch_size);
        println!("  Batch Timeout: {}s", config.extractor.batch_timeout_secs);
        println!("  Single Timeout: {}s", config.extractor.single_timeout_secs);
        println!("  Per-file Workers: {}", options.per_file_workers);
        println!("  Extensions: {}", options.extensions.join(", "));
        println!(
            "  Tags: {} (fallback {})",
            options.primary_tag, options.fallback_tag
        );
        println!();

        let settings = config.settings();
        println!("Viewer:");
        println!("  Thumbnail Size: {}", settings.thumbnail_size());
        println!(
            "  Last Folder: {}",
            settings.last_folder().unwrap_or("(none)")
        );

        Ok(())
    }
}
