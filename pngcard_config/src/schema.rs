use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::settings::Settings;

const CONFIG_DIR: &str = "pngcard";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

/// How metadata is pulled out of image files.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Explicit exiftool binary. When unset the tool is searched on `PATH`,
    /// then next to the running executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exiftool_path: Option<String>,
    #[serde(default = "ExtractorConfig::default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "ExtractorConfig::default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,
    #[serde(default = "ExtractorConfig::default_single_timeout_secs")]
    pub single_timeout_secs: u64,
    #[serde(default = "ExtractorConfig::default_per_file_workers")]
    pub per_file_workers: usize,
    #[serde(default = "ExtractorConfig::default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "ExtractorConfig::default_primary_tag")]
    pub primary_tag: String,
    #[serde(default = "ExtractorConfig::default_fallback_tag")]
    pub fallback_tag: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            exiftool_path: None,
            batch_size: Self::default_batch_size(),
            batch_timeout_secs: Self::default_batch_timeout_secs(),
            single_timeout_secs: Self::default_single_timeout_secs(),
            per_file_workers: Self::default_per_file_workers(),
            extensions: Self::default_extensions(),
            primary_tag: Self::default_primary_tag(),
            fallback_tag: Self::default_fallback_tag(),
        }
    }
}

impl ExtractorConfig {
    const fn default_batch_size() -> usize {
        100
    }

    const fn default_batch_timeout_secs() -> u64 {
        300
    }

    const fn default_single_timeout_secs() -> u64 {
        30
    }

    const fn default_per_file_workers() -> usize {
        4
    }

    fn default_extensions() -> Vec<String> {
        vec!["png".to_string()]
    }

    fn default_primary_tag() -> String {
        "chara".to_string()
    }

    fn default_fallback_tag() -> String {
        "ccv3".to_string()
    }
}

/// Values remembered between runs of the viewer.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    #[serde(default = "ViewerConfig::default_thumbnail_size")]
    pub thumbnail_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_folder: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: Self::default_thumbnail_size(),
            last_folder: None,
        }
    }
}

impl ViewerConfig {
    const fn default_thumbnail_size() -> u32 {
        crate::settings::DEFAULT_THUMBNAIL_SIZE
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load `~/pngcard/config.json`, or the defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Invalid config file {}: {e}", config_path.display())
        })?;

        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Persist the current values, e.g. after a settings change.
    pub fn save(&self) -> anyhow::Result<()> {
        Self::ensure_config_dir()?;
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        debug!(path = %config_path.display(), "Saved config");
        Ok(())
    }

    #[must_use]
    pub const fn settings(&mut self) -> Settings<'_> {
        Settings::new(&mut self.viewer)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);

        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Install exiftool, or set extractor.exiftool_path");
        println!("   2. Run 'pngcard info' to check that it is found");
        println!("   3. Run 'pngcard scan <DIR>' to list the cards in a folder");
        println!();
        println!("🔧 Configuration options:");
        println!("   - batch_size: Files per bulk exiftool call");
        println!("   - per_file_workers: Parallel single-file lookups for files the bulk calls missed");
        println!("   - extensions: File extensions that are scanned");
        println!();
        Ok(())
    }

    /// Write the default template to `config_path`. Refuses to overwrite.
    pub fn write_template(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "extractor": {
    "batch_size": 100,
    "batch_timeout_secs": 300,
    "single_timeout_secs": 30,
    "per_file_workers": 4,
    "extensions": ["png"],
    "primary_tag": "chara",
    "fallback_tag": "ccv3"
  },
  "viewer": {
    "thumbnail_size": 150
  }
}"#;

        std::fs::write(config_path, config_template)?;
        Ok(())
    }
}
