use std::path::PathBuf;
use std::sync::Arc;

use pngcard_config::Config;
use pngcard_core::CardRecord;
use pngcard_decode::CardDecoder;
use pngcard_extract::Progress;
use tracing::{info, warn};

use super::{build_extractor, display_name};

/// Input parameters for the Scan command strategy.
#[derive(Debug, Clone)]
pub struct ScanInput {
    /// Folder to scan. `None` reuses the last scanned folder.
    pub dir: Option<PathBuf>,
    pub recursive: bool,
    pub json: bool,
}

/// Strategy for listing every card in a folder.
///
/// Progress goes to stderr so stdout holds only the listing. The folder is
/// remembered as the viewer's last folder.
#[derive(Debug, Clone, Copy)]
pub struct ScanStrategy;

impl super::CommandStrategy for ScanStrategy {
    type Input = ScanInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        let dir = match input.dir {
            Some(dir) => dir,
            None => config.settings().last_folder().map(PathBuf::from).ok_or_else(|| {
                anyhow::anyhow!("No folder given and no previous folder remembered")
            })?,
        };
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {}", dir.display());
        }

        let extractor = build_extractor(&config.extractor);
        let report: Progress<'_> = &|done, total| {
            eprint!("\rReading metadata: {done}/{total}");
            if done == total {
                eprintln!();
            }
        };
        let payloads = extractor
            .extract_directory(&dir, input.recursive, Some(report))
            .await;

        let decoder = CardDecoder::new();
        let cards = decoder.decode_all(&payloads);
        let decoded = cards.values().filter(|card| card.is_some()).count();
        info!(
            "Decoded {}/{} cards in {}",
            decoded,
            cards.len(),
            dir.display()
        );

        if input.json {
            let records: Vec<&CardRecord> = cards.values().flatten().map(Arc::as_ref).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else {
            for (identity, card) in &cards {
                println!("{}", listing_line(identity, card.as_deref()));
            }
        }

        let folder = dir.canonicalize().unwrap_or(dir);
        config.settings().set_last_folder(folder.display().to_string());
        if let Err(e) = config.save() {
            warn!("Failed to remember last folder: {e}");
        }

        Ok(())
    }
}

fn listing_line(identity: &str, card: Option<&CardRecord>) -> String {
    let file = display_name(identity);
    let Some(card) = card else {
        return format!("{file}\t(unreadable card)");
    };

    let tags = if card.tags().is_empty() {
        "-".to_string()
    } else {
        card.tags().join(", ")
    };
    format!(
        "{file}\t{}\t[{tags}]\t{} greeting(s)",
        card.name(),
        card.greeting_count()
    )
}
