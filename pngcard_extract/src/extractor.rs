//! Batched, fault-tolerant tag extraction.
//!
//! Every batch walks down three tiers until each file has a payload or the
//! tiers run out:
//! 1. one bulk query for the primary tag,
//! 2. one bulk query for the fallback tag over the files still missing,
//! 3. per-file queries (primary, then fallback) over whatever is left.
//!
//! A failure at any tier only costs that tier's results for that batch, so one
//! corrupt file or hung tool call cannot wipe out a whole directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::discover::{candidate_files, has_accepted_extension, normalize_identity, path_identity};
use crate::tool::MetadataTool;

/// Tag written by the older card spec.
pub const PRIMARY_TAG: &str = "chara";
/// Tag written by the newer card spec, carrying the same logical payload.
pub const FALLBACK_TAG: &str = "ccv3";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_PER_FILE_WORKERS: usize = 4;

/// Identity → raw payload for one extraction run. Files without metadata have
/// no entry; payloads are never empty.
pub type ExtractionResult = BTreeMap<String, String>;

/// Progress callback: `(processed, total)` files, reported after each batch.
pub type Progress<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorOptions {
    pub batch_size: usize,
    pub per_file_workers: usize,
    pub extensions: Vec<String>,
    pub primary_tag: String,
    pub fallback_tag: String,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            per_file_workers: DEFAULT_PER_FILE_WORKERS,
            extensions: vec!["png".to_string()],
            primary_tag: PRIMARY_TAG.to_string(),
            fallback_tag: FALLBACK_TAG.to_string(),
        }
    }
}

pub struct MetadataExtractor<T> {
    tool: Arc<T>,
    options: ExtractorOptions,
}

impl<T: MetadataTool + 'static> MetadataExtractor<T> {
    #[must_use]
    pub fn new(tool: T) -> Self {
        Self::with_options(tool, ExtractorOptions::default())
    }

    #[must_use]
    pub fn with_options(tool: T, options: ExtractorOptions) -> Self {
        Self {
            tool: Arc::new(tool),
            options,
        }
    }

    #[must_use]
    pub fn tool(&self) -> &T {
        &self.tool
    }

    #[must_use]
    pub const fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Extract payloads for every candidate file under `dir`.
    ///
    /// Never fails: a missing directory, tool crashes and timeouts all just
    /// shrink the result.
    pub async fn extract_directory(
        &self,
        dir: &Path,
        recursive: bool,
        progress: Option<Progress<'_>>,
    ) -> ExtractionResult {
        let mut result = ExtractionResult::new();

        if !dir.is_dir() {
            warn!("Not a directory, nothing to extract: {}", dir.display());
            return result;
        }

        let files = candidate_files(dir, recursive, &self.options.extensions);
        if files.is_empty() {
            info!("No candidate files in {}", dir.display());
            return result;
        }

        let total = files.len();
        let batch_size = self.options.batch_size.max(1);
        info!(
            "Extracting metadata from {} files in {} (batch size {})",
            total,
            dir.display(),
            batch_size
        );

        let mut processed = 0;
        for (index, batch) in files.chunks(batch_size).enumerate() {
            self.extract_batch(index, batch, &mut result).await;
            processed += batch.len();
            if let Some(report) = progress {
                report(processed, total);
            }
        }

        info!("Found metadata in {}/{} files", result.len(), total);
        result
    }

    /// Extract the payload of one file, trying the primary then the fallback
    /// tag. Missing files and files with other extensions yield `None`.
    pub async fn extract_single(&self, file: &Path) -> Option<String> {
        if !file.is_file() || !has_accepted_extension(file, &self.options.extensions) {
            debug!("Skipping non-candidate file {}", file.display());
            return None;
        }
        query_file_tags(
            self.tool.as_ref(),
            file,
            &[&self.options.primary_tag, &self.options.fallback_tag],
        )
        .await
    }

    async fn extract_batch(&self, index: usize, batch: &[PathBuf], result: &mut ExtractionResult) {
        let primary = &self.options.primary_tag;
        let fallback = &self.options.fallback_tag;

        self.merge_bulk(index, batch, primary, result).await;

        let missing = still_missing(batch, result);
        if !missing.is_empty() {
            debug!(
                "Batch {}: {} files missing after -{}, trying -{}",
                index,
                missing.len(),
                primary,
                fallback
            );
            self.merge_bulk(index, &missing, fallback, result).await;
        }

        let missing = still_missing(batch, result);
        if !missing.is_empty() {
            debug!(
                "Batch {}: querying {} files individually",
                index,
                missing.len()
            );
            self.merge_per_file(missing, result).await;
        }
    }

    async fn merge_bulk(
        &self,
        index: usize,
        files: &[PathBuf],
        tag: &str,
        result: &mut ExtractionResult,
    ) {
        match self.tool.query_batch(files, tag).await {
            Ok(entries) => {
                for entry in entries {
                    if entry.payload.is_empty() {
                        continue;
                    }
                    result
                        .entry(normalize_identity(&entry.source_file))
                        .or_insert(entry.payload);
                }
            }
            Err(e) => warn!(
                "Batch {} bulk -{} failed for {} files ({}): {e}",
                index,
                tag,
                files.len(),
                e.kind()
            ),
        }
    }

    async fn merge_per_file(&self, files: Vec<PathBuf>, result: &mut ExtractionResult) {
        let permits = Arc::new(Semaphore::new(self.options.per_file_workers.max(1)));
        let tags = Arc::new([
            self.options.primary_tag.clone(),
            self.options.fallback_tag.clone(),
        ]);
        let mut tasks = JoinSet::new();

        for file in files {
            let tool = Arc::clone(&self.tool);
            let permits = Arc::clone(&permits);
            let tags = Arc::clone(&tags);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok()?;
                let [primary, fallback] = &*tags;
                let payload = query_file_tags(tool.as_ref(), &file, &[primary, fallback]).await?;
                Some((path_identity(&file), payload))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some((identity, payload))) => {
                    result.entry(identity).or_insert(payload);
                }
                Ok(None) => {}
                Err(e) => warn!("Per-file extraction task failed: {e}"),
            }
        }
    }
}

async fn query_file_tags<T: MetadataTool + ?Sized>(
    tool: &T,
    file: &Path,
    tags: &[&String],
) -> Option<String> {
    for tag in tags {
        match tool.query_single(file, tag).await {
            Ok(Some(payload)) if !payload.is_empty() => return Some(payload),
            Ok(_) => {}
            Err(e) => warn!(
                "Single -{} query failed for {} ({}): {e}",
                tag,
                file.display(),
                e.kind()
            ),
        }
    }
    None
}

fn still_missing(batch: &[PathBuf], result: &ExtractionResult) -> Vec<PathBuf> {
    batch
        .iter()
        .filter(|file| !result.contains_key(&path_identity(file)))
        .cloned()
        .collect()
}
