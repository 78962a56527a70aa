//! The external metadata tool seam.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::ToolError;

/// One `{source file, payload}` pair reported by a bulk query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// The file path exactly as the tool echoed it.
    pub source_file: String,
    pub payload: String,
}

impl TagEntry {
    #[must_use]
    pub fn new(source_file: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            payload: payload.into(),
        }
    }
}

/// Reads a named metadata tag out of image files.
///
/// Implementations own their own timeouts. Every method reports failure as a
/// [`ToolError`]; interpreting a failure as "nothing found" is the caller's
/// job.
#[async_trait]
pub trait MetadataTool: Send + Sync {
    /// Query `tag` across many files in one invocation. Files without the tag
    /// are simply absent from the result.
    async fn query_batch(&self, files: &[PathBuf], tag: &str) -> Result<Vec<TagEntry>, ToolError>;

    /// Query `tag` on a single file. `Ok(None)` means the tag is absent or empty.
    async fn query_single(&self, file: &Path, tag: &str) -> Result<Option<String>, ToolError>;
}

/// Spellings to look for when the tool echoes a tag name back: capitalized,
/// as given, and upper-case.
#[must_use]
pub fn tag_key_variants(tag: &str) -> Vec<String> {
    let mut chars = tag.chars();
    let capitalized = chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    });

    let mut variants = Vec::with_capacity(3);
    for candidate in [capitalized, tag.to_string(), tag.to_uppercase()] {
        if !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}
