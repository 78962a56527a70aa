//! [`MetadataTool`] backed by the `exiftool` executable.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tempfile::TempPath;
use tracing::{debug, info};

use crate::command_runner::{bulk_tag_command, run_with_timeout, single_tag_command, version_command};
use crate::tool::{MetadataTool, TagEntry, tag_key_variants};
use crate::ToolError;

pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_SINGLE_TIMEOUT: Duration = Duration::from_secs(30);

const EXIFTOOL: &str = "exiftool";

/// Handle on an `exiftool` binary plus the timeouts applied to each call.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
    batch_timeout: Duration,
    single_timeout: Duration,
}

impl ExifTool {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            batch_timeout: DEFAULT_BATCH_TIMEOUT,
            single_timeout: DEFAULT_SINGLE_TIMEOUT,
        }
    }

    /// Resolve the executable: an explicit path wins, then `exiftool` on
    /// `PATH`, then a copy bundled in an `exiftool/` directory beside the
    /// running binary. Falls back to the bare name so the failure surfaces at
    /// call time rather than here.
    #[must_use]
    pub fn locate(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        if let Ok(path) = which::which(EXIFTOOL) {
            return Self::new(path);
        }
        if let Some(bundled) = bundled_exiftool().filter(|p| p.is_file()) {
            info!("Using bundled exiftool at {}", bundled.display());
            return Self::new(bundled);
        }
        Self::new(EXIFTOOL)
    }

    #[must_use]
    pub const fn with_timeouts(mut self, batch: Duration, single: Duration) -> Self {
        self.batch_timeout = batch;
        self.single_timeout = single;
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The tool's self-reported version, e.g. `"12.76"`.
    pub async fn version(&self) -> Result<String, ToolError> {
        let output = run_with_timeout(&version_command(&self.program), self.single_timeout).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl MetadataTool for ExifTool {
    async fn query_batch(&self, files: &[PathBuf], tag: &str) -> Result<Vec<TagEntry>, ToolError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        // Dropping `arg_path` deletes the list.
        let arg_path = write_arg_file(files)?;

        debug!("exiftool bulk -{} over {} files", tag, files.len());
        let spec = bulk_tag_command(&self.program, tag, &arg_path);
        let output = run_with_timeout(&spec, self.batch_timeout).await?;
        parse_bulk_output(&String::from_utf8_lossy(&output.stdout), tag)
    }

    async fn query_single(&self, file: &Path, tag: &str) -> Result<Option<String>, ToolError> {
        let spec = single_tag_command(&self.program, tag, file);
        let output = run_with_timeout(&spec, self.single_timeout).await?;
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!value.is_empty()).then_some(value))
    }
}

#[derive(Debug, Deserialize)]
struct BulkRow {
    #[serde(rename = "SourceFile", default)]
    source_file: String,
    #[serde(flatten)]
    tags: HashMap<String, serde_json::Value>,
}

/// Parse `exiftool -json` output into entries carrying a non-empty `tag`.
///
/// Blank output is an empty result. Rows without a source file or without a
/// string value under any spelling of the tag are skipped.
pub fn parse_bulk_output(stdout: &str, tag: &str) -> Result<Vec<TagEntry>, ToolError> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<BulkRow> = serde_json::from_str(stdout)?;
    let keys = tag_key_variants(tag);

    Ok(rows
        .into_iter()
        .filter(|row| !row.source_file.is_empty())
        .filter_map(|row| {
            let payload = keys
                .iter()
                .filter_map(|key| row.tags.get(key).and_then(serde_json::Value::as_str))
                .find(|value| !value.is_empty())?
                .to_string();
            Some(TagEntry::new(row.source_file, payload))
        })
        .collect())
}

/// Write `files` one per line to a temp file for `-@`. The list keeps long
/// path sets off the command line.
pub fn write_arg_file(files: &[PathBuf]) -> Result<TempPath, ToolError> {
    let mut list = tempfile::Builder::new()
        .prefix("pngcard-")
        .suffix(".txt")
        .tempfile()?;
    for file in files {
        list.write_all(&path_bytes(file))?;
        list.write_all(b"\n")?;
    }
    list.flush()?;
    Ok(list.into_temp_path())
}

/// Raw bytes of a path on Unix, where names need not be UTF-8.
#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

/// Windows paths are UTF-16; exiftool reads its argument file as UTF-8.
#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
        Cow::Owned(text) => Cow::Owned(text.into_bytes()),
    }
}

fn bundled_exiftool() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let name = if cfg!(target_os = "windows") {
        "exiftool.exe"
    } else {
        EXIFTOOL
    };
    Some(exe.parent()?.join(EXIFTOOL).join(name))
}
