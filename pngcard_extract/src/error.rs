use std::time::Duration;

use thiserror::Error;

/// Failure of a single metadata tool invocation.
///
/// The extractor never surfaces these to its caller; each one downgrades the
/// affected unit of work to "no payload" and moves on to the next tier.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata tool timed out after {0:?}")]
    Timeout(Duration),

    #[error("metadata tool exited with code {code}: {stderr}")]
    ExitStatus { code: i32, stderr: String },

    #[error("unparseable metadata tool output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("failed to write file list: {0}")]
    ArgFile(#[from] std::io::Error),
}

impl ToolError {
    /// Short label used in log lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "spawn_error",
            Self::Timeout(_) => "timeout",
            Self::ExitStatus { .. } => "process_exit",
            Self::Output(_) => "bad_output",
            Self::ArgFile(_) => "arg_file",
        }
    }
}
