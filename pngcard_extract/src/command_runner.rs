use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use crate::ToolError;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Program and arguments, kept as OS strings so non-UTF-8 file names reach
/// the tool unchanged.
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    #[must_use]
    pub fn new<I, S>(program: impl AsRef<OsStr>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self {
            program: program.as_ref().to_os_string(),
            args: args.into_iter().map(|a| a.as_ref().to_os_string()).collect(),
        }
    }
}

/// `exiftool -json -<tag> -@ <arg_file>`: one JSON row per listed file.
#[must_use]
pub fn bulk_tag_command(program: &Path, tag: &str, arg_file: &Path) -> CommandSpec {
    let tag = format!("-{tag}");
    CommandSpec::new(
        program,
        [OsStr::new("-json"), OsStr::new(&tag), OsStr::new("-@"), arg_file.as_os_str()],
    )
}

/// `exiftool -s3 -<tag> <file>`: the bare tag value on stdout.
#[must_use]
pub fn single_tag_command(program: &Path, tag: &str, file: &Path) -> CommandSpec {
    let tag = format!("-{tag}");
    CommandSpec::new(
        program,
        [OsStr::new("-s3"), OsStr::new(&tag), file.as_os_str()],
    )
}

#[must_use]
pub fn version_command(program: &Path) -> CommandSpec {
    CommandSpec::new(program, ["-ver"])
}

#[must_use]
pub fn build_command(spec: &CommandSpec) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true);
    #[cfg(target_os = "windows")]
    cmd.creation_flags(CREATE_NO_WINDOW);
    cmd
}

/// Run a command to completion, abandoning it after `limit`.
///
/// A timed-out child is killed when its future is dropped. A non-zero exit is
/// reported as [`ToolError::ExitStatus`] with the captured stderr.
pub async fn run_with_timeout(spec: &CommandSpec, limit: Duration) -> Result<Output, ToolError> {
    let result = tokio::time::timeout(limit, build_command(spec).output()).await;

    match result {
        Ok(Ok(output)) if output.status.success() => Ok(output),
        Ok(Ok(output)) => Err(ToolError::ExitStatus {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Ok(Err(e)) => Err(ToolError::Spawn {
            program: spec.program.to_string_lossy().into_owned(),
            source: e,
        }),
        Err(_) => Err(ToolError::Timeout(limit)),
    }
}
