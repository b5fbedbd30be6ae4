//! External process primitive for the build and deploy steps.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use shopgrade_core::errors::{Result, UpgradeError};

/// One external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Program and arguments joined by spaces
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs external commands to completion
///
/// Implementations block until the process exits. There is no timeout.
pub trait CommandRunner: Send + Sync {
    /// # Errors
    ///
    /// `ProcessFailed` on a non-zero exit, `ProcessSpawn` if the process
    /// could not be started.
    fn run(&self, spec: &CommandSpec) -> Result<()>;
}

/// Spawns real processes that inherit this process's stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<()> {
        run(&spec.program, &spec.args, &spec.cwd)
    }
}

/// Spawn `cmd args...` in `cwd` and wait for it
///
/// Succeeds on exit code 0.
///
/// # Errors
///
/// `"{cmd} {args} failed with status {code}"` on a non-zero exit; the
/// underlying spawn error message if the process could not start.
pub fn run(cmd: &str, args: &[String], cwd: &Path) -> Result<()> {
    let shown = CommandSpec::new(cmd, args.iter().map(String::as_str), cwd).display();
    tracing::info!(command = %shown, cwd = %cwd.display(), "running");

    let status = Command::new(cmd)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| UpgradeError::ProcessSpawn {
            command: shown.clone(),
            reason: e.to_string(),
        })?;

    if status.success() {
        return Ok(());
    }

    let code = status
        .code()
        .map_or_else(|| status.to_string(), |code| code.to_string());
    Err(UpgradeError::ProcessExited {
        command: shown,
        status: code,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_args() {
        let spec = CommandSpec::new("pnpm", ["--filter", "apps/shop-demo", "build"], Path::new("."));
        assert_eq!(spec.display(), "pnpm --filter apps/shop-demo build");
    }

    #[test]
    fn test_display_without_args() {
        let spec = CommandSpec::new("true", Vec::<String>::new(), Path::new("."));
        assert_eq!(spec.display(), "true");
    }
}
