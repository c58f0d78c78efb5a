//! Shell command execution for fragment concatenation.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Captured result of one shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code; -1 when the process was terminated by a signal.
    pub code: i32,
}

impl CommandOutput {
    /// Returns true for a zero exit code.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs a shell-style command line and waits for it to finish.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Executes `command_line` and returns its captured output.
    async fn exec(&self, command_line: &str) -> io::Result<CommandOutput>;
}

/// Runs commands through `sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    /// Creates a new executor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn exec(&self, command_line: &str) -> io::Result<CommandOutput> {
        debug!(command = command_line, "running shell command");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .output()
            .await?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Quotes `path` as a single POSIX shell word.
#[must_use]
pub fn shell_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// Builds `cat 'frag1' 'frag2' ... > 'output'`.
#[must_use]
pub fn concat_command(fragments: &[impl AsRef<Path>], output: &Path) -> String {
    let mut command = String::from("cat");
    for fragment in fragments {
        command.push(' ');
        command.push_str(&shell_quote(fragment.as_ref()));
    }
    command.push_str(" > ");
    command.push_str(&shell_quote(output));
    command
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote(Path::new("/dl/a b")), "'/dl/a b'");
        assert_eq!(shell_quote(Path::new("/dl/it's")), r"'/dl/it'\''s'");
    }

    #[test]
    fn test_concat_command_lists_fragments_in_order() {
        let fragments = vec![PathBuf::from("/dl/a.001"), PathBuf::from("/dl/a.002")];
        assert_eq!(
            concat_command(&fragments, Path::new("/dl/a")),
            "cat '/dl/a.001' '/dl/a.002' > '/dl/a'"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_executor_captures_exit_code_and_stderr() {
        let output = ShellExecutor::new()
            .exec("echo out; echo err >&2; exit 3")
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert_eq!(output.code, 3);
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_executor_command_survives_dropped_future() {
        let temp = tempfile::TempDir::new().unwrap();
        let marker = temp.path().join("finished");
        let command = format!("sleep 0.5; touch {}", shell_quote(&marker));

        let dropped = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            ShellExecutor::new().exec(&command),
        )
        .await;
        assert!(dropped.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(1200)).await;
        assert!(marker.exists(), "command must run to completion");
    }
}
