use crate::error::{Result, SnapError};
use crate::session::{ExecutionSession, SessionHost};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Starts a persistent system shell for each session.
///
/// - Unix: `sh`
/// - Windows: `cmd /Q`
#[derive(Debug, Default, Clone)]
pub struct ShellHost {
    program: Option<String>,
}

impl ShellHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific shell instead of the platform default. It must read
    /// commands line by line from stdin.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    fn command(&self) -> Command {
        if let Some(program) = &self.program {
            return Command::new(program);
        }

        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/Q");
            cmd
        }

        #[cfg(not(windows))]
        {
            Command::new("sh")
        }
    }
}

impl SessionHost for ShellHost {
    type Session = ShellSession;

    fn create_session(&mut self, name: &str, working_directory: &Path) -> Result<ShellSession> {
        let mut child = self
            .command()
            .current_dir(working_directory)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SnapError::Session(format!(
                    "Failed to start shell in {}: {}",
                    working_directory.display(),
                    e
                ))
            })?;

        let stdin = child.stdin.take();
        tracing::debug!(name, pid = child.id(), "spawned shell session");

        Ok(ShellSession {
            name: name.to_string(),
            working_directory: working_directory.to_path_buf(),
            child,
            stdin,
        })
    }
}

/// A shell process fed through its stdin.
///
/// Dropping the session closes stdin, which lets the shell run whatever is
/// still queued and exit; the drop waits for that to happen.
pub struct ShellSession {
    name: String,
    working_directory: PathBuf,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl ExecutionSession for ShellSession {
    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn show(&mut self, _preserve_focus: bool) {
        // Output is inherited, so the shell already writes to our terminal.
    }

    fn send_text(&mut self, text: &str) -> Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SnapError::Session(format!("{} no longer accepts input", self.name)))?;
        writeln!(stdin, "{}", text)?;
        stdin.flush()?;
        Ok(())
    }

    fn working_directory(&self) -> &Path {
        &self.working_directory
    }
}

impl Drop for ShellSession {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Err(e) = self.child.wait() {
            tracing::warn!(name = %self.name, error = %e, "failed to wait for shell");
        }
    }
}
