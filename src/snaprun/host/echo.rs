use crate::error::Result;
use crate::session::{ExecutionSession, SessionHost};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sessions that print each command line to stdout instead of running it.
/// Backs `--dry-run`.
#[derive(Debug, Default, Clone)]
pub struct EchoHost;

impl SessionHost for EchoHost {
    type Session = EchoSession;

    fn create_session(&mut self, name: &str, working_directory: &Path) -> Result<EchoSession> {
        tracing::debug!(name, cwd = %working_directory.display(), "dry-run session");
        Ok(EchoSession {
            working_directory: working_directory.to_path_buf(),
        })
    }
}

#[derive(Debug)]
pub struct EchoSession {
    working_directory: PathBuf,
}

impl ExecutionSession for EchoSession {
    fn is_alive(&mut self) -> bool {
        true
    }

    fn show(&mut self, _preserve_focus: bool) {}

    fn send_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
        Ok(())
    }

    fn working_directory(&self) -> &Path {
        &self.working_directory
    }
}
