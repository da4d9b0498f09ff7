//! # Headless host
//!
//! Implementations of the host collaborators that let the `snaprun` binary (or
//! any program without an editor) drive the dispatcher:
//!
//! - [`FileDocument`]: the file named on the command line is the active document.
//! - [`ShellHost`]: each session is a persistent `sh` / `cmd` process.
//! - [`EchoHost`]: prints command lines instead of running them.
//! - [`ConsoleNotifier`]: error messages in red on stderr.
//! - [`TerminalHost`]: picks between shell and echo at runtime.

use crate::dispatch::Notifier;
use crate::error::Result;
use crate::session::{ExecutionSession, SessionHost};
use colored::Colorize;
use std::path::Path;

pub mod echo;
pub mod file;
pub mod shell;

pub use echo::{EchoHost, EchoSession};
pub use file::FileDocument;
pub use shell::{ShellHost, ShellSession};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message.red());
    }
}

pub enum TerminalHost {
    Shell(ShellHost),
    Echo(EchoHost),
}

impl TerminalHost {
    pub fn new(dry_run: bool) -> Self {
        if dry_run {
            TerminalHost::Echo(EchoHost)
        } else {
            TerminalHost::Shell(ShellHost::new())
        }
    }
}

pub enum TerminalSession {
    Shell(ShellSession),
    Echo(EchoSession),
}

impl SessionHost for TerminalHost {
    type Session = TerminalSession;

    fn create_session(&mut self, name: &str, working_directory: &Path) -> Result<TerminalSession> {
        match self {
            TerminalHost::Shell(host) => host
                .create_session(name, working_directory)
                .map(TerminalSession::Shell),
            TerminalHost::Echo(host) => host
                .create_session(name, working_directory)
                .map(TerminalSession::Echo),
        }
    }
}

impl ExecutionSession for TerminalSession {
    fn is_alive(&mut self) -> bool {
        match self {
            TerminalSession::Shell(s) => s.is_alive(),
            TerminalSession::Echo(s) => s.is_alive(),
        }
    }

    fn show(&mut self, preserve_focus: bool) {
        match self {
            TerminalSession::Shell(s) => s.show(preserve_focus),
            TerminalSession::Echo(s) => s.show(preserve_focus),
        }
    }

    fn send_text(&mut self, text: &str) -> Result<()> {
        match self {
            TerminalSession::Shell(s) => s.send_text(text),
            TerminalSession::Echo(s) => s.send_text(text),
        }
    }

    fn working_directory(&self) -> &Path {
        match self {
            TerminalSession::Shell(s) => s.working_directory(),
            TerminalSession::Echo(s) => s.working_directory(),
        }
    }
}
