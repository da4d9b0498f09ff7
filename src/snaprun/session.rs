//! # Session Manager
//!
//! Commands are sent to one long-lived interactive session (a terminal in an
//! editor, a shell process for the CLI) so the user keeps a single scrollback
//! and working directory across runs.
//!
//! The manager holds that session in a single slot:
//!
//! ```text
//!   Absent ──submit──▶ Live ──process exits──▶ Terminated
//!                       ▲                          │
//!                       └─────────submit───────────┘
//! ```
//!
//! Termination is observed, never driven: the manager asks the session whether
//! it is still alive each time something is submitted and replaces it when it
//! is not. There is no close operation.

use crate::error::Result;
use std::path::Path;

/// Name given to every session this crate creates.
pub const SESSION_NAME: &str = "Http Snap";

/// A running interactive session that accepts lines of text.
pub trait ExecutionSession {
    /// False once the underlying process has exited.
    fn is_alive(&mut self) -> bool;

    /// Bring the session into view. With `preserve_focus` the caller keeps input focus.
    fn show(&mut self, preserve_focus: bool);

    /// Send one line of text for execution.
    fn send_text(&mut self, text: &str) -> Result<()>;

    fn working_directory(&self) -> &Path;
}

/// Creates sessions. Implemented by whatever owns terminals in the host.
pub trait SessionHost {
    type Session: ExecutionSession;

    fn create_session(&mut self, name: &str, working_directory: &Path) -> Result<Self::Session>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Absent,
    Live,
    Terminated,
}

/// What a [`SessionManager::submit`] call did with the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Replaced,
    Reused,
}

pub struct SessionManager<H: SessionHost> {
    host: H,
    slot: Option<H::Session>,
}

impl<H: SessionHost> SessionManager<H> {
    pub fn new(host: H) -> Self {
        Self { host, slot: None }
    }

    pub fn state(&mut self) -> SessionState {
        match self.slot.as_mut() {
            None => SessionState::Absent,
            Some(session) => {
                if session.is_alive() {
                    SessionState::Live
                } else {
                    SessionState::Terminated
                }
            }
        }
    }

    /// Send `command_text` to the session, creating one bound to
    /// `working_directory` if there is none or the last one has exited.
    ///
    /// A live session is reused as is, even when `working_directory` differs
    /// from the directory it was created in.
    pub fn submit(&mut self, command_text: &str, working_directory: &Path) -> Result<SubmitOutcome> {
        let outcome = match self.state() {
            SessionState::Live => SubmitOutcome::Reused,
            SessionState::Absent => SubmitOutcome::Created,
            SessionState::Terminated => SubmitOutcome::Replaced,
        };

        let session = match (outcome, &mut self.slot) {
            (SubmitOutcome::Reused, Some(session)) => {
                if session.working_directory() != working_directory {
                    tracing::debug!(
                        session_dir = %session.working_directory().display(),
                        requested_dir = %working_directory.display(),
                        "reusing session with a different working directory"
                    );
                }
                session
            }
            (_, slot) => {
                let created = self.host.create_session(SESSION_NAME, working_directory)?;
                tracing::info!(
                    cwd = %working_directory.display(),
                    replaced = (outcome == SubmitOutcome::Replaced),
                    "created execution session"
                );
                slot.insert(created)
            }
        };

        session.show(true);
        session.send_text(command_text)?;
        tracing::debug!(command = command_text, "sent command to session");

        Ok(outcome)
    }

    pub fn session(&self) -> Option<&H::Session> {
        self.slot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;
    use std::path::PathBuf;

    fn tool_dir() -> PathBuf {
        PathBuf::from("/usr/local/bin")
    }

    #[test]
    fn starts_absent() {
        let mut manager = SessionManager::new(RecordingHost::new());
        assert_eq!(manager.state(), SessionState::Absent);
        assert!(manager.session().is_none());
    }

    #[test]
    fn first_submit_creates_session_in_working_directory() {
        let host = RecordingHost::new();
        let log = host.log();
        let mut manager = SessionManager::new(host);

        let outcome = manager.submit("cargo run -- test", &tool_dir()).unwrap();

        assert_eq!(outcome, SubmitOutcome::Created);
        assert_eq!(manager.state(), SessionState::Live);
        let log = log.borrow();
        assert_eq!(log.created.len(), 1);
        assert_eq!(log.created[0].name, SESSION_NAME);
        assert_eq!(log.created[0].working_directory, tool_dir());
        assert_eq!(log.sent_texts(), vec!["cargo run -- test"]);
    }

    #[test]
    fn live_session_is_reused() {
        let host = RecordingHost::new();
        let log = host.log();
        let mut manager = SessionManager::new(host);

        manager.submit("first", &tool_dir()).unwrap();
        let outcome = manager.submit("second", &tool_dir()).unwrap();

        assert_eq!(outcome, SubmitOutcome::Reused);
        let log = log.borrow();
        assert_eq!(log.created.len(), 1);
        assert_eq!(log.sent_texts(), vec!["first", "second"]);
        assert!(log.sent.iter().all(|s| s.session == 0));
    }

    #[test]
    fn terminated_session_is_replaced() {
        let host = RecordingHost::new();
        let log = host.log();
        let mut manager = SessionManager::new(host);

        manager.submit("first", &tool_dir()).unwrap();
        log.borrow_mut().terminate(0);
        assert_eq!(manager.state(), SessionState::Terminated);

        let outcome = manager.submit("second", &tool_dir()).unwrap();

        assert_eq!(outcome, SubmitOutcome::Replaced);
        assert_eq!(manager.state(), SessionState::Live);
        let log = log.borrow();
        assert_eq!(log.created.len(), 2);
        assert_eq!(log.sent[1].session, 1);
    }

    #[test]
    fn reuse_keeps_original_working_directory() {
        let host = RecordingHost::new();
        let mut manager = SessionManager::new(host);

        manager.submit("first", &tool_dir()).unwrap();
        manager.submit("second", Path::new("/elsewhere")).unwrap();

        assert_eq!(
            manager.session().unwrap().working_directory(),
            tool_dir().as_path()
        );
    }

    #[test]
    fn every_submit_shows_then_sends_once() {
        let host = RecordingHost::new();
        let log = host.log();
        let mut manager = SessionManager::new(host);

        for _ in 0..3 {
            manager.submit("same", &tool_dir()).unwrap();
        }

        let log = log.borrow();
        assert_eq!(log.sent.len(), 3);
        assert_eq!(log.shown, vec![(0, true); 3]);
    }

    #[test]
    fn failed_creation_leaves_slot_empty() {
        let host = RecordingHost::new().failing_creation();
        let mut manager = SessionManager::new(host);

        assert!(manager.submit("cmd", &tool_dir()).is_err());
        assert_eq!(manager.state(), SessionState::Absent);
    }
}
