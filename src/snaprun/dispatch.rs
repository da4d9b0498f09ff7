//! # Dispatcher
//!
//! One dispatch turns a user action into a line of text in the session. The
//! steps run in a fixed order and the first failing guard ends the dispatch:
//!
//! 1. active file            → [`SnapError::NoActiveFile`]
//! 2. `http-snap.path`       → [`SnapError::ToolPathNotConfigured`]
//! 3. save the document      → [`SnapError::SaveFailed`]
//! 4. environment / client options
//! 5. build the command line
//! 6. submit it, using the tool path as working directory
//!
//! The save is the only `.await`. Submission borrows the session manager
//! without awaiting, so when several dispatches are in flight each one reaches
//! the session in the order its save resolved and the create-or-reuse decision
//! is never interleaved with another dispatch.

use crate::command::{build_command_line, ActionKind, CommandRequest};
use crate::config::{ConfigResolver, SettingsStore};
use crate::document::ActiveDocument;
use crate::error::{Result, SnapError};
use crate::session::{SessionHost, SessionManager, SessionState, SubmitOutcome};
use std::cell::RefCell;
use std::path::PathBuf;

/// Surface for the single user-visible message a failed dispatch produces.
pub trait Notifier {
    fn show_error(&self, message: &str);
}

/// What a successful dispatch sent, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub action: ActionKind,
    pub command_line: String,
    pub working_directory: PathBuf,
    pub outcome: SubmitOutcome,
}

pub struct Dispatcher<S, D, H, N>
where
    S: SettingsStore,
    D: ActiveDocument,
    H: SessionHost,
    N: Notifier,
{
    config: ConfigResolver<S>,
    document: D,
    sessions: RefCell<SessionManager<H>>,
    notifier: N,
}

impl<S, D, H, N> Dispatcher<S, D, H, N>
where
    S: SettingsStore,
    D: ActiveDocument,
    H: SessionHost,
    N: Notifier,
{
    pub fn new(settings: S, document: D, host: H, notifier: N) -> Self {
        Self {
            config: ConfigResolver::new(settings),
            document,
            sessions: RefCell::new(SessionManager::new(host)),
            notifier,
        }
    }

    /// Run the full precondition, save, build and submit sequence.
    pub async fn dispatch(&self, action: ActionKind) -> Result<Submission> {
        let file_path = self.document.active_path().ok_or(SnapError::NoActiveFile)?;
        let tool_path = self
            .config
            .tool_path()
            .ok_or(SnapError::ToolPathNotConfigured)?;

        tracing::debug!(action = %action, file = %file_path.display(), "saving active document");
        if !self.document.save().await {
            return Err(SnapError::SaveFailed);
        }

        let request = CommandRequest::new(action, &file_path)
            .with_environment(self.config.environment())
            .with_client_options(self.config.client_options());
        let command_line = build_command_line(&request);
        let working_directory = PathBuf::from(tool_path);

        let outcome = self
            .sessions
            .borrow_mut()
            .submit(&command_line, &working_directory)?;

        Ok(Submission {
            action,
            command_line,
            working_directory,
            outcome,
        })
    }

    /// The handler bound to a command identifier. Failures become one
    /// notification and go no further.
    pub async fn handle(&self, action: ActionKind) -> Option<Submission> {
        match self.dispatch(action).await {
            Ok(submission) => Some(submission),
            Err(e) => {
                if e.is_precondition() {
                    tracing::warn!(action = %action, error = %e, "dispatch aborted");
                } else {
                    tracing::error!(action = %action, error = %e, "dispatch failed");
                }
                self.notifier.show_error(&e.to_string());
                None
            }
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.sessions.borrow_mut().state()
    }

    pub fn config(&self) -> &ConfigResolver<S> {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
