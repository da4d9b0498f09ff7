//! In-memory stand-ins for the host collaborators.
//!
//! Compiled for unit tests and behind the `test_utils` feature so embedders can
//! test their own wiring against the same doubles.

use crate::dispatch::Notifier;
use crate::document::ActiveDocument;
use crate::error::{Result, SnapError};
use crate::session::{ExecutionSession, SessionHost};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub name: String,
    pub working_directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentText {
    pub session: usize,
    pub text: String,
}

/// Everything a [`RecordingHost`] and its sessions were asked to do.
#[derive(Debug, Default)]
pub struct HostLog {
    pub created: Vec<CreatedSession>,
    pub sent: Vec<SentText>,
    pub shown: Vec<(usize, bool)>,
    terminated: HashSet<usize>,
}

impl HostLog {
    /// Simulate the process behind session `id` exiting.
    pub fn terminate(&mut self, id: usize) {
        self.terminated.insert(id);
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.iter().map(|s| s.text.clone()).collect()
    }
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    log: Rc<RefCell<HostLog>>,
    fail_creation: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_creation(mut self) -> Self {
        self.fail_creation = true;
        self
    }

    /// Shared handle to the log; stays valid after the host is moved.
    pub fn log(&self) -> Rc<RefCell<HostLog>> {
        Rc::clone(&self.log)
    }
}

impl SessionHost for RecordingHost {
    type Session = RecordingSession;

    fn create_session(&mut self, name: &str, working_directory: &Path) -> Result<RecordingSession> {
        if self.fail_creation {
            return Err(SnapError::Session("host refused to create a session".into()));
        }
        let mut log = self.log.borrow_mut();
        let id = log.created.len();
        log.created.push(CreatedSession {
            name: name.to_string(),
            working_directory: working_directory.to_path_buf(),
        });
        Ok(RecordingSession {
            id,
            working_directory: working_directory.to_path_buf(),
            log: Rc::clone(&self.log),
        })
    }
}

#[derive(Debug)]
pub struct RecordingSession {
    id: usize,
    working_directory: PathBuf,
    log: Rc<RefCell<HostLog>>,
}

impl ExecutionSession for RecordingSession {
    fn is_alive(&mut self) -> bool {
        !self.log.borrow().terminated.contains(&self.id)
    }

    fn show(&mut self, preserve_focus: bool) {
        self.log.borrow_mut().shown.push((self.id, preserve_focus));
    }

    fn send_text(&mut self, text: &str) -> Result<()> {
        self.log.borrow_mut().sent.push(SentText {
            session: self.id,
            text: text.to_string(),
        });
        Ok(())
    }

    fn working_directory(&self) -> &Path {
        &self.working_directory
    }
}

/// A document whose save outcome and timing are scripted.
///
/// Each save yields to the runtime as many times as the next queued delay, so
/// concurrent dispatches can be made to resolve in a chosen order.
#[derive(Debug, Default)]
pub struct StubDocument {
    path: RefCell<Option<PathBuf>>,
    save_ok: Cell<bool>,
    delays: RefCell<VecDeque<usize>>,
    saves: Cell<usize>,
}

impl StubDocument {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let doc = Self::default();
        doc.path.replace(Some(path.into()));
        doc.save_ok.set(true);
        doc
    }

    pub fn none() -> Self {
        let doc = Self::default();
        doc.save_ok.set(true);
        doc
    }

    pub fn failing_save(self) -> Self {
        self.save_ok.set(false);
        self
    }

    pub fn with_save_delays(self, delays: impl IntoIterator<Item = usize>) -> Self {
        self.delays.borrow_mut().extend(delays);
        self
    }

    pub fn focus(&self, path: Option<PathBuf>) {
        self.path.replace(path);
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

#[async_trait(?Send)]
impl ActiveDocument for StubDocument {
    fn active_path(&self) -> Option<PathBuf> {
        self.path.borrow().clone()
    }

    async fn save(&self) -> bool {
        self.saves.set(self.saves.get() + 1);
        let delay = self.delays.borrow_mut().pop_front().unwrap_or(0);
        for _ in 0..delay {
            tokio::task::yield_now().await;
        }
        self.save_ok.get()
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
