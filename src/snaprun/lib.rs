//! # snaprun Architecture
//!
//! snaprun runs the `http-snap` snapshot tool (tests and snapshot updates)
//! against the file a user is editing. It is a **host-agnostic orchestration
//! library**: an editor extension and the bundled `snaprun` binary are both
//! just hosts plugging their own settings, documents and terminals into it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (editor extension, or host/ + main.rs for the CLI)    │
//! │  - Registers command ids, owns settings, documents, shells  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatcher (dispatch.rs)                                   │
//! │  - Precondition checks, document save, error notification  │
//! └─────────────────────────────────────────────────────────────┘
//!               │                               │
//!               ▼                               ▼
//! ┌───────────────────────────┐   ┌─────────────────────────────┐
//! │  Config (config.rs)       │   │  Command builder            │
//! │  - Fresh settings reads   │   │  (command.rs)               │
//! └───────────────────────────┘   └─────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session manager (session.rs)                               │
//! │  - One reusable session, replaced when its process exits    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Host Collaborators
//!
//! Everything outside the core is a trait, so the same dispatcher serves any host:
//!
//! - [`config::SettingsStore`]: key lookup into the user's settings
//! - [`document::ActiveDocument`]: focused file path and async save
//! - [`session::SessionHost`] / [`session::ExecutionSession`]: terminals
//! - [`registry::CommandRegistry`]: binding command ids to actions
//! - [`dispatch::Notifier`]: user-visible error messages
//!
//! ## Scheduling
//!
//! Dispatches run on a single-threaded event loop. Saving the document is the
//! only suspension point; everything after it, including the session's
//! create-or-reuse decision, runs without yielding.
//!
//! ## Module Overview
//!
//! - [`dispatch`]: The dispatcher, entry point for every action
//! - [`command`]: Action kinds and command line construction
//! - [`session`]: Single-slot session management
//! - [`config`]: Settings keys, resolver, JSON and in-memory stores
//! - [`document`]: Active document trait
//! - [`registry`]: Command identifiers and registration
//! - [`host`]: Shell, dry-run and file-backed host implementations
//! - [`error`]: Error types

pub mod command;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod host;
pub mod registry;
pub mod session;

#[cfg(any(test, feature = "test_utils"))]
pub mod testing;
