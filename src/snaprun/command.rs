//! Command line construction for the http-snap tool.
//!
//! The tool is launched through cargo from its own checkout:
//!
//! ```text
//! cargo run -- {test|update} --path <file> [--update-mode {overwrite|append} --detectors all]
//!              [--environment <env>] [--client-options <opts>]
//! ```
//!
//! Building never fails. Optional settings that are absent or empty simply do
//! not produce a flag.

use crate::error::SnapError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Program used to start the tool.
pub const LAUNCHER: &str = "cargo";

const LAUNCH_PREFIX: [&str; 2] = ["run", "--"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Overwrite,
    Append,
}

impl UpdateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::Overwrite => "overwrite",
            UpdateMode::Append => "append",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three things a user can ask the runner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    RunTest,
    RunUpdateOverwrite,
    RunUpdateAppend,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [
        ActionKind::RunTest,
        ActionKind::RunUpdateOverwrite,
        ActionKind::RunUpdateAppend,
    ];

    /// Identifier the editor binds to this action.
    pub fn command_id(&self) -> &'static str {
        match self {
            ActionKind::RunTest => "http-snap-runner.runTest",
            ActionKind::RunUpdateOverwrite => "http-snap-runner.runUpdateOverwrite",
            ActionKind::RunUpdateAppend => "http-snap-runner.runUpdateAppend",
        }
    }

    pub fn from_command_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.command_id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ActionKind::RunTest => "Run snapshot tests",
            ActionKind::RunUpdateOverwrite => "Update snapshots (overwrite)",
            ActionKind::RunUpdateAppend => "Update snapshots (append)",
        }
    }

    pub fn update_mode(&self) -> Option<UpdateMode> {
        match self {
            ActionKind::RunTest => None,
            ActionKind::RunUpdateOverwrite => Some(UpdateMode::Overwrite),
            ActionKind::RunUpdateAppend => Some(UpdateMode::Append),
        }
    }

    fn subcommand(&self) -> &'static str {
        match self.update_mode() {
            None => "test",
            Some(_) => "update",
        }
    }

    /// The action's own arguments: launch prefix, subcommand, target path and
    /// any fixed trailing flags.
    pub fn shape_args(&self, file_path: &str) -> Vec<String> {
        let mut args: Vec<String> = LAUNCH_PREFIX.iter().map(|s| s.to_string()).collect();
        args.push(self.subcommand().to_string());
        args.push("--path".to_string());
        args.push(file_path.to_string());
        if let Some(mode) = self.update_mode() {
            args.push("--update-mode".to_string());
            args.push(mode.to_string());
            args.push("--detectors".to_string());
            args.push("all".to_string());
        }
        args
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_id())
    }
}

impl FromStr for ActionKind {
    type Err = SnapError;

    /// Accepts a full command identifier or a short alias
    /// (`test`, `update-overwrite`, `update-append`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(action) = Self::from_command_id(s) {
            return Ok(action);
        }
        match s {
            "test" | "run-test" => Ok(ActionKind::RunTest),
            "update" | "update-overwrite" | "run-update-overwrite" => {
                Ok(ActionKind::RunUpdateOverwrite)
            }
            "update-append" | "run-update-append" => Ok(ActionKind::RunUpdateAppend),
            other => Err(SnapError::UnknownCommand(other.to_string())),
        }
    }
}

/// Everything needed to build one command line. Lives for a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub action: ActionKind,
    pub file_path: String,
    pub environment: Option<String>,
    pub client_options: Option<String>,
}

impl CommandRequest {
    pub fn new(action: ActionKind, file_path: &Path) -> Self {
        Self {
            action,
            file_path: file_path.to_string_lossy().into_owned(),
            environment: None,
            client_options: None,
        }
    }

    pub fn with_environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_client_options(mut self, client_options: Option<String>) -> Self {
        self.client_options = client_options;
        self
    }
}

/// Arguments after the launcher, in order.
pub fn build_args(request: &CommandRequest) -> Vec<String> {
    let mut args = request.action.shape_args(&request.file_path);
    if let Some(environment) = non_empty(&request.environment) {
        args.push("--environment".to_string());
        args.push(environment.to_string());
    }
    if let Some(client_options) = non_empty(&request.client_options) {
        args.push("--client-options".to_string());
        args.push(client_options.to_string());
    }
    args
}

/// The full line sent to the session: launcher and arguments joined by single spaces.
pub fn build_command_line(request: &CommandRequest) -> String {
    let args = build_args(request);
    format!("{} {}", LAUNCHER, args.join(" "))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
