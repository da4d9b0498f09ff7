use clap::{Parser, Subcommand, ValueEnum};
use snaprun::command::ActionKind;
use std::path::PathBuf;

/// Version string with the commit hash for builds made from a git checkout.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("SNAPRUN_GIT_HASH");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{} ({})", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "snaprun", version = get_version())]
#[command(about = "Run http-snap tests and snapshot updates for a file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (JSON object with http-snap.* keys)
    #[arg(long, global = true, env = "HTTP_SNAP_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Print command lines instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Overwrite,
    Append,
}

impl ModeArg {
    pub fn action(self) -> ActionKind {
        match self {
            ModeArg::Overwrite => ActionKind::RunUpdateOverwrite,
            ModeArg::Append => ActionKind::RunUpdateAppend,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run snapshot tests for a file
    #[command(alias = "t")]
    Test {
        /// The .http file to test
        file: Option<PathBuf>,
    },

    /// Update mismatching snapshots in a file
    #[command(alias = "u")]
    Update {
        /// The .http file to update
        file: Option<PathBuf>,

        /// Replace snapshots or append new ones
        #[arg(long, value_enum, default_value_t = ModeArg::Overwrite)]
        mode: ModeArg,
    },

    /// Invoke a registered command identifier (see `snaprun commands`)
    Exec {
        /// Command identifier, e.g. http-snap-runner.runTest
        command_id: String,

        /// The file the command acts on
        file: Option<PathBuf>,
    },

    /// List the registered command identifiers
    Commands,

    /// Get or set settings
    Config {
        /// Setting key (e.g. http-snap.path)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,

        /// Remove the key from the settings file
        #[arg(long, conflicts_with = "value", requires = "key")]
        unset: bool,
    },

    /// Read `<command> <file>` lines from stdin and run them in one shared session
    Shell,
}
