use clap::Parser;
use colored::*;
use snaprun::command::ActionKind;
use snaprun::config::{JsonSettingsStore, SettingsStore, KNOWN_KEYS};
use snaprun::dispatch::{Dispatcher, Notifier};
use snaprun::error::{Result, SnapError};
use snaprun::host::{ConsoleNotifier, FileDocument, TerminalHost};
use snaprun::registry::CommandTable;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

type CliDispatcher = Dispatcher<JsonSettingsStore, FileDocument, TerminalHost, ConsoleNotifier>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            ConsoleNotifier.show_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` turns on debug output.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("snaprun=debug")
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns whether everything asked for succeeded. The dispatcher, and any
/// shell it started, is dropped before this returns.
async fn run(cli: Cli) -> Result<bool> {
    let settings = match &cli.settings {
        Some(path) => JsonSettingsStore::new(path),
        None => JsonSettingsStore::default_location()?,
    };

    match cli.command {
        Commands::Test { file } => {
            let dispatcher = dispatcher(settings, file.as_deref(), cli.dry_run);
            Ok(dispatcher.handle(ActionKind::RunTest).await.is_some())
        }
        Commands::Update { file, mode } => {
            let dispatcher = dispatcher(settings, file.as_deref(), cli.dry_run);
            Ok(dispatcher.handle(mode.action()).await.is_some())
        }
        Commands::Exec { command_id, file } => {
            let table = CommandTable::activated();
            let action = table
                .lookup(&command_id)
                .ok_or(SnapError::UnknownCommand(command_id))?;
            let dispatcher = dispatcher(settings, file.as_deref(), cli.dry_run);
            Ok(dispatcher.handle(action).await.is_some())
        }
        Commands::Commands => {
            handle_commands();
            Ok(true)
        }
        Commands::Config { key, value, unset } => handle_config(&settings, key, value, unset),
        Commands::Shell => handle_shell(dispatcher(settings, None, cli.dry_run)).await,
    }
}

fn dispatcher(settings: JsonSettingsStore, file: Option<&Path>, dry_run: bool) -> CliDispatcher {
    Dispatcher::new(
        settings,
        FileDocument::new(file),
        TerminalHost::new(dry_run),
        ConsoleNotifier,
    )
}

fn handle_commands() {
    for (id, action) in CommandTable::activated().iter() {
        println!("{:<40} {}", id.yellow(), action.title().dimmed());
    }
}

fn handle_config(
    settings: &JsonSettingsStore,
    key: Option<String>,
    value: Option<String>,
    unset: bool,
) -> Result<bool> {
    let Some(key) = key else {
        println!("{}", settings.path().display().to_string().dimmed());
        for key in KNOWN_KEYS {
            print_setting(key, settings.get(key));
        }
        return Ok(true);
    };

    if !KNOWN_KEYS.contains(&key.as_str()) {
        return Err(SnapError::Settings(format!(
            "Unknown config key: {} (expected one of {})",
            key,
            KNOWN_KEYS.join(", ")
        )));
    }

    if unset {
        if settings.unset(&key)? {
            println!("{}", format!("Removed {}", key).green());
        } else {
            println!("{}", format!("{} was not set", key).dimmed());
        }
        return Ok(true);
    }

    match value {
        Some(value) => {
            settings.set(&key, &value)?;
            println!("{}", format!("{} = {}", key, value).green());
        }
        None => print_setting(&key, settings.get(&key)),
    }
    Ok(true)
}

fn print_setting(key: &str, value: Option<String>) {
    match value {
        Some(value) => println!("{} = {}", key, value),
        None => println!("{} = {}", key, "(unset)".dimmed()),
    }
}

/// One dispatch per input line, all sharing the dispatcher's session.
///
/// Lines are `<command> [file]`, where `<command>` is a command identifier or
/// one of `test`, `update-overwrite`, `update-append`. Blank lines and lines
/// starting with `#` are skipped.
async fn handle_shell(dispatcher: CliDispatcher) -> Result<bool> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut all_ok = true;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (command, file) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, Some(PathBuf::from(rest.trim()))),
            None => (line, None),
        };

        let action = match command.parse::<ActionKind>() {
            Ok(action) => action,
            Err(e) => {
                dispatcher.notifier().show_error(&e.to_string());
                all_ok = false;
                continue;
            }
        };

        dispatcher.document().focus(file.as_deref());
        all_ok &= dispatcher.handle(action).await.is_some();
    }

    Ok(all_ok)
}
