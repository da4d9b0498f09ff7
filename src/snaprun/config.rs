//! # Configuration
//!
//! Three settings drive every dispatch:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `http-snap.path` | Directory of the http-snap checkout; used as the session's working directory |
//! | `http-snap.environment` | Environment file passed as `--environment` |
//! | `http-snap.client-options` | Client options file passed as `--client-options` |
//!
//! Settings are never cached. [`ConfigResolver`] asks its [`SettingsStore`] on
//! every call, so an edit to the settings file is picked up by the next
//! dispatch without restarting anything.
//!
//! Two stores ship with the crate:
//! - [`JsonSettingsStore`]: a flat JSON object on disk, re-read on each lookup.
//! - [`MemorySettings`]: a map, for tests and for hosts that keep settings themselves.

use crate::error::{Result, SnapError};
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOOL_PATH_KEY: &str = "http-snap.path";
pub const ENVIRONMENT_KEY: &str = "http-snap.environment";
pub const CLIENT_OPTIONS_KEY: &str = "http-snap.client-options";

/// All keys understood by the resolver, in display order.
pub const KNOWN_KEYS: [&str; 3] = [TOOL_PATH_KEY, ENVIRONMENT_KEY, CLIENT_OPTIONS_KEY];

const SETTINGS_FILENAME: &str = "settings.json";

/// Generic key lookup over whatever holds the user's settings.
///
/// A key that is missing, or holds something other than a string, is unset.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Reads the three runner settings from a store, fresh on every call.
pub struct ConfigResolver<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> ConfigResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn tool_path(&self) -> Option<String> {
        self.lookup(TOOL_PATH_KEY)
    }

    pub fn environment(&self) -> Option<String> {
        self.lookup(ENVIRONMENT_KEY)
    }

    pub fn client_options(&self) -> Option<String> {
        self.lookup(CLIENT_OPTIONS_KEY)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|value| !value.is_empty())
    }
}

/// Contents of a settings file: the runner's own keys, plus whatever else the
/// file holds, which is kept untouched across writes.
///
/// A runner key holding something other than a string reads as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerSettings {
    #[serde(
        rename = "http-snap.path",
        default,
        deserialize_with = "string_or_unset",
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_path: Option<String>,

    #[serde(
        rename = "http-snap.environment",
        default,
        deserialize_with = "string_or_unset",
        skip_serializing_if = "Option::is_none"
    )]
    pub environment: Option<String>,

    #[serde(
        rename = "http-snap.client-options",
        default,
        deserialize_with = "string_or_unset",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_options: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

fn string_or_unset<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        _ => None,
    })
}

impl RunnerSettings {
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            TOOL_PATH_KEY => self.tool_path.as_deref(),
            ENVIRONMENT_KEY => self.environment.as_deref(),
            CLIENT_OPTIONS_KEY => self.client_options.as_deref(),
            _ => self.other.get(key).and_then(Value::as_str),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        match self.known_mut(key) {
            Some(slot) => *slot = Some(value.to_string()),
            None => {
                self.other
                    .insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }

    /// Returns whether the key was present.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.known_mut(key) {
            Some(slot) => slot.take().is_some(),
            None => self.other.remove(key).is_some(),
        }
    }

    fn known_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            TOOL_PATH_KEY => Some(&mut self.tool_path),
            ENVIRONMENT_KEY => Some(&mut self.environment),
            CLIENT_OPTIONS_KEY => Some(&mut self.client_options),
            _ => None,
        }
    }
}

/// Settings kept in a flat JSON object, e.g.
///
/// ```json
/// { "http-snap.path": "/home/me/http-snap", "http-snap.environment": "env/staging.json" }
/// ```
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The settings file in the user's config directory.
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "http-snap", "http-snap-runner").ok_or_else(|| {
            SnapError::Settings("Could not determine a config directory".to_string())
        })?;
        Ok(Self::new(dirs.config_dir().join(SETTINGS_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole file. A missing or blank file has no settings.
    pub fn load(&self) -> Result<RunnerSettings> {
        if !self.path.exists() {
            return Ok(RunnerSettings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RunnerSettings::default());
        }

        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(serde_json::from_value(Value::Object(map))?),
            _ => Err(SnapError::Settings(format!(
                "{} must contain a JSON object",
                self.path.display()
            ))),
        }
    }

    /// Write one key, preserving every other entry in the file.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.set(key, value);
        self.write(&settings)
    }

    /// Remove one key. Returns whether it was present.
    pub fn unset(&self, key: &str) -> Result<bool> {
        let mut settings = self.load()?;
        let removed = settings.remove(key);
        if removed {
            self.write(&settings)?;
        }
        Ok(removed)
    }

    fn write(&self, settings: &RunnerSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(settings) => settings.get(key).map(str::to_string),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable settings");
                None
            }
        }
    }
}

/// In-memory settings. Interior mutability lets a host change values while a
/// resolver holds a shared reference, which is how "edits take effect on the
/// next dispatch" is exercised in tests.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) -> bool {
        self.values.borrow_mut().remove(key).is_some()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}
