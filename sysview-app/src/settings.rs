use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sysview_core::Setting;

/// The Settings tab's backing store: a JSON list of
/// `{name, description, command}` records.
///
/// The file is re-serialized after every command run, because a run may
/// rewrite the command text (sudo elevation). It is always written back to
/// the path it was loaded from.
pub struct SettingsStore {
    path: PathBuf,
    pub entries: Vec<Setting>,
}

/// A lone top-level object is accepted and treated as a one-element list.
#[derive(Deserialize)]
#[serde(untagged)]
enum SettingsFile {
    Many(Vec<Setting>),
    One(Setting),
}

impl SettingsStore {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "settings file not found");
                return Ok(Self {
                    path: path.to_path_buf(),
                    entries: Vec::new(),
                });
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let entries = match serde_json::from_str::<SettingsFile>(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?
        {
            SettingsFile::Many(list) => list,
            SettingsFile::One(single) => vec![single],
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Store the command line that actually ran and persist the whole list.
    pub fn record_command(&mut self, index: usize, command: String) -> Result<()> {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.command = command;
        }
        self.save()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
