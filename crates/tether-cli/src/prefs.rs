//! Preferences collaborator. The only state that survives a panel
//! close/reopen cycle lives here, in a TOML file under the user config
//! directory; every panel open reads it fresh.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    Text,
    Raw,
}

impl ExtractionMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Raw => "raw",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Text => Self::Raw,
            Self::Raw => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Panel opened at startup when none is given on the command line.
    pub default_panel: Option<String>,
    /// How the documents panel asks the daemon to re-extract content.
    pub documents_extraction_mode: ExtractionMode,
    /// Overrides the per-panel poll interval when set.
    pub poll_interval_ms: Option<u64>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_panel: None,
            documents_extraction_mode: ExtractionMode::Text,
            poll_interval_ms: None,
        }
    }
}

pub fn preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tether").join("preferences.toml"))
}

/// Best-effort load: a missing or unreadable file yields defaults so the
/// client always starts.
pub fn load_from(path: &Path) -> Preferences {
    let Ok(raw) = fs::read_to_string(path) else {
        return Preferences::default();
    };
    match toml::from_str(&raw) {
        Ok(prefs) => prefs,
        Err(err) => {
            log::warn!("ignoring malformed preferences file: {err}");
            Preferences::default()
        }
    }
}

pub fn save_to(path: &Path, prefs: &Preferences) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = toml::to_string_pretty(prefs).map_err(std::io::Error::other)?;
    fs::write(path, raw)
}

pub fn load() -> Preferences {
    preferences_path()
        .map(|path| load_from(&path))
        .unwrap_or_default()
}
