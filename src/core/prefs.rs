//! # Preferences
//!
//! The one piece of state that outlives a run: the color theme.
//! Stored as `theme = "light" | "dark"` in `~/.support-chat/prefs.toml`,
//! read once at startup and rewritten on every toggle.
//!
//! Writes go through a `.tmp` file and `rename()` so a crash never leaves
//! a half-written file behind.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
struct Prefs {
    theme: Option<Theme>,
}

#[derive(Debug)]
pub enum PrefsError {
    Io(io::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefsError::Io(e) => write!(f, "prefs I/O error: {e}"),
            PrefsError::Serialize(e) => write!(f, "prefs serialize error: {e}"),
        }
    }
}

impl std::error::Error for PrefsError {}

/// Returns the path to `~/.support-chat/prefs.toml`.
pub fn prefs_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".support-chat").join("prefs.toml"))
}

/// Reads the saved theme. Anything missing or unreadable means `Light`.
pub fn load_theme(path: &Path) -> Theme {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Theme::default(),
        Err(e) => {
            warn!("Failed to read prefs {}: {}", path.display(), e);
            return Theme::default();
        }
    };

    match toml::from_str::<Prefs>(&contents) {
        Ok(prefs) => {
            let theme = prefs.theme.unwrap_or_default();
            debug!("Loaded theme {:?} from {}", theme, path.display());
            theme
        }
        Err(e) => {
            warn!("Ignoring malformed prefs {}: {}", path.display(), e);
            Theme::default()
        }
    }
}

/// Persists the theme, creating the parent directory if needed.
pub fn save_theme(path: &Path, theme: Theme) -> Result<(), PrefsError> {
    let body = toml::to_string(&Prefs { theme: Some(theme) }).map_err(PrefsError::Serialize)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(PrefsError::Io)?;
    }
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, body).map_err(PrefsError::Io)?;
    fs::rename(&tmp, path).map_err(PrefsError::Io)?;

    debug!("Saved theme {:?} to {}", theme, path.display());
    Ok(())
}
