//! Settings file discovery and loading

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::toml_schema::SettingsToml;

pub const SETTINGS_FILE_NAME: &str = "mycnf-split.toml";

/// Error type for settings loading
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading the file
    Io(io::Error),
    /// TOML parsing error
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read settings file: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse settings file: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Find mycnf-split.toml by searching upward from the given directory,
/// stopping at the git repository root.
pub fn find_settings_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let file_path = current.join(SETTINGS_FILE_NAME);
        if file_path.is_file() {
            return Some(file_path);
        }

        if current.join(".git").exists() {
            return None;
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load and parse mycnf-split.toml from the given path.
pub fn load_settings(path: &Path) -> Result<SettingsToml, ConfigError> {
    let content = fs::read_to_string(path)?;
    let settings: SettingsToml = toml::from_str(&content)?;
    Ok(settings)
}
