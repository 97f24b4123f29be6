//! Settings file support for mycnf-split.
//!
//! This module provides:
//! - Loading settings from `mycnf-split.toml`
//! - Settings file discovery (search upward from current directory)
//! - Merging CLI args, settings file, and defaults
//! - Template generation with `--init`

mod file;
mod init;
mod merge;
mod toml_schema;

pub use file::{find_settings_file, load_settings, ConfigError, SETTINGS_FILE_NAME};
pub use init::{generate_init_file, generate_init_file_in, SETTINGS_TEMPLATE};
pub use merge::{merge_split_config, CliSplitOptions};
pub use toml_schema::{SettingsToml, SplitSection};
