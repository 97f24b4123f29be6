//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file::SETTINGS_FILE_NAME;

/// Template mycnf-split.toml with documentation
pub const SETTINGS_TEMPLATE: &str = r#"# mycnf-split.toml - Settings for mycnf-split
#
# mycnf-split reads a MySQL my.cnf and:
# - Renames legacy hyphenated options (max-connections -> max_connections)
# - Drops !include / !includedir directives
# - Writes one <key>.cnf file per option
# - Writes <config><suffix> that includes the generated files
#
# Command line flags take precedence over these settings.

[split]
# Source config.
# config = "/etc/mysql/my.cnf"

# Include directory used by the flat layout.
# include_dir = "/etc/mysql/conf.d"

# Suffix appended to the config path for the new top-level file.
# suffix = ".new"

# "flat": every key in include_dir, each file with its [section] header.
# "per-section": one <section>.d directory per section next to the config.
# layout = "flat"

# Remove include_dir before writing (flat layout only).
# clean_include_dir = false
"#;

/// Generate mycnf-split.toml in the specified directory (or current directory if None).
///
/// Returns an error if the file already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(
        || PathBuf::from(SETTINGS_FILE_NAME),
        |d| d.join(SETTINGS_FILE_NAME),
    );

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{SETTINGS_FILE_NAME} already exists"),
        ));
    }

    fs::write(&path, SETTINGS_TEMPLATE)?;
    Ok(path)
}

/// Generate mycnf-split.toml in the current directory.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
