//! TOML schema definitions for mycnf-split.toml

use std::path::PathBuf;

use serde::Deserialize;

use crate::layout::Layout;

/// Root structure for mycnf-split.toml
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsToml {
    #[serde(default)]
    pub split: SplitSection,
}

/// `[split]` section in mycnf-split.toml
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitSection {
    /// Source config (default: /etc/mysql/my.cnf)
    pub config: Option<PathBuf>,

    /// Include directory for the flat layout (default: /etc/mysql/conf.d)
    pub include_dir: Option<PathBuf>,

    /// Suffix of the new top-level config (default: .new)
    pub suffix: Option<String>,

    /// `flat` or `per-section` (default: flat)
    pub layout: Option<Layout>,

    /// Remove the include directory before writing (default: false)
    pub clean_include_dir: Option<bool>,
}
