//! Settings merging logic
//!
//! Priority: CLI args > mycnf-split.toml > defaults

use std::path::PathBuf;

use crate::layout::{Layout, SplitConfig};

use super::toml_schema::SplitSection;

/// CLI options that can override settings file values.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliSplitOptions {
    pub config: Option<PathBuf>,
    pub include_dir: Option<PathBuf>,
    pub suffix: Option<String>,
    pub layout: Option<Layout>,
    /// Only `Some(true)` when the flag was passed
    pub clean_include_dir: Option<bool>,
}

/// Merge settings from CLI, TOML, and defaults.
pub fn merge_split_config(cli: &CliSplitOptions, toml: Option<&SplitSection>) -> SplitConfig {
    let defaults = SplitConfig::default();

    SplitConfig {
        config_path: cli
            .config
            .clone()
            .or_else(|| toml.and_then(|t| t.config.clone()))
            .unwrap_or(defaults.config_path),
        include_dir: cli
            .include_dir
            .clone()
            .or_else(|| toml.and_then(|t| t.include_dir.clone()))
            .unwrap_or(defaults.include_dir),
        suffix: cli
            .suffix
            .clone()
            .or_else(|| toml.and_then(|t| t.suffix.clone()))
            .unwrap_or(defaults.suffix),
        layout: cli
            .layout
            .or_else(|| toml.and_then(|t| t.layout))
            .unwrap_or(defaults.layout),
        clean_include_dir: cli
            .clean_include_dir
            .or_else(|| toml.and_then(|t| t.clean_include_dir))
            .unwrap_or(defaults.clean_include_dir),
    }
}
