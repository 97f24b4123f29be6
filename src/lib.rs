pub mod colors;
pub mod config;
pub mod document;
mod error;
pub mod layout;
pub mod normalize;
mod output;
pub mod parser;
pub mod progress;
pub mod writer;

pub use colors::{should_use_colors, Colors, Style};
pub use config::{
    find_settings_file, generate_init_file, load_settings, merge_split_config, CliSplitOptions,
    ConfigError, SettingsToml, SplitSection, SETTINGS_TEMPLATE,
};
pub use document::{Document, Entry, Section};
pub use error::SplitError;
pub use layout::{plan_flat, plan_per_section, Layout, LayoutError, Plan, PlannedFile, SplitConfig};
pub use normalize::{normalize_document, Change, ChangeKind, NormalizeResult};
pub use output::{print_diff, print_error, Config, OutputContext, OutputMode, RunResult};
pub use parser::{parse_file, parse_str, ParseError};
pub use progress::ProgressReporter;
pub use writer::{apply_plan, WriteReport};

use std::fs;
use std::io;
use std::path::Path;

/// Main entry point: parse, normalize, plan and (unless dry-run) write.
pub fn run(config: &Config, ctx: &OutputContext) -> Result<RunResult, SplitError> {
    let split = &config.split;

    let source = parse_file(&split.config_path).map_err(|source| SplitError::ConfigRead {
        path: split.config_path.clone(),
        source,
    })?;

    let normalized = normalize_document(&source);
    if normalized.has_changes() {
        output::print_changes(&normalized, ctx);
    }

    let plan = split.plan(&normalized.document)?;
    output::print_collisions(&plan, ctx);

    let mut result = RunResult {
        files_planned: plan.file_count(),
        keys_renamed: normalized.renamed_count(),
        warnings: normalized
            .changes
            .iter()
            .filter(|c| c.kind.is_warning())
            .count()
            + plan.collisions.len(),
        top_level: plan.top_level.path.clone(),
        ..Default::default()
    };

    if ctx.mode == OutputMode::Diff {
        print_plan_diff(&plan)?;
    }

    if config.dry_run {
        output::print_planned(&plan, ctx);
    } else {
        let progress = ProgressReporter::new(plan.file_count() as u64, ctx.show_progress);
        let report = apply_plan(&plan, |path| {
            progress.file_written(path);
            if !progress.is_visible() {
                output::print_written(path, ctx);
            }
        })?;
        progress.finish();
        output::print_dirs_created(&report.dirs_created, ctx);

        result.files_written = report.files_written;
        result.cleaned = report.cleaned;
    }

    output::print_summary(&result, config, ctx);

    Ok(result)
}

/// Diff every planned file against what is on disk now.
fn print_plan_diff(plan: &Plan) -> Result<(), SplitError> {
    for file in plan.files() {
        let current = read_existing(&file.path)?;
        if current != file.contents {
            print_diff(&file.path.display().to_string(), &current, &file.contents);
        }
    }
    Ok(())
}

/// Current contents of `path`, empty when it does not exist yet.
fn read_existing(path: &Path) -> Result<String, SplitError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(SplitError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
