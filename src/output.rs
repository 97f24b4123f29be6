use crate::colors::{Colors, Style};
use crate::layout::{Plan, SplitConfig};
use crate::normalize::{ChangeKind, NormalizeResult};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Normal,
    Quiet,
    Diff,
}

pub struct Config {
    pub dry_run: bool,
    pub output_mode: OutputMode,
    pub split: SplitConfig,
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub colors: Colors,
    pub verbose: bool,
    pub show_progress: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, use_colors: bool, verbose: bool, show_progress: bool) -> Self {
        Self {
            mode,
            colors: Colors::new(use_colors),
            verbose,
            show_progress,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunResult {
    pub files_planned: usize,
    pub files_written: usize,
    pub keys_renamed: usize,
    pub warnings: usize,
    pub top_level: PathBuf,
    pub cleaned: Option<PathBuf>,
}

impl RunResult {
    pub fn has_warnings(&self) -> bool {
        self.warnings > 0
    }
}

pub fn print_changes(result: &NormalizeResult, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }

    for change in &result.changes {
        let section = &change.section;
        match &change.kind {
            ChangeKind::DroppedShadowed { key, kept } => {
                eprintln!(
                    "{} [{section}] '{key}' dropped, '{kept}' already set",
                    ctx.colors.paint(Style::Warning, "Warning:")
                );
            }
            ChangeKind::Renamed { from, to } if ctx.verbose => {
                println!(
                    "{} [{section}] {from} -> {to}",
                    ctx.colors.paint(Style::Info, "Renamed:")
                );
            }
            ChangeKind::RemovedDirective { key } if ctx.verbose => {
                println!(
                    "{} [{section}] {key}",
                    ctx.colors.paint(Style::Info, "Removed:")
                );
            }
            _ => {}
        }
    }
}

pub fn print_collisions(plan: &Plan, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }

    for collision in &plan.collisions {
        let last = collision
            .sections
            .last()
            .map(String::as_str)
            .unwrap_or_default();
        eprintln!(
            "{} {} written by [{}], keeping [{last}]",
            ctx.colors.paint(Style::Warning, "Warning:"),
            collision.path.display(),
            collision.sections.join("], [")
        );
    }
}

pub fn print_written(path: &Path, ctx: &OutputContext) {
    match ctx.mode {
        OutputMode::Quiet => println!("{}", path.display()),
        OutputMode::Normal if ctx.verbose => println!(
            "{} {}",
            ctx.colors.paint(Style::Success, "Wrote:"),
            path.display()
        ),
        _ => {}
    }
}

pub fn print_planned(plan: &Plan, ctx: &OutputContext) {
    if let Some(dir) = &plan.clean_dir {
        if ctx.mode != OutputMode::Quiet {
            println!(
                "{} {}",
                ctx.colors.paint(Style::Info, "Would clean:"),
                dir.display()
            );
        }
    }

    for file in plan.files() {
        match ctx.mode {
            OutputMode::Quiet => println!("{}", file.path.display()),
            OutputMode::Normal => println!(
                "{} {}",
                ctx.colors.paint(Style::Info, "Would write:"),
                file.path.display()
            ),
            OutputMode::Diff => {}
        }
    }
}

pub fn print_diff(label: &str, original: &str, content: &str) {
    let diff = TextDiff::from_lines(original, content);

    println!("--- {label}");
    println!("+++ {label}");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!();
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                print!("{sign}{change}");
            }
        }
    }
}

/// Directories the writer had to create, verbose mode only.
pub fn print_dirs_created(dirs: &[PathBuf], ctx: &OutputContext) {
    if !ctx.verbose || ctx.mode == OutputMode::Quiet {
        return;
    }

    for dir in dirs {
        println!(
            "{} {}",
            ctx.colors.paint(Style::Info, "Created dir:"),
            dir.display()
        );
    }
}

pub fn print_summary(result: &RunResult, config: &Config, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }

    println!();
    let mut parts = vec![];
    if config.dry_run {
        parts.push(format!(
            "{} files would be written",
            result.files_planned
        ));
    } else {
        parts.push(ctx.colors.paint(
            Style::Success,
            &format!("{} files written", result.files_written),
        ));
    }
    if result.keys_renamed > 0 {
        parts.push(format!("{} keys renamed", result.keys_renamed));
    }
    if result.has_warnings() {
        parts.push(
            ctx.colors
                .paint(Style::Warning, &format!("{} warnings", result.warnings)),
        );
    }
    println!("{}", parts.join(", "));

    if !config.dry_run {
        println!(
            "{} {} ({} layout)",
            ctx.colors.paint(Style::Success, "Created:"),
            result.top_level.display(),
            config.split.layout
        );
    }
}

pub fn print_error(message: &str, colors: &Colors) {
    eprintln!("{} {message}", colors.paint(Style::Error, "Error:"));
}
