use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mycnf_split::{
    find_settings_file, generate_init_file, load_settings, merge_split_config, print_error, run,
    should_use_colors, CliSplitOptions, Colors, Config, Layout, OutputContext, OutputMode,
    SettingsToml,
};

#[derive(Parser)]
#[command(name = "mycnf-split")]
#[command(
    version,
    about = "Normalize a MySQL my.cnf and split it into per-key include files"
)]
struct Cli {
    /// Path to the source config [default: /etc/mysql/my.cnf]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Include directory for the flat layout [default: /etc/mysql/conf.d]
    #[arg(long, value_name = "PATH")]
    include_dir: Option<PathBuf>,

    /// Remove the include directory before writing (flat layout)
    #[arg(long)]
    clean_include_dir: bool,

    /// Suffix for the newly created top-level config [default: .new]
    #[arg(long, value_name = "SUFFIX")]
    suffix: Option<String>,

    /// Output layout [default: flat]
    #[arg(long, value_enum)]
    layout: Option<Layout>,

    /// Show what would be written without touching the filesystem
    #[arg(long)]
    dry_run: bool,

    /// Show changes in diff format
    #[arg(short, long)]
    diff: bool,

    /// Output only written file names
    #[arg(short, long)]
    quiet: bool,

    /// Report every renamed key and written file
    #[arg(short, long)]
    verbose: bool,

    /// Force colored output
    #[arg(long)]
    color: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Generate a template mycnf-split.toml settings file
    #[arg(long)]
    init: bool,

    /// Settings file path (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let use_colors = should_use_colors(cli.color, cli.no_color);

    if cli.init {
        return handle_init(use_colors);
    }

    let settings = match load_configuration(&cli.settings, cli.quiet) {
        Ok(settings) => settings,
        Err(message) => {
            print_error(&message, &Colors::new(use_colors));
            return ExitCode::from(1);
        }
    };

    // Merge configurations: CLI > TOML > defaults
    let split = merge_split_config(
        &build_cli_options(&cli),
        settings.as_ref().map(|s| &s.split),
    );

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.diff {
        OutputMode::Diff
    } else {
        OutputMode::Normal
    };

    let show_progress =
        output_mode == OutputMode::Normal && !cli.verbose && io::stderr().is_terminal();
    let ctx = OutputContext::new(output_mode, use_colors, cli.verbose, show_progress);

    let config = Config {
        dry_run: cli.dry_run,
        output_mode,
        split,
    };

    match run(&config, &ctx) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e.to_string(), &ctx.colors);
            ExitCode::from(1)
        }
    }
}

fn handle_init(use_colors: bool) -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&e.to_string(), &Colors::new(use_colors));
            ExitCode::from(1)
        }
    }
}

/// Load the settings file.
///
/// A file named with `--settings` must load; an auto-discovered one that
/// fails is reported and ignored.
fn load_configuration(
    explicit_path: &Option<PathBuf>,
    quiet: bool,
) -> Result<Option<SettingsToml>, String> {
    if let Some(path) = explicit_path {
        return match load_settings(path) {
            Ok(settings) => {
                if !quiet {
                    eprintln!("Using settings: {}", path.display());
                }
                Ok(Some(settings))
            }
            Err(e) => Err(format!("failed to load {}: {e}", path.display())),
        };
    }

    let discovered = std::env::current_dir()
        .ok()
        .and_then(|d| find_settings_file(&d));

    Ok(discovered.and_then(|p| match load_settings(&p) {
        Ok(settings) => {
            if !quiet {
                eprintln!("Using settings: {}", p.display());
            }
            Some(settings)
        }
        Err(e) => {
            eprintln!("Warning: Failed to load {}: {}", p.display(), e);
            None
        }
    }))
}

fn build_cli_options(cli: &Cli) -> CliSplitOptions {
    // Boolean flags in clap are always present (default false), so we
    // treat false as "not set" for proper merging with the settings file.
    CliSplitOptions {
        config: cli.config.clone(),
        include_dir: cli.include_dir.clone(),
        suffix: cli.suffix.clone(),
        layout: cli.layout,
        clean_include_dir: cli.clean_include_dir.then_some(true),
    }
}
