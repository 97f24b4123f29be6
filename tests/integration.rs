use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn split_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mycnf-split"));
    cmd.env("NO_COLOR", "1");
    cmd
}

fn run_flat(dir: &Path, extra: &[&str]) -> Output {
    split_cmd()
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("my.cnf"))
        .arg("--include-dir")
        .arg(dir.join("conf.d"))
        .args(extra)
        .output()
        .unwrap()
}

// ===========================================
// Flat layout
// ===========================================

#[test]
fn test_flat_round_trip() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nmax-connections=100\n").unwrap();

    let output = run_flat(dir.path(), &[]);
    assert!(output.status.success());

    assert_eq!(
        fs::read_to_string(dir.path().join("conf.d/max_connections.cnf")).unwrap(),
        "[mysqld]\nmax_connections = 100\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("my.cnf.new")).unwrap(),
        format!("!includedir {}\n", dir.path().join("conf.d").display())
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 files written"));
    assert!(stdout.contains("1 keys renamed"));
}

#[test]
fn test_flat_flag_key() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nskip-networking\n").unwrap();

    assert!(run_flat(dir.path(), &[]).status.success());

    assert_eq!(
        fs::read_to_string(dir.path().join("conf.d/skip_networking.cnf")).unwrap(),
        "[mysqld]\nskip_networking = \n"
    );
}

#[test]
fn test_flat_strips_include_directives() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("my.cnf"),
        "!includedir /etc/mysql/conf.d/\n[mysqld]\n!includedir /etc/mysql/mysql.conf.d/\nport=3306\n",
    )
    .unwrap();

    assert!(run_flat(dir.path(), &[]).status.success());

    let files: Vec<_> = fs::read_dir(dir.path().join("conf.d"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files, vec![dir.path().join("conf.d/port.cnf")]);
    for file in files {
        let content = fs::read_to_string(file).unwrap();
        assert!(content.lines().all(|l| !l.starts_with("!include")));
    }
}

#[test]
fn test_flat_custom_suffix() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();

    assert!(run_flat(dir.path(), &["--suffix", ".split"]).status.success());

    assert!(dir.path().join("my.cnf.split").exists());
    assert!(!dir.path().join("my.cnf.new").exists());
}

#[test]
fn test_flat_collision_warns_and_last_wins() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("my.cnf"),
        "[client]\nport=3306\n[mysqld]\nport=3307\n",
    )
    .unwrap();

    let output = run_flat(dir.path(), &[]);
    assert!(output.status.success());

    assert_eq!(
        fs::read_to_string(dir.path().join("conf.d/port.cnf")).unwrap(),
        "[mysqld]\nport = 3307\n"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Warning:"));
    assert!(stderr.contains("keeping [mysqld]"));
}

#[test]
fn test_clean_include_dir_removes_stale_files_only_there() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();
    fs::create_dir(dir.path().join("conf.d")).unwrap();
    fs::write(dir.path().join("conf.d/stale.cnf"), "[mysqld]\nold = 1\n").unwrap();
    fs::write(dir.path().join("other.txt"), "untouched").unwrap();

    assert!(run_flat(dir.path(), &["--clean-include-dir"]).status.success());

    assert!(!dir.path().join("conf.d/stale.cnf").exists());
    assert!(dir.path().join("conf.d/port.cnf").exists());
    assert!(dir.path().join("other.txt").exists());
}

#[test]
fn test_clean_refused_when_include_dir_holds_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();
    fs::write(dir.path().join("sibling.cnf"), "[client]\nuser=a\n").unwrap();

    let output = split_cmd()
        .current_dir(dir.path())
        .arg("--config")
        .arg(dir.path().join("my.cnf"))
        .arg("--include-dir")
        .arg(dir.path())
        .arg("--clean-include-dir")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("refusing to clean"));
    assert!(dir.path().join("my.cnf").exists());
    assert!(dir.path().join("sibling.cnf").exists());
    assert!(!dir.path().join("port.cnf").exists());
}

#[test]
fn test_without_clean_stale_files_stay() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();
    fs::create_dir(dir.path().join("conf.d")).unwrap();
    fs::write(dir.path().join("conf.d/stale.cnf"), "[mysqld]\nold = 1\n").unwrap();

    assert!(run_flat(dir.path(), &[]).status.success());

    assert!(dir.path().join("conf.d/stale.cnf").exists());
}

// ===========================================
// Per-section layout
// ===========================================

#[test]
fn test_per_section_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("my.cnf");
    fs::write(&config, "[mysqld]\nmax-connections=100\n").unwrap();

    let output = split_cmd()
        .arg("--config")
        .arg(&config)
        .arg("--layout")
        .arg("per-section")
        .output()
        .unwrap();
    assert!(output.status.success());

    let section_dir = dir.path().join("mysqld.d");
    assert_eq!(
        fs::read_to_string(section_dir.join("max_connections.cnf")).unwrap(),
        "max_connections = 100\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("my.cnf.new")).unwrap(),
        format!("[mysqld]\n!includedir {}\n", section_dir.display())
    );
}

#[test]
fn test_per_section_multiple_sections() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("my.cnf");
    fs::write(
        &config,
        "[client]\ndefault-character-set=utf8mb4\n\n[mysqld]\nport=3306\nskip-name-resolve\n",
    )
    .unwrap();

    let output = split_cmd()
        .arg("--config")
        .arg(&config)
        .arg("--layout")
        .arg("per-section")
        .output()
        .unwrap();
    assert!(output.status.success());

    assert_eq!(
        fs::read_to_string(dir.path().join("client.d/default_character_set.cnf")).unwrap(),
        "default_character_set = utf8mb4\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("mysqld.d/skip_name_resolve.cnf")).unwrap(),
        "skip_name_resolve = \n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("my.cnf.new")).unwrap(),
        format!(
            "[client]\n!includedir {}\n\n[mysqld]\n!includedir {}\n",
            dir.path().join("client.d").display(),
            dir.path().join("mysqld.d").display()
        )
    );
}

// ===========================================
// Failures
// ===========================================

#[test]
fn test_duplicate_key_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\nport=2\n").unwrap();

    let output = run_flat(dir.path(), &[]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("my.cnf"));
    assert!(!dir.path().join("conf.d").exists());
    assert!(!dir.path().join("my.cnf.new").exists());
}

#[test]
fn test_missing_config_fails() {
    let dir = TempDir::new().unwrap();

    let output = run_flat(dir.path(), &[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("my.cnf"));
}

#[test]
fn test_unsafe_key_name_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n../escape=1\n").unwrap();

    let output = run_flat(dir.path(), &[]);

    assert!(!output.status.success());
    assert!(!dir.path().join("conf.d").exists());
}

// ===========================================
// Output modes
// ===========================================

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();

    let output = run_flat(dir.path(), &["--dry-run"]);
    assert!(output.status.success());

    assert!(!dir.path().join("conf.d").exists());
    assert!(!dir.path().join("my.cnf.new").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would write:"));
    assert!(stdout.contains("port.cnf"));
}

#[test]
fn test_diff_mode_shows_changes() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();

    let output = run_flat(dir.path(), &["--diff", "--dry-run"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("---"));
    assert!(stdout.contains("+++"));
    assert!(stdout.contains("+port = 1"));
}

#[test]
fn test_quiet_mode_lists_written_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();

    let output = run_flat(dir.path(), &["--quiet"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port.cnf"));
    assert!(stdout.contains("my.cnf.new"));
    assert!(!stdout.contains("files written"));
}

#[test]
fn test_verbose_reports_renames() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("my.cnf"),
        "[mysqld]\nmax-connections=100\n!include /etc/mysql/extra.cnf\n",
    )
    .unwrap();

    let output = run_flat(dir.path(), &["--verbose"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("max-connections -> max_connections"));
    assert!(stdout.contains("Removed:"));
    assert!(stdout.contains("Wrote:"));
    assert!(stdout.contains("Created dir:"));
}

// ===========================================
// Settings file
// ===========================================

#[test]
fn test_init_creates_settings_file() {
    let dir = TempDir::new().unwrap();

    let output = split_cmd()
        .current_dir(dir.path())
        .arg("--init")
        .output()
        .unwrap();
    assert!(output.status.success());

    let content = fs::read_to_string(dir.path().join("mycnf-split.toml")).unwrap();
    assert!(content.contains("[split]"));
}

#[test]
fn test_init_fails_if_settings_exist() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("mycnf-split.toml"), "existing").unwrap();

    let output = split_cmd()
        .current_dir(dir.path())
        .arg("--init")
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_settings_file_selects_layout() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();
    fs::write(
        dir.path().join("mycnf-split.toml"),
        format!(
            "[split]\nconfig = {:?}\nlayout = \"per-section\"\n",
            dir.path().join("my.cnf").display().to_string()
        ),
    )
    .unwrap();

    let output = split_cmd().current_dir(dir.path()).output().unwrap();
    assert!(output.status.success());

    assert!(dir.path().join("mysqld.d/port.cnf").exists());
}

#[test]
fn test_cli_overrides_settings_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();
    fs::write(
        dir.path().join("mycnf-split.toml"),
        "[split]\nlayout = \"per-section\"\nsuffix = \".toml\"\n",
    )
    .unwrap();

    let output = run_flat(dir.path(), &["--layout", "flat"]);
    assert!(output.status.success());

    assert!(dir.path().join("conf.d/port.cnf").exists());
    assert!(!dir.path().join("mysqld.d").exists());
    // suffix still comes from the settings file
    assert!(dir.path().join("my.cnf.toml").exists());
}

#[test]
fn test_explicit_settings_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();
    let settings = dir.path().join("custom.toml");
    fs::write(&settings, "[split]\nsuffix = \".custom\"\n").unwrap();

    let output = run_flat(dir.path(), &["--settings", settings.to_str().unwrap()]);
    assert!(output.status.success());

    assert!(dir.path().join("my.cnf.custom").exists());
}

#[test]
fn test_invalid_explicit_settings_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();
    let settings = dir.path().join("custom.toml");
    fs::write(&settings, "[split]\nlayout = \"nested\"\n").unwrap();

    let output = run_flat(dir.path(), &["--settings", settings.to_str().unwrap()]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("custom.toml"));
    assert!(!dir.path().join("conf.d").exists());
    assert!(!dir.path().join("my.cnf.new").exists());
}

#[test]
fn test_invalid_discovered_settings_warns_and_continues() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("my.cnf"), "[mysqld]\nport=1\n").unwrap();
    fs::write(
        dir.path().join("mycnf-split.toml"),
        "[split]\nlayout = \"nested\"\n",
    )
    .unwrap();

    let output = run_flat(dir.path(), &[]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Warning:"));
    assert!(dir.path().join("conf.d/port.cnf").exists());
}
