//! Applies a [`Plan`] to the filesystem.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::SplitError;
use crate::layout::Plan;

/// rwxrwxr-x
pub const DIR_MODE: u32 = 0o775;
/// rw-rw-r--
pub const FILE_MODE: u32 = 0o664;

#[derive(Debug, Default)]
pub struct WriteReport {
    pub files_written: usize,
    pub dirs_created: Vec<PathBuf>,
    pub cleaned: Option<PathBuf>,
}

/// Write every file of `plan`, calling `on_write` after each one.
///
/// The first failure aborts; files already written stay on disk.
pub fn apply_plan(
    plan: &Plan,
    mut on_write: impl FnMut(&Path),
) -> Result<WriteReport, SplitError> {
    let mut report = WriteReport::default();

    if let Some(dir) = &plan.clean_dir {
        clean_dir(dir)?;
        report.cleaned = Some(dir.clone());
    }

    let mut known_dirs = HashSet::new();
    for dir in &plan.dirs {
        ensure_dir(dir, &mut known_dirs, &mut report)?;
    }

    for file in plan.files() {
        if let Some(parent) = file.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent, &mut known_dirs, &mut report)?;
        }

        write_file(&file.path, &file.contents).map_err(|source| SplitError::FileWrite {
            path: file.path.clone(),
            source,
        })?;
        report.files_written += 1;
        on_write(&file.path);
    }

    Ok(report)
}

fn clean_dir(dir: &Path) -> Result<(), SplitError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SplitError::CleanDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn ensure_dir(
    dir: &Path,
    known: &mut HashSet<PathBuf>,
    report: &mut WriteReport,
) -> Result<(), SplitError> {
    if known.contains(dir) {
        return Ok(());
    }

    if !dir.is_dir() {
        create_dir(dir).map_err(|source| SplitError::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        })?;
        report.dirs_created.push(dir.to_path_buf());
    }

    known.insert(dir.to_path_buf());
    Ok(())
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options.open(path)?;
    file.write_all(contents.as_bytes())
}
