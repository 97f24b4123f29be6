//! Include-file layouts.
//!
//! A layout turns a normalized document into a [`Plan`]: the directories to
//! create and the exact files to write. Nothing here touches the filesystem,
//! see [`crate::writer`] for that.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::document::{Document, Entry};

/// Extension of every generated key file
pub const KEY_FILE_EXT: &str = "cnf";

/// Which emitter to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// All keys in one include directory, each file carrying its section header
    #[default]
    Flat,
    /// One `<section>.d` directory per section next to the config file
    PerSection,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Flat => f.write_str("flat"),
            Layout::PerSection => f.write_str("per-section"),
        }
    }
}

pub const DEFAULT_CONFIG_PATH: &str = "/etc/mysql/my.cnf";
pub const DEFAULT_INCLUDE_DIR: &str = "/etc/mysql/conf.d";
pub const DEFAULT_SUFFIX: &str = ".new";

/// Everything a run needs to know about where files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub config_path: PathBuf,
    pub include_dir: PathBuf,
    pub suffix: String,
    pub layout: Layout,
    pub clean_include_dir: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            include_dir: PathBuf::from(DEFAULT_INCLUDE_DIR),
            suffix: DEFAULT_SUFFIX.to_string(),
            layout: Layout::Flat,
            clean_include_dir: false,
        }
    }
}

impl SplitConfig {
    /// Plan `doc` with the configured layout.
    pub fn plan(&self, doc: &Document) -> Result<Plan, LayoutError> {
        match self.layout {
            Layout::Flat => plan_flat(
                doc,
                &FlatOptions {
                    config_path: self.config_path.clone(),
                    include_dir: self.include_dir.clone(),
                    suffix: self.suffix.clone(),
                    clean_include_dir: self.clean_include_dir,
                },
            ),
            Layout::PerSection => plan_per_section(
                doc,
                &SectionOptions {
                    config_path: self.config_path.clone(),
                    suffix: self.suffix.clone(),
                },
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlatOptions {
    pub config_path: PathBuf,
    pub include_dir: PathBuf,
    pub suffix: String,
    pub clean_include_dir: bool,
}

#[derive(Debug, Clone)]
pub struct SectionOptions {
    pub config_path: PathBuf,
    pub suffix: String,
}

/// Error type for building a plan
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A section or key name cannot be used as a file name
    UnsafeName { section: String, name: String },
    /// Cleaning the include directory would delete the source config
    CleanRemovesConfig {
        include_dir: PathBuf,
        config_path: PathBuf,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::UnsafeName { section, name } => write!(
                f,
                "'{name}' in section [{section}] cannot be used as a file name"
            ),
            LayoutError::CleanRemovesConfig {
                include_dir,
                config_path,
            } => write!(
                f,
                "refusing to clean '{}': it contains the source config '{}'",
                include_dir.display(),
                config_path.display()
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// The same key file written by more than one section; the last one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub path: PathBuf,
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Directory to remove before anything is written
    pub clean_dir: Option<PathBuf>,
    /// Directories created up front, even when no key lands in them
    pub dirs: Vec<PathBuf>,
    /// Key files in write order
    pub key_files: Vec<PlannedFile>,
    /// The new top-level config
    pub top_level: PlannedFile,
    pub collisions: Vec<Collision>,
}

impl Plan {
    /// Every file in write order, top-level last.
    pub fn files(&self) -> impl Iterator<Item = &PlannedFile> {
        self.key_files.iter().chain(std::iter::once(&self.top_level))
    }

    pub fn file_count(&self) -> usize {
        self.key_files.len() + 1
    }
}

/// Plan the flat layout: every key as `<include_dir>/<key>.cnf`.
pub fn plan_flat(doc: &Document, options: &FlatOptions) -> Result<Plan, LayoutError> {
    if options.clean_include_dir && options.config_path.starts_with(&options.include_dir) {
        return Err(LayoutError::CleanRemovesConfig {
            include_dir: options.include_dir.clone(),
            config_path: options.config_path.clone(),
        });
    }

    let mut key_files = vec![];
    let mut writers: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for section in doc.sections() {
        for entry in section.entries() {
            let path = key_file_path(&options.include_dir, section.name(), entry)?;
            writers
                .entry(path.clone())
                .or_default()
                .push(section.name().to_string());
            key_files.push(PlannedFile {
                path,
                contents: format!("[{}]\n{}", section.name(), key_line(entry)),
            });
        }
    }

    let collisions = writers
        .into_iter()
        .filter(|(_, sections)| sections.len() > 1)
        .map(|(path, sections)| Collision { path, sections })
        .collect();

    Ok(Plan {
        clean_dir: options
            .clean_include_dir
            .then(|| options.include_dir.clone()),
        dirs: vec![options.include_dir.clone()],
        key_files,
        top_level: PlannedFile {
            path: suffixed(&options.config_path, &options.suffix),
            contents: format!("!includedir {}\n", options.include_dir.display()),
        },
        collisions,
    })
}

/// Plan the per-section layout: every key as `<base>/<section>.d/<key>.cnf`.
///
/// Section directories are left to the writer, which creates them when the
/// first key file lands in them.
pub fn plan_per_section(doc: &Document, options: &SectionOptions) -> Result<Plan, LayoutError> {
    let base_dir = options
        .config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut key_files = vec![];
    let mut blocks = vec![];

    for section in doc.sections() {
        check_name(section.name(), section.name())?;
        let section_dir = base_dir.join(format!("{}.d", section.name()));

        blocks.push(format!(
            "[{}]\n!includedir {}",
            section.name(),
            section_dir.display()
        ));

        for entry in section.entries() {
            key_files.push(PlannedFile {
                path: key_file_path(&section_dir, section.name(), entry)?,
                contents: key_line(entry),
            });
        }
    }

    let contents = if blocks.is_empty() {
        String::new()
    } else {
        format!("{}\n", blocks.join("\n\n"))
    };

    Ok(Plan {
        clean_dir: None,
        dirs: vec![],
        key_files,
        top_level: PlannedFile {
            path: suffixed(&options.config_path, &options.suffix),
            contents,
        },
        collisions: vec![],
    })
}

/// `<key> = <value>\n`; flag keys keep the delimiter with an empty value.
fn key_line(entry: &Entry) -> String {
    format!("{} = {}\n", entry.key, entry.value)
}

fn key_file_path(dir: &Path, section: &str, entry: &Entry) -> Result<PathBuf, LayoutError> {
    check_name(section, &entry.key)?;
    Ok(dir.join(format!("{}.{KEY_FILE_EXT}", entry.key)))
}

fn check_name(section: &str, name: &str) -> Result<(), LayoutError> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if unsafe_name {
        return Err(LayoutError::UnsafeName {
            section: section.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// `<path><suffix>`, appended to the file name as-is (`my.cnf` + `.new`).
pub fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}
