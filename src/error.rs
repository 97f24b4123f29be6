use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::layout::LayoutError;
use crate::parser::ParseError;

/// Error type for a split run. Every variant is fatal.
#[derive(Debug)]
pub enum SplitError {
    /// The source config could not be read or parsed
    ConfigRead { path: PathBuf, source: ParseError },
    /// A section or key name cannot become a file name
    Layout(LayoutError),
    /// Removing the include directory failed
    CleanDir { path: PathBuf, source: io::Error },
    DirectoryCreate { path: PathBuf, source: io::Error },
    FileWrite { path: PathBuf, source: io::Error },
    /// Reading an existing output file for a diff failed
    FileRead { path: PathBuf, source: io::Error },
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::ConfigRead { path, source } => {
                write!(f, "failed to read config '{}': {source}", path.display())
            }
            SplitError::Layout(e) => write!(f, "{e}"),
            SplitError::CleanDir { path, source } => {
                write!(f, "failed to clean '{}': {source}", path.display())
            }
            SplitError::DirectoryCreate { path, source } => write!(
                f,
                "failed to create directory '{}': {source}",
                path.display()
            ),
            SplitError::FileWrite { path, source } => {
                write!(f, "failed to write '{}': {source}", path.display())
            }
            SplitError::FileRead { path, source } => {
                write!(f, "failed to read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SplitError::ConfigRead { source, .. } => Some(source),
            SplitError::Layout(e) => Some(e),
            SplitError::CleanDir { source, .. }
            | SplitError::DirectoryCreate { source, .. }
            | SplitError::FileWrite { source, .. }
            | SplitError::FileRead { source, .. } => Some(source),
        }
    }
}

impl From<LayoutError> for SplitError {
    fn from(e: LayoutError) -> Self {
        SplitError::Layout(e)
    }
}
