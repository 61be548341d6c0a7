//! Error types for site loading, metadata resolution, and relocation.
//!
//! Failures fall in three groups:
//! - [`LoadError`]: structural and fatal, aborts the whole build.
//! - [`MetadataError`]: recoverable, scoped to one page. The scheduler logs
//!   it and keeps the page's default metadata.
//! - [`RelocateError`]: a policy conflict, reported and skipped.

use std::path::PathBuf;

/// Fatal error raised while discovering pages.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A directory or entry under a walked root could not be read.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file name is not valid UTF-8 and cannot become a site path.
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// A handler failed while deciding whether it claims a file.
    #[error("Handler {handler} failed on {path}: {message}")]
    Handler {
        /// Handler name.
        handler: &'static str,
        /// Relative path being classified.
        path: String,
        /// Failure description.
        message: String,
    },

    /// A theme was already loaded for this site.
    #[error("Cannot load theme from {} because it was already loaded from {}", requested.display(), existing.display())]
    ThemeAlreadyLoaded {
        /// Root of the theme already loaded.
        existing: PathBuf,
        /// Root of the theme requested now.
        requested: PathBuf,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Recoverable error raised while reading one page's metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The source file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The front matter block is malformed.
    #[error("Invalid front matter: {0}")]
    FrontMatter(String),

    /// A date field could not be parsed.
    #[error("Cannot parse date: {value}")]
    Date {
        /// The offending value.
        value: String,
    },

    /// A required field is missing.
    #[error("Missing required field: {0}")]
    Missing(&'static str),
}

/// Relocation refused because the target path is taken.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RelocateError {
    /// Another page already occupies the target path.
    #[error("Cannot relocate {from} to existing page {to}")]
    Occupied {
        /// Current site path of the page.
        from: String,
        /// Requested site path.
        to: String,
    },
}
