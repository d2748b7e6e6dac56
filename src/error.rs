//! Catalog errors
//!
//! Only the accessor layer fails. Graph builders degrade on bad data instead of
//! returning errors, so everything here is an I/O or parse problem.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while reading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid frontmatter in {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no frontmatter block in {0}")]
    MissingFrontmatter(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("resource source failed: {0}")]
    Source(String),
}

impl CatalogError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}
