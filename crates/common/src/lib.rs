//! Common types and utilities for docgen
//!
//! This crate contains the example data model, the accumulated metadata
//! error types and the tool-level error type shared by the snippet scanner,
//! the metadata loader, the generator and the CLI.

pub mod errors;
pub mod model;

pub use errors::{MetadataError, MetadataErrorKind, MetadataErrors};
pub use model::{
    Category, Example, Excerpt, Expanded, Language, Sdk, SdkVersion, Service, ServiceGuide,
    Snippet, Url, Version,
};

use thiserror::Error;

/// Errors that stop a tool run (as opposed to accumulated [`MetadataError`]s)
#[derive(Error, Debug)]
pub enum DocGenError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for docgen operations
pub type Result<T> = std::result::Result<T, DocGenError>;

/// Convert a path to the forward-slash, repository-relative form used in
/// metadata files and snippet ids.
pub fn relative_path(root: &std::path::Path, path: &std::path::Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_relative_path() {
        let root = Path::new("/repo");
        assert_eq!(
            relative_path(root, Path::new("/repo/python/example_code/s3/hello.py")),
            "python/example_code/s3/hello.py"
        );
        assert_eq!(relative_path(root, Path::new("other/file.rs")), "other/file.rs");
    }

    #[test]
    fn test_error_display() {
        let err = DocGenError::Config("bad depth".to_string());
        assert_eq!(err.to_string(), "Config error: bad depth");
    }
}
