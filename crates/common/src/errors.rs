//! Structured metadata errors
//!
//! Validation never stops at the first problem. Every loader pushes
//! [`MetadataError`]s into a [`MetadataErrors`] collection and keeps going, so
//! a single run reports everything that is wrong with the tree.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What went wrong, with the data the message needs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataErrorKind {
    #[error("could not parse YAML: {0}")]
    YamlParse(String),

    #[error("could not read file: {0}")]
    UnreadableFile(String),

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("example id must look like `<service>_<Action>` with a known service prefix or `cross`")]
    NameFormat,

    #[error("unknown language `{0}`")]
    UnknownLanguage(String),

    #[error("SDK version {version} is not declared for {language}")]
    UnknownSdkVersion { language: String, version: u32 },

    #[error("unknown service `{0}`")]
    UnknownService(String),

    #[error("unknown entity `{0}`")]
    UnknownEntity(String),

    #[error("version has neither block_content nor excerpts")]
    MissingBlockContentAndExcerpt,

    #[error("version has both block_content and excerpts")]
    BlockContentAndExcerptConflict,

    #[error("block content file `{0}` does not exist")]
    MissingBlockContentFile(String),

    #[error("excerpt has no snippet_tags or snippet_files")]
    ExcerptWithoutSnippet,

    #[error("snippet tag `{0}` was not found in any source file")]
    MissingSnippetTag(String),

    #[error("snippet file `{0}` does not exist")]
    MissingSnippetFile(String),

    #[error("github link `{0}` must be a repository-relative path")]
    InvalidGithubLink(String),

    #[error("example id is already defined in {0}")]
    DuplicateExample(String),

    #[error("title must not end with a period")]
    TitleEndsWithPeriod,

    #[error("`{service}` does not list `{action}` as an action")]
    ActionServiceMismatch { service: String, action: String },

    #[error("service id must be lowercase letters, digits and dashes")]
    InvalidServiceId,

    #[error("SDK declares no versions")]
    SdkWithoutVersions,

    #[error("snippet-start:[{tag}] on line {line} is a duplicate")]
    DuplicateSnippetStart { tag: String, line: usize },

    #[error("snippet-end:[{tag}] on line {line} is a duplicate")]
    DuplicateSnippetEnd { tag: String, line: usize },

    #[error("snippet-end:[{tag}] on line {line} has no matching start")]
    MissingSnippetStart { tag: String, line: usize },

    #[error("snippet-start:[{tag}] on line {line} has no matching end")]
    MissingSnippetEnd { tag: String, line: usize },

    #[error("snippet-end:[{tag}] on line {line} closes before inner snippet `{open}`")]
    SnippetEndOutOfOrder {
        tag: String,
        open: String,
        line: usize,
    },

    #[error("snippet `{tag}` is already defined in {other}")]
    SnippetAlreadyWritten { tag: String, other: String },

    #[error("snippet tag `{tag}` on line {line} is not valid")]
    InvalidSnippetTag { tag: String, line: usize },

    #[error("snippet `{0}` is never referenced by example metadata")]
    UnusedSnippet(String),
}

impl MetadataErrorKind {
    /// Source line of a snippet marker problem
    pub fn line(&self) -> Option<usize> {
        match self {
            MetadataErrorKind::DuplicateSnippetStart { line, .. }
            | MetadataErrorKind::DuplicateSnippetEnd { line, .. }
            | MetadataErrorKind::MissingSnippetStart { line, .. }
            | MetadataErrorKind::MissingSnippetEnd { line, .. }
            | MetadataErrorKind::SnippetEndOutOfOrder { line, .. }
            | MetadataErrorKind::InvalidSnippetTag { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// A single metadata problem and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataError {
    pub file: Option<PathBuf>,
    pub id: Option<String>,
    pub language: Option<String>,
    pub sdk_version: Option<u32>,
    pub kind: MetadataErrorKind,
}

impl MetadataError {
    pub fn new(kind: MetadataErrorKind) -> Self {
        Self {
            file: None,
            id: None,
            language: None,
            sdk_version: None,
            kind,
        }
    }

    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn at_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn for_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn for_sdk_version(mut self, sdk_version: u32) -> Self {
        self.sdk_version = Some(sdk_version);
        self
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut located = false;
        if let Some(file) = &self.file {
            write!(f, "In {}", file.display())?;
            located = true;
        }
        if let Some(id) = &self.id {
            write!(f, "{}at {}", if located { " " } else { "" }, id)?;
            located = true;
        }
        match (&self.language, self.sdk_version) {
            (Some(lang), Some(v)) => {
                write!(f, " ({}:{})", lang, v)?;
                located = true;
            }
            (Some(lang), None) => {
                write!(f, " ({})", lang)?;
                located = true;
            }
            _ => {}
        }
        if located {
            write!(f, ": ")?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for MetadataError {}

/// Ordered accumulator of [`MetadataError`]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataErrors {
    errors: Vec<MetadataError>,
}

impl MetadataErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: MetadataError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: MetadataErrors) {
        self.errors.extend(other.errors);
    }

    /// Keep the value of a successful step, or absorb its errors
    pub fn maybe_extend<T>(&mut self, result: std::result::Result<T, MetadataErrors>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.extend(errors);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataError> {
        self.errors.iter()
    }

    /// `Ok(value)` when nothing was collected
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, MetadataErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<MetadataError> for MetadataErrors {
    fn from(error: MetadataError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for MetadataErrors {
    type Item = MetadataError;
    type IntoIter = std::vec::IntoIter<MetadataError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a MetadataErrors {
    type Item = &'a MetadataError;
    type IntoIter = std::slice::Iter<'a, MetadataError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl FromIterator<MetadataError> for MetadataErrors {
    fn from_iter<I: IntoIterator<Item = MetadataError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for MetadataErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_full_location() {
        let err = MetadataError::new(MetadataErrorKind::MissingSnippetTag("py.s3.hello".into()))
            .in_file("s3_metadata.yaml")
            .at_id("s3_Hello")
            .for_language("Python")
            .for_sdk_version(3);
        assert_eq!(
            err.to_string(),
            "In s3_metadata.yaml at s3_Hello (Python:3): snippet tag `py.s3.hello` was not found in any source file"
        );
    }

    #[test]
    fn test_display_without_location() {
        let err = MetadataError::new(MetadataErrorKind::UnusedSnippet("tag".into()));
        assert_eq!(
            err.to_string(),
            "snippet `tag` is never referenced by example metadata"
        );

        let err = MetadataError::new(MetadataErrorKind::NameFormat).at_id("bad");
        assert!(err.to_string().starts_with("at bad: "));
    }

    #[test]
    fn test_maybe_extend() {
        let mut errors = MetadataErrors::new();

        let ok: std::result::Result<u32, MetadataErrors> = Ok(7);
        assert_eq!(errors.maybe_extend(ok), Some(7));
        assert!(errors.is_empty());

        let failed: std::result::Result<u32, MetadataErrors> =
            Err(MetadataError::new(MetadataErrorKind::NameFormat).into());
        assert_eq!(errors.maybe_extend(failed), None);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(MetadataErrors::new().into_result(3), Ok(3));

        let errors: MetadataErrors =
            vec![MetadataError::new(MetadataErrorKind::SdkWithoutVersions)]
                .into_iter()
                .collect();
        assert!(errors.into_result(3).is_err());
    }

    #[test]
    fn test_snippet_error_line() {
        let kind = MetadataErrorKind::SnippetEndOutOfOrder {
            tag: "outer".into(),
            open: "inner".into(),
            line: 12,
        };
        assert_eq!(kind.line(), Some(12));
        assert_eq!(MetadataErrorKind::UnusedSnippet("tag".into()).line(), None);
    }
}
