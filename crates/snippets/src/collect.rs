//! Repository-wide snippet discovery

use crate::scanner::{is_directive_line, parse_snippets};
use docgen_common::{relative_path, MetadataError, MetadataErrorKind, MetadataErrors, Snippet};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Directories never scanned for snippets
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    ".doc_gen",
    ".snippets",
    ".venv",
    "__pycache__",
    "build",
    "dist",
    "node_modules",
    "target",
    "venv",
];

/// Source extensions scanned by default
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "c", "cpp", "cs", "go", "h", "java", "js", "json", "kt", "md", "mjs", "php", "ps1", "py",
    "rb", "rs", "sh", "sql", "swift", "ts", "txt", "xml", "yaml", "yml",
];

/// Options controlling which files are scanned
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub ignored_dirs: Vec<String>,
    pub extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.ignored_dirs.iter().any(|d| d == name))
                .unwrap_or(false)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

/// Walk `root` and return every source file the options select, sorted
pub fn source_files(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !options.is_ignored_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && options.has_source_extension(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// All snippets found in a repository, plus whole-file snippets
#[derive(Debug, Clone, Default)]
pub struct SnippetIndex {
    root: PathBuf,
    /// Tagged regions keyed by tag
    pub snippets: BTreeMap<String, Snippet>,
    /// Whole-file snippets keyed by repository-relative path
    pub files: BTreeMap<String, Snippet>,
}

impl SnippetIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, tag: &str) -> Option<&Snippet> {
        self.snippets.get(tag)
    }

    /// Whether a repository-relative file exists on disk
    pub fn file_exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }

    /// Add one file's snippets, reporting tags already defined elsewhere
    pub fn merge(&mut self, found: BTreeMap<String, Snippet>) -> MetadataErrors {
        let mut errors = MetadataErrors::new();
        for (tag, snippet) in found {
            if let Some(existing) = self.snippets.get(&tag) {
                errors.push(
                    MetadataError::new(MetadataErrorKind::SnippetAlreadyWritten {
                        tag,
                        other: existing.file.clone(),
                    })
                    .in_file(&snippet.file),
                );
                continue;
            }
            self.snippets.insert(tag, snippet);
        }
        errors
    }

    /// Load whole files referenced by `snippet_files` metadata
    ///
    /// Directive lines are stripped from the content. Paths that do not
    /// exist are reported as [`MetadataErrorKind::MissingSnippetFile`].
    pub fn collect_snippet_files<'a, I>(&mut self, paths: I) -> MetadataErrors
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut errors = MetadataErrors::new();
        for path in paths {
            if self.files.contains_key(path) {
                continue;
            }
            let full = self.root.join(path);
            let content = match fs::read_to_string(&full) {
                Ok(content) => content,
                Err(e) => {
                    debug!("Cannot read snippet file {}: {}", full.display(), e);
                    errors.push(MetadataError::new(MetadataErrorKind::MissingSnippetFile(
                        path.to_string(),
                    )));
                    continue;
                }
            };
            let code: Vec<&str> = content.lines().filter(|l| !is_directive_line(l)).collect();
            self.files.insert(
                path.to_string(),
                Snippet {
                    id: path.to_string(),
                    file: path.to_string(),
                    line_start: 1,
                    line_end: content.lines().count(),
                    code: code.join("\n"),
                },
            );
        }
        errors
    }
}

/// Scan every source file under `root` for tagged snippets
pub fn find_snippets(root: &Path, options: &ScanOptions) -> (SnippetIndex, MetadataErrors) {
    let mut index = SnippetIndex::new(root);
    let mut errors = MetadataErrors::new();
    let mut scanned = 0usize;

    for path in source_files(root, options) {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };
        scanned += 1;

        let file = relative_path(root, &path);
        let (found, file_errors) = parse_snippets(content.lines(), &file);
        if !found.is_empty() {
            debug!("Found {} snippets in {}", found.len(), file);
        }
        errors.extend(file_errors);
        errors.extend(index.merge(found));
    }

    info!(
        "Scanned {} files, found {} snippets",
        scanned,
        index.snippets.len()
    );

    (index, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(tag: &str, file: &str) -> Snippet {
        Snippet {
            id: tag.to_string(),
            file: file.to_string(),
            line_start: 1,
            line_end: 1,
            code: String::new(),
        }
    }

    #[test]
    fn test_merge_reports_duplicates_across_files() {
        let mut index = SnippetIndex::new("/repo");

        let mut first = BTreeMap::new();
        first.insert("tag".to_string(), snippet("tag", "a.py"));
        assert!(index.merge(first).is_empty());

        let mut second = BTreeMap::new();
        second.insert("tag".to_string(), snippet("tag", "b.py"));
        let errors = index.merge(second);

        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert_eq!(
            error.kind,
            MetadataErrorKind::SnippetAlreadyWritten {
                tag: "tag".to_string(),
                other: "a.py".to_string(),
            }
        );
        assert_eq!(error.file.as_deref(), Some(Path::new("b.py")));
        assert_eq!(index.get("tag").unwrap().file, "a.py");
    }

    #[test]
    fn test_extension_filter() {
        let options = ScanOptions::default();
        assert!(options.has_source_extension(Path::new("a/b.py")));
        assert!(options.has_source_extension(Path::new("A.JAVA")));
        assert!(!options.has_source_extension(Path::new("image.png")));
        assert!(!options.has_source_extension(Path::new("Makefile")));
    }
}
