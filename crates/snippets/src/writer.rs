//! Snippet export for the documentation build

use crate::SnippetIndex;
use docgen_common::{DocGenError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Turn a snippet id into a safe file name
///
/// Tags can hold `:` and whole-file ids hold `/`, neither of which is portable.
pub fn snippet_file_name(id: &str) -> String {
    let name: String = id
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | ' ' => '_',
            c => c,
        })
        .collect();
    format!("{}.txt", name)
}

/// Write every snippet and whole-file snippet as `<id>.txt` under `output_dir`
///
/// Returns the written paths in id order. Ids that sanitize to the same
/// file name are an error and nothing is written.
pub fn write_snippets(index: &SnippetIndex, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| {
        DocGenError::Render(format!(
            "Failed to create snippet directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let mut names: HashMap<String, &str> = HashMap::new();
    for snippet in index.snippets.values().chain(index.files.values()) {
        let name = snippet_file_name(&snippet.id);
        if let Some(other) = names.insert(name.clone(), &snippet.id) {
            return Err(DocGenError::Render(format!(
                "Snippets `{}` and `{}` would both be written to {}",
                other, snippet.id, name
            )));
        }
    }

    let mut written = Vec::new();
    for snippet in index.snippets.values().chain(index.files.values()) {
        let path = output_dir.join(snippet_file_name(&snippet.id));
        fs::write(&path, &snippet.code).map_err(|e| {
            DocGenError::Render(format!("Failed to write {}: {}", path.display(), e))
        })?;
        written.push(path);
    }

    info!(
        "Wrote {} snippet files to {}",
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgen_common::Snippet;

    #[test]
    fn test_snippet_file_name() {
        assert_eq!(
            snippet_file_name("python.example_code.s3.Hello"),
            "python.example_code.s3.Hello.txt"
        );
        assert_eq!(snippet_file_name("S3:dotnetv3:Main"), "S3_dotnetv3_Main.txt");
        assert_eq!(
            snippet_file_name("python/example_code/s3/hello.py"),
            "python_example_code_s3_hello.py.txt"
        );
    }

    fn snippet(id: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            file: "main.rs".to_string(),
            line_start: 1,
            line_end: 1,
            code: format!("// {}", id),
        }
    }

    #[test]
    fn test_colliding_file_names_are_rejected() {
        let out = tempfile::TempDir::new().unwrap();
        let mut index = SnippetIndex::new(out.path());
        for id in ["S3:Main", "S3_Main"] {
            index.snippets.insert(id.to_string(), snippet(id));
        }

        let result = write_snippets(&index, &out.path().join("snippets"));

        assert!(matches!(result, Err(DocGenError::Render(_))));
        assert_eq!(
            std::fs::read_dir(out.path().join("snippets")).unwrap().count(),
            0
        );
    }

    #[test]
    fn test_distinct_names_are_all_written() {
        let out = tempfile::TempDir::new().unwrap();
        let mut index = SnippetIndex::new(out.path());
        for id in ["S3:Main", "S3:Other"] {
            index.snippets.insert(id.to_string(), snippet(id));
        }

        let written = write_snippets(&index, out.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|p| p.is_file()));
    }
}
