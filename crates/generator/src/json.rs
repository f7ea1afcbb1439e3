//! JSON export of the resolved model

use docgen_common::{DocGenError, Example, Result, Sdk, Service, Snippet};
use docgen_metadata::DocGen;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Everything the documentation build needs, in one document
#[derive(Debug, Serialize)]
pub struct ModelExport<'a> {
    pub sdks: Vec<&'a Sdk>,
    pub services: Vec<&'a Service>,
    pub examples: Vec<&'a Example>,
    pub snippets: Vec<&'a Snippet>,
    pub snippet_files: Vec<&'a Snippet>,
}

impl<'a> ModelExport<'a> {
    pub fn new(doc_gen: &'a DocGen) -> Self {
        Self {
            sdks: doc_gen.sdks.values().collect(),
            services: doc_gen.services.values().collect(),
            examples: doc_gen.examples.values().collect(),
            snippets: doc_gen.snippets.snippets.values().collect(),
            snippet_files: doc_gen.snippets.files.values().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write the resolved model as pretty JSON
pub fn write_json(doc_gen: &DocGen, path: &Path) -> Result<()> {
    let json = ModelExport::new(doc_gen).to_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json).map_err(|e| {
        DocGenError::Render(format!("Failed to write {}: {}", path.display(), e))
    })?;
    info!("Wrote model JSON to {}", path.display());
    Ok(())
}
