//! Whole-repository metadata loading

use crate::entities::Entities;
use crate::examples::{parse_examples, ExampleContext};
use crate::{parse_sdks, parse_services};
use docgen_common::{
    relative_path, DocGenError, Example, MetadataError, MetadataErrorKind, MetadataErrors, Result,
    Sdk, Service,
};
use docgen_snippets::{find_snippets, ScanOptions, SnippetIndex};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Suffix of example metadata files
pub const METADATA_SUFFIX: &str = "_metadata.yaml";

/// Where the metadata files live inside a repository
#[derive(Debug, Clone)]
pub struct DocGenLayout {
    pub root: PathBuf,
    pub metadata_dir: PathBuf,
    pub cross_content_dir: PathBuf,
}

impl DocGenLayout {
    /// Standard layout: `.doc_gen/metadata` and `.doc_gen/cross-content`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let doc_gen = root.join(".doc_gen");
        Self {
            metadata_dir: doc_gen.join("metadata"),
            cross_content_dir: doc_gen.join("cross-content"),
            root,
        }
    }

    pub fn sdks_file(&self) -> PathBuf {
        self.metadata_dir.join("sdks.yaml")
    }

    pub fn services_file(&self) -> PathBuf {
        self.metadata_dir.join("services.yaml")
    }

    pub fn entities_file(&self) -> PathBuf {
        self.cross_content_dir.join("entities.yaml")
    }

    /// All `*_metadata.yaml` files, sorted by path
    pub fn example_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.metadata_dir)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_type().is_file()
                    && e.file_name()
                        .to_str()
                        .map(|n| n.ends_with(METADATA_SUFFIX))
                        .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }
}

/// Validation switches
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Treat warnings as errors
    pub strict: bool,
    pub scan: ScanOptions,
}

/// Problems found while loading
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: MetadataErrors,
    pub warnings: MetadataErrors,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The validated metadata model of a repository
#[derive(Debug, Clone)]
pub struct DocGen {
    pub layout: DocGenLayout,
    pub sdks: BTreeMap<String, Sdk>,
    pub services: BTreeMap<String, Service>,
    pub entities: Entities,
    pub examples: BTreeMap<String, Example>,
    pub snippets: SnippetIndex,
}

fn read_required(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        DocGenError::Config(format!("Failed to read {} {}: {}", what, path.display(), e))
    })
}

impl DocGen {
    /// Load and cross-validate everything under `layout`
    ///
    /// Only unreadable required files are fatal; every content problem is in
    /// the returned report.
    pub fn load(layout: DocGenLayout, options: &ValidationOptions) -> Result<(Self, ValidationReport)> {
        let mut errors = MetadataErrors::new();

        info!("Loading SDKs and services from {}", layout.metadata_dir.display());
        let rel = |path: &Path| PathBuf::from(relative_path(&layout.root, path));

        let sdks_file = layout.sdks_file();
        let (sdks, sdk_errors) =
            parse_sdks(&rel(&sdks_file), &read_required(&sdks_file, "SDK metadata")?);
        errors.extend(sdk_errors);

        let services_file = layout.services_file();
        let (services, service_errors) = parse_services(
            &rel(&services_file),
            &read_required(&services_file, "service metadata")?,
        );
        errors.extend(service_errors);

        let entities_file = layout.entities_file();
        let mut entities = load_entities(&entities_file, &rel(&entities_file), &mut errors);
        entities.add_definitions(services.values(), sdks.values());
        debug!("{} entities defined", entities.len());

        info!("Scanning {} for snippets", layout.root.display());
        let (mut snippets, snippet_errors) = find_snippets(&layout.root, &options.scan);
        errors.extend(snippet_errors);

        let mut examples: BTreeMap<String, Example> = BTreeMap::new();
        let mut referenced: BTreeSet<String> = BTreeSet::new();
        {
            let ctx = ExampleContext {
                sdks: &sdks,
                services: &services,
                entities: &entities,
                snippets: &snippets,
                cross_content_dir: Some(&layout.cross_content_dir),
            };

            // First file each id was defined in, whether or not it validated
            let mut defined_in: BTreeMap<String, PathBuf> = BTreeMap::new();

            for file in layout.example_files() {
                let rel_file = rel(&file);
                let yaml = match fs::read_to_string(&file) {
                    Ok(yaml) => yaml,
                    Err(e) => {
                        warn!("Skipping {}: {}", rel_file.display(), e);
                        errors.push(
                            MetadataError::new(MetadataErrorKind::UnreadableFile(e.to_string()))
                                .in_file(&rel_file),
                        );
                        continue;
                    }
                };
                let parsed = parse_examples(&rel_file, &yaml, &ctx);
                debug!(
                    "Read {} examples from {}",
                    parsed.ids.len(),
                    rel_file.display()
                );
                errors.extend(parsed.errors);
                referenced.extend(parsed.snippet_tags);

                let mut duplicates = BTreeSet::new();
                for id in parsed.ids {
                    if let Some(existing) = defined_in.get(&id) {
                        errors.push(
                            MetadataError::new(MetadataErrorKind::DuplicateExample(
                                existing.display().to_string(),
                            ))
                            .in_file(&rel_file)
                            .at_id(&id),
                        );
                        duplicates.insert(id);
                    } else {
                        defined_in.insert(id, rel_file.clone());
                    }
                }

                for example in parsed.examples {
                    if !duplicates.contains(&example.id) {
                        examples.insert(example.id.clone(), example);
                    }
                }
            }
        }
        info!("Loaded {} examples", examples.len());

        let files: BTreeSet<&str> = examples
            .values()
            .flat_map(|e| e.languages.values())
            .flat_map(|l| l.versions.iter())
            .flat_map(|v| v.excerpts.iter())
            .flat_map(|x| x.snippet_files.iter().map(String::as_str))
            .filter(|path| snippets.file_exists(path))
            .collect();
        errors.extend(snippets.collect_snippet_files(files));

        let doc_gen = Self {
            layout,
            sdks,
            services,
            entities,
            examples,
            snippets,
        };

        let mut warnings = doc_gen.unused_snippets(&referenced);
        if options.strict {
            errors.extend(std::mem::take(&mut warnings));
        }

        Ok((doc_gen, ValidationReport { errors, warnings }))
    }

    /// Snippets whose tag no metadata entry mentions
    ///
    /// `referenced` covers entries that failed validation too, so a broken
    /// example does not also report its snippets as unused.
    fn unused_snippets(&self, referenced: &BTreeSet<String>) -> MetadataErrors {
        self.snippets
            .snippets
            .values()
            .filter(|s| !referenced.contains(&s.id))
            .map(|s| {
                MetadataError::new(MetadataErrorKind::UnusedSnippet(s.id.clone())).in_file(&s.file)
            })
            .collect()
    }

    pub fn sdk(&self, name: &str) -> Option<&Sdk> {
        self.sdks.get(name)
    }

    /// Examples implemented for an SDK version and filed under `service`
    ///
    /// Cross-service examples are included for every service they list.
    pub fn examples_for(&self, language: &str, sdk_version: u32, service: &str) -> Vec<&Example> {
        let mut found: Vec<&Example> = self
            .examples
            .values()
            .filter(|e| e.version(language, sdk_version).is_some())
            .filter(|e| e.prefix() == service || e.services.contains_key(service))
            .collect();
        found.sort_by(|a, b| {
            (a.category.rank(), &a.category, &a.title_abbrev)
                .cmp(&(b.category.rank(), &b.category, &b.title_abbrev))
        });
        found
    }

    /// Service ids that have at least one example for the SDK version
    pub fn services_for(&self, language: &str, sdk_version: u32) -> Vec<&Service> {
        self.services
            .values()
            .filter(|s| !self.examples_for(language, sdk_version, &s.id).is_empty())
            .collect()
    }
}

fn load_entities(path: &Path, rel_file: &Path, errors: &mut MetadataErrors) -> Entities {
    let Ok(yaml) = fs::read_to_string(path) else {
        debug!("No entities file at {}", path.display());
        return Entities::default();
    };
    match Entities::from_yaml(&yaml) {
        Ok(entities) => entities,
        Err(e) => {
            errors.push(
                MetadataError::new(MetadataErrorKind::YamlParse(e.to_string())).in_file(rel_file),
            );
            Entities::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = DocGenLayout::new("/repo");
        assert_eq!(layout.sdks_file(), Path::new("/repo/.doc_gen/metadata/sdks.yaml"));
        assert_eq!(
            layout.services_file(),
            Path::new("/repo/.doc_gen/metadata/services.yaml")
        );
        assert_eq!(
            layout.entities_file(),
            Path::new("/repo/.doc_gen/cross-content/entities.yaml")
        );
    }

    #[test]
    fn test_missing_required_file_is_fatal() {
        let layout = DocGenLayout::new("/nonexistent/docgen/root");
        let result = DocGen::load(layout, &ValidationOptions::default());
        assert!(matches!(result, Err(DocGenError::Config(_))));
    }
}
