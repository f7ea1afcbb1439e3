//! Documentation artifacts for SDK examples
//!
//! This crate turns a validated [`DocGen`] model into the files the
//! documentation site consumes:
//! - per-service `README.md` example listings for one SDK version
//! - a JSON export of the whole resolved model

mod json;
mod templates;

pub use json::{write_json, ModelExport};
pub use templates::anchor;

use docgen_common::{Category, DocGenError, Example, Result, Sdk, SdkVersion, Service};
use docgen_metadata::DocGen;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct ServiceView {
    id: String,
    long: String,
    short: String,
    blurb: Option<String>,
    guide: Option<String>,
    guide_subtitle: String,
}

#[derive(Debug, Serialize)]
struct SdkView {
    name: String,
    long: String,
    short: String,
    version: u32,
    property: String,
    caveat: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExampleView {
    id: String,
    title_abbrev: String,
    synopsis: String,
    github: Option<String>,
    snippet_tags: Vec<String>,
    snippet_files: Vec<String>,
    block_content: Option<String>,
}

#[derive(Debug, Serialize)]
struct SectionView {
    title: String,
    examples: Vec<ExampleView>,
}

/// Section heading for a category
pub fn section_title(category: &Category) -> String {
    match category {
        Category::Hello => "Get started".to_string(),
        other => other.to_string(),
    }
}

/// README listing generator
///
/// Renders, for one SDK version, a listing of every example filed under a
/// service, grouped into Hello, Actions, Scenarios and custom categories.
pub struct ReadmeGenerator<'a> {
    doc_gen: &'a DocGen,
    tera: Tera,
}

impl<'a> ReadmeGenerator<'a> {
    pub fn new(doc_gen: &'a DocGen) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { doc_gen, tera })
    }

    fn lookup(&self, language: &str, sdk_version: u32) -> Result<(&'a Sdk, &'a SdkVersion)> {
        let sdk = self
            .doc_gen
            .sdk(language)
            .ok_or_else(|| DocGenError::Render(format!("Unknown language: {}", language)))?;
        let version = sdk.version(sdk_version).ok_or_else(|| {
            DocGenError::Render(format!("{} has no SDK version {}", language, sdk_version))
        })?;
        Ok((sdk, version))
    }

    /// Render the README for one service
    pub fn render_service(&self, language: &str, sdk_version: u32, service_id: &str) -> Result<String> {
        let (sdk, version) = self.lookup(language, sdk_version)?;
        let service = self
            .doc_gen
            .services
            .get(service_id)
            .ok_or_else(|| DocGenError::Render(format!("Unknown service: {}", service_id)))?;

        let examples = self.doc_gen.examples_for(language, sdk_version, service_id);
        let context = self.create_context(sdk, version, service, &examples);

        self.tera
            .render("README.md", &context)
            .map_err(|e| DocGenError::Render(format!("Template error: {:?}", e)))
    }

    /// Write `<output>/<property>/v<version>/<service>/README.md` files
    ///
    /// With `services` set only those are written; otherwise every service
    /// that has examples for the SDK version.
    pub fn generate_to_directory(
        &self,
        language: &str,
        sdk_version: u32,
        services: Option<&[String]>,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let (sdk, _) = self.lookup(language, sdk_version)?;

        let service_ids: Vec<String> = match services {
            Some(ids) => ids.to_vec(),
            None => self
                .doc_gen
                .services_for(language, sdk_version)
                .into_iter()
                .map(|s| s.id.clone())
                .collect(),
        };

        let base = output_dir
            .join(&sdk.property)
            .join(format!("v{}", sdk_version));

        let mut written = Vec::new();
        for service_id in &service_ids {
            let rendered = self.render_service(language, sdk_version, service_id)?;
            let service_dir = base.join(service_id);
            fs::create_dir_all(&service_dir).map_err(|e| {
                DocGenError::Render(format!(
                    "Failed to create directory {}: {}",
                    service_dir.display(),
                    e
                ))
            })?;

            let path = service_dir.join("README.md");
            fs::write(&path, rendered).map_err(|e| {
                DocGenError::Render(format!("Failed to write {}: {}", path.display(), e))
            })?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        info!(
            "Wrote {} README files for {} v{}",
            written.len(),
            language,
            sdk_version
        );
        Ok(written)
    }

    fn create_context(
        &self,
        sdk: &Sdk,
        version: &SdkVersion,
        service: &Service,
        examples: &[&Example],
    ) -> tera::Context {
        let entities = &self.doc_gen.entities;

        let (sdk_long, sdk_short) = match &version.expanded {
            Some(expanded) => (expanded.long.clone(), expanded.short.clone()),
            None => (entities.expand(&version.long), entities.expand(&version.short)),
        };
        let sdk_view = SdkView {
            name: sdk.name.clone(),
            long: sdk_long,
            short: sdk_short,
            version: version.version,
            property: sdk.property.clone(),
            caveat: version.caveat.as_deref().map(|c| entities.expand(c)),
        };

        let service_view = ServiceView {
            id: service.id.clone(),
            long: service.expanded.long.clone(),
            short: service.expanded.short.clone(),
            blurb: service.blurb.as_deref().map(|b| entities.expand(b)),
            guide: service.guide.as_ref().map(|g| g.url.clone()),
            guide_subtitle: service
                .guide
                .as_ref()
                .and_then(|g| g.subtitle.clone())
                .unwrap_or_else(|| "User Guide".to_string()),
        };

        let mut sections: Vec<SectionView> = Vec::new();
        let mut current: Option<&Category> = None;
        for example in examples {
            let Some(impl_version) = example.version(&sdk.name, version.version) else {
                continue;
            };
            if current != Some(&example.category) {
                sections.push(SectionView {
                    title: section_title(&example.category),
                    examples: Vec::new(),
                });
                current = Some(&example.category);
            }

            let synopsis = if example.synopsis.trim().is_empty() {
                example.synopsis_list.join(" ")
            } else {
                example.synopsis.clone()
            };

            if let Some(section) = sections.last_mut() {
                section.examples.push(ExampleView {
                    id: example.id.clone(),
                    title_abbrev: entities.expand(&example.title_abbrev),
                    synopsis: entities.expand(&synopsis),
                    github: impl_version.github.clone(),
                    snippet_tags: impl_version.snippet_tags().map(str::to_string).collect(),
                    snippet_files: impl_version
                        .excerpts
                        .iter()
                        .flat_map(|e| e.snippet_files.iter().cloned())
                        .collect(),
                    block_content: impl_version.block_content.clone(),
                });
            }
        }

        let mut context = tera::Context::new();
        context.insert("sdk", &sdk_view);
        context.insert("service", &service_view);
        context.insert("sections", &sections);
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_titles() {
        assert_eq!(section_title(&Category::Hello), "Get started");
        assert_eq!(section_title(&Category::Actions), "Actions");
        assert_eq!(
            section_title(&Category::Custom("Serverless examples".to_string())),
            "Serverless examples"
        );
    }
}
