//! Example metadata loading and validation
//!
//! This crate reads the documentation metadata tree of an SDK examples
//! repository into the shared model (`docgen_common`):
//!
//! - `sdks.yaml`: languages and their SDK versions
//! - `services.yaml`: services examples are filed under
//! - `entities.yaml`: `&Name;` text expansions
//! - `*_metadata.yaml`: the examples themselves
//!
//! ## Validation Strategy
//!
//! Loaders never stop at the first problem. Every malformed field, unknown
//! cross reference or missing snippet becomes a `MetadataError`, and a run
//! reports all of them at once. Entries that fail validation are left out of
//! the resulting model so downstream rendering only sees consistent data.

mod doc_gen;
pub mod entities;
pub mod examples;
mod sdks;
mod services;
mod types;

pub use doc_gen::{DocGen, DocGenLayout, ValidationOptions, ValidationReport};
pub use entities::{expand_entities, Entities};
pub use examples::{parse_example_id, parse_examples, resolve_category, ExampleContext};
pub use sdks::parse_sdks;
pub use services::{is_valid_service_id, parse_services};

use docgen_snippets::SnippetIndex;

/// Where example metadata looks up the snippets it references
#[cfg_attr(test, mockall::automock)]
pub trait SnippetLookup {
    /// Whether a tagged snippet exists
    fn has_snippet(&self, tag: &str) -> bool;

    /// Whether a repository-relative file exists
    fn has_file(&self, path: &str) -> bool;
}

impl SnippetLookup for SnippetIndex {
    fn has_snippet(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path) || self.file_exists(path)
    }
}
