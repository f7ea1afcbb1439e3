//! Resolved example metadata model
//!
//! These records are produced by the metadata loader after validation. They
//! carry no raw YAML details; optional fields are `None` when the source file
//! omitted them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Long and short display names with entities already expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expanded {
    pub long: String,
    pub short: String,
}

/// A language SDK (e.g. "Python") and the major versions documented for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sdk {
    /// Display name, also the key used by example `languages` maps
    pub name: String,
    /// Lowercase identifier used in paths (e.g. "python")
    pub property: String,
    /// Syntax highlighting hint for code blocks
    pub syntax: Option<String>,
    pub guide: String,
    pub versions: Vec<SdkVersion>,
}

impl Sdk {
    /// Find a declared version
    pub fn version(&self, version: u32) -> Option<&SdkVersion> {
        self.versions.iter().find(|v| v.version == version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkVersion {
    pub version: u32,
    /// Entity reference for the long name (e.g. "&PYLong;")
    pub long: String,
    /// Entity reference for the short name
    pub short: String,
    pub expanded: Option<Expanded>,
    pub guide: Option<String>,
    pub api_ref: Option<String>,
    pub caveat: Option<String>,
}

/// Link to the service developer guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceGuide {
    pub subtitle: Option<String>,
    pub url: String,
}

/// An AWS service that examples can be filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    /// Lowercase service id (e.g. "s3"), also the example id prefix
    pub id: String,
    pub long: String,
    pub short: String,
    /// Sort key used when listing services
    pub sort: String,
    pub expanded: Expanded,
    /// API version string (e.g. "s3-2006-03-01")
    pub version: Option<String>,
    pub api_ref: Option<String>,
    pub blurb: Option<String>,
    pub caveat: Option<String>,
    pub guide: Option<ServiceGuide>,
    pub tags: BTreeMap<String, BTreeSet<String>>,
}

/// How an example is grouped in generated listings
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Hello,
    Actions,
    Scenarios,
    Custom(String),
}

impl Category {
    /// Sort rank for listings: Hello, Actions, Scenarios, then custom names
    pub fn rank(&self) -> u8 {
        match self {
            Category::Hello => 0,
            Category::Actions => 1,
            Category::Scenarios => 2,
            Category::Custom(_) => 3,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Hello" => Category::Hello,
            "Actions" => Category::Actions,
            "Scenarios" => Category::Scenarios,
            _ => Category::Custom(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Hello => write!(f, "Hello"),
            Category::Actions => write!(f, "Actions"),
            Category::Scenarios => write!(f, "Scenarios"),
            Category::Custom(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Url {
    pub title: String,
    pub url: String,
}

/// A described group of snippets shown together in the docs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    pub description: Option<String>,
    pub snippet_tags: Vec<String>,
    pub snippet_files: Vec<String>,
}

/// One SDK version's implementation of an example
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    pub sdk_version: u32,
    /// Repository-relative folder holding the example code
    pub github: Option<String>,
    /// Name of a cross-content file used instead of excerpts
    pub block_content: Option<String>,
    pub excerpts: Vec<Excerpt>,
    pub add_services: BTreeMap<String, BTreeSet<String>>,
    pub sdkguide: Option<String>,
    pub more_info: Vec<Url>,
}

impl Version {
    /// All snippet tags referenced by this version's excerpts
    pub fn snippet_tags(&self) -> impl Iterator<Item = &str> {
        self.excerpts
            .iter()
            .flat_map(|e| e.snippet_tags.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub name: String,
    pub versions: Vec<Version>,
}

/// A documented example, keyed by `<service>_<Action>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub id: String,
    /// Metadata file the example was read from
    pub file: PathBuf,
    pub title: String,
    pub title_abbrev: String,
    pub synopsis: String,
    pub synopsis_list: Vec<String>,
    pub category: Category,
    pub guide_topic: Option<Url>,
    pub languages: BTreeMap<String, Language>,
    /// Service id to the API actions the example calls
    pub services: BTreeMap<String, BTreeSet<String>>,
}

impl Example {
    /// The `<Action>` half of the id
    pub fn action(&self) -> &str {
        self.id.split_once('_').map(|(_, a)| a).unwrap_or(&self.id)
    }

    /// The `<service>` half of the id
    pub fn prefix(&self) -> &str {
        self.id.split_once('_').map(|(p, _)| p).unwrap_or("")
    }

    /// Find the implementation for a language and SDK version
    pub fn version(&self, language: &str, sdk_version: u32) -> Option<&Version> {
        self.languages
            .get(language)?
            .versions
            .iter()
            .find(|v| v.sdk_version == sdk_version)
    }
}

/// A tagged region (or whole file) of source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// Tag name, or the repository-relative path for whole-file snippets
    pub id: String,
    /// Repository-relative path of the source file
    pub file: String,
    /// First enclosed line (1-based)
    pub line_start: usize,
    /// Last enclosed line (1-based, inclusive)
    ///
    /// An empty region has `line_start == line_end`, both on its start marker.
    pub line_end: usize,
    pub code: String,
}
