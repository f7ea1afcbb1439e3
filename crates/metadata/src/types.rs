//! Raw YAML shapes of the metadata files
//!
//! Everything is optional here so that a missing field becomes a
//! [`MetadataErrorKind::MissingField`](docgen_common::MetadataErrorKind)
//! instead of a parse failure for the whole file.

use docgen_common::{Expanded, MetadataError, MetadataErrorKind, MetadataErrors};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Read a top-level mapping entry by entry
///
/// Every key is returned, with `None` for an entry that failed to
/// deserialize, so one malformed entry does not drop its neighbours.
pub fn parse_entries<T: DeserializeOwned>(
    file: &Path,
    yaml: &str,
) -> (Vec<(String, Option<T>)>, MetadataErrors) {
    let mut errors = MetadataErrors::new();
    let yaml_error = |msg: String| MetadataError::new(MetadataErrorKind::YamlParse(msg)).in_file(file);

    let mapping: Option<serde_yaml::Mapping> = match serde_yaml::from_str(yaml) {
        Ok(mapping) => mapping,
        Err(e) => {
            errors.push(yaml_error(e.to_string()));
            return (Vec::new(), errors);
        }
    };

    let mut entries = Vec::new();
    for (key, value) in mapping.unwrap_or_default() {
        let Some(key) = key.as_str().map(str::to_string) else {
            errors.push(yaml_error(format!("key {:?} is not a string", key)));
            continue;
        };
        match serde_yaml::from_value(value) {
            Ok(entry) => entries.push((key, Some(entry))),
            Err(e) => {
                errors.push(yaml_error(e.to_string()).at_id(&key));
                entries.push((key, None));
            }
        }
    }
    (entries, errors)
}

/// One entry of `sdks.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlSdk {
    pub property: Option<String>,
    pub syntax: Option<String>,
    pub guide: Option<String>,
    #[serde(default)]
    pub sdk: BTreeMap<u32, YamlSdkVersion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlSdkVersion {
    pub long: Option<String>,
    pub short: Option<String>,
    pub expanded: Option<Expanded>,
    pub guide: Option<String>,
    pub api_ref: Option<String>,
    pub caveat: Option<String>,
}

/// One entry of `services.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlService {
    pub long: Option<String>,
    pub short: Option<String>,
    pub sort: Option<String>,
    pub expanded: Option<Expanded>,
    pub version: Option<String>,
    pub api_ref: Option<String>,
    pub blurb: Option<String>,
    pub caveat: Option<String>,
    pub guide: Option<YamlGuide>,
    #[serde(default)]
    pub tags: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlGuide {
    pub subtitle: Option<String>,
    pub url: Option<String>,
}

/// Actions listed for a service, written either as a YAML list or as a flow
/// set (`{CreateBucket, DeleteBucket}`, which YAML reads as a map of nulls)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YamlActions {
    List(Vec<String>),
    Set(BTreeMap<String, serde_yaml::Value>),
}

impl YamlActions {
    pub fn into_set(self) -> BTreeSet<String> {
        match self {
            YamlActions::List(list) => list.into_iter().collect(),
            YamlActions::Set(map) => map.into_keys().collect(),
        }
    }
}

/// Convert a services map, treating a bare key (`s3:`) as no actions
pub fn actions_map(
    raw: BTreeMap<String, Option<YamlActions>>,
) -> BTreeMap<String, BTreeSet<String>> {
    raw.into_iter()
        .map(|(service, actions)| (service, actions.map(YamlActions::into_set).unwrap_or_default()))
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlUrl {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// One entry of an `*_metadata.yaml` file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlExample {
    pub title: Option<String>,
    pub title_abbrev: Option<String>,
    pub synopsis: Option<String>,
    #[serde(default)]
    pub synopsis_list: Vec<String>,
    pub category: Option<String>,
    pub guide_topic: Option<YamlUrl>,
    #[serde(default)]
    pub languages: BTreeMap<String, YamlLanguage>,
    #[serde(default)]
    pub services: BTreeMap<String, Option<YamlActions>>,
}

impl YamlExample {
    /// Every snippet tag referenced by any version
    pub fn snippet_tags(&self) -> impl Iterator<Item = &str> {
        self.languages
            .values()
            .flat_map(|l| l.versions.iter())
            .flat_map(|v| v.excerpts.iter())
            .flat_map(|x| x.snippet_tags.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlLanguage {
    #[serde(default)]
    pub versions: Vec<YamlVersion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlVersion {
    pub sdk_version: Option<u32>,
    pub github: Option<String>,
    pub block_content: Option<String>,
    #[serde(default)]
    pub excerpts: Vec<YamlExcerpt>,
    #[serde(default)]
    pub add_services: BTreeMap<String, Option<YamlActions>>,
    pub sdkguide: Option<String>,
    #[serde(default)]
    pub more_info: Vec<YamlUrl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlExcerpt {
    pub description: Option<String>,
    #[serde(default)]
    pub snippet_tags: Vec<String>,
    #[serde(default)]
    pub snippet_files: Vec<String>,
}
