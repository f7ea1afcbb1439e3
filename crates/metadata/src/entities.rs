//! Entity references (`&S3long;`) and their expansions

use docgen_common::{DocGenError, Result, Sdk, Service};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&([A-Za-z0-9_.-]+);").expect("valid regex"))
}

/// Known entity names (without `&` and `;`) and their expansions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entities {
    map: BTreeMap<String, String>,
}

impl Default for Entities {
    fn default() -> Self {
        let map = [("amp", "&"), ("lt", "<"), ("gt", ">"), ("quot", "\""), ("apos", "'")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { map }
    }
}

impl Entities {
    /// Parse a flat `Name: expansion` YAML document on top of the XML builtins
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let parsed: Option<BTreeMap<String, String>> = serde_yaml::from_str(yaml)
            .map_err(|e| DocGenError::Parse(format!("Failed to parse entities YAML: {}", e)))?;

        let mut entities = Self::default();
        for (name, expansion) in parsed.unwrap_or_default() {
            let name = name.trim_start_matches('&').trim_end_matches(';').to_string();
            entities.map.insert(name, expansion);
        }
        Ok(entities)
    }

    /// Register `reference` (e.g. `&S3long;`) as expanding to `expansion`
    ///
    /// Plain text that is not an entity reference is ignored.
    pub fn insert_reference(&mut self, reference: &str, expansion: &str) {
        if let Some(caps) = entity_regex().captures(reference.trim()) {
            if caps.get(0).map(|m| m.as_str().len()) == Some(reference.trim().len()) {
                self.map.insert(caps[1].to_string(), expansion.to_string());
            }
        }
    }

    /// Add the long and short names of services and SDK versions
    pub fn add_definitions<'a, S, K>(&mut self, services: S, sdks: K)
    where
        S: IntoIterator<Item = &'a Service>,
        K: IntoIterator<Item = &'a Sdk>,
    {
        for service in services {
            self.insert_reference(&service.long, &service.expanded.long);
            self.insert_reference(&service.short, &service.expanded.short);
        }
        for sdk in sdks {
            for version in &sdk.versions {
                if let Some(expanded) = &version.expanded {
                    self.insert_reference(&version.long, &expanded.long);
                    self.insert_reference(&version.short, &expanded.short);
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Names referenced in `text` that are not defined
    pub fn unknown_in(&self, text: &str) -> Vec<String> {
        let mut unknown = Vec::new();
        for caps in entity_regex().captures_iter(text) {
            let name = &caps[1];
            if !self.contains(name) && !unknown.iter().any(|u| u == name) {
                unknown.push(name.to_string());
            }
        }
        unknown
    }

    /// Expand every known entity; unknown references are left in place
    pub fn expand(&self, text: &str) -> String {
        entity_regex()
            .replace_all(text, |caps: &regex::Captures<'_>| {
                self.map
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Expand `text`, returning the expansion and any unknown entity names
pub fn expand_entities(text: &str, entities: &Entities) -> (String, Vec<String>) {
    (entities.expand(text), entities.unknown_in(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> Entities {
        Entities::from_yaml("S3long: Amazon Simple Storage Service\n'&S3;': Amazon S3\n").unwrap()
    }

    #[test]
    fn test_expand_known_entities() {
        let (text, unknown) = expand_entities("Create an &S3; bucket &amp; list it", &entities());
        assert_eq!(text, "Create an Amazon S3 bucket & list it");
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_unknown_entities_are_reported_once() {
        let (text, unknown) = expand_entities("&DDB; and &DDB; with &S3long;", &entities());
        assert_eq!(text, "&DDB; and &DDB; with Amazon Simple Storage Service");
        assert_eq!(unknown, vec!["DDB".to_string()]);
    }

    #[test]
    fn test_insert_reference_requires_whole_entity() {
        let mut e = Entities::default();
        e.insert_reference("&PYLong;", "SDK for Python (Boto3)");
        e.insert_reference("Plain name", "ignored");
        e.insert_reference("&A; and more", "ignored");
        assert!(e.contains("PYLong"));
        assert!(!e.contains("A"));
        assert_eq!(e.len(), 6);
    }

    #[test]
    fn test_empty_entities_file() {
        let e = Entities::from_yaml("").unwrap();
        assert!(e.contains("amp"));
    }
}
