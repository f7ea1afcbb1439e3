//! `sdks.yaml` loading

use crate::types::{parse_entries, YamlSdk};
use docgen_common::{MetadataError, MetadataErrorKind, MetadataErrors, Sdk, SdkVersion};
use std::collections::BTreeMap;
use std::path::Path;

/// Parse `sdks.yaml` into SDK records
///
/// SDKs that fail to deserialize or miss required fields are reported and
/// left out; the others still load.
pub fn parse_sdks(file: &Path, yaml: &str) -> (BTreeMap<String, Sdk>, MetadataErrors) {
    let (entries, mut errors) = parse_entries::<YamlSdk>(file, yaml);

    let mut sdks = BTreeMap::new();
    for (name, yaml_sdk) in entries {
        let Some(yaml_sdk) = yaml_sdk else { continue };
        if let Some(sdk) = errors.maybe_extend(convert_sdk(file, &name, yaml_sdk)) {
            sdks.insert(name, sdk);
        }
    }
    (sdks, errors)
}

fn convert_sdk(file: &Path, name: &str, raw: YamlSdk) -> Result<Sdk, MetadataErrors> {
    let mut errors = MetadataErrors::new();
    let error = |kind| MetadataError::new(kind).in_file(file).for_language(name);
    let missing = |field: &str| error(MetadataErrorKind::MissingField(field.to_string()));

    let property = raw.property.unwrap_or_else(|| {
        errors.push(missing("property"));
        String::new()
    });

    if raw.sdk.is_empty() {
        errors.push(error(MetadataErrorKind::SdkWithoutVersions));
    }

    let mut versions = Vec::new();
    for (version, v) in raw.sdk {
        let version_error = |field: &str| missing(field).for_sdk_version(version);
        let (Some(long), Some(short)) = (v.long, v.short) else {
            errors.push(version_error("long/short"));
            continue;
        };
        versions.push(SdkVersion {
            version,
            long,
            short,
            expanded: v.expanded,
            guide: v.guide,
            api_ref: v.api_ref,
            caveat: v.caveat,
        });
    }

    errors.into_result(Sdk {
        name: name.to_string(),
        property,
        syntax: raw.syntax,
        guide: raw.guide.unwrap_or_default(),
        versions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDKS: &str = r#"
Python:
  property: python
  syntax: python
  guide: "sdk-for-python/latest/developer-guide/welcome.html"
  sdk:
    3:
      long: "&PYLong;"
      short: "&PYShort;"
      expanded:
        long: "AWS SDK for Python (Boto3)"
        short: "SDK for Python"
      api_ref: "https://boto3.amazonaws.com/v1/documentation/api/latest/reference/services/"
Rust:
  property: rust
  sdk:
    1:
      long: "&RustLong;"
      short: "&RustShort;"
"#;

    #[test]
    fn test_parse_sdks() {
        let (sdks, errors) = parse_sdks(Path::new("sdks.yaml"), SDKS);
        assert!(errors.is_empty(), "{}", errors);
        assert_eq!(sdks.len(), 2);

        let python = &sdks["Python"];
        assert_eq!(python.property, "python");
        assert_eq!(python.syntax.as_deref(), Some("python"));
        let v3 = python.version(3).unwrap();
        assert_eq!(v3.long, "&PYLong;");
        assert_eq!(
            v3.expanded.as_ref().unwrap().long,
            "AWS SDK for Python (Boto3)"
        );
        assert!(python.version(2).is_none());
    }

    #[test]
    fn test_missing_fields_are_collected() {
        let yaml = "Go:\n  sdk:\n    2:\n      long: '&GoLong;'\nJava:\n  property: java\n";
        let (sdks, errors) = parse_sdks(Path::new("sdks.yaml"), yaml);

        assert!(sdks.is_empty());
        let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                MetadataErrorKind::MissingField("property".to_string()),
                MetadataErrorKind::MissingField("long/short".to_string()),
                MetadataErrorKind::SdkWithoutVersions,
            ]
        );
        assert_eq!(errors.iter().nth(1).unwrap().sdk_version, Some(2));
    }

    #[test]
    fn test_invalid_yaml() {
        let (sdks, errors) = parse_sdks(Path::new("sdks.yaml"), "Python: [unclosed");
        assert!(sdks.is_empty());
        assert!(matches!(
            errors.iter().next().unwrap().kind,
            MetadataErrorKind::YamlParse(_)
        ));
    }

    #[test]
    fn test_bad_entry_keeps_other_sdks() {
        let yaml = format!("{}Go:\n  property: go\n  bookmark: nope\n", SDKS);
        let (sdks, errors) = parse_sdks(Path::new("sdks.yaml"), &yaml);

        assert_eq!(sdks.keys().collect::<Vec<_>>(), vec!["Python", "Rust"]);
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert!(matches!(error.kind, MetadataErrorKind::YamlParse(_)));
        assert_eq!(error.id.as_deref(), Some("Go"));
    }
}
