//! `services.yaml` loading

use crate::types::{parse_entries, YamlService};
use docgen_common::{MetadataError, MetadataErrorKind, MetadataErrors, Service, ServiceGuide};
use std::collections::BTreeMap;
use std::path::Path;

/// Service ids are lowercase letters, digits and dashes
pub fn is_valid_service_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Parse `services.yaml` into service records keyed by id
pub fn parse_services(file: &Path, yaml: &str) -> (BTreeMap<String, Service>, MetadataErrors) {
    let (entries, mut errors) = parse_entries::<YamlService>(file, yaml);

    let mut services = BTreeMap::new();
    for (id, yaml_service) in entries {
        let Some(yaml_service) = yaml_service else { continue };
        if let Some(service) = errors.maybe_extend(convert_service(file, &id, yaml_service)) {
            services.insert(id, service);
        }
    }
    (services, errors)
}

fn convert_service(file: &Path, id: &str, raw: YamlService) -> Result<Service, MetadataErrors> {
    let mut errors = MetadataErrors::new();
    let missing = |field: &str| {
        MetadataError::new(MetadataErrorKind::MissingField(field.to_string()))
            .in_file(file)
            .at_id(id)
    };

    if !is_valid_service_id(id) {
        errors.push(
            MetadataError::new(MetadataErrorKind::InvalidServiceId)
                .in_file(file)
                .at_id(id),
        );
    }

    let long = raw.long.unwrap_or_else(|| {
        errors.push(missing("long"));
        String::new()
    });
    let short = raw.short.unwrap_or_else(|| {
        errors.push(missing("short"));
        String::new()
    });
    let Some(expanded) = raw.expanded else {
        errors.push(missing("expanded"));
        return Err(errors);
    };

    let guide = match raw.guide {
        Some(guide) => match guide.url {
            Some(url) => Some(ServiceGuide {
                subtitle: guide.subtitle,
                url,
            }),
            None => {
                errors.push(missing("guide.url"));
                None
            }
        },
        None => None,
    };

    errors.into_result(Service {
        id: id.to_string(),
        sort: raw.sort.unwrap_or_else(|| expanded.short.clone()),
        long,
        short,
        expanded,
        version: raw.version,
        api_ref: raw.api_ref,
        blurb: raw.blurb,
        caveat: raw.caveat,
        guide,
        tags: raw.tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICES: &str = r#"
s3:
  long: "&S3long;"
  short: "&S3;"
  sort: S3
  expanded:
    long: "Amazon Simple Storage Service (Amazon S3)"
    short: "Amazon S3"
  version: s3-2006-03-01
  guide:
    subtitle: User Guide
    url: "AmazonS3/latest/userguide/Welcome.html"
  tags:
    product_categories:
      - Storage
dynamodb:
  long: "&DDBlong;"
  short: "&DDB;"
  expanded:
    long: "Amazon DynamoDB"
    short: "DynamoDB"
"#;

    #[test]
    fn test_parse_services() {
        let (services, errors) = parse_services(Path::new("services.yaml"), SERVICES);
        assert!(errors.is_empty(), "{}", errors);

        let s3 = &services["s3"];
        assert_eq!(s3.expanded.short, "Amazon S3");
        assert_eq!(s3.version.as_deref(), Some("s3-2006-03-01"));
        assert_eq!(s3.guide.as_ref().unwrap().url, "AmazonS3/latest/userguide/Welcome.html");
        assert!(s3.tags["product_categories"].contains("Storage"));

        // sort falls back to the short expansion
        assert_eq!(services["dynamodb"].sort, "DynamoDB");
    }

    #[test]
    fn test_invalid_services() {
        let yaml = "S3_Bad:\n  long: x\n  short: y\n  expanded: {long: a, short: b}\nsqs:\n  long: '&SQS;'\n";
        let (services, errors) = parse_services(Path::new("services.yaml"), yaml);

        assert!(services.is_empty());
        let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                MetadataErrorKind::InvalidServiceId,
                MetadataErrorKind::MissingField("short".to_string()),
                MetadataErrorKind::MissingField("expanded".to_string()),
            ]
        );
    }

    #[test]
    fn test_service_id_format() {
        assert!(is_valid_service_id("s3"));
        assert!(is_valid_service_id("cognito-identity-provider"));
        assert!(!is_valid_service_id("S3"));
        assert!(!is_valid_service_id(""));
        assert!(!is_valid_service_id("s3_control"));
    }

    #[test]
    fn test_bad_entry_keeps_other_services() {
        let yaml = format!("{}sqs:\n  long: '&SQSlong;'\n  shrot: '&SQS;'\n", SERVICES);
        let (services, errors) = parse_services(Path::new("services.yaml"), &yaml);

        assert_eq!(services.keys().collect::<Vec<_>>(), vec!["dynamodb", "s3"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().id.as_deref(), Some("sqs"));
    }
}
