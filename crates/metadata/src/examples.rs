//! Example metadata (`*_metadata.yaml`) conversion and validation

use crate::entities::Entities;
use crate::types::{actions_map, parse_entries, YamlExample, YamlUrl, YamlVersion};
use crate::SnippetLookup;
use docgen_common::{
    Category, Example, Excerpt, Language, MetadataError, MetadataErrorKind, MetadataErrors, Sdk,
    Service, Url, Version,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Prefix used by examples that span several services
pub const CROSS_SERVICE_PREFIX: &str = "cross";

/// Everything an example is validated against
pub struct ExampleContext<'a> {
    pub sdks: &'a BTreeMap<String, Sdk>,
    pub services: &'a BTreeMap<String, Service>,
    pub entities: &'a Entities,
    pub snippets: &'a dyn SnippetLookup,
    /// Directory holding `block_content` files; existence is not checked when `None`
    pub cross_content_dir: Option<&'a Path>,
}

/// Everything read from one metadata file
#[derive(Debug, Default)]
pub struct ParsedExamples {
    /// Examples that validated cleanly
    pub examples: Vec<Example>,
    /// Every example id defined in the file, valid or not
    pub ids: Vec<String>,
    /// Snippet tags referenced by any entry, valid or not
    pub snippet_tags: BTreeSet<String>,
    pub errors: MetadataErrors,
}

/// Parse one metadata file
///
/// Each example is deserialized on its own so a malformed entry does not
/// hide problems in its neighbours.
pub fn parse_examples(file: &Path, yaml: &str, ctx: &ExampleContext<'_>) -> ParsedExamples {
    let (entries, errors) = parse_entries::<YamlExample>(file, yaml);
    let mut parsed = ParsedExamples {
        errors,
        ..Default::default()
    };

    for (id, raw) in entries {
        parsed.ids.push(id.clone());
        let Some(raw) = raw else { continue };
        parsed
            .snippet_tags
            .extend(raw.snippet_tags().map(str::to_string));
        if let Some(example) = parsed.errors.maybe_extend(convert_example(file, &id, raw, ctx)) {
            parsed.examples.push(example);
        }
    }

    parsed
}

/// Split `<prefix>_<Action>` and check both halves
pub fn parse_example_id<'i>(
    id: &'i str,
    services: &BTreeMap<String, Service>,
) -> Option<(&'i str, &'i str)> {
    let (prefix, action) = id.split_once('_')?;
    let action_ok = action
        .chars()
        .next()
        .map(|c| c.is_ascii_alphanumeric())
        .unwrap_or(false)
        && action.chars().all(|c| c.is_ascii_alphanumeric());
    let prefix_ok = prefix == CROSS_SERVICE_PREFIX || services.contains_key(prefix);
    (action_ok && prefix_ok).then_some((prefix, action))
}

/// Pick the listing category for an example
///
/// An explicit category wins; `Actions` additionally requires the example's
/// services entry for its prefix to list the action.
pub fn resolve_category(
    explicit: Option<&str>,
    prefix: &str,
    action: &str,
    services: &BTreeMap<String, BTreeSet<String>>,
) -> Result<Category, MetadataErrorKind> {
    let lists_action = services
        .get(prefix)
        .map(|actions| actions.contains(action))
        .unwrap_or(false);

    match explicit.map(|c| Category::from(c.to_string())) {
        Some(Category::Actions) if !lists_action => Err(MetadataErrorKind::ActionServiceMismatch {
            service: prefix.to_string(),
            action: action.to_string(),
        }),
        Some(category) => Ok(category),
        None if action == "Hello" => Ok(Category::Hello),
        None if lists_action => Ok(Category::Actions),
        None => Ok(Category::Scenarios),
    }
}

fn convert_example(
    file: &Path,
    id: &str,
    raw: YamlExample,
    ctx: &ExampleContext<'_>,
) -> Result<Example, MetadataErrors> {
    let mut errors = MetadataErrors::new();
    let error = |kind: MetadataErrorKind| MetadataError::new(kind).in_file(file).at_id(id);
    let missing = |field: &str| error(MetadataErrorKind::MissingField(field.to_string()));

    let (prefix, action) = match parse_example_id(id, ctx.services) {
        Some(parts) => parts,
        None => {
            errors.push(error(MetadataErrorKind::NameFormat));
            id.split_once('_').unwrap_or((id, ""))
        }
    };

    let title = raw.title.unwrap_or_else(|| {
        errors.push(missing("title"));
        String::new()
    });
    if title.trim_end().ends_with('.') {
        errors.push(error(MetadataErrorKind::TitleEndsWithPeriod));
    }
    let title_abbrev = raw.title_abbrev.unwrap_or_else(|| {
        errors.push(missing("title_abbrev"));
        String::new()
    });
    let synopsis = raw.synopsis.unwrap_or_default();
    if synopsis.trim().is_empty() && raw.synopsis_list.is_empty() {
        errors.push(missing("synopsis"));
    }

    let texts = [title.as_str(), title_abbrev.as_str(), synopsis.as_str()]
        .into_iter()
        .chain(raw.synopsis_list.iter().map(String::as_str));
    for text in texts {
        for name in ctx.entities.unknown_in(text) {
            errors.push(error(MetadataErrorKind::UnknownEntity(name)));
        }
    }

    let services = actions_map(raw.services);
    for service in services.keys() {
        if !ctx.services.contains_key(service) {
            errors.push(error(MetadataErrorKind::UnknownService(service.clone())));
        }
    }

    let category = match resolve_category(raw.category.as_deref(), prefix, action, &services) {
        Ok(category) => category,
        Err(kind) => {
            errors.push(error(kind));
            Category::Scenarios
        }
    };

    let guide_topic = raw.guide_topic.and_then(|url| {
        convert_url(url).or_else(|| {
            errors.push(missing("guide_topic.url"));
            None
        })
    });

    if raw.languages.is_empty() {
        errors.push(missing("languages"));
    }

    let mut languages = BTreeMap::new();
    for (name, yaml_language) in raw.languages {
        let Some(sdk) = ctx.sdks.get(&name) else {
            errors.push(error(MetadataErrorKind::UnknownLanguage(name)));
            continue;
        };
        if yaml_language.versions.is_empty() {
            errors.push(missing("versions").for_language(&name));
        }
        let mut versions = Vec::new();
        for yaml_version in yaml_language.versions {
            if let Some(version) = errors.maybe_extend(convert_version(
                yaml_version,
                sdk,
                ctx,
                &|kind: MetadataErrorKind| error(kind).for_language(&name),
            )) {
                versions.push(version);
            }
        }
        languages.insert(name.clone(), Language { name, versions });
    }

    errors.into_result(Example {
        id: id.to_string(),
        file: file.to_path_buf(),
        title,
        title_abbrev,
        synopsis,
        synopsis_list: raw.synopsis_list,
        category,
        guide_topic,
        languages,
        services,
    })
}

fn convert_url(raw: YamlUrl) -> Option<Url> {
    let url = raw.url?;
    Some(Url {
        title: raw.title.unwrap_or_else(|| url.clone()),
        url,
    })
}

fn is_url(link: &str) -> bool {
    let lower = link.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn convert_version(
    raw: YamlVersion,
    sdk: &Sdk,
    ctx: &ExampleContext<'_>,
    error: &dyn Fn(MetadataErrorKind) -> MetadataError,
) -> Result<Version, MetadataErrors> {
    let mut errors = MetadataErrors::new();

    let Some(sdk_version) = raw.sdk_version else {
        errors.push(error(MetadataErrorKind::MissingField("sdk_version".to_string())));
        return Err(errors);
    };
    let error = |kind: MetadataErrorKind| error(kind).for_sdk_version(sdk_version);

    if sdk.version(sdk_version).is_none() {
        errors.push(error(MetadataErrorKind::UnknownSdkVersion {
            language: sdk.name.clone(),
            version: sdk_version,
        }));
    }

    if let Some(github) = raw.github.as_deref().filter(|g| is_url(g)) {
        errors.push(error(MetadataErrorKind::InvalidGithubLink(github.to_string())));
    }

    match (&raw.block_content, raw.excerpts.is_empty()) {
        (None, true) => errors.push(error(MetadataErrorKind::MissingBlockContentAndExcerpt)),
        (Some(_), false) => errors.push(error(MetadataErrorKind::BlockContentAndExcerptConflict)),
        (Some(block), true) => {
            if let Some(dir) = ctx.cross_content_dir {
                if !dir.join(block).is_file() {
                    errors.push(error(MetadataErrorKind::MissingBlockContentFile(block.clone())));
                }
            }
        }
        (None, false) => {}
    }

    let mut excerpts = Vec::new();
    for raw_excerpt in raw.excerpts {
        if raw_excerpt.snippet_tags.is_empty() && raw_excerpt.snippet_files.is_empty() {
            errors.push(error(MetadataErrorKind::ExcerptWithoutSnippet));
        }
        if let Some(description) = &raw_excerpt.description {
            for name in ctx.entities.unknown_in(description) {
                errors.push(error(MetadataErrorKind::UnknownEntity(name)));
            }
        }
        for tag in &raw_excerpt.snippet_tags {
            if !ctx.snippets.has_snippet(tag) {
                errors.push(error(MetadataErrorKind::MissingSnippetTag(tag.clone())));
            }
        }
        for path in &raw_excerpt.snippet_files {
            if !ctx.snippets.has_file(path) {
                errors.push(error(MetadataErrorKind::MissingSnippetFile(path.clone())));
            }
        }
        excerpts.push(Excerpt {
            description: raw_excerpt.description,
            snippet_tags: raw_excerpt.snippet_tags,
            snippet_files: raw_excerpt.snippet_files,
        });
    }

    let add_services = actions_map(raw.add_services);
    for service in add_services.keys() {
        if !ctx.services.contains_key(service) {
            errors.push(error(MetadataErrorKind::UnknownService(service.clone())));
        }
    }

    let mut more_info = Vec::new();
    for url in raw.more_info {
        match convert_url(url) {
            Some(url) => more_info.push(url),
            None => errors.push(error(MetadataErrorKind::MissingField(
                "more_info.url".to_string(),
            ))),
        }
    }

    errors.into_result(Version {
        sdk_version,
        github: raw.github,
        block_content: raw.block_content,
        excerpts,
        add_services,
        sdkguide: raw.sdkguide,
        more_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockSnippetLookup;
    use docgen_common::{Expanded, SdkVersion};

    fn sdks() -> BTreeMap<String, Sdk> {
        let mut sdks = BTreeMap::new();
        sdks.insert(
            "Python".to_string(),
            Sdk {
                name: "Python".to_string(),
                property: "python".to_string(),
                syntax: Some("python".to_string()),
                guide: String::new(),
                versions: vec![SdkVersion {
                    version: 3,
                    long: "&PYLong;".to_string(),
                    short: "&PYShort;".to_string(),
                    expanded: None,
                    guide: None,
                    api_ref: None,
                    caveat: None,
                }],
            },
        );
        sdks
    }

    fn services() -> BTreeMap<String, Service> {
        let mut services = BTreeMap::new();
        services.insert(
            "s3".to_string(),
            Service {
                id: "s3".to_string(),
                long: "&S3long;".to_string(),
                short: "&S3;".to_string(),
                sort: "S3".to_string(),
                expanded: Expanded {
                    long: "Amazon Simple Storage Service".to_string(),
                    short: "Amazon S3".to_string(),
                },
                version: None,
                api_ref: None,
                blurb: None,
                caveat: None,
                guide: None,
                tags: BTreeMap::new(),
            },
        );
        services
    }

    fn entities() -> Entities {
        let mut entities = Entities::default();
        entities.insert_reference("&S3;", "Amazon S3");
        entities
    }

    fn all_snippets_exist() -> MockSnippetLookup {
        let mut lookup = MockSnippetLookup::new();
        lookup.expect_has_snippet().return_const(true);
        lookup.expect_has_file().return_const(true);
        lookup
    }

    fn run(yaml: &str, lookup: &MockSnippetLookup) -> (Vec<Example>, MetadataErrors) {
        let sdks = sdks();
        let services = services();
        let entities = entities();
        let ctx = ExampleContext {
            sdks: &sdks,
            services: &services,
            entities: &entities,
            snippets: lookup,
            cross_content_dir: None,
        };
        let parsed = parse_examples(Path::new("s3_metadata.yaml"), yaml, &ctx);
        (parsed.examples, parsed.errors)
    }

    fn kinds(errors: &MetadataErrors) -> Vec<MetadataErrorKind> {
        errors.iter().map(|e| e.kind.clone()).collect()
    }

    const CREATE_BUCKET: &str = r#"
s3_CreateBucket:
  title: Create an &S3; bucket using an &AWS; SDK
  title_abbrev: Create a bucket
  synopsis: create an &S3; bucket.
  languages:
    Python:
      versions:
        - sdk_version: 3
          github: python/example_code/s3
          excerpts:
            - description: Create the bucket.
              snippet_tags:
                - python.example_code.s3.CreateBucket
  services:
    s3: {CreateBucket}
"#;

    #[test]
    fn test_valid_action_example() {
        let yaml = CREATE_BUCKET.replace(" using an &AWS; SDK", "");

        let lookup = all_snippets_exist();
        let (examples, errors) = run(&yaml, &lookup);

        assert!(errors.is_empty(), "{}", errors);
        let example = &examples[0];
        assert_eq!(example.category, Category::Actions);
        assert_eq!(example.title, "Create an &S3; bucket");
        let version = example.version("Python", 3).unwrap();
        assert_eq!(version.github.as_deref(), Some("python/example_code/s3"));
        assert_eq!(
            version.snippet_tags().collect::<Vec<_>>(),
            vec!["python.example_code.s3.CreateBucket"]
        );
        assert!(example.services["s3"].contains("CreateBucket"));
    }

    #[test]
    fn test_unknown_entity_and_missing_snippet() {
        let mut lookup = MockSnippetLookup::new();
        lookup
            .expect_has_snippet()
            .withf(|tag: &str| tag == "python.example_code.s3.CreateBucket")
            .times(1)
            .return_const(false);

        let (examples, errors) = run(CREATE_BUCKET, &lookup);

        assert!(examples.is_empty());
        assert_eq!(
            kinds(&errors),
            vec![
                MetadataErrorKind::UnknownEntity("AWS".to_string()),
                MetadataErrorKind::MissingSnippetTag(
                    "python.example_code.s3.CreateBucket".to_string()
                ),
            ]
        );
        let tag_error = errors.iter().nth(1).unwrap();
        assert_eq!(tag_error.language.as_deref(), Some("Python"));
        assert_eq!(tag_error.sdk_version, Some(3));
        assert_eq!(tag_error.id.as_deref(), Some("s3_CreateBucket"));
    }

    #[test]
    fn test_structural_errors_are_all_collected() {
        let yaml = r#"
sqs_Send:
  title: Send a message.
  title_abbrev: Send
  synopsis: send.
  languages:
    Python:
      versions:
        - sdk_version: 2
          github: https://github.com/awsdocs/aws-doc-sdk-examples
          block_content: cross_Send.xml
          excerpts:
            - description: nothing
    Cobol:
      versions: []
  services:
    sqs:
"#;
        let lookup = all_snippets_exist();
        let (examples, errors) = run(yaml, &lookup);

        assert!(examples.is_empty());
        assert_eq!(
            kinds(&errors),
            vec![
                MetadataErrorKind::NameFormat,
                MetadataErrorKind::TitleEndsWithPeriod,
                MetadataErrorKind::UnknownService("sqs".to_string()),
                MetadataErrorKind::UnknownLanguage("Cobol".to_string()),
                MetadataErrorKind::UnknownSdkVersion {
                    language: "Python".to_string(),
                    version: 2,
                },
                MetadataErrorKind::InvalidGithubLink(
                    "https://github.com/awsdocs/aws-doc-sdk-examples".to_string()
                ),
                MetadataErrorKind::BlockContentAndExcerptConflict,
                MetadataErrorKind::ExcerptWithoutSnippet,
            ]
        );
    }

    #[test]
    fn test_bad_entry_does_not_hide_good_one() {
        let yaml = r#"
s3_Broken:
  titel: typo
s3_Hello:
  title: Hello &S3;
  title_abbrev: Hello &S3;
  synopsis: get started.
  languages:
    Python:
      versions:
        - sdk_version: 3
          block_content: s3_hello.xml
"#;
        let lookup = all_snippets_exist();
        let (examples, errors) = run(yaml, &lookup);

        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].category, Category::Hello);
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert!(matches!(error.kind, MetadataErrorKind::YamlParse(_)));
        assert_eq!(error.id.as_deref(), Some("s3_Broken"));
    }

    #[test]
    fn test_invalid_example_keeps_id_and_tags() {
        let sdks = sdks();
        let services = services();
        let entities = entities();
        let lookup = all_snippets_exist();
        let ctx = ExampleContext {
            sdks: &sdks,
            services: &services,
            entities: &entities,
            snippets: &lookup,
            cross_content_dir: None,
        };

        // &AWS; is not a known entity
        let parsed = parse_examples(Path::new("s3_metadata.yaml"), CREATE_BUCKET, &ctx);

        assert!(parsed.examples.is_empty());
        assert_eq!(parsed.ids, vec!["s3_CreateBucket".to_string()]);
        assert!(parsed.snippet_tags.contains("python.example_code.s3.CreateBucket"));
        assert!(!parsed.errors.is_empty());
    }

    #[test]
    fn test_resolve_category() {
        let mut services = BTreeMap::new();
        services.insert(
            "s3".to_string(),
            ["CreateBucket".to_string()].into_iter().collect(),
        );

        assert_eq!(
            resolve_category(None, "s3", "CreateBucket", &services),
            Ok(Category::Actions)
        );
        assert_eq!(
            resolve_category(None, "s3", "Hello", &services),
            Ok(Category::Hello)
        );
        assert_eq!(
            resolve_category(None, "s3", "GettingStarted", &services),
            Ok(Category::Scenarios)
        );
        assert_eq!(
            resolve_category(Some("Serverless examples"), "s3", "Lambda", &services),
            Ok(Category::Custom("Serverless examples".to_string()))
        );
        assert!(resolve_category(Some("Actions"), "s3", "PutObject", &services).is_err());
    }

    #[test]
    fn test_parse_example_id() {
        let services = services();
        assert_eq!(
            parse_example_id("s3_CreateBucket", &services),
            Some(("s3", "CreateBucket"))
        );
        assert_eq!(
            parse_example_id("cross_ServerlessWorkflow", &services),
            Some(("cross", "ServerlessWorkflow"))
        );
        assert_eq!(parse_example_id("s3CreateBucket", &services), None);
        assert_eq!(parse_example_id("ec2_Run", &services), None);
        assert_eq!(parse_example_id("s3_Create_Bucket", &services), None);
    }
}
