//! Single-pass snippet tag scanner
//!
//! Tags are written as comments in source files:
//!
//! ```text
//! # snippet-start:[python.example_code.s3.Hello]
//! def hello(): ...
//! # snippet-end:[python.example_code.s3.Hello]
//! ```
//!
//! Open tags form a stack, so regions may nest but never cross.

use docgen_common::{MetadataError, MetadataErrorKind, MetadataErrors, Snippet};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// `snippet-start:[tag]` / `snippet-end:[tag]`
fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"snippet-(start|end):\[([^\]]*)\]").expect("valid regex"))
}

/// Any snippet directive, including legacy ones like `snippet-sourcedescription:[`
fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"snippet-[a-z]+:\[").expect("valid regex"))
}

/// Check tag characters: letters, digits, `_`, `.`, `:` and `-`
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'))
}

/// Whether a line carries any snippet directive and must not appear in output
pub fn is_directive_line(line: &str) -> bool {
    directive_regex().is_match(line)
}

/// A tag currently being collected
struct OpenSnippet {
    tag: String,
    start_line: usize,
    lines: Vec<String>,
}

/// Scan one file's lines for snippet regions
///
/// `file` is the repository-relative path recorded on each [`Snippet`] and
/// on every error. Returns all completed snippets and the errors found; a
/// region with errors does not prevent other regions from being returned.
pub fn parse_snippets<'a, I>(lines: I, file: &str) -> (BTreeMap<String, Snippet>, MetadataErrors)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut snippets = BTreeMap::new();
    let mut errors = MetadataErrors::new();
    let mut open: Vec<OpenSnippet> = Vec::new();
    let mut started: HashSet<String> = HashSet::new();
    let mut closed: HashSet<String> = HashSet::new();

    let error = |kind: MetadataErrorKind| MetadataError::new(kind).in_file(file);

    for (index, line) in lines.into_iter().enumerate() {
        let line_no = index + 1;

        if !is_directive_line(line) {
            for snippet in open.iter_mut() {
                snippet.lines.push(line.to_string());
            }
            continue;
        }

        for caps in marker_regex().captures_iter(line) {
            let tag = caps[2].trim().to_string();
            if !is_valid_tag(&tag) {
                errors.push(error(MetadataErrorKind::InvalidSnippetTag {
                    tag,
                    line: line_no,
                }));
                continue;
            }

            if &caps[1] == "start" {
                if started.contains(&tag) {
                    errors.push(error(MetadataErrorKind::DuplicateSnippetStart {
                        tag,
                        line: line_no,
                    }));
                    continue;
                }
                started.insert(tag.clone());
                open.push(OpenSnippet {
                    tag,
                    start_line: line_no + 1,
                    lines: Vec::new(),
                });
                continue;
            }

            let Some(position) = open.iter().position(|s| s.tag == tag) else {
                let kind = if closed.contains(&tag) {
                    MetadataErrorKind::DuplicateSnippetEnd { tag, line: line_no }
                } else {
                    MetadataErrorKind::MissingSnippetStart { tag, line: line_no }
                };
                errors.push(error(kind));
                continue;
            };

            if position + 1 != open.len() {
                let innermost = &open[open.len() - 1];
                errors.push(error(MetadataErrorKind::SnippetEndOutOfOrder {
                    tag: tag.clone(),
                    open: innermost.tag.clone(),
                    line: line_no,
                }));
            }

            let finished = open.remove(position);
            closed.insert(tag.clone());
            // An empty region collapses onto its start marker line
            let line_end = line_no - 1;
            snippets.insert(
                tag.clone(),
                Snippet {
                    id: tag,
                    file: file.to_string(),
                    line_start: finished.start_line.min(line_end),
                    line_end,
                    code: dedent(&finished.lines),
                },
            );
        }
    }

    for unfinished in open {
        errors.push(error(MetadataErrorKind::MissingSnippetEnd {
            tag: unfinished.tag,
            line: unfinished.start_line - 1,
        }));
    }

    (snippets, errors)
}

/// Remove the whitespace prefix common to all non-blank lines
///
/// Blank lines are emitted empty. The result has no trailing newline.
pub fn dedent(lines: &[String]) -> String {
    let prefix_len = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    // Shrink until the prefix is identical across lines (tabs vs spaces)
    let mut common = prefix_len;
    if let Some(first) = lines.iter().find(|l| !l.trim().is_empty()) {
        while common > 0 {
            let Some(candidate) = first.get(..common) else {
                common -= 1;
                continue;
            };
            if lines
                .iter()
                .filter(|l| !l.trim().is_empty())
                .all(|l| l.starts_with(candidate))
            {
                break;
            }
            common -= 1;
        }
    }

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                &l[common..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
