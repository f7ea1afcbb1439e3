//! Individual lint rules
//!
//! Each rule inspects one file (its relative path, size or text) and returns
//! the violations it found. Rules never fail; unreadable input is handled by
//! the caller.

use crate::config::CheckinConfig;
use docgen_snippets::parse_snippets;
use serde::Serialize;
use std::fmt;

pub const DENY_LIST_WORD: &str = "DENY_LIST_WORD";
pub const POSSIBLE_ACCESS_KEY: &str = "POSSIBLE_ACCESS_KEY";
pub const POSSIBLE_SECRET_KEY: &str = "POSSIBLE_SECRET_KEY";
pub const SNIPPET_TAG: &str = "SNIPPET_TAG";
pub const FILE_NAME_SPACES: &str = "FILE_NAME_SPACES";
pub const FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";

const ACCESS_KEY_LEN: usize = 20;
const SECRET_KEY_LEN: usize = 40;

/// One rule failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: &'static str,
    pub file: String,
    pub line: Option<usize>,
    pub message: String,
}

impl Violation {
    fn new(rule: &'static str, file: &str, line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            rule,
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: [{}] {}", self.file, line, self.rule, self.message),
            None => write!(f, "{}: [{}] {}", self.file, self.rule, self.message),
        }
    }
}

/// Maximal runs of characters accepted by `member`
fn runs(line: &str, member: impl Fn(char) -> bool) -> Vec<&str> {
    let mut found = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (member(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                found.push(&line[s..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        found.push(&line[s..]);
    }
    found
}

pub fn is_access_key(word: &str) -> bool {
    word.len() == ACCESS_KEY_LEN
        && (word.starts_with("AKIA") || word.starts_with("ASIA"))
        && word.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

pub fn is_secret_key(word: &str) -> bool {
    word.len() == SECRET_KEY_LEN
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/')
        && word.chars().any(|c| c.is_ascii_digit())
        && word.chars().any(|c| c.is_ascii_lowercase())
        && word.chars().any(|c| c.is_ascii_uppercase())
}

pub fn check_deny_list(file: &str, content: &str, config: &CheckinConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (index, line) in content.lines().enumerate() {
        for word in config.deny_list.iter().filter(|w| line.contains(w.as_str())) {
            violations.push(Violation::new(
                DENY_LIST_WORD,
                file,
                Some(index + 1),
                format!("found denied word `{}`", word),
            ));
        }
    }
    violations
}

pub fn check_access_keys(file: &str, content: &str, config: &CheckinConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let candidates = runs(line, |c| c.is_ascii_uppercase() || c.is_ascii_digit());
        for word in candidates {
            if is_access_key(word) && !config.is_allowed(word) {
                violations.push(Violation::new(
                    POSSIBLE_ACCESS_KEY,
                    file,
                    Some(index + 1),
                    format!("`{}` looks like an access key id", word),
                ));
            }
        }
    }
    violations
}

pub fn check_secret_keys(file: &str, content: &str, config: &CheckinConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let candidates = runs(line, |c| c.is_ascii_alphanumeric() || c == '+' || c == '/');
        for word in candidates {
            if is_secret_key(word) && !config.is_allowed(word) {
                violations.push(Violation::new(
                    POSSIBLE_SECRET_KEY,
                    file,
                    Some(index + 1),
                    format!("`{}` looks like a secret access key", word),
                ));
            }
        }
    }
    violations
}

/// Unbalanced or malformed snippet markers
pub fn check_snippet_tags(file: &str, content: &str) -> Vec<Violation> {
    let (_, errors) = parse_snippets(content.lines(), file);
    errors
        .into_iter()
        .map(|e| Violation::new(SNIPPET_TAG, file, e.kind.line(), e.kind.to_string()))
        .collect()
}

pub fn check_file_name(file: &str) -> Option<Violation> {
    let name = file.rsplit('/').next().unwrap_or(file);
    name.chars().any(char::is_whitespace).then(|| {
        Violation::new(FILE_NAME_SPACES, file, None, "file name contains whitespace")
    })
}

pub fn check_file_size(file: &str, size: u64, config: &CheckinConfig) -> Option<Violation> {
    (size > config.max_file_size).then(|| {
        Violation::new(
            FILE_TOO_LARGE,
            file,
            None,
            format!("{} bytes exceeds the {} byte limit", size, config.max_file_size),
        )
    })
}

/// All content rules for one file
pub fn check_contents(file: &str, content: &str, config: &CheckinConfig) -> Vec<Violation> {
    let mut violations = check_deny_list(file, content, config);
    violations.extend(check_access_keys(file, content, config));
    violations.extend(check_secret_keys(file, content, config));
    violations.extend(check_snippet_tags(file, content));
    violations
}
