//! Snippet tag extraction
//!
//! Source files mark reusable excerpts with `snippet-start:[tag]` and
//! `snippet-end:[tag]` comments. This crate scans a repository for those
//! markers, validates that they pair up, and exports the enclosed text as
//! named fragments for the documentation build.
//!
//! # Examples
//!
//! ```no_run
//! use docgen_snippets::{find_snippets, ScanOptions};
//! use std::path::Path;
//!
//! let (index, errors) = find_snippets(Path::new("."), &ScanOptions::default());
//! for error in &errors {
//!     eprintln!("{error}");
//! }
//! println!("{} snippets", index.snippets.len());
//! ```

mod collect;
pub mod scanner;
mod writer;

pub use collect::{
    find_snippets, source_files, ScanOptions, SnippetIndex, DEFAULT_EXTENSIONS,
    DEFAULT_IGNORED_DIRS,
};
pub use scanner::{dedent, is_directive_line, is_valid_tag, parse_snippets};
pub use writer::{snippet_file_name, write_snippets};
