//! Changelog parsing.
//!
//! The changelog is a line-oriented document of release sections:
//!
//! ```text
//! == 0.13.0 (2024-01-05)
//! === Engine
//! * Fixed a bug.
//! ** Sub point.
//! ```
//!
//! - [`classify`] - Turns one line into a [`Line`]
//! - [`parser`] - Accumulates classified lines into completed [`Release`]s

pub mod classify;
pub mod parser;

pub use classify::{classify, Line};
pub use parser::{parse_changelog, ChangelogParser, Release, VersionEntry};

use thiserror::Error;

/// Errors that abort changelog parsing.
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// The version marker matched without capturing both version and date.
    #[error("line {line}: version marker did not capture a version and a date")]
    MarkerCaptures { line: usize },

    /// A bullet line with no space separating the marker from its text.
    #[error("line {line}: bullet has no space after its marker")]
    MalformedBullet { line: usize },

    /// The marker date is shaped like YYYY-MM-DD but is not a calendar date.
    #[error("line {line}: invalid release date '{date}': {source}")]
    InvalidDate {
        line: usize,
        date: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The document has no version marker at all.
    #[error("no pubdate found")]
    NoVersion,
}
