//! Error types
//!
//! `parse` and `format` never fail. These errors come from the optional
//! well-formedness check and from the self-check in [`crate::verify`].

use thiserror::Error;

/// Reason an archive would not survive a format/parse round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    /// File name is empty
    #[error("file #{index} has an empty name")]
    EmptyName { index: usize },

    /// File name contains a newline
    #[error("file name {name:?} contains a newline")]
    NameContainsNewline { name: String },

    /// File name has leading or trailing whitespace that parsing would strip
    #[error("file name {name:?} has leading or trailing whitespace")]
    NameNotTrimmed { name: String },

    /// Comment contains a line that parses as a file marker
    #[error("comment contains file marker line for {marker:?}")]
    MarkerInComment { marker: String },

    /// File content contains a line that parses as a file marker
    #[error("file {name:?} contains file marker line for {marker:?}")]
    MarkerInFile { name: String, marker: String },

    /// File name would resolve outside the directory it is extracted into
    #[error("file name {name:?} is not a safe relative path")]
    UnsafePath { name: String },
}

/// Two normalizations of the same input disagree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reference} output diverges for input of {} bytes", .input.len())]
pub struct Divergence {
    /// Name of the implementation compared against
    pub reference: String,
    /// Original input
    pub input: String,
    /// Output of this crate
    pub ours: String,
    /// Output of the reference
    pub theirs: String,
}
