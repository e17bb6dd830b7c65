//! # txtar
//!
//! A trivial text-based file archive format.
//!
//! A txtar archive is zero or more comment lines followed by a sequence of
//! file entries. Each file entry starts with a marker line of the form
//! `-- name --` and holds the text up to the next marker line:
//!
//! ```text
//! Free-form comment describing the archive.
//! -- file1.txt --
//! content of file1
//! -- dir/file2.txt --
//! content of file2
//! ```
//!
//! The format is meant to be easy to read and edit by hand, so it has no
//! escaping. A file whose content contains a line that looks like a marker
//! cannot be stored; [`Archive::check`] detects that case.
//!
//! [`parse`] and [`format`] never fail. Parsing always succeeds, at worst
//! yielding an archive with only a comment. Formatting writes exactly what it
//! is given, adding a final newline to the comment and to each file's data
//! where missing.
//!
//! ```
//! use txtar::{format, parse, File};
//!
//! let archive = parse("notes\n-- a.txt --\nhello");
//! assert_eq!(archive.comment, "notes\n");
//! assert_eq!(archive.files, vec![File::new("a.txt", "hello\n")]);
//! assert_eq!(format(&archive), "notes\n-- a.txt --\nhello\n");
//! ```

pub mod archive;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod marker;
pub mod verify;

pub use archive::{fix_nl, has_marker_line, Archive, File};
pub use decoder::{parse, Decoder};
pub use encoder::{format, Encoder};
pub use error::{ArchiveError, Divergence};
pub use marker::{find_marker, Marker};
