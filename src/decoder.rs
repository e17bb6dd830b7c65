//! Txtar archive decoder

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::archive::{Archive, File, MARKER_PREFIX_LEN, MARKER_SUFFIX_LEN};
use crate::marker::find_marker;

/// Parse the serialized form of an archive.
///
/// Total over any input: text without marker lines becomes the comment.
pub fn parse(text: &str) -> Archive {
    scan(text, None)
}

/// Split `text` into comment and files.
///
/// When `padded` is given, marker lines whose names carry extra whitespace
/// are collected into it. Such names are trimmed, so re-encoding changes
/// the marker line.
fn scan<'a>(text: &'a str, mut padded: Option<&mut Vec<&'a str>>) -> Archive {
    let mut archive = Archive::new();
    let mut rest = text;
    let mut current: Option<&'a str> = None;

    loop {
        let marker = find_marker(rest);

        if let (Some(name), Some(padded)) = (marker.name, padded.as_deref_mut()) {
            let line = &rest[marker.before.len()..rest.len() - marker.after.len()];
            let line = line.strip_suffix('\n').unwrap_or(line);
            if line.len() != name.len() + MARKER_PREFIX_LEN + MARKER_SUFFIX_LEN {
                padded.push(line);
            }
        }

        match current {
            Some(name) => archive.add_file(File::new(name, marker.before)),
            None => archive.comment = marker.before.into_owned(),
        }

        match marker.name {
            Some(next) => {
                current = Some(next);
                rest = marker.after;
            }
            None => break,
        }
    }

    archive
}

/// Decodes a txtar archive
pub struct Decoder {
    /// Verbosity level for marker warnings
    verbose: u8,
}

impl Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self { verbose: 0 }
    }

    /// Set verbosity level (0-3)
    pub fn with_verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Decode a txtar archive from a string
    pub fn decode(&self, input: &str) -> Archive {
        let archive = if self.verbose > 0 {
            let mut padded = Vec::new();
            let archive = scan(input, Some(&mut padded));
            for line in padded {
                warn!("Marker line {:?} has padded name, it will be written trimmed", line);
            }
            archive
        } else {
            scan(input, None)
        };

        debug!("decoded {} files from {} bytes", archive.files.len(), input.len());
        for file in &archive.files {
            debug!("file {} ({} bytes)", file.name, file.data.len());
        }

        archive
    }

    /// Decode a txtar archive from a reader holding UTF-8 text
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<Archive> {
        let mut buffer = String::new();
        reader
            .read_to_string(&mut buffer)
            .context("Archive is not valid UTF-8 text")?;
        Ok(self.decode(&buffer))
    }

    /// Decode a txtar archive from a file
    pub fn decode_file(&self, path: &Path) -> Result<Archive> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        Ok(self.decode(&text))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, data: &str) -> File {
        File::new(name, data)
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse(""), Archive::new());
    }

    #[test]
    fn test_parse_no_markers() {
        let archive = parse("hello\nworld\n");
        assert_eq!(archive.comment, "hello\nworld\n");
        assert!(archive.files.is_empty());

        assert_eq!(parse("no newline").comment, "no newline\n");
    }

    #[test]
    fn test_parse_single_file_without_trailing_newline() {
        let archive = parse("-- a --\ndata");
        assert_eq!(archive.comment, "");
        assert_eq!(archive.files, vec![file("a", "data\n")]);
    }

    #[test]
    fn test_parse_two_files() {
        let archive = parse("-- a --\nA\n-- b --\nB\n");
        assert_eq!(archive.comment, "");
        assert_eq!(archive.files, vec![file("a", "A\n"), file("b", "B\n")]);
    }

    #[test]
    fn test_parse_with_comment() {
        let input = "This is a comment\nAnother comment line\n\n-- file.txt --\nContent\n";
        let archive = parse(input);

        assert_eq!(archive.comment, "This is a comment\nAnother comment line\n\n");
        assert_eq!(archive.files, vec![file("file.txt", "Content\n")]);
    }

    #[test]
    fn test_parse_empty_name_is_text() {
        let archive = parse("--  --\nbody\n");
        assert_eq!(archive.comment, "--  --\nbody\n");
        assert!(archive.files.is_empty());
    }

    #[test]
    fn test_parse_mid_line_marker_is_text() {
        let archive = parse("-- a --\nfoo -- x --\nbar\n");
        assert_eq!(archive.files, vec![file("a", "foo -- x --\nbar\n")]);
    }

    #[test]
    fn test_parse_trailing_marker_without_newline() {
        let archive = parse("-- a --\nA\n-- b --");
        assert_eq!(archive.files, vec![file("a", "A\n"), file("b", "")]);
    }

    #[test]
    fn test_parse_empty_files_and_blank_lines() {
        let archive = parse("-- a --\n-- b --\n\n\n-- c --\n");
        assert_eq!(
            archive.files,
            vec![file("a", ""), file("b", "\n\n"), file("c", "")]
        );
    }

    #[test]
    fn test_parse_trims_names() {
        let archive = parse("--   dir/sub file.txt \t --\nx\n");
        assert_eq!(archive.files, vec![file("dir/sub file.txt", "x\n")]);
    }

    #[test]
    fn test_parse_duplicate_names_allowed() {
        let archive = parse("-- f --\n1\n-- f --\n2\n");
        assert_eq!(archive.files, vec![file("f", "1\n"), file("f", "2\n")]);
    }

    #[test]
    fn test_parse_crlf_marker_is_text() {
        let archive = parse("-- a --\r\nbody\r\n");
        assert_eq!(archive.comment, "-- a --\r\nbody\r\n");
        assert!(archive.files.is_empty());
    }

    #[test]
    fn test_decode_matches_parse() {
        let input = "c\n--  padded  --\nx\n";
        let decoded = Decoder::new().with_verbose(1).decode(input);
        assert_eq!(decoded, parse(input));
        assert_eq!(decoded.files, vec![file("padded", "x\n")]);
    }

    #[test]
    fn test_scan_collects_padded_markers() {
        let input = "c\n--  padded  --\nx\n-- ok --\ny\n-- last\t --";
        let mut padded = Vec::new();
        let archive = scan(input, Some(&mut padded));

        assert_eq!(padded, ["--  padded  --", "-- last\t --"]);
        assert_eq!(archive, parse(input));
    }

    #[test]
    fn test_scan_without_padding() {
        let mut padded = Vec::new();
        scan("-- a --\nA\n-- b --", Some(&mut padded));
        assert!(padded.is_empty());
    }

    #[test]
    fn test_decode_reader() {
        let archive = Decoder::new().decode_reader("-- a --\nA\n".as_bytes()).unwrap();
        assert_eq!(archive.files, vec![file("a", "A\n")]);
    }

    #[test]
    fn test_decode_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'-', b'-', b' ', 0xFF, 0xFE];
        let err = Decoder::new().decode_reader(bytes).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txtar");
        std::fs::write(&path, "comment\n-- a --\nA").unwrap();

        let archive = Decoder::default().decode_file(&path).unwrap();
        assert_eq!(archive.comment, "comment\n");
        assert_eq!(archive.files, vec![file("a", "A\n")]);

        assert!(Decoder::new().decode_file(&dir.path().join("missing")).is_err());
    }
}
