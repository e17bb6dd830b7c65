//! Txtar archive encoder

use std::path::Path;

use anyhow::{Context, Result};
use log::trace;

use crate::archive::{fix_nl, Archive, File, MARKER_PREFIX, MARKER_SUFFIX};

/// Serialize an archive.
///
/// The archive is assumed well-formed: the comment and every file's data
/// contain no marker lines and every name is non-empty. Nothing is checked;
/// see [`Archive::check`] for that.
pub fn format(archive: &Archive) -> String {
    let marker_len = MARKER_PREFIX.len() + MARKER_SUFFIX.len() + 2;
    let files_len: usize = archive
        .files
        .iter()
        .map(|f| f.name.len() + f.data.len() + marker_len)
        .sum();
    let mut output = String::with_capacity(archive.comment.len() + 1 + files_len);

    output.push_str(&fix_nl(&archive.comment));
    for file in &archive.files {
        encode_file(&mut output, file);
    }

    output
}

fn encode_file(output: &mut String, file: &File) {
    output.push_str(MARKER_PREFIX);
    output.push_str(&file.name);
    output.push_str(MARKER_SUFFIX);
    output.push('\n');
    output.push_str(&fix_nl(&file.data));
}

/// Encodes an archive into txtar format
pub struct Encoder {
    // Currently stateless, but reserved for future options
}

impl Encoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {}
    }

    /// Encode an archive to a string
    pub fn encode(&self, archive: &Archive) -> String {
        let encoded = format(archive);
        trace!("encoded {} files into {} bytes", archive.files.len(), encoded.len());
        encoded
    }

    /// Encode an archive directly to a writer
    pub fn encode_to_writer<W: std::io::Write>(
        &self,
        archive: &Archive,
        mut writer: W,
    ) -> Result<()> {
        let encoded = self.encode(archive);
        writer.write_all(encoded.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Encode an archive to a file
    pub fn encode_to_file(&self, archive: &Archive, path: &Path) -> Result<()> {
        let encoded = self.encode(archive);
        std::fs::write(path, encoded)
            .with_context(|| format!("Failed to write: {}", path.display()))?;
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
