//! Archive data structures

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::error::ArchiveError;
use crate::marker::find_marker;

// Txtar format constants
pub const MARKER_PREFIX: &str = "-- ";
pub const MARKER_SUFFIX: &str = " --";
pub const MARKER_PREFIX_LEN: usize = 3;  // len("-- ")
pub const MARKER_SUFFIX_LEN: usize = 3;  // len(" --")
pub const NEWLINE_MARKER: &str = "\n-- ";

/// Represents a single file in an archive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
    /// Name of the file (may include subdirectories)
    pub name: String,
    /// Contents of the file
    pub data: String,
}

impl File {
    /// Create a new file with the given name and data
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Relative path to extract this file to.
    ///
    /// Rejects absolute names and names with `..` components.
    pub fn safe_path(&self) -> Result<PathBuf, ArchiveError> {
        let path = Path::new(&self.name);
        let mut normal = 0;
        for component in path.components() {
            match component {
                Component::Normal(_) => normal += 1,
                Component::CurDir => {}
                _ => return Err(ArchiveError::UnsafePath { name: self.name.clone() }),
            }
        }
        if normal == 0 {
            return Err(ArchiveError::UnsafePath { name: self.name.clone() });
        }
        Ok(path.to_path_buf())
    }
}

/// Represents a txtar archive containing multiple files
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Archive {
    /// Text before the first file
    pub comment: String,
    /// Files in the archive, in marker order
    pub files: Vec<File>,
}

impl Archive {
    /// Create a new empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an archive with a comment
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            ..Default::default()
        }
    }

    /// Parse the serialized form of an archive. Never fails.
    pub fn parse(text: &str) -> Self {
        crate::decoder::parse(text)
    }

    /// Serialize the archive. Never fails.
    pub fn format(&self) -> String {
        crate::encoder::format(self)
    }

    /// Append a file. Names are not required to be unique.
    pub fn add_file(&mut self, file: File) {
        self.files.push(file);
    }

    /// Add a file from a path
    ///
    /// The file must hold UTF-8 text; txtar has no binary encoding.
    pub fn add_file_from_path(
        &mut self,
        path: &Path,
        archive_name: Option<String>,
    ) -> anyhow::Result<()> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read text file: {}", path.display()))?;

        // Use provided name or the file's actual name
        let name = match archive_name {
            Some(name) => name,
            None => path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid filename: {}", path.display()))?
                .to_string(),
        };

        self.add_file(File::new(name, data));
        Ok(())
    }

    /// First file with the given name
    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.name == name)
    }

    /// True when there is neither a comment nor any file
    pub fn is_empty(&self) -> bool {
        self.comment.is_empty() && self.files.is_empty()
    }

    /// Check that formatting this archive and parsing the result gives it back.
    ///
    /// Data that lacks a final newline still passes: formatting adds one,
    /// which is the only difference a round trip introduces.
    pub fn check(&self) -> Result<(), ArchiveError> {
        if let Some(marker) = first_marker_name(&self.comment) {
            return Err(ArchiveError::MarkerInComment { marker: marker.to_string() });
        }

        for (index, file) in self.files.iter().enumerate() {
            if file.name.is_empty() {
                return Err(ArchiveError::EmptyName { index });
            }
            if file.name.contains('\n') {
                return Err(ArchiveError::NameContainsNewline { name: file.name.clone() });
            }
            if file.name.trim() != file.name {
                return Err(ArchiveError::NameNotTrimmed { name: file.name.clone() });
            }
            if let Some(marker) = first_marker_name(&file.data) {
                return Err(ArchiveError::MarkerInFile {
                    name: file.name.clone(),
                    marker: marker.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// If `data` is empty or ends in `\n`, returns it unchanged.
/// Otherwise returns a copy with a final `\n` added.
pub fn fix_nl(data: &str) -> Cow<'_, str> {
    if data.is_empty() || data.ends_with('\n') {
        Cow::Borrowed(data)
    } else {
        let mut owned = String::with_capacity(data.len() + 1);
        owned.push_str(data);
        owned.push('\n');
        Cow::Owned(owned)
    }
}

/// Check if text contains a line that would be read as a file marker
pub fn has_marker_line(text: &str) -> bool {
    first_marker_name(text).is_some()
}

fn first_marker_name(text: &str) -> Option<&str> {
    find_marker(text).name
}
