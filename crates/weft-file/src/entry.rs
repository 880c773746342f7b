//! The payload type for file pipelines.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// An opaque handle to a file discovered by a polling source.
///
/// The entry is a reference into the watched directory: consumers may read
/// it, but the routing core never mutates or deletes the underlying file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
}

impl FileEntry {
    /// Creates an entry for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the full path of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file name component, lossily decoded.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or(Cow::Borrowed(""))
    }

    /// Reads the entry's contents.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let entry = FileEntry::new("/watch/report.txt");
        assert_eq!(entry.file_name(), "report.txt");
        assert_eq!(entry.path(), Path::new("/watch/report.txt"));
    }
}
