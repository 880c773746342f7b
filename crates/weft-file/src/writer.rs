//! A terminal handler that appends polled files to one output file.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use weft_core::{Handler, HandlerResult, Message};

use crate::entry::FileEntry;

/// Appends the contents of every delivered entry to a single target file.
///
/// The target is created on first use and always opened in append mode, so
/// repeated deliveries accumulate. The source entries themselves are only
/// read, never touched.
///
/// # Example
///
/// ```rust,ignore
/// file_channel.bind(FileWriter::new("out/combined.txt"));
/// ```
pub struct FileWriter {
    target: PathBuf,
}

impl FileWriter {
    /// Creates a writer appending to `target`.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// The file deliveries are appended to.
    pub fn target(&self) -> &std::path::Path {
        &self.target
    }
}

#[async_trait]
impl Handler<FileEntry> for FileWriter {
    async fn handle(&self, message: Message<FileEntry>) -> HandlerResult<FileEntry> {
        let entry = message.payload();
        let contents = entry.read().await?;

        let mut target = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.target)
            .await?;
        target.write_all(&contents).await?;
        target.flush().await?;

        debug!(
            source = %entry.file_name(),
            target = %self.target.display(),
            bytes = contents.len(),
            "appended polled file"
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_appends_each_delivery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha\n").unwrap();
        std::fs::write(dir.path().join("b.txt"), "beta\n").unwrap();
        let target = dir.path().join("out.txt");

        let writer = FileWriter::new(&target);
        writer
            .handle(Message::new(FileEntry::new(dir.path().join("a.txt"))))
            .await
            .unwrap();
        writer
            .handle(Message::new(FileEntry::new(dir.path().join("b.txt"))))
            .await
            .unwrap();

        let combined = std::fs::read_to_string(&target).unwrap();
        assert_eq!(combined, "alpha\nbeta\n");
    }

    #[tokio::test]
    async fn test_missing_source_is_a_handler_error() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("out.txt"));

        let result = writer
            .handle(Message::new(FileEntry::new(dir.path().join("gone.txt"))))
            .await;
        assert!(result.is_err());
    }
}
