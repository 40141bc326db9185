//! File reading collaborator
//!
//! Reading is injected rather than done inline so tests can substitute
//! in-memory sources and so a missing file surfaces as a typed error.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{PollError, Result};

/// Reads a text file at a path
#[async_trait]
pub trait FileReader: Send + Sync {
    /// Read the full contents of `path` as UTF-8 text
    ///
    /// Fails with [`PollError::SourceUnavailable`] if the path does not
    /// exist or is unreadable.
    async fn read_text(&self, path: &Path) -> Result<String>;
}

/// Default reader backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileReader;

#[async_trait]
impl FileReader for SystemFileReader {
    async fn read_text(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PollError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "CITY=Paris\n").unwrap();

        let reader = SystemFileReader;
        let contents = reader.read_text(file.path()).await.unwrap();

        assert_eq!(contents, "CITY=Paris\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let reader = SystemFileReader;
        let result = reader.read_text(Path::new("/no/such/path")).await;

        match result {
            Err(PollError::SourceUnavailable { path, .. }) => {
                assert_eq!(path, Path::new("/no/such/path"));
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }
}
