use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::Result;

#[async_trait]
pub trait SpeechStore: Send + Sync {
    /// Write a rendered speech under `file_name`, replacing any previous
    /// file of the same name. Returns where it was written.
    async fn store(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}

/// Flat directory of UTF-8 `.txt` files.
#[derive(Debug, Clone)]
pub struct TextFileStore {
    root: PathBuf,
}

impl TextFileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl SpeechStore for TextFileStore {
    async fn store(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        tokio::fs::write(&path, contents.as_bytes()).await?;
        debug!("💾 Wrote {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}
