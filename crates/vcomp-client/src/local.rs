//! Local files selected for upload.

use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult};

/// A file on the local disk, described the way a browser file picker would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVideoFile {
    /// Location on disk
    pub path: PathBuf,
    /// File name shown to the user and sent as the multipart file name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type guessed from the extension
    pub mime: Option<String>,
}

impl LocalVideoFile {
    /// Describe a file without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = guess_mime(&path);

        Self {
            path,
            name,
            size,
            mime,
        }
    }

    /// Stat a file on disk.
    pub async fn probe(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;

        if !metadata.is_file() {
            return Err(ClientError::invalid_file(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        Ok(Self::new(path, metadata.len()))
    }

    /// Lower-cased extension, without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Override the guessed MIME type.
    pub fn with_mime(mut self, mime: Option<String>) -> Self {
        self.mime = mime;
        self
    }
}

fn guess_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}
