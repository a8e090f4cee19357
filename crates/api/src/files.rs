//! The upload store: a flat directory of stored files referenced by
//! relative `/uploads/...` paths.
//!
//! The directory is created lazily on first write. There is no size
//! limit, deduplication, or garbage collection; removal is explicit and
//! best-effort (asset deletion reports per-file failures instead of
//! aborting).

use std::path::{Path, PathBuf};

use assetforge_core::uploads::{relative_url, stored_filename, UPLOADS_PREFIX};

/// Handle on the upload directory.
#[derive(Debug)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory files are stored in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist uploaded bytes under a generated name, returning the
    /// relative `/uploads/<name>` path to store in the database.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let name = stored_filename(original_name);
        tokio::fs::write(self.root.join(&name), data).await?;

        Ok(relative_url(&name))
    }

    /// Whether the file behind a stored relative path exists on disk.
    pub async fn exists(&self, rel_path: &str) -> bool {
        match self.disk_path(rel_path) {
            Some(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            None => false,
        }
    }

    /// Remove the file behind a stored relative path.
    ///
    /// Returns `Ok(true)` if the file was removed, `Ok(false)` if it was
    /// already missing.
    pub async fn remove(&self, rel_path: &str) -> std::io::Result<bool> {
        let Some(path) = self.disk_path(rel_path) else {
            return Ok(false);
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Resolve a stored `/uploads/<name>` path to its on-disk location.
    ///
    /// Rejects anything that is not a bare filename under the uploads
    /// prefix, so stored paths cannot escape the directory.
    fn disk_path(&self, rel_path: &str) -> Option<PathBuf> {
        let name = rel_path.strip_prefix(&format!("{UPLOADS_PREFIX}/"))?;
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(self.root.join(name))
    }
}
