use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Avatar files on disk, named by UUID and served under `/avatars`.
#[derive(Debug, Clone)]
pub struct AvatarStorage {
    root: PathBuf,
}

impl AvatarStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` under a fresh name and returns that name.
    pub async fn store(&self, bytes: &[u8], extension: &str) -> Result<String> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)
                .await
                .with_context(|| format!("Failed to create {}", self.root.display()))?;
        }

        let filename = format!("{}.{}", uuid::Uuid::new_v4(), extension);
        let file_path = self.root.join(&filename);

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write avatar to {}", file_path.display()))?;

        info!(path = %file_path.display(), size = bytes.len(), "Stored avatar");
        Ok(filename)
    }

    /// Removes a stored avatar. Missing files are not an error.
    pub async fn delete(&self, filename: &str) -> Result<()> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename.starts_with('.')
        {
            anyhow::bail!("Refusing to delete avatar with unsafe name: {filename}");
        }

        let file_path = self.root.join(filename);
        match fs::remove_file(&file_path).await {
            Ok(()) => {
                info!(path = %file_path.display(), "Deleted avatar");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %file_path.display(), "Avatar already missing");
                Ok(())
            }
            Err(e) => Err(e)
                .with_context(|| format!("Failed to delete avatar {}", file_path.display())),
        }
    }

    /// Public URL path for a stored avatar name.
    #[must_use]
    pub fn url_for(filename: &str) -> String {
        format!("/avatars/{}", urlencoding::encode(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("wikilens-avatars-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn store_then_delete() {
        let root = temp_root();
        let storage = AvatarStorage::new(&root);

        let name = storage.store(b"png-bytes", "png").await.unwrap();
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(root.join(&name)).unwrap(), b"png-bytes");

        storage.delete(&name).await.unwrap();
        assert!(!root.join(&name).exists());

        // second delete is a no-op
        storage.delete(&name).await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn delete_rejects_path_traversal() {
        let storage = AvatarStorage::new(temp_root());
        assert!(storage.delete("../config.toml").await.is_err());
        assert!(storage.delete("").await.is_err());
    }

    #[test]
    fn url_for_prefixes_avatars() {
        assert_eq!(AvatarStorage::url_for("a b.png"), "/avatars/a%20b.png");
    }
}
