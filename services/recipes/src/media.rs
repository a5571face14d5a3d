//! Storage for uploaded recipe images

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::{forms::UploadedImage, validation::image_extension};

const IMAGE_DIR: &str = "recipe_images";

/// Writes uploaded images under a media root
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a new image store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Media root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an image and return its path relative to the media root
    ///
    /// Files get a fresh random name so uploads never overwrite each other.
    pub async fn save(&self, image: &UploadedImage) -> Result<String> {
        let dir = self.root.join(IMAGE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create image directory {}", dir.display()))?;

        let file_name = match image_extension(&image.file_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let path = dir.join(&file_name);

        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("Failed to write image {}", path.display()))?;

        info!("Stored recipe image {} ({} bytes)", file_name, image.bytes.len());
        Ok(format!("{}/{}", IMAGE_DIR, file_name))
    }

    /// Delete an image previously returned by [`ImageStore::save`]
    pub async fn remove(&self, path: &str) -> Result<()> {
        let path = self.root.join(path);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to remove image {}", path.display()))?;

        info!("Removed recipe image {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    #[tokio::test]
    async fn test_save_writes_under_media_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = ImageStore::new(dir.path());
        let image = UploadedImage {
            file_name: "Pancakes.JPG".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: Bytes::from_static(b"jpeg bytes"),
        };

        let first = store.save(&image).await?;
        let second = store.save(&image).await?;

        assert!(first.starts_with("recipe_images/"));
        assert!(first.ends_with(".jpg"));
        assert_ne!(first, second);
        assert_eq!(std::fs::read(store.root().join(&first))?, b"jpeg bytes");
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_deletes_saved_image() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = ImageStore::new(dir.path());
        let image = UploadedImage {
            file_name: "toast.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"png bytes"),
        };

        let path = store.save(&image).await?;
        store.remove(&path).await?;

        assert!(!store.root().join(&path).exists());
        assert!(store.remove(&path).await.is_err());
        Ok(())
    }
}
