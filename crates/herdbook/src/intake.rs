//! Local image storage for uploaded photographs.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use database::User;
use object_store::ObjectStore;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectStorePath;
use tracing::debug;
use uuid::Uuid;

/// Name used when an upload arrives without a usable file name.
const FALLBACK_IMAGE_NAME: &str = "captured.jpg";

/// Stores uploaded images under a base directory, one subdirectory per
/// account plus one shared `anonymous` directory.
pub struct ImageStore {
    store: Arc<dyn ObjectStore>,
}

impl ImageStore {
    /// Opens (creating if needed) the image directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or opened.
    pub fn open(base: &Path) -> Result<Self> {
        std::fs::create_dir_all(base)
            .with_context(|| format!("Failed to create image directory {}", base.display()))?;
        let store = LocalFileSystem::new_with_prefix(base)
            .with_context(|| format!("Failed to open image directory {}", base.display()))?;

        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Writes one image and returns its storage key.
    ///
    /// Every upload gets a fresh UUID in its key, so repeated uploads of
    /// the same file name never overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the object store rejects the write.
    pub async fn store_image(
        &self,
        user: Option<&User>,
        source_name: Option<&str>,
        data: Bytes,
    ) -> Result<String, object_store::Error> {
        let scope = match user {
            Some(user) => format!("user-{}", user.id),
            None => "anonymous".to_string(),
        };
        let name = sanitized_name(source_name);
        let key = format!("{scope}/{}-{name}", Uuid::new_v4());

        let object_path = ObjectStorePath::from(key.as_str());
        self.store.put(&object_path, data.into()).await?;
        debug!(key = %key, "stored uploaded image");

        Ok(key)
    }
}

/// Reduces an upload name to its final path component, falling back to
/// `captured.jpg` when nothing usable remains.
fn sanitized_name(source_name: Option<&str>) -> &str {
    source_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or(FALLBACK_IMAGE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(id: i64) -> User {
        User {
            id,
            email: format!("user{id}@example.com"),
            password_hash: "x".to_string(),
            name: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_sanitized_name_strips_directories() {
        assert_eq!(sanitized_name(Some("cow.jpg")), "cow.jpg");
        assert_eq!(sanitized_name(Some("photos/cow.jpg")), "cow.jpg");
        assert_eq!(sanitized_name(Some("  ")), FALLBACK_IMAGE_NAME);
        assert_eq!(sanitized_name(None), FALLBACK_IMAGE_NAME);
    }

    #[tokio::test]
    async fn test_same_file_name_never_collides() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageStore::open(dir.path()).unwrap();

        let first = images
            .store_image(Some(&test_user(1)), Some("cow.jpg"), Bytes::from_static(b"a"))
            .await
            .unwrap();
        let second = images
            .store_image(Some(&test_user(1)), Some("cow.jpg"), Bytes::from_static(b"b"))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert!(dir.path().join(&first).is_file());
        assert!(dir.path().join(&second).is_file());
    }

    #[tokio::test]
    async fn test_images_are_scoped_per_account() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageStore::open(dir.path()).unwrap();

        let owned = images
            .store_image(Some(&test_user(7)), Some("cow.jpg"), Bytes::from_static(b"a"))
            .await
            .unwrap();
        let anonymous = images
            .store_image(None, None, Bytes::from_static(b"b"))
            .await
            .unwrap();

        assert!(owned.starts_with("user-7/"));
        assert!(anonymous.starts_with("anonymous/"));
        assert!(anonymous.ends_with("-captured.jpg"));
    }
}
