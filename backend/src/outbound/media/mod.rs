//! Blob store adapters for memes, share images, and proxied media.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{MediaStore, MediaStoreError};
use crate::domain::{MediaKey, MediaObject};

/// Stores blobs as files below a root directory.
///
/// Keys are validated relative paths, so joining them onto the root cannot
/// escape it. The content type is inferred from the key on read.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &MediaKey) -> PathBuf {
        key.as_str()
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn get(&self, key: &MediaKey) -> Result<Option<MediaObject>, MediaStoreError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(MediaObject {
                content_type: key.content_type().to_owned(),
                bytes,
            })),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(MediaStoreError::io(format!(
                "read {}: {err}",
                path.display()
            ))),
        }
    }

    async fn put(&self, key: &MediaKey, object: MediaObject) -> Result<(), MediaStoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                MediaStoreError::io(format!("create {}: {err}", parent.display()))
            })?;
        }
        tokio::fs::write(&path, &object.bytes)
            .await
            .map_err(|err| MediaStoreError::io(format!("write {}: {err}", path.display())))?;
        debug!(%key, size = object.bytes.len(), "media written to disk");
        Ok(())
    }
}

/// Process-local blob store used when no media directory is configured.
///
/// Like [`FsMediaStore`], the content type is inferred from the key on read.
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    objects: Mutex<HashMap<MediaKey, Vec<u8>>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn get(&self, key: &MediaKey) -> Result<Option<MediaObject>, MediaStoreError> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| MediaStoreError::io("media store lock poisoned"))?;
        Ok(objects.get(key).map(|bytes| MediaObject {
            content_type: key.content_type().to_owned(),
            bytes: bytes.clone(),
        }))
    }

    async fn put(&self, key: &MediaKey, object: MediaObject) -> Result<(), MediaStoreError> {
        self.objects
            .lock()
            .map_err(|_| MediaStoreError::io("media store lock poisoned"))?
            .insert(key.clone(), object.bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key(raw: &str) -> MediaKey {
        MediaKey::new(raw).expect("valid key")
    }

    fn object(content_type: &str, bytes: &[u8]) -> MediaObject {
        MediaObject {
            content_type: content_type.to_owned(),
            bytes: bytes.to_vec(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fs_store_round_trips_nested_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsMediaStore::new(dir.path());

        store
            .put(&key("memes/p1-abc.png"), object("image/png", b"png-bytes"))
            .await
            .expect("put");

        let stored = store
            .get(&key("memes/p1-abc.png"))
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.bytes, b"png-bytes");
        assert_eq!(stored.content_type, "image/png");
        assert!(dir.path().join("memes").join("p1-abc.png").is_file());
    }

    #[rstest]
    #[tokio::test]
    async fn fs_store_reports_missing_keys_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsMediaStore::new(dir.path());
        assert_eq!(store.get(&key("nothing/here.mp3")).await.expect("get"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn fs_store_overwrites_existing_blobs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsMediaStore::new(dir.path());
        let k = key("share-images/p1.svg");
        store.put(&k, object("image/svg+xml", b"<svg/>")).await.expect("first");
        store
            .put(&k, object("image/svg+xml", b"<svg></svg>"))
            .await
            .expect("second");
        let stored = store.get(&k).await.expect("get").expect("present");
        assert_eq!(stored.bytes, b"<svg></svg>");
    }

    #[rstest]
    #[tokio::test]
    async fn memory_store_infers_content_type_from_key() {
        let store = InMemoryMediaStore::new();
        let k = key("memes/evil.png");
        store.put(&k, object("text/html", b"<script>")).await.expect("put");
        let stored = store.get(&k).await.expect("get").expect("present");
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(stored.bytes, b"<script>");
    }
}
