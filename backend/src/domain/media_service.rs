//! Blob proxy service behind the `/media` routes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{MediaLibrary, MediaStore};
use crate::domain::{Error, MAX_MEDIA_BYTES, MediaKey, MediaObject};

/// Service implementing [`MediaLibrary`].
#[derive(Clone)]
pub struct MediaService<M: ?Sized> {
    store: Arc<M>,
}

impl<M: ?Sized> MediaService<M> {
    pub fn new(store: Arc<M>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<M: ?Sized> MediaLibrary for MediaService<M>
where
    M: MediaStore,
{
    async fn fetch(&self, key: MediaKey) -> Result<MediaObject, Error> {
        self.store
            .get(&key)
            .await?
            .ok_or_else(|| Error::not_found("Media not found."))
    }

    async fn store(&self, key: MediaKey, bytes: Vec<u8>) -> Result<String, Error> {
        if bytes.len() > MAX_MEDIA_BYTES {
            return Err(Error::invalid_request("File too large."));
        }
        let content_type = key.content_type().to_owned();
        debug!(%key, %content_type, size = bytes.len(), "storing media");
        self.store
            .put(
                &key,
                MediaObject {
                    content_type,
                    bytes,
                },
            )
            .await?;
        Ok(key.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MediaStoreError, MockMediaStore};
    use rstest::rstest;

    fn key(raw: &str) -> MediaKey {
        MediaKey::new(raw).expect("valid key")
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_unknown_key_is_not_found() {
        let mut store = MockMediaStore::new();
        store.expect_get().return_once(|_| Ok(None));

        let error = MediaService::new(Arc::new(store))
            .fetch(key("memes/x.png"))
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case("clips/a.mp3", "audio/mpeg")]
    #[case("memes/x.png", "image/png")]
    #[case("notes/readme", "application/octet-stream")]
    #[tokio::test]
    async fn store_infers_content_type_from_key(
        #[case] raw: &'static str,
        #[case] expected: &'static str,
    ) {
        let mut store = MockMediaStore::new();
        store
            .expect_put()
            .withf(move |_, object| object.content_type == expected)
            .return_once(|_, _| Ok(()));

        let url = MediaService::new(Arc::new(store))
            .store(key(raw), vec![1, 2, 3])
            .await
            .expect("stored");
        assert_eq!(url, format!("/media/{raw}"));
    }

    #[rstest]
    #[tokio::test]
    async fn store_rejects_oversized_bodies() {
        let mut store = MockMediaStore::new();
        store.expect_put().never();

        let error = MediaService::new(Arc::new(store))
            .store(key("a.bin"), vec![0; MAX_MEDIA_BYTES + 1])
            .await
            .expect_err("too large");
        assert_eq!(error.message(), "File too large.");
    }

    #[rstest]
    #[tokio::test]
    async fn store_failures_are_internal() {
        let mut store = MockMediaStore::new();
        store
            .expect_put()
            .return_once(|_, _| Err(MediaStoreError::io("disk full")));

        let error = MediaService::new(Arc::new(store))
            .store(key("a.bin"), vec![1])
            .await
            .expect_err("io failure");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
