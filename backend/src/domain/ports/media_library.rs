//! Driving port for the `/media` blob proxy.

use async_trait::async_trait;

use crate::domain::{Error, MediaKey, MediaObject};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Fetch a blob; unknown keys fail with `not_found`.
    async fn fetch(&self, key: MediaKey) -> Result<MediaObject, Error>;

    /// Store a blob. The content type always follows the key's extension.
    async fn store(&self, key: MediaKey, bytes: Vec<u8>) -> Result<String, Error>;
}
