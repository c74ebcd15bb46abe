//! Port abstraction for binary blob storage.

use async_trait::async_trait;

use crate::domain::{Error, MediaKey, MediaObject};

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum MediaStoreError {
        /// Reading or writing the blob failed.
        Io { message: String } => "media store i/o failed: {message}",
    }
}

impl From<MediaStoreError> for Error {
    fn from(error: MediaStoreError) -> Self {
        Error::internal(error.to_string())
    }
}

/// Keyed blob store for memes, audio, and cached share images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Fetch a blob, or `None` when the key is unknown.
    async fn get(&self, key: &MediaKey) -> Result<Option<MediaObject>, MediaStoreError>;

    /// Store a blob, replacing any existing one under the key.
    async fn put(&self, key: &MediaKey, object: MediaObject) -> Result<(), MediaStoreError>;
}
