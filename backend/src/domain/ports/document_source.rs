//! Port abstraction for fetching static site documents.

use async_trait::async_trait;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by static document sources.
    pub enum DocumentSourceError {
        /// The requested path is not a valid document path.
        InvalidPath { path: String } => "invalid document path: {path}",
        /// The upstream could not be reached or returned a failure.
        Fetch { message: String } => "static document fetch failed: {message}",
    }
}

impl From<DocumentSourceError> for Error {
    fn from(error: DocumentSourceError) -> Self {
        match error {
            DocumentSourceError::InvalidPath { .. } => Error::not_found("Not found."),
            DocumentSourceError::Fetch { .. } => Error::internal(error.to_string()),
        }
    }
}

/// A static file with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDocument {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Source of the static front-end files (`index.html`, `/assets/*`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the document at a relative path such as `index.html`.
    ///
    /// Returns `None` when the document does not exist.
    async fn fetch(&self, path: &str) -> Result<Option<StaticDocument>, DocumentSourceError>;
}
