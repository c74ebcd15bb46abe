//! Filesystem-backed static document source.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::ports::{DocumentSource, DocumentSourceError, StaticDocument};

use super::{document_content_type, validate_document_path};

/// Serves documents from a local directory such as `./public`.
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn fetch(&self, path: &str) -> Result<Option<StaticDocument>, DocumentSourceError> {
        let path = validate_document_path(path)?;
        let full = path
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment));
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(Some(StaticDocument {
                content_type: document_content_type(path).to_owned(),
                bytes,
            })),
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                Ok(None)
            }
            Err(err) => Err(DocumentSourceError::fetch(format!(
                "read {}: {err}",
                full.display()
            ))),
        }
    }
}
