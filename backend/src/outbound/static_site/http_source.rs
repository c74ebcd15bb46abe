//! Reqwest-backed static document source.
//!
//! Fetches documents from an HTTP origin, such as a CDN or the front-end dev
//! server. Owns transport details only: URL joining, timeout, and status
//! mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::domain::ports::{DocumentSource, DocumentSourceError, StaticDocument};

use super::{document_content_type, validate_document_path};

/// Document source that performs GET requests against one origin.
#[derive(Debug, Clone)]
pub struct HttpDocumentSource {
    client: Client,
    origin: Url,
}

impl HttpDocumentSource {
    /// Build a source with a client-level request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(origin: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, origin })
    }

    fn document_url(&self, path: &str) -> Result<Url, DocumentSourceError> {
        let mut url = self.origin.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| {
                DocumentSourceError::fetch(format!("origin {} cannot carry a path", self.origin))
            })?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }
}

fn map_status_error(status: StatusCode, url: &Url) -> DocumentSourceError {
    DocumentSourceError::fetch(format!("GET {url} returned status {}", status.as_u16()))
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, path: &str) -> Result<Option<StaticDocument>, DocumentSourceError> {
        let path = validate_document_path(path)?;
        let url = self.document_url(path)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| DocumentSourceError::fetch(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%url, "static document not found upstream");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, &url));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or_else(|| document_content_type(path).to_owned(), str::to_owned);
        let bytes = response
            .bytes()
            .await
            .map_err(|err| DocumentSourceError::fetch(err.to_string()))?;
        Ok(Some(StaticDocument {
            content_type,
            bytes: bytes.to_vec(),
        }))
    }
}
