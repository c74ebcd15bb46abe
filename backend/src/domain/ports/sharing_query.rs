//! Driving ports for share previews and static site documents.

use async_trait::async_trait;

use crate::domain::{Error, ProposalId};

use super::StaticDocument;

/// Rendered share card and its validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareImage {
    pub svg: String,
    /// Hex SHA-256 of `svg`.
    pub etag: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharingQuery: Send + Sync {
    /// Render the share card and schedule caching it in the blob store.
    async fn share_image(&self, id: ProposalId) -> Result<ShareImage, Error>;

    /// Fetch `index.html` with share meta tags for the proposal.
    ///
    /// `base_url` is the absolute origin used for page and image URLs.
    /// Unknown proposals get the base document unchanged.
    async fn share_page(&self, id: ProposalId, base_url: String) -> Result<String, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaticSiteQuery: Send + Sync {
    /// Fetch a static file by relative path; unknown paths fail with
    /// `not_found`.
    async fn asset(&self, path: String) -> Result<StaticDocument, Error>;
}
