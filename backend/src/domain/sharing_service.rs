//! Share previews: the SVG card, the meta-tagged share page, and static
//! documents.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use url::Url;

use crate::domain::media::key_segment;
use crate::domain::meta_tags::{ShareMeta, inject_share_meta};
use crate::domain::ports::{
    DocumentSource, MediaStore, ProposalAsset, ProposalRepository, ShareImage, SharingQuery,
    StaticDocument, StaticSiteQuery,
};
use crate::domain::proposals_service::proposal_not_found;
use crate::domain::share_image::{ShareCard, format_net, render_share_image};
use crate::domain::{Error, MediaKey, MediaObject, ProposalId, ProposalSummary, TraceId};

/// Document the share page is built from.
pub const INDEX_DOCUMENT: &str = "index.html";

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

fn document_not_found() -> Error {
    Error::not_found("Not found.")
}

/// Service implementing [`SharingQuery`].
#[derive(Clone)]
pub struct SharingService<P: ?Sized, M: ?Sized, D: ?Sized> {
    proposals: Arc<P>,
    media: Arc<M>,
    documents: Arc<D>,
}

impl<P: ?Sized, M: ?Sized, D: ?Sized> SharingService<P, M, D> {
    pub fn new(proposals: Arc<P>, media: Arc<M>, documents: Arc<D>) -> Self {
        Self {
            proposals,
            media,
            documents,
        }
    }
}

fn share_card(summary: &ProposalSummary) -> ShareCard {
    ShareCard {
        proposal_id: summary.proposal.id.clone(),
        text: summary.proposal.text.clone(),
        author_name: summary.author_name.to_string(),
        created_at: summary.proposal.created_at,
        tally: summary.tally,
    }
}

fn share_description(summary: &ProposalSummary) -> String {
    format!(
        "Proposed by {}. {} upvotes, {} downvotes ({} net). Add your voice.",
        summary.author_name,
        summary.tally.upvotes,
        summary.tally.downvotes,
        format_net(summary.tally.net()),
    )
}

/// Append path segments to `base`, percent-encoding each one.
fn absolute_url(base: &Url, segments: &[&str]) -> Result<String, Error> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| Error::internal(format!("base URL {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.to_string())
}

/// Store the rendered card and record its URL, logging any failure.
async fn cache_share_image<P, M>(proposals: Arc<P>, media: Arc<M>, id: ProposalId, svg: String)
where
    P: ProposalRepository + ?Sized,
    M: MediaStore + ?Sized,
{
    let key = match MediaKey::new(format!("share-images/{}.svg", key_segment(id.as_str()))) {
        Ok(key) => key,
        Err(err) => {
            warn!(proposal_id = %id, error = %err, "share image key rejected");
            return;
        }
    };
    let object = MediaObject {
        content_type: SVG_CONTENT_TYPE.to_owned(),
        bytes: svg.into_bytes(),
    };
    if let Err(err) = media.put(&key, object).await {
        warn!(proposal_id = %id, error = %err, "share image cache write failed");
        return;
    }
    match proposals
        .set_asset_url(&id, ProposalAsset::ShareImage, &key.url())
        .await
    {
        Ok(true) => debug!(proposal_id = %id, %key, "share image cached"),
        Ok(false) => warn!(proposal_id = %id, "proposal vanished before share image was recorded"),
        Err(err) => warn!(proposal_id = %id, error = %err, "share image url update failed"),
    }
}

#[async_trait]
impl<P: ?Sized, M: ?Sized, D: ?Sized> SharingQuery for SharingService<P, M, D>
where
    P: ProposalRepository + 'static,
    M: MediaStore + 'static,
    D: DocumentSource,
{
    async fn share_image(&self, id: ProposalId) -> Result<ShareImage, Error> {
        let summary = self
            .proposals
            .find_summary(&id)
            .await?
            .ok_or_else(proposal_not_found)?;
        let svg = render_share_image(&share_card(&summary));
        let etag = hex::encode(Sha256::digest(svg.as_bytes()));

        let task = cache_share_image(
            Arc::clone(&self.proposals),
            Arc::clone(&self.media),
            id,
            svg.clone(),
        );
        match TraceId::current() {
            Some(trace_id) => drop(tokio::spawn(TraceId::scope(trace_id, task))),
            None => drop(tokio::spawn(task)),
        }

        Ok(ShareImage { svg, etag })
    }

    async fn share_page(&self, id: ProposalId, base_url: String) -> Result<String, Error> {
        let document = self
            .documents
            .fetch(INDEX_DOCUMENT)
            .await?
            .ok_or_else(document_not_found)?;
        let html = String::from_utf8_lossy(&document.bytes).into_owned();

        let Some(summary) = self.proposals.find_summary(&id).await? else {
            return Ok(html);
        };
        let base = Url::parse(&base_url)
            .map_err(|err| Error::internal(format!("invalid public base URL {base_url}: {err}")))?;
        let meta = ShareMeta {
            page_url: absolute_url(&base, &["proposals", id.as_str()])?,
            image_url: absolute_url(&base, &["api", "proposals", id.as_str(), "share-image"])?,
            title: summary.proposal.text.clone(),
            description: share_description(&summary),
        };
        Ok(inject_share_meta(&html, &meta))
    }
}

/// Service implementing [`StaticSiteQuery`].
#[derive(Clone)]
pub struct StaticSiteService<D: ?Sized> {
    documents: Arc<D>,
}

impl<D: ?Sized> StaticSiteService<D> {
    pub fn new(documents: Arc<D>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl<D: ?Sized> StaticSiteQuery for StaticSiteService<D>
where
    D: DocumentSource,
{
    async fn asset(&self, path: String) -> Result<StaticDocument, Error> {
        let path = path.trim_start_matches('/');
        let path = if path.is_empty() { INDEX_DOCUMENT } else { path };
        self.documents
            .fetch(path)
            .await?
            .ok_or_else(document_not_found)
    }
}
