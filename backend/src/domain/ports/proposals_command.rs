//! Driving port for proposal writes.

use async_trait::async_trait;

use crate::domain::{DisplayName, Error, Proposal, ProposalId, ProposalSummary, ProposalText, UserId};

/// New proposal from a (possibly unseen) author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProposalRequest {
    pub author_id: UserId,
    pub author_name: DisplayName,
    pub text: ProposalText,
}

/// Meme image received from a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeUpload {
    pub proposal_id: ProposalId,
    /// Declared MIME type of the uploaded part.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Stored meme location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeUploadResponse {
    pub proposal_id: ProposalId,
    pub meme_url: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProposalsCommand: Send + Sync {
    /// Create a proposal, creating its author on first sight.
    async fn create(&self, request: CreateProposalRequest) -> Result<ProposalSummary, Error>;

    /// Set or clear the trending flag.
    async fn set_trending(&self, id: ProposalId, trending: bool) -> Result<Proposal, Error>;

    /// Validate and store a meme image, recording its URL on the proposal.
    async fn attach_meme(&self, upload: MemeUpload) -> Result<MemeUploadResponse, Error>;
}
