//! Proposal services implementing the proposal driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageInfo;
use tracing::info;
use uuid::Uuid;

use crate::domain::media::key_segment;
use crate::domain::ports::{
    CreateProposalRequest, ListProposalsRequest, MediaStore, MemeUpload, MemeUploadResponse,
    PetitionRepository, ProposalAsset, ProposalListing, ProposalRepository, ProposalsCommand,
    ProposalsQuery, UserRepository, VoteRepository,
};
use crate::domain::user_accounts_service::ensure_account;
use crate::domain::{
    Error, MAX_MEME_BYTES, MediaKey, MediaObject, MemeImageType, PetitionStats, Proposal,
    ProposalId, ProposalSummary, ProposalView, UserId, VoteTally,
};

pub(crate) fn proposal_not_found() -> Error {
    Error::not_found("Proposal not found.")
}

/// Read-side proposal service.
#[derive(Clone)]
pub struct ProposalsQueryService<P: ?Sized, V: ?Sized, T: ?Sized> {
    proposals: Arc<P>,
    votes: Arc<V>,
    petitions: Arc<T>,
}

impl<P: ?Sized, V: ?Sized, T: ?Sized> ProposalsQueryService<P, V, T> {
    pub fn new(proposals: Arc<P>, votes: Arc<V>, petitions: Arc<T>) -> Self {
        Self {
            proposals,
            votes,
            petitions,
        }
    }
}

#[async_trait]
impl<P: ?Sized, V: ?Sized, T: ?Sized> ProposalsQuery for ProposalsQueryService<P, V, T>
where
    P: ProposalRepository,
    V: VoteRepository,
    T: PetitionRepository,
{
    async fn list(&self, request: ListProposalsRequest) -> Result<ProposalListing, Error> {
        let page = self.proposals.list(request.sort, request.page).await?;
        Ok(ProposalListing {
            items: page.items,
            page: PageInfo::new(request.page, page.total),
        })
    }

    async fn get(&self, id: ProposalId, viewer: Option<UserId>) -> Result<ProposalView, Error> {
        let summary = self
            .proposals
            .find_summary(&id)
            .await?
            .ok_or_else(proposal_not_found)?;
        let stored = match viewer {
            Some(viewer) => self.votes.find_proposal_vote(&id, &viewer).await?,
            None => None,
        };
        Ok(ProposalView {
            summary,
            viewer_vote: stored.map(|vote| vote.vote_type),
            viewer_is_petition: stored.is_some_and(|vote| vote.is_petition),
        })
    }

    async fn petition_stats(&self, id: ProposalId) -> Result<PetitionStats, Error> {
        if self.proposals.find(&id).await?.is_none() {
            return Err(proposal_not_found());
        }
        Ok(self.petitions.stats(&id).await?)
    }
}

/// Write-side proposal service.
#[derive(Clone)]
pub struct ProposalsCommandService<P: ?Sized, U: ?Sized, M: ?Sized> {
    proposals: Arc<P>,
    users: Arc<U>,
    media: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<P: ?Sized, U: ?Sized, M: ?Sized> ProposalsCommandService<P, U, M> {
    pub fn new(proposals: Arc<P>, users: Arc<U>, media: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            proposals,
            users,
            media,
            clock,
        }
    }
}

/// Check a meme upload against the allow-list and size cap.
fn validate_meme(upload: &MemeUpload) -> Result<MemeImageType, Error> {
    if upload.bytes.is_empty() {
        return Err(Error::invalid_request("No file uploaded."));
    }
    let kind = MemeImageType::from_mime(&upload.content_type)
        .ok_or_else(|| Error::invalid_request("Invalid file type."))?;
    if upload.bytes.len() > MAX_MEME_BYTES {
        return Err(Error::invalid_request("File too large."));
    }
    Ok(kind)
}

#[async_trait]
impl<P: ?Sized, U: ?Sized, M: ?Sized> ProposalsCommand for ProposalsCommandService<P, U, M>
where
    P: ProposalRepository,
    U: UserRepository,
    M: MediaStore,
{
    async fn create(&self, request: CreateProposalRequest) -> Result<ProposalSummary, Error> {
        let now = self.clock.utc();
        let (author, _) = ensure_account(
            self.users.as_ref(),
            &request.author_id,
            &request.author_name,
            now,
        )
        .await?;
        let proposal = Proposal {
            id: ProposalId::random(),
            author_id: request.author_id,
            text: request.text.into_inner(),
            created_at: now,
            trending: false,
            meme_url: None,
            share_image_url: None,
        };
        self.proposals.insert(&proposal).await?;
        info!(proposal_id = %proposal.id, author_id = %proposal.author_id, "proposal created");
        Ok(ProposalSummary {
            proposal,
            author_name: author.user.display_name,
            tally: VoteTally::default(),
            comment_count: 0,
            petition_count: 0,
        })
    }

    async fn set_trending(&self, id: ProposalId, trending: bool) -> Result<Proposal, Error> {
        if !self.proposals.set_trending(&id, trending).await? {
            return Err(proposal_not_found());
        }
        self.proposals
            .find(&id)
            .await?
            .ok_or_else(proposal_not_found)
    }

    async fn attach_meme(&self, upload: MemeUpload) -> Result<MemeUploadResponse, Error> {
        if self.proposals.find(&upload.proposal_id).await?.is_none() {
            return Err(proposal_not_found());
        }
        let kind = validate_meme(&upload)?;
        let key = MediaKey::new(format!(
            "memes/{}-{}.{}",
            key_segment(upload.proposal_id.as_str()),
            Uuid::new_v4(),
            kind.extension()
        ))
        .map_err(|err| Error::internal(format!("generated meme key rejected: {err}")))?;
        let size = upload.bytes.len();
        self.media
            .put(
                &key,
                MediaObject {
                    content_type: kind.mime().to_owned(),
                    bytes: upload.bytes,
                },
            )
            .await?;
        let url = key.url();
        if !self
            .proposals
            .set_asset_url(&upload.proposal_id, ProposalAsset::Meme, &url)
            .await?
        {
            return Err(proposal_not_found());
        }
        info!(proposal_id = %upload.proposal_id, %key, size, "meme stored");
        Ok(MemeUploadResponse {
            proposal_id: upload.proposal_id,
            meme_url: url,
        })
    }
}
