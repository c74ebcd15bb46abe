//! Driving port for casting and toggling votes.

use async_trait::async_trait;

use crate::domain::{
    CommentId, Error, PetitionDetailsDraft, ProposalId, UserId, VoteOutcome, VoteType,
};

/// Proposal vote as received from clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVoteRequest {
    pub proposal_id: ProposalId,
    pub user_id: UserId,
    pub vote_type: VoteType,
    pub is_petition: bool,
    pub petition: Option<PetitionDetailsDraft>,
}

/// Comment vote as received from clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastCommentVoteRequest {
    pub comment_id: CommentId,
    pub user_id: UserId,
    pub vote_type: VoteType,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VotingCommand: Send + Sync {
    /// Toggle a proposal vote, capturing petition details on upvotes.
    async fn cast_proposal_vote(&self, request: CastVoteRequest) -> Result<VoteOutcome, Error>;

    /// Toggle a comment vote.
    async fn cast_comment_vote(
        &self,
        request: CastCommentVoteRequest,
    ) -> Result<VoteOutcome, Error>;
}
