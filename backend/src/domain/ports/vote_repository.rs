//! Port abstraction for the vote toggle engine's storage.
//!
//! Both toggles must be atomic: the adapter removes a same-type row, or
//! inserts/flips the row keyed on `(subject, user)`, as one unit. Proposal
//! toggles also apply the petition upsert inside that unit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CommentId, PetitionDetails, ProposalId, UserId, VoteAction, VoteTally, VoteType,
};

use super::StoreError;

/// Proposal vote toggle request as applied by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalVoteToggle {
    pub proposal_id: ProposalId,
    pub user_id: UserId,
    pub vote_type: VoteType,
    /// Petition flag stored on the vote row; only ever set for upvotes.
    pub is_petition: bool,
    /// Details upserted alongside the vote unless the toggle removes it.
    pub petition: Option<PetitionDetails>,
    pub at: DateTime<Utc>,
}

/// Comment vote toggle request as applied by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentVoteToggle {
    pub comment_id: CommentId,
    pub user_id: UserId,
    pub vote_type: VoteType,
    pub at: DateTime<Utc>,
}

/// Stored proposal vote for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredVote {
    pub vote_type: VoteType,
    pub is_petition: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Atomically toggle a proposal vote.
    async fn toggle_proposal_vote(
        &self,
        toggle: &ProposalVoteToggle,
    ) -> Result<VoteAction, StoreError>;

    /// Atomically toggle a comment vote.
    async fn toggle_comment_vote(&self, toggle: &CommentVoteToggle)
    -> Result<VoteAction, StoreError>;

    /// Current tally for a proposal.
    async fn proposal_tally(&self, id: &ProposalId) -> Result<VoteTally, StoreError>;

    /// Current tally for a comment.
    async fn comment_tally(&self, id: &CommentId) -> Result<VoteTally, StoreError>;

    /// The user's vote on a proposal, if any.
    async fn find_proposal_vote(
        &self,
        id: &ProposalId,
        user_id: &UserId,
    ) -> Result<Option<StoredVote>, StoreError>;

    /// The user's vote on a comment, if any.
    async fn find_comment_vote(
        &self,
        id: &CommentId,
        user_id: &UserId,
    ) -> Result<Option<VoteType>, StoreError>;
}
