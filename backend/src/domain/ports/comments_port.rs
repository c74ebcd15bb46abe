//! Driving ports for comment reads and writes.

use async_trait::async_trait;

use crate::domain::{
    CommentId, CommentText, CommentView, DisplayName, Error, ProposalId, UserId, VoteTally,
    VoteType,
};

/// New comment from a (possibly unseen) user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentRequest {
    pub proposal_id: ProposalId,
    pub user_id: UserId,
    pub user_name: DisplayName,
    pub text: CommentText,
}

/// A user's current comment vote plus the comment tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentVoteStatus {
    pub vote_type: Option<VoteType>,
    pub tally: VoteTally,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// Comments on a proposal, oldest first.
    async fn list(
        &self,
        proposal_id: ProposalId,
        viewer: Option<UserId>,
    ) -> Result<Vec<CommentView>, Error>;

    /// Current vote state for a comment.
    async fn vote_status(
        &self,
        comment_id: CommentId,
        viewer: Option<UserId>,
    ) -> Result<CommentVoteStatus, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Create a comment, creating its author on first sight.
    async fn create(&self, request: CreateCommentRequest) -> Result<CommentView, Error>;
}
