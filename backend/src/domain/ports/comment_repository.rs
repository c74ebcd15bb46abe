//! Port abstraction for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CommentView, ProposalId, UserId};

use super::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a new comment.
    async fn insert(&self, comment: &Comment) -> Result<(), StoreError>;

    /// Fetch a comment row.
    async fn find(&self, id: &CommentId) -> Result<Option<Comment>, StoreError>;

    /// List a proposal's comments oldest first, annotated with tallies and
    /// the viewer's vote when a viewer is given.
    async fn list_for_proposal(
        &self,
        proposal_id: &ProposalId,
        viewer: Option<UserId>,
    ) -> Result<Vec<CommentView>, StoreError>;
}
