//! PostgreSQL-backed `CommentRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Nullable, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, StoreError};
use crate::domain::{Comment, CommentId, CommentView, ProposalId, UserId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, CommentViewRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::comments;

const LIST_FOR_PROPOSAL_SQL: &str = r#"
SELECT c.id, c.proposal_id, c.user_id, c.text, c.created_at,
       u.display_name AS author_name,
       COUNT(cv.user_id) FILTER (WHERE cv.vote_type = 'upvote') AS upvotes,
       COUNT(cv.user_id) FILTER (WHERE cv.vote_type = 'downvote') AS downvotes,
       MAX(cv.vote_type) FILTER (WHERE cv.user_id = $2) AS viewer_vote
FROM comments c
JOIN users u ON u.id = c.user_id
LEFT JOIN comment_votes cv ON cv.comment_id = c.id
WHERE c.proposal_id = $1
GROUP BY c.id, u.display_name
ORDER BY c.created_at ASC, c.id ASC
"#;

/// Diesel-backed implementation of the [`CommentRepository`] port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            id: comment.id.as_str(),
            proposal_id: comment.proposal_id.as_str(),
            user_id: comment.user_id.as_str(),
            text: &comment.text,
            created_at: comment.created_at,
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, id: &CommentId) -> Result<Option<Comment>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommentRow> = comments::table
            .filter(comments::id.eq(id.as_str()))
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Comment::try_from).transpose()
    }

    async fn list_for_proposal(
        &self,
        proposal_id: &ProposalId,
        viewer: Option<UserId>,
    ) -> Result<Vec<CommentView>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentViewRow> = sql_query(LIST_FOR_PROPOSAL_SQL)
            .bind::<Text, _>(proposal_id.as_str())
            .bind::<Nullable<Text>, _>(viewer.as_ref().map(UserId::as_str))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(CommentView::try_from).collect()
    }
}
