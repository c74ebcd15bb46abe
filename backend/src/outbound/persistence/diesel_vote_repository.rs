//! PostgreSQL-backed `VoteRepository` implementation.
//!
//! Each toggle runs in one transaction: a same-type row is deleted, otherwise
//! the row is upserted and `xmax` tells a fresh insert apart from a flip.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Bool, Text, Timestamptz};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    CommentVoteToggle, ProposalVoteToggle, StoreError, StoredVote, VoteRepository,
};
use crate::domain::{CommentId, ProposalId, UserId, VoteAction, VoteTally, VoteType};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{CommentVoteRow, TallyRow, UpsertOutcomeRow, VoteRow, parse_vote_type};
use super::pool::DbPool;
use super::schema::{comment_votes, votes};

const UPSERT_PROPOSAL_VOTE_SQL: &str = r#"
INSERT INTO votes (proposal_id, user_id, vote_type, is_petition, voted_at)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (proposal_id, user_id)
DO UPDATE SET
    vote_type = EXCLUDED.vote_type,
    is_petition = EXCLUDED.is_petition,
    voted_at = EXCLUDED.voted_at
RETURNING (xmax = 0) AS inserted
"#;

const UPSERT_COMMENT_VOTE_SQL: &str = r#"
INSERT INTO comment_votes (comment_id, user_id, vote_type, voted_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (comment_id, user_id)
DO UPDATE SET
    vote_type = EXCLUDED.vote_type,
    voted_at = EXCLUDED.voted_at
RETURNING (xmax = 0) AS inserted
"#;

const UPSERT_PETITION_SQL: &str = r#"
INSERT INTO petition_details
    (proposal_id, user_id, full_name, address, postcode, date_of_birth, email, verified, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)
ON CONFLICT (proposal_id, user_id)
DO UPDATE SET
    full_name = EXCLUDED.full_name,
    address = EXCLUDED.address,
    postcode = EXCLUDED.postcode,
    date_of_birth = EXCLUDED.date_of_birth,
    email = EXCLUDED.email,
    verified = TRUE,
    updated_at = EXCLUDED.updated_at
"#;

const PROPOSAL_TALLY_SQL: &str = r#"
SELECT COUNT(*) FILTER (WHERE vote_type = 'upvote') AS upvotes,
       COUNT(*) FILTER (WHERE vote_type = 'downvote') AS downvotes
FROM votes
WHERE proposal_id = $1
"#;

const COMMENT_TALLY_SQL: &str = r#"
SELECT COUNT(*) FILTER (WHERE vote_type = 'upvote') AS upvotes,
       COUNT(*) FILTER (WHERE vote_type = 'downvote') AS downvotes
FROM comment_votes
WHERE comment_id = $1
"#;

fn upsert_action(row: &UpsertOutcomeRow) -> VoteAction {
    if row.inserted {
        VoteAction::Created
    } else {
        VoteAction::Updated
    }
}

/// Diesel-backed implementation of the [`VoteRepository`] port.
#[derive(Clone)]
pub struct DieselVoteRepository {
    pool: DbPool,
}

impl DieselVoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for DieselVoteRepository {
    async fn toggle_proposal_vote(
        &self,
        toggle: &ProposalVoteToggle,
    ) -> Result<VoteAction, StoreError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let removed = diesel::delete(
                    votes::table
                        .filter(votes::proposal_id.eq(toggle.proposal_id.as_str()))
                        .filter(votes::user_id.eq(toggle.user_id.as_str()))
                        .filter(votes::vote_type.eq(toggle.vote_type.as_str())),
                )
                .execute(conn)
                .await?;
                if removed > 0 {
                    return Ok(VoteAction::Removed);
                }

                let outcome: UpsertOutcomeRow = sql_query(UPSERT_PROPOSAL_VOTE_SQL)
                    .bind::<Text, _>(toggle.proposal_id.as_str())
                    .bind::<Text, _>(toggle.user_id.as_str())
                    .bind::<Text, _>(toggle.vote_type.as_str())
                    .bind::<Bool, _>(toggle.is_petition)
                    .bind::<Timestamptz, _>(toggle.at)
                    .get_result(conn)
                    .await?;

                if let Some(details) = &toggle.petition {
                    sql_query(UPSERT_PETITION_SQL)
                        .bind::<Text, _>(toggle.proposal_id.as_str())
                        .bind::<Text, _>(toggle.user_id.as_str())
                        .bind::<Text, _>(details.full_name())
                        .bind::<Text, _>(details.address())
                        .bind::<Text, _>(details.postcode())
                        .bind::<Text, _>(details.date_of_birth())
                        .bind::<Text, _>(details.email())
                        .bind::<Timestamptz, _>(toggle.at)
                        .execute(conn)
                        .await?;
                }

                Ok(upsert_action(&outcome))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn toggle_comment_vote(
        &self,
        toggle: &CommentVoteToggle,
    ) -> Result<VoteAction, StoreError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let removed = diesel::delete(
                    comment_votes::table
                        .filter(comment_votes::comment_id.eq(toggle.comment_id.as_str()))
                        .filter(comment_votes::user_id.eq(toggle.user_id.as_str()))
                        .filter(comment_votes::vote_type.eq(toggle.vote_type.as_str())),
                )
                .execute(conn)
                .await?;
                if removed > 0 {
                    return Ok(VoteAction::Removed);
                }

                let outcome: UpsertOutcomeRow = sql_query(UPSERT_COMMENT_VOTE_SQL)
                    .bind::<Text, _>(toggle.comment_id.as_str())
                    .bind::<Text, _>(toggle.user_id.as_str())
                    .bind::<Text, _>(toggle.vote_type.as_str())
                    .bind::<Timestamptz, _>(toggle.at)
                    .get_result(conn)
                    .await?;
                Ok(upsert_action(&outcome))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn proposal_tally(&self, id: &ProposalId) -> Result<VoteTally, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: TallyRow = sql_query(PROPOSAL_TALLY_SQL)
            .bind::<Text, _>(id.as_str())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn comment_tally(&self, id: &CommentId) -> Result<VoteTally, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: TallyRow = sql_query(COMMENT_TALLY_SQL)
            .bind::<Text, _>(id.as_str())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }

    async fn find_proposal_vote(
        &self,
        id: &ProposalId,
        user_id: &UserId,
    ) -> Result<Option<StoredVote>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<VoteRow> = votes::table
            .filter(votes::proposal_id.eq(id.as_str()))
            .filter(votes::user_id.eq(user_id.as_str()))
            .select(VoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            Ok(StoredVote {
                vote_type: parse_vote_type(&row.vote_type)?,
                is_petition: row.is_petition,
            })
        })
        .transpose()
    }

    async fn find_comment_vote(
        &self,
        id: &CommentId,
        user_id: &UserId,
    ) -> Result<Option<VoteType>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommentVoteRow> = comment_votes::table
            .filter(comment_votes::comment_id.eq(id.as_str()))
            .filter(comment_votes::user_id.eq(user_id.as_str()))
            .select(CommentVoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| parse_vote_type(&row.vote_type)).transpose()
    }
}
