//! PostgreSQL-backed `ProposalRepository` implementation.
//!
//! Summaries are read with a raw aggregate query so vote, petition, and
//! comment counts come back in a single round trip.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{ProposalAsset, ProposalPage, ProposalRepository, StoreError};
use crate::domain::{Proposal, ProposalId, ProposalSort, ProposalSummary};

use super::diesel_helpers::{count_to_u64, map_diesel_error, map_pool_error, offset_to_i64};
use super::models::{NewProposalRow, ProposalRow, ProposalSummaryRow};
use super::pool::DbPool;
use super::schema::proposals;

const SUMMARY_SELECT: &str = r#"
SELECT p.id, p.author_id, p.text, p.created_at, p.trending, p.meme_url, p.share_image_url,
       u.display_name AS author_name,
       COALESCE(v.upvotes, 0) AS upvotes,
       COALESCE(v.downvotes, 0) AS downvotes,
       COALESCE(v.petitions, 0) AS petitions,
       COALESCE(c.comment_count, 0) AS comment_count
FROM proposals p
JOIN users u ON u.id = p.author_id
LEFT JOIN (
    SELECT proposal_id,
           COUNT(*) FILTER (WHERE vote_type = 'upvote') AS upvotes,
           COUNT(*) FILTER (WHERE vote_type = 'downvote') AS downvotes,
           COUNT(*) FILTER (WHERE is_petition) AS petitions
    FROM votes
    GROUP BY proposal_id
) v ON v.proposal_id = p.id
LEFT JOIN (
    SELECT proposal_id, COUNT(*) AS comment_count
    FROM comments
    GROUP BY proposal_id
) c ON c.proposal_id = p.id
"#;

#[derive(Debug, QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    total: i64,
}

fn order_clause(sort: ProposalSort) -> &'static str {
    match sort {
        ProposalSort::Recent => "s.created_at DESC, s.id",
        ProposalSort::Popular => "(s.upvotes - s.downvotes) DESC, s.created_at DESC, s.id",
        ProposalSort::Trending => {
            "s.trending DESC, (s.upvotes - s.downvotes) DESC, s.created_at DESC, s.id"
        }
    }
}

fn list_sql(sort: ProposalSort) -> String {
    format!(
        "SELECT s.* FROM ({SUMMARY_SELECT}) s ORDER BY {} LIMIT $1 OFFSET $2",
        order_clause(sort)
    )
}

fn find_summary_sql() -> String {
    format!("{SUMMARY_SELECT} WHERE p.id = $1")
}

/// Diesel-backed implementation of the [`ProposalRepository`] port.
#[derive(Clone)]
pub struct DieselProposalRepository {
    pool: DbPool,
}

impl DieselProposalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProposalRepository for DieselProposalRepository {
    async fn insert(&self, proposal: &Proposal) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProposalRow {
            id: proposal.id.as_str(),
            author_id: proposal.author_id.as_str(),
            text: &proposal.text,
            created_at: proposal.created_at,
            trending: proposal.trending,
        };
        diesel::insert_into(proposals::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, id: &ProposalId) -> Result<Option<Proposal>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProposalRow> = proposals::table
            .filter(proposals::id.eq(id.as_str()))
            .select(ProposalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Proposal::try_from).transpose()
    }

    async fn find_summary(&self, id: &ProposalId) -> Result<Option<ProposalSummary>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProposalSummaryRow> = sql_query(find_summary_sql())
            .bind::<Text, _>(id.as_str())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ProposalSummary::try_from).transpose()
    }

    async fn list(
        &self,
        sort: ProposalSort,
        page: PageRequest,
    ) -> Result<ProposalPage, StoreError> {
        let offset = offset_to_i64(page.offset())?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProposalSummaryRow> = sql_query(list_sql(sort))
            .bind::<BigInt, _>(i64::from(page.limit()))
            .bind::<BigInt, _>(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total: CountRow = sql_query("SELECT COUNT(*) AS total FROM proposals")
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(ProposalSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProposalPage {
            items,
            total: count_to_u64(total.total),
        })
    }

    async fn set_trending(&self, id: &ProposalId, trending: bool) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(proposals::table.filter(proposals::id.eq(id.as_str())))
            .set(proposals::trending.eq(trending))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn set_asset_url(
        &self,
        id: &ProposalId,
        asset: ProposalAsset,
        url: &str,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = proposals::table.filter(proposals::id.eq(id.as_str()));
        let updated = match asset {
            ProposalAsset::Meme => {
                diesel::update(target)
                    .set(proposals::meme_url.eq(Some(url)))
                    .execute(&mut conn)
                    .await
            }
            ProposalAsset::ShareImage => {
                diesel::update(target)
                    .set(proposals::share_image_url.eq(Some(url)))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ProposalSort::Recent, "ORDER BY s.created_at DESC")]
    #[case(ProposalSort::Popular, "ORDER BY (s.upvotes - s.downvotes) DESC")]
    #[case(ProposalSort::Trending, "ORDER BY s.trending DESC")]
    fn list_sql_orders_by_sort_key(#[case] sort: ProposalSort, #[case] expected: &str) {
        let sql = list_sql(sort);
        assert!(sql.contains(expected), "{sql}");
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
    }

    #[rstest]
    fn summary_lookup_filters_on_id() {
        assert!(find_summary_sql().trim_end().ends_with("WHERE p.id = $1"));
    }
}
