//! PostgreSQL-backed `PetitionRepository` implementation.
//!
//! Only details whose vote still carries the petition flag are counted, so a
//! removed or flipped vote drops out of the statistics without deleting the
//! stored details.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PetitionRepository, StoreError};
use crate::domain::petition::rank_postcodes;
use crate::domain::{PetitionStats, PostcodeCount, ProposalId, TOP_POSTCODES};

use super::diesel_helpers::{count_to_u64, map_diesel_error, map_pool_error};
use super::models::{PetitionTotalsRow, PostcodeCountRow};
use super::pool::DbPool;

const SIGNATURES: &str = r#"
FROM petition_details d
JOIN votes v
  ON v.proposal_id = d.proposal_id
 AND v.user_id = d.user_id
 AND v.is_petition
WHERE d.proposal_id = $1
"#;

fn totals_sql() -> String {
    format!(
        "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE d.verified) AS verified {SIGNATURES}"
    )
}

fn postcodes_sql() -> String {
    format!(
        "SELECT d.postcode, COUNT(*) AS count {SIGNATURES} \
         GROUP BY d.postcode ORDER BY count DESC, d.postcode ASC LIMIT $2"
    )
}

/// Diesel-backed implementation of the [`PetitionRepository`] port.
#[derive(Clone)]
pub struct DieselPetitionRepository {
    pool: DbPool,
}

impl DieselPetitionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PetitionRepository for DieselPetitionRepository {
    async fn stats(&self, id: &ProposalId) -> Result<PetitionStats, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let totals: PetitionTotalsRow = sql_query(totals_sql())
            .bind::<Text, _>(id.as_str())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let postcodes: Vec<PostcodeCountRow> = sql_query(postcodes_sql())
            .bind::<Text, _>(id.as_str())
            .bind::<BigInt, _>(TOP_POSTCODES as i64)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let top_postcodes = rank_postcodes(
            postcodes
                .into_iter()
                .map(|row| PostcodeCount {
                    postcode: row.postcode,
                    count: count_to_u64(row.count),
                })
                .collect(),
        );
        Ok(PetitionStats {
            proposal_id: id.clone(),
            total_signatures: count_to_u64(totals.total),
            verified_signatures: count_to_u64(totals.verified),
            top_postcodes,
        })
    }
}
