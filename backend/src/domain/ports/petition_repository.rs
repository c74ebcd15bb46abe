//! Port abstraction for petition aggregates.

use async_trait::async_trait;

use crate::domain::{PetitionStats, ProposalId};

use super::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetitionRepository: Send + Sync {
    /// Aggregate signatures for a proposal.
    ///
    /// Only details attached to a current petition upvote are counted.
    /// Adapters return at most [`crate::domain::TOP_POSTCODES`] postcodes,
    /// ranked by count then postcode.
    async fn stats(&self, id: &ProposalId) -> Result<PetitionStats, StoreError>;
}
