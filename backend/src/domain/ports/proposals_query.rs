//! Driving port for proposal reads.

use async_trait::async_trait;
use pagination::{PageInfo, PageRequest};

use crate::domain::{Error, PetitionStats, ProposalId, ProposalSort, ProposalSummary, ProposalView, UserId};

/// List request after boundary validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListProposalsRequest {
    pub sort: ProposalSort,
    pub page: PageRequest,
}

/// One page of proposals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalListing {
    pub items: Vec<ProposalSummary>,
    pub page: PageInfo,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProposalsQuery: Send + Sync {
    /// List proposals in the requested order.
    async fn list(&self, request: ListProposalsRequest) -> Result<ProposalListing, Error>;

    /// Fetch one proposal, annotated with the viewer's vote when given.
    async fn get(&self, id: ProposalId, viewer: Option<UserId>) -> Result<ProposalView, Error>;

    /// Petition aggregates for a proposal.
    async fn petition_stats(&self, id: ProposalId) -> Result<PetitionStats, Error>;
}
