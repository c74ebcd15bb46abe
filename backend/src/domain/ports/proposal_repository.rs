//! Port abstraction for proposal persistence and listing.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Proposal, ProposalId, ProposalSort, ProposalSummary};

use super::StoreError;

/// One page of proposal summaries plus the unpaged total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalPage {
    pub items: Vec<ProposalSummary>,
    pub total: u64,
}

/// Generated asset URLs that may be attached to a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalAsset {
    Meme,
    ShareImage,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Persist a new proposal.
    async fn insert(&self, proposal: &Proposal) -> Result<(), StoreError>;

    /// Fetch a proposal row.
    async fn find(&self, id: &ProposalId) -> Result<Option<Proposal>, StoreError>;

    /// Fetch a proposal joined with its author and aggregate counts.
    async fn find_summary(&self, id: &ProposalId) -> Result<Option<ProposalSummary>, StoreError>;

    /// List proposal summaries in the requested order.
    async fn list(&self, sort: ProposalSort, page: PageRequest)
    -> Result<ProposalPage, StoreError>;

    /// Set the trending flag. Returns `false` when the proposal is unknown.
    async fn set_trending(&self, id: &ProposalId, trending: bool) -> Result<bool, StoreError>;

    /// Record a generated asset URL. Returns `false` when the proposal is
    /// unknown.
    async fn set_asset_url(
        &self,
        id: &ProposalId,
        asset: ProposalAsset,
        url: &str,
    ) -> Result<bool, StoreError>;
}
