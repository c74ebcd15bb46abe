//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration; DTO fields holding domain
//! enums point at these through `#[schema(value_type = ...)]`.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::VoteType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::VoteType)]
pub enum VoteTypeSchema {
    #[schema(rename = "upvote")]
    Upvote,
    #[schema(rename = "downvote")]
    Downvote,
}

/// OpenAPI schema for [`crate::domain::VoteAction`].
///
/// What a vote toggle did to the caller's stored vote.
#[derive(ToSchema)]
#[schema(as = crate::domain::VoteAction)]
pub enum VoteActionSchema {
    /// No vote existed; one was recorded.
    #[schema(rename = "created")]
    Created,
    /// The opposite vote existed and was flipped.
    #[schema(rename = "updated")]
    Updated,
    /// The same vote existed and was retracted.
    #[schema(rename = "removed")]
    Removed,
}

/// OpenAPI schema for [`crate::domain::ProposalSort`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ProposalSort)]
pub enum ProposalSortSchema {
    #[schema(rename = "recent")]
    Recent,
    #[schema(rename = "popular")]
    Popular,
    #[schema(rename = "trending")]
    Trending,
}

/// OpenAPI schema for [`pagination::PageInfo`].
#[derive(ToSchema)]
#[schema(as = pagination::PageInfo, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageInfoSchema {
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 20)]
    limit: u32,
    total: u64,
    total_pages: u64,
    has_more: bool,
}
