//! Proposal API handlers.
//!
//! ```text
//! GET /api/proposals?sortBy=popular&page=1&limit=20
//! POST /api/proposals {"userId":"u1","text":"Open the library on Sundays"}
//! GET /api/proposals/{id}?userId=u1
//! PUT /api/proposals/{id}/trending {"trending":true}
//! GET /api/proposals/{id}/petition-stats
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::PageInfo;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateProposalRequest, ListProposalsRequest};
use crate::domain::{
    PetitionStats, PostcodeCount, Proposal, ProposalSummary, ProposalView, VoteType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::schemas::{PageInfoSchema, VoteTypeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, PROPOSAL_ID, USER_ID, missing_field_error, parse_display_name, parse_optional_user_id,
    parse_page, parse_proposal_id, parse_proposal_text, parse_sort, parse_user_id,
};

/// Proposal with its author and vote aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalBody {
    pub id: String,
    /// Author's user id.
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub trending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meme_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_image_url: Option<String>,
    pub upvotes: u64,
    pub downvotes: u64,
    /// Upvotes minus downvotes.
    pub net_votes: i64,
    pub comment_count: u64,
    pub petition_count: u64,
}

impl From<ProposalSummary> for ProposalBody {
    fn from(summary: ProposalSummary) -> Self {
        let ProposalSummary {
            proposal,
            author_name,
            tally,
            comment_count,
            petition_count,
        } = summary;
        Self {
            id: proposal.id.into(),
            user_id: proposal.author_id.into(),
            user_name: author_name.to_string(),
            text: proposal.text,
            created_at: proposal.created_at,
            trending: proposal.trending,
            meme_url: proposal.meme_url,
            share_image_url: proposal.share_image_url,
            upvotes: tally.upvotes,
            downvotes: tally.downvotes,
            net_votes: tally.net(),
            comment_count,
            petition_count,
        }
    }
}

/// Query parameters for `GET /api/proposals`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProposalsQuery {
    /// `recent` (default), `popular`, or `trending`.
    pub sort_by: Option<String>,
    /// One-based page number.
    pub page: Option<String>,
    /// Page size, at most 100.
    pub limit: Option<String>,
}

/// Page of proposals.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalListBody {
    pub proposals: Vec<ProposalBody>,
    #[schema(value_type = PageInfoSchema)]
    pub pagination: PageInfo,
}

/// List proposals in the requested order.
#[utoipa::path(
    get,
    path = "/api/proposals",
    params(ListProposalsQuery),
    responses(
        (status = 200, description = "Proposals", body = ProposalListBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["proposals"],
    operation_id = "listProposals"
)]
#[get("/api/proposals")]
pub async fn list_proposals(
    state: web::Data<HttpState>,
    query: web::Query<ListProposalsQuery>,
) -> ApiResult<web::Json<ProposalListBody>> {
    let query = query.into_inner();
    let request = ListProposalsRequest {
        sort: parse_sort(query.sort_by.as_deref())?,
        page: parse_page(query.page.as_deref(), query.limit.as_deref())?,
    };
    let listing = state.proposals.list(request).await?;
    Ok(web::Json(ProposalListBody {
        proposals: listing.items.into_iter().map(ProposalBody::from).collect(),
        pagination: listing.page,
    }))
}

/// Request body for `POST /api/proposals`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalBody {
    pub user_id: Option<String>,
    pub text: Option<String>,
    /// Used when the author is seen for the first time.
    pub user_name: Option<String>,
}

/// Create a proposal, registering an unseen author on the way.
#[utoipa::path(
    post,
    path = "/api/proposals",
    request_body = CreateProposalBody,
    responses(
        (status = 200, description = "Created proposal", body = ProposalBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["proposals"],
    operation_id = "createProposal"
)]
#[post("/api/proposals")]
pub async fn create_proposal(
    state: web::Data<HttpState>,
    payload: web::Json<CreateProposalBody>,
) -> ApiResult<web::Json<ProposalBody>> {
    let body = payload.into_inner();
    let request = CreateProposalRequest {
        author_id: parse_user_id(body.user_id, USER_ID)?,
        author_name: parse_display_name(body.user_name.as_deref(), FieldName::new("userName"))?,
        text: parse_proposal_text(body.text)?,
    };
    let summary = state.proposals_command.create(request).await?;
    Ok(web::Json(summary.into()))
}

/// Optional viewer used to annotate responses with their own vote.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ViewerQuery {
    pub user_id: Option<String>,
}

/// Single proposal with the viewer's vote, if any.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDetailBody {
    #[serde(flatten)]
    pub proposal: ProposalBody,
    #[schema(value_type = Option<VoteTypeSchema>)]
    pub user_vote: Option<VoteType>,
    pub user_is_petition: bool,
}

impl From<ProposalView> for ProposalDetailBody {
    fn from(view: ProposalView) -> Self {
        Self {
            proposal: view.summary.into(),
            user_vote: view.viewer_vote,
            user_is_petition: view.viewer_is_petition,
        }
    }
}

/// Fetch one proposal.
#[utoipa::path(
    get,
    path = "/api/proposals/{id}",
    params(("id" = String, Path, description = "Proposal id"), ViewerQuery),
    responses(
        (status = 200, description = "Proposal", body = ProposalDetailBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["proposals"],
    operation_id = "getProposal"
)]
#[get("/api/proposals/{id}")]
pub async fn get_proposal(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> ApiResult<web::Json<ProposalDetailBody>> {
    let id = parse_proposal_id(Some(path.into_inner()), PROPOSAL_ID)?;
    let viewer = parse_optional_user_id(query.into_inner().user_id, USER_ID)?;
    let view = state.proposals.get(id, viewer).await?;
    Ok(web::Json(view.into()))
}

/// Request body for `PUT /api/proposals/{id}/trending`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct TrendingBody {
    pub trending: Option<bool>,
}

/// Proposal row after a trending update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponseBody {
    pub id: String,
    pub trending: bool,
}

impl From<Proposal> for TrendingResponseBody {
    fn from(proposal: Proposal) -> Self {
        Self {
            id: proposal.id.into(),
            trending: proposal.trending,
        }
    }
}

/// Set or clear the trending flag.
#[utoipa::path(
    put,
    path = "/api/proposals/{id}/trending",
    params(("id" = String, Path, description = "Proposal id")),
    request_body = TrendingBody,
    responses(
        (status = 200, description = "Updated", body = TrendingResponseBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["proposals"],
    operation_id = "setTrending"
)]
#[put("/api/proposals/{id}/trending")]
pub async fn set_trending(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TrendingBody>,
) -> ApiResult<web::Json<TrendingResponseBody>> {
    let id = parse_proposal_id(Some(path.into_inner()), PROPOSAL_ID)?;
    let trending = payload
        .into_inner()
        .trending
        .ok_or_else(|| missing_field_error(FieldName::new("trending")))?;
    let proposal = state.proposals_command.set_trending(id, trending).await?;
    Ok(web::Json(proposal.into()))
}

/// Signature count for one postcode.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostcodeCountBody {
    #[schema(example = "SW1A 1AA")]
    pub postcode: String,
    pub count: u64,
}

impl From<PostcodeCount> for PostcodeCountBody {
    fn from(value: PostcodeCount) -> Self {
        Self {
            postcode: value.postcode,
            count: value.count,
        }
    }
}

/// Petition aggregates for a proposal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetitionStatsBody {
    pub proposal_id: String,
    pub total_signatures: u64,
    pub verified_signatures: u64,
    /// At most five postcodes, most signatures first.
    pub top_postcodes: Vec<PostcodeCountBody>,
}

impl From<PetitionStats> for PetitionStatsBody {
    fn from(stats: PetitionStats) -> Self {
        Self {
            proposal_id: stats.proposal_id.into(),
            total_signatures: stats.total_signatures,
            verified_signatures: stats.verified_signatures,
            top_postcodes: stats.top_postcodes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Petition signature totals and the busiest postcodes.
#[utoipa::path(
    get,
    path = "/api/proposals/{id}/petition-stats",
    params(("id" = String, Path, description = "Proposal id")),
    responses(
        (status = 200, description = "Petition statistics", body = PetitionStatsBody),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["proposals"],
    operation_id = "petitionStats"
)]
#[get("/api/proposals/{id}/petition-stats")]
pub async fn petition_stats(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_proposal_id(Some(path.into_inner()), PROPOSAL_ID)?;
    let stats = state.proposals.petition_stats(id).await?;
    Ok(HttpResponse::Ok().json(PetitionStatsBody::from(stats)))
}
