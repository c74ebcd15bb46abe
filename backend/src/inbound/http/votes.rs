//! Vote toggle handlers for proposals and comments.
//!
//! ```text
//! POST /api/votes {"proposalId":"p1","userId":"u1","voteType":"upvote"}
//! POST /api/comment-votes {"commentId":"c1","userId":"u1","voteType":"downvote"}
//! GET /api/comment-votes?commentId=c1&userId=u1
//! ```
//!
//! Casting the same vote twice retracts it; the response then carries a
//! `null` vote type.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CastCommentVoteRequest, CastVoteRequest};
use crate::domain::{PetitionDetailsDraft, VoteAction, VoteOutcome, VoteTally, VoteType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::schemas::{VoteActionSchema, VoteTypeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    COMMENT_ID, PROPOSAL_ID, USER_ID, parse_comment_id, parse_optional_user_id, parse_proposal_id,
    parse_user_id, parse_vote_type,
};

/// Petition signature fields sent with a petition upvote.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetitionDetailsBody {
    pub full_name: Option<String>,
    pub address: Option<String>,
    #[schema(example = "SW1A 1AA")]
    pub postcode: Option<String>,
    #[schema(example = "1990-04-01")]
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
}

impl From<PetitionDetailsBody> for PetitionDetailsDraft {
    fn from(body: PetitionDetailsBody) -> Self {
        Self {
            full_name: body.full_name,
            address: body.address,
            postcode: body.postcode,
            date_of_birth: body.date_of_birth,
            email: body.email,
        }
    }
}

/// Request body for `POST /api/votes`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteBody {
    pub proposal_id: Option<String>,
    pub user_id: Option<String>,
    /// `upvote` or `downvote`.
    pub vote_type: Option<String>,
    #[serde(default)]
    pub is_petition: bool,
    pub petition_details: Option<PetitionDetailsBody>,
}

/// Outcome of a vote toggle with the fresh tally.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponseBody {
    #[schema(value_type = VoteActionSchema)]
    pub action: VoteAction,
    /// Resulting vote; `null` once retracted.
    #[schema(value_type = Option<VoteTypeSchema>)]
    pub vote_type: Option<VoteType>,
    pub is_petition: bool,
    pub upvotes: u64,
    pub downvotes: u64,
    pub net_votes: i64,
}

impl From<VoteOutcome> for VoteResponseBody {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            action: outcome.action,
            vote_type: outcome.vote_type,
            is_petition: outcome.is_petition,
            upvotes: outcome.tally.upvotes,
            downvotes: outcome.tally.downvotes,
            net_votes: outcome.tally.net(),
        }
    }
}

/// Cast, flip, or retract a vote on a proposal.
#[utoipa::path(
    post,
    path = "/api/votes",
    request_body = CastVoteBody,
    responses(
        (status = 200, description = "Vote toggled", body = VoteResponseBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Proposal or user not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["votes"],
    operation_id = "castVote"
)]
#[post("/api/votes")]
pub async fn cast_vote(
    state: web::Data<HttpState>,
    payload: web::Json<CastVoteBody>,
) -> ApiResult<web::Json<VoteResponseBody>> {
    let body = payload.into_inner();
    let request = CastVoteRequest {
        proposal_id: parse_proposal_id(body.proposal_id, PROPOSAL_ID)?,
        user_id: parse_user_id(body.user_id, USER_ID)?,
        vote_type: parse_vote_type(body.vote_type)?,
        is_petition: body.is_petition,
        petition: body.petition_details.map(Into::into),
    };
    let outcome = state.voting.cast_proposal_vote(request).await?;
    Ok(web::Json(outcome.into()))
}

/// Request body for `POST /api/comment-votes`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastCommentVoteBody {
    pub comment_id: Option<String>,
    pub user_id: Option<String>,
    pub vote_type: Option<String>,
}

/// Cast, flip, or retract a vote on a comment.
#[utoipa::path(
    post,
    path = "/api/comment-votes",
    request_body = CastCommentVoteBody,
    responses(
        (status = 200, description = "Vote toggled", body = VoteResponseBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Comment or user not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["votes"],
    operation_id = "castCommentVote"
)]
#[post("/api/comment-votes")]
pub async fn cast_comment_vote(
    state: web::Data<HttpState>,
    payload: web::Json<CastCommentVoteBody>,
) -> ApiResult<web::Json<VoteResponseBody>> {
    let body = payload.into_inner();
    let request = CastCommentVoteRequest {
        comment_id: parse_comment_id(body.comment_id, COMMENT_ID)?,
        user_id: parse_user_id(body.user_id, USER_ID)?,
        vote_type: parse_vote_type(body.vote_type)?,
    };
    let outcome = state.voting.cast_comment_vote(request).await?;
    Ok(web::Json(outcome.into()))
}

/// Query parameters for `GET /api/comment-votes`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CommentVoteQuery {
    pub comment_id: Option<String>,
    pub user_id: Option<String>,
}

/// A comment's tally and the viewer's vote.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentVoteStatusBody {
    pub comment_id: String,
    #[schema(value_type = Option<VoteTypeSchema>)]
    pub vote_type: Option<VoteType>,
    pub upvotes: u64,
    pub downvotes: u64,
    pub net_votes: i64,
}

fn status_body(comment_id: String, vote_type: Option<VoteType>, tally: VoteTally) -> CommentVoteStatusBody {
    CommentVoteStatusBody {
        comment_id,
        vote_type,
        upvotes: tally.upvotes,
        downvotes: tally.downvotes,
        net_votes: tally.net(),
    }
}

/// Current vote state of a comment.
#[utoipa::path(
    get,
    path = "/api/comment-votes",
    params(CommentVoteQuery),
    responses(
        (status = 200, description = "Comment vote state", body = CommentVoteStatusBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Comment not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["votes"],
    operation_id = "commentVoteStatus"
)]
#[get("/api/comment-votes")]
pub async fn comment_vote_status(
    state: web::Data<HttpState>,
    query: web::Query<CommentVoteQuery>,
) -> ApiResult<web::Json<CommentVoteStatusBody>> {
    let query = query.into_inner();
    let comment_id = parse_comment_id(query.comment_id, COMMENT_ID)?;
    let viewer = parse_optional_user_id(query.user_id, USER_ID)?;
    let status = state.comments.vote_status(comment_id.clone(), viewer).await?;
    Ok(web::Json(status_body(
        comment_id.into(),
        status.vote_type,
        status.tally,
    )))
}
