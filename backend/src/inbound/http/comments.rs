//! Comment handlers.
//!
//! ```text
//! GET /api/proposals/{id}/comments?userId=u1
//! POST /api/proposals/{id}/comments {"userId":"u1","text":"Yes please"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CreateCommentRequest;
use crate::domain::{CommentView, VoteType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::proposals::ViewerQuery;
use crate::inbound::http::schemas::VoteTypeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, PROPOSAL_ID, USER_ID, parse_comment_text, parse_display_name,
    parse_optional_user_id, parse_proposal_id, parse_user_id,
};

/// Comment with its author, tally, and the viewer's vote.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub id: String,
    pub proposal_id: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub upvotes: u64,
    pub downvotes: u64,
    pub net_votes: i64,
    #[schema(value_type = Option<VoteTypeSchema>)]
    pub user_vote: Option<VoteType>,
}

impl From<CommentView> for CommentBody {
    fn from(view: CommentView) -> Self {
        let CommentView {
            comment,
            author_name,
            tally,
            viewer_vote,
        } = view;
        Self {
            id: comment.id.into(),
            proposal_id: comment.proposal_id.into(),
            user_id: comment.user_id.into(),
            user_name: author_name.to_string(),
            text: comment.text,
            created_at: comment.created_at,
            upvotes: tally.upvotes,
            downvotes: tally.downvotes,
            net_votes: tally.net(),
            user_vote: viewer_vote,
        }
    }
}

/// Comments on a proposal, oldest first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentListBody {
    pub comments: Vec<CommentBody>,
}

/// List a proposal's comments.
#[utoipa::path(
    get,
    path = "/api/proposals/{id}/comments",
    params(("id" = String, Path, description = "Proposal id"), ViewerQuery),
    responses(
        (status = 200, description = "Comments", body = CommentListBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/api/proposals/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ViewerQuery>,
) -> ApiResult<web::Json<CommentListBody>> {
    let proposal_id = parse_proposal_id(Some(path.into_inner()), PROPOSAL_ID)?;
    let viewer = parse_optional_user_id(query.into_inner().user_id, USER_ID)?;
    let comments = state.comments.list(proposal_id, viewer).await?;
    Ok(web::Json(CommentListBody {
        comments: comments.into_iter().map(CommentBody::from).collect(),
    }))
}

/// Request body for `POST /api/proposals/{id}/comments`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentBody {
    pub user_id: Option<String>,
    pub text: Option<String>,
    pub user_name: Option<String>,
}

/// Add a comment to a proposal.
#[utoipa::path(
    post,
    path = "/api/proposals/{id}/comments",
    params(("id" = String, Path, description = "Proposal id")),
    request_body = CreateCommentBody,
    responses(
        (status = 201, description = "Comment created", body = CommentBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "Proposal not found", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/api/proposals/{id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CreateCommentBody>,
) -> ApiResult<HttpResponse> {
    let proposal_id = parse_proposal_id(Some(path.into_inner()), PROPOSAL_ID)?;
    let body = payload.into_inner();
    let request = CreateCommentRequest {
        proposal_id,
        user_id: parse_user_id(body.user_id, USER_ID)?,
        user_name: parse_display_name(body.user_name.as_deref(), FieldName::new("userName"))?,
        text: parse_comment_text(body.text)?,
    };
    let view = state.comments_command.create(request).await?;
    Ok(HttpResponse::Created().json(CommentBody::from(view)))
}
