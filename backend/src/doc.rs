//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in the inbound HTTP layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`], which
//! describe domain enums without coupling them to utoipa.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::schemas::{
    PageInfoSchema, ProposalSortSchema, VoteActionSchema, VoteTypeSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Soapbox API",
        description = "Users, proposals, comments, votes, petitions, and share previews."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::api_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::users::ensure_user,
        crate::inbound::http::users::login,
        crate::inbound::http::proposals::list_proposals,
        crate::inbound::http::proposals::create_proposal,
        crate::inbound::http::proposals::get_proposal,
        crate::inbound::http::proposals::set_trending,
        crate::inbound::http::proposals::petition_stats,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::meme::upload_meme,
        crate::inbound::http::votes::cast_vote,
        crate::inbound::http::votes::cast_comment_vote,
        crate::inbound::http::votes::comment_vote_status,
        crate::inbound::http::sharing::share_image,
        crate::inbound::http::sharing::share_page,
        crate::inbound::http::media::get_media,
        crate::inbound::http::media::put_media,
    ),
    components(schemas(
        ErrorEnvelope,
        VoteTypeSchema,
        VoteActionSchema,
        ProposalSortSchema,
        PageInfoSchema
    )),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "users", description = "Lazy user creation and login"),
        (name = "proposals", description = "Proposals, trending flag, memes, and petitions"),
        (name = "comments", description = "Comments on proposals"),
        (name = "votes", description = "Vote toggling on proposals and comments"),
        (name = "sharing", description = "Share images and share pages"),
        (name = "media", description = "Media blob proxy")
    )
)]
pub struct ApiDoc;
