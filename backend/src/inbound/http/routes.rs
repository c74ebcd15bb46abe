//! Route table for the HTTP adapter.
//!
//! ```text
//! GET  /api/health                         health check
//! POST /api/users, /api/login              users
//! GET|POST /api/proposals                  list / create
//! GET  /api/proposals/{id}                 single proposal
//! PUT  /api/proposals/{id}/trending        trending flag
//! GET|POST /api/proposals/{id}/comments    comments
//! POST /api/proposals/{id}/meme            meme upload
//! GET  /api/proposals/{id}/petition-stats  petition aggregates
//! GET  /api/proposals/{id}/share-image     SVG share card
//! POST /api/votes                          proposal vote toggle
//! GET|POST /api/comment-votes              comment vote state / toggle
//! GET  /proposals/{id}                     share page
//! GET|PUT /media/{key}                     blob proxy
//! ```
//!
//! Everything else falls through to [`static_asset`], which the server
//! registers as the application's default service.

use actix_web::web;

pub use crate::inbound::http::assets::static_asset;
use crate::inbound::http::comments::{create_comment, list_comments};
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::health::api_health;
use crate::inbound::http::media::{get_media, put_media};
use crate::inbound::http::meme::upload_meme;
use crate::inbound::http::proposals::{
    create_proposal, get_proposal, list_proposals, petition_stats, set_trending,
};
use crate::inbound::http::sharing::{share_image, share_page};
use crate::inbound::http::users::{ensure_user, login};
use crate::inbound::http::votes::{cast_comment_vote, cast_vote, comment_vote_status};

/// Register every API, share, and media route plus the extractor configs
/// that turn malformed input into the 400 envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(api_health)
        .service(ensure_user)
        .service(login)
        .service(list_proposals)
        .service(create_proposal)
        .service(get_proposal)
        .service(set_trending)
        .service(list_comments)
        .service(create_comment)
        .service(upload_meme)
        .service(petition_stats)
        .service(share_image)
        .service(cast_vote)
        .service(cast_comment_vote)
        .service(comment_vote_status)
        .service(share_page)
        .service(get_media)
        .service(put_media);
}
