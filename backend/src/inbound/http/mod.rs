//! HTTP inbound adapter exposing REST endpoints.

pub mod assets;
pub mod comments;
pub mod error;
pub mod health;
pub mod media;
pub mod meme;
pub mod proposals;
pub mod routes;
pub mod schemas;
pub mod sharing;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;
pub mod votes;

pub use error::ApiResult;
