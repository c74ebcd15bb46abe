//! Domain primitives, pure renderers, ports, and the services behind them.
//!
//! Purpose: keep every rule about users, proposals, comments, votes,
//! petitions, and share previews independent of HTTP and storage. Inbound
//! adapters call the driving ports in [`ports`]; outbound adapters implement
//! the driven ones.

pub mod comment;
pub mod error;
pub mod ids;
pub mod media;
pub mod meta_tags;
pub mod petition;
pub mod ports;
pub mod proposal;
pub mod share_image;
pub mod trace_id;
pub mod user;
pub mod vote;

mod comments_service;
mod media_service;
mod proposals_service;
mod sharing_service;
mod user_accounts_service;
mod voting_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::comment::{Comment, CommentText, CommentValidationError, CommentView};
pub use self::comments_service::CommentsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CommentId, IdValidationError, MAX_ID_LENGTH, ProposalId, UserId};
pub use self::media::{
    MAX_MEDIA_BYTES, MAX_MEME_BYTES, MediaKey, MediaKeyError, MediaObject, MemeImageType,
};
pub use self::media_service::MediaService;
pub use self::petition::{
    PetitionDetails, PetitionDetailsDraft, PetitionStats, PetitionValidationError,
    PostcodeCount, TOP_POSTCODES,
};
pub use self::proposal::{
    ParseProposalSortError, Proposal, ProposalSort, ProposalSummary, ProposalText,
    ProposalValidationError, ProposalView, VoteTally,
};
pub use self::proposals_service::{ProposalsCommandService, ProposalsQueryService};
pub use self::share_image::ShareCard;
pub use self::sharing_service::{SharingService, StaticSiteService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DEFAULT_DISPLAY_NAME, DisplayName, LoginCredentials, User, UserAccount, UserValidationError,
};
pub use self::user_accounts_service::UserAccountsService;
pub use self::vote::{ParseVoteTypeError, VoteAction, VoteOutcome, VoteType};
pub use self::voting_service::VotingService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use soapbox::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("Proposal not found."))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
