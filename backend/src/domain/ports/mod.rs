//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`MediaStore`], [`DocumentSource`]) are
//! implemented by outbound adapters. Driving ports (`*Query`, `*Command`,
//! [`UserAccounts`], [`MediaLibrary`]) are implemented by domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod comments_port;
mod document_source;
mod media_library;
mod media_store;
mod petition_repository;
mod proposal_repository;
mod proposals_command;
mod proposals_query;
mod sharing_query;
mod store_error;
mod user_accounts;
mod user_repository;
mod vote_repository;
mod voting_command;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::CommentRepository;
#[cfg(test)]
pub use comments_port::{MockCommentsCommand, MockCommentsQuery};
pub use comments_port::{
    CommentVoteStatus, CommentsCommand, CommentsQuery, CreateCommentRequest,
};
#[cfg(test)]
pub use document_source::MockDocumentSource;
pub use document_source::{DocumentSource, DocumentSourceError, StaticDocument};
#[cfg(test)]
pub use media_library::MockMediaLibrary;
pub use media_library::MediaLibrary;
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaStore, MediaStoreError};
#[cfg(test)]
pub use petition_repository::MockPetitionRepository;
pub use petition_repository::PetitionRepository;
#[cfg(test)]
pub use proposal_repository::MockProposalRepository;
pub use proposal_repository::{ProposalAsset, ProposalPage, ProposalRepository};
#[cfg(test)]
pub use proposals_command::MockProposalsCommand;
pub use proposals_command::{
    CreateProposalRequest, MemeUpload, MemeUploadResponse, ProposalsCommand,
};
#[cfg(test)]
pub use proposals_query::MockProposalsQuery;
pub use proposals_query::{ListProposalsRequest, ProposalListing, ProposalsQuery};
#[cfg(test)]
pub use sharing_query::{MockSharingQuery, MockStaticSiteQuery};
pub use sharing_query::{ShareImage, SharingQuery, StaticSiteQuery};
pub use store_error::StoreError;
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::{
    EnsureUserRequest, EnsureUserResponse, LoginRequest, LoginResponse, UserAccounts,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
#[cfg(test)]
pub use vote_repository::MockVoteRepository;
pub use vote_repository::{CommentVoteToggle, ProposalVoteToggle, StoredVote, VoteRepository};
#[cfg(test)]
pub use voting_command::MockVotingCommand;
pub use voting_command::{CastCommentVoteRequest, CastVoteRequest, VotingCommand};
