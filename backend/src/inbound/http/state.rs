//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{
    CommentsCommand, CommentsQuery, MediaLibrary, ProposalsCommand, ProposalsQuery, SharingQuery,
    StaticSiteQuery, UserAccounts, VotingCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserAccounts>,
    pub proposals: Arc<dyn ProposalsQuery>,
    pub proposals_command: Arc<dyn ProposalsCommand>,
    pub voting: Arc<dyn VotingCommand>,
    pub comments: Arc<dyn CommentsQuery>,
    pub comments_command: Arc<dyn CommentsCommand>,
    pub media: Arc<dyn MediaLibrary>,
    pub sharing: Arc<dyn SharingQuery>,
    pub static_site: Arc<dyn StaticSiteQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserAccounts>,
    pub proposals: Arc<dyn ProposalsQuery>,
    pub proposals_command: Arc<dyn ProposalsCommand>,
    pub voting: Arc<dyn VotingCommand>,
    pub comments: Arc<dyn CommentsQuery>,
    pub comments_command: Arc<dyn CommentsCommand>,
    pub media: Arc<dyn MediaLibrary>,
    pub sharing: Arc<dyn SharingQuery>,
    pub static_site: Arc<dyn StaticSiteQuery>,
    /// Origin used for absolute share URLs; the request's own scheme and
    /// host are used when unset.
    pub public_base_url: Option<Url>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from the driving ports.
    ///
    /// # Examples
    /// ```ignore
    /// let state = HttpState::new(ports).with_public_base_url(Some(base));
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            proposals,
            proposals_command,
            voting,
            comments,
            comments_command,
            media,
            sharing,
            static_site,
        } = ports;
        Self {
            users,
            proposals,
            proposals_command,
            voting,
            comments,
            comments_command,
            media,
            sharing,
            static_site,
            public_base_url: None,
        }
    }

    /// Pin the origin used for share page URLs.
    #[must_use]
    pub fn with_public_base_url(mut self, url: Option<Url>) -> Self {
        self.public_base_url = url;
        self
    }
}
