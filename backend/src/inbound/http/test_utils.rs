//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockCommentsCommand, MockCommentsQuery, MockMediaLibrary, MockProposalsCommand,
    MockProposalsQuery, MockSharingQuery, MockStaticSiteQuery, MockUserAccounts,
    MockVotingCommand,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mocked driving ports; set expectations on the ones a test exercises.
///
/// Mocks without expectations panic when called, so an unexpected port call
/// fails the test.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub users: MockUserAccounts,
    pub proposals: MockProposalsQuery,
    pub proposals_command: MockProposalsCommand,
    pub voting: MockVotingCommand,
    pub comments: MockCommentsQuery,
    pub comments_command: MockCommentsCommand,
    pub media: MockMediaLibrary,
    pub sharing: MockSharingQuery,
    pub static_site: MockStaticSiteQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::from(HttpStatePorts {
            users: Arc::new(self.users),
            proposals: Arc::new(self.proposals),
            proposals_command: Arc::new(self.proposals_command),
            voting: Arc::new(self.voting),
            comments: Arc::new(self.comments),
            comments_command: Arc::new(self.comments_command),
            media: Arc::new(self.media),
            sharing: Arc::new(self.sharing),
            static_site: Arc::new(self.static_site),
        }))
    }
}
