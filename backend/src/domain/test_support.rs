//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{DisplayName, Proposal, ProposalId, User, UserAccount, UserId};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("fixture user id")
}

pub(crate) fn proposal_id(raw: &str) -> ProposalId {
    ProposalId::new(raw).expect("fixture proposal id")
}

pub(crate) fn account(raw: &str, name: &str) -> UserAccount {
    UserAccount {
        user: User {
            id: user_id(raw),
            display_name: DisplayName::new(name).expect("fixture name"),
            created_at: fixture_timestamp(),
            last_login_at: None,
        },
        credentials: None,
    }
}

pub(crate) fn proposal(raw: &str, author: &str) -> Proposal {
    Proposal {
        id: proposal_id(raw),
        author_id: user_id(author),
        text: "Open the library on Sundays".to_owned(),
        created_at: fixture_timestamp(),
        trending: false,
        meme_url: None,
        share_image_url: None,
    }
}
