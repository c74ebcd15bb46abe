//! Proposals, their vote tallies, and list ordering.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{DisplayName, ProposalId, UserId, VoteType};

/// Longest proposal text accepted at the boundary.
pub const PROPOSAL_TEXT_MAX: usize = 2_000;

/// Validation errors for proposal text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProposalValidationError {
    /// Text was blank once trimmed.
    #[error("proposal text must not be empty")]
    EmptyText,
    /// Text exceeded [`PROPOSAL_TEXT_MAX`] characters.
    #[error("proposal text must be at most {max} characters")]
    TextTooLong { max: usize },
}

/// Trimmed, non-empty proposal body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalText(String);

impl ProposalText {
    /// Validate proposal text.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ProposalValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProposalValidationError::EmptyText);
        }
        if trimmed.chars().count() > PROPOSAL_TEXT_MAX {
            return Err(ProposalValidationError::TextTooLong {
                max: PROPOSAL_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Stored proposal row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub id: ProposalId,
    pub author_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub trending: bool,
    pub meme_url: Option<String>,
    pub share_image_url: Option<String>,
}

/// Upvote and downvote counts for a proposal or comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub upvotes: u64,
    pub downvotes: u64,
}

impl VoteTally {
    /// Upvotes minus downvotes.
    pub fn net(&self) -> i64 {
        i64::try_from(self.upvotes).unwrap_or(i64::MAX)
            - i64::try_from(self.downvotes).unwrap_or(i64::MAX)
    }
}

/// Proposal joined with its author and aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalSummary {
    pub proposal: Proposal,
    pub author_name: DisplayName,
    pub tally: VoteTally,
    pub comment_count: u64,
    pub petition_count: u64,
}

/// Proposal summary annotated with the viewer's own vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalView {
    pub summary: ProposalSummary,
    pub viewer_vote: Option<VoteType>,
    pub viewer_is_petition: bool,
}

/// Ordering applied when listing proposals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProposalSort {
    /// Newest first.
    #[default]
    Recent,
    /// Net votes descending, ties by recency.
    Popular,
    /// Trending flag first, then net votes, then recency.
    Trending,
}

impl ProposalSort {
    /// Query-string spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Popular => "popular",
            Self::Trending => "trending",
        }
    }

    /// Order two summaries according to this sort.
    ///
    /// Used by the in-memory store; the SQL adapter expresses the same rules
    /// as `ORDER BY` clauses.
    pub fn compare(self, a: &ProposalSummary, b: &ProposalSummary) -> std::cmp::Ordering {
        let recency = b.proposal.created_at.cmp(&a.proposal.created_at);
        let net = b.tally.net().cmp(&a.tally.net());
        let ordering = match self {
            Self::Recent => recency,
            Self::Popular => net.then(recency),
            Self::Trending => b
                .proposal
                .trending
                .cmp(&a.proposal.trending)
                .then(net)
                .then(recency),
        };
        ordering.then_with(|| a.proposal.id.cmp(&b.proposal.id))
    }
}

/// Error raised for unknown sort keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sortBy must be one of recent, popular, trending (got {value})")]
pub struct ParseProposalSortError {
    pub value: String,
}

impl FromStr for ProposalSort {
    type Err = ParseProposalSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(Self::Recent),
            "popular" => Ok(Self::Popular),
            "trending" => Ok(Self::Trending),
            other => Err(ParseProposalSortError {
                value: other.to_owned(),
            }),
        }
    }
}
