//! Vote types and toggle outcomes shared by proposal and comment voting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::VoteTally;

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    /// Stored and wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised for vote types outside the two-element enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid vote type: {value}")]
pub struct ParseVoteTypeError {
    pub value: String,
}

impl FromStr for VoteType {
    type Err = ParseVoteTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(Self::Upvote),
            "downvote" => Ok(Self::Downvote),
            other => Err(ParseVoteTypeError {
                value: other.to_owned(),
            }),
        }
    }
}

/// What a toggle did to the stored vote row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    /// No row existed; one was inserted.
    Created,
    /// A row with the other type existed; it was flipped.
    Updated,
    /// A row with the same type existed; it was deleted.
    Removed,
}

impl VoteAction {
    /// Resulting vote type given the type that was cast.
    pub fn resulting_vote(self, cast: VoteType) -> Option<VoteType> {
        match self {
            Self::Removed => None,
            Self::Created | Self::Updated => Some(cast),
        }
    }
}

/// Result of a proposal or comment vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub action: VoteAction,
    pub vote_type: Option<VoteType>,
    pub is_petition: bool,
    pub tally: VoteTally,
}

/// Decide the toggle action from the existing row's type.
///
/// Adapters that cannot run the atomic conditional upsert use this to apply
/// the same three-way branch.
pub fn toggle_action(existing: Option<VoteType>, cast: VoteType) -> VoteAction {
    match existing {
        None => VoteAction::Created,
        Some(current) if current == cast => VoteAction::Removed,
        Some(_) => VoteAction::Updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, VoteType::Upvote, VoteAction::Created)]
    #[case(Some(VoteType::Upvote), VoteType::Upvote, VoteAction::Removed)]
    #[case(Some(VoteType::Downvote), VoteType::Upvote, VoteAction::Updated)]
    #[case(Some(VoteType::Upvote), VoteType::Downvote, VoteAction::Updated)]
    fn toggle_branches(
        #[case] existing: Option<VoteType>,
        #[case] cast: VoteType,
        #[case] expected: VoteAction,
    ) {
        assert_eq!(toggle_action(existing, cast), expected);
    }

    #[rstest]
    fn removed_votes_have_no_resulting_type() {
        assert_eq!(VoteAction::Removed.resulting_vote(VoteType::Upvote), None);
        assert_eq!(
            VoteAction::Updated.resulting_vote(VoteType::Downvote),
            Some(VoteType::Downvote)
        );
    }

    #[rstest]
    #[case("sideways")]
    #[case("Upvote")]
    #[case("")]
    fn rejects_unknown_vote_types(#[case] raw: &str) {
        assert!(raw.parse::<VoteType>().is_err());
    }

    #[rstest]
    fn serialises_lowercase() {
        let json = serde_json::to_string(&VoteType::Downvote).expect("serialise");
        assert_eq!(json, "\"downvote\"");
    }
}
