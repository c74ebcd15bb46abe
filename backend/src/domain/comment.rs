//! Comments attached to proposals.

use chrono::{DateTime, Utc};

use super::{CommentId, DisplayName, ProposalId, UserId, VoteTally, VoteType};

/// Longest comment accepted at the boundary.
pub const COMMENT_TEXT_MAX: usize = 1_000;

/// Validation errors for comment text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    #[error("comment text must not be empty")]
    EmptyText,
    #[error("comment text must be at most {max} characters")]
    TextTooLong { max: usize },
}

/// Trimmed, non-empty comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate comment text.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CommentValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        if trimmed.chars().count() > COMMENT_TEXT_MAX {
            return Err(CommentValidationError::TextTooLong {
                max: COMMENT_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Stored comment row. Comments are immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub proposal_id: ProposalId,
    pub user_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author, tally, and the viewer's vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author_name: DisplayName,
    pub tally: VoteTally,
    pub viewer_vote: Option<VoteType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn trims_comment_text() {
        let text = CommentText::new("  agreed \n").expect("valid");
        assert_eq!(text.as_str(), "agreed");
    }

    #[rstest]
    #[case("")]
    #[case(" \t ")]
    fn rejects_blank_comments(#[case] raw: &str) {
        assert_eq!(CommentText::new(raw), Err(CommentValidationError::EmptyText));
    }

    #[rstest]
    fn rejects_overlong_comments() {
        let raw = "c".repeat(COMMENT_TEXT_MAX + 1);
        assert_eq!(
            CommentText::new(raw),
            Err(CommentValidationError::TextTooLong {
                max: COMMENT_TEXT_MAX
            })
        );
    }
}
