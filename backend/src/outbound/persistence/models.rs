//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types validate
//! stored identifiers and map failures to [`StoreError::Query`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Nullable, Text, Timestamptz};

use crate::domain::ports::StoreError;
use crate::domain::{
    Comment, CommentId, CommentView, DisplayName, LoginCredentials, Proposal, ProposalId,
    ProposalSummary, User, UserAccount, UserId, VoteTally, VoteType,
};

use super::diesel_helpers::count_to_u64;
use super::schema::{comment_votes, comments, proposals, users, votes};

fn invalid_row(what: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::query(format!("invalid stored {what}: {err}"))
}

pub(crate) fn parse_vote_type(raw: &str) -> Result<VoteType, StoreError> {
    raw.parse().map_err(|err| invalid_row("vote type", err))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub emoji_combination: Option<String>,
    pub first_selection_id: Option<String>,
    pub second_selection_id: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub display_name: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Credential columns written at first login.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserCredentialsUpdate<'a> {
    pub emoji_combination: &'a str,
    pub first_selection_id: &'a str,
    pub second_selection_id: &'a str,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let credentials = match (
            row.emoji_combination,
            row.first_selection_id,
            row.second_selection_id,
        ) {
            (Some(emoji), Some(first), Some(second)) => Some(
                LoginCredentials::try_from_parts(&emoji, &first, &second)
                    .map_err(|err| invalid_row("credentials", err))?,
            ),
            _ => None,
        };
        Ok(Self {
            user: User {
                id: UserId::new(row.id).map_err(|err| invalid_row("user id", err))?,
                display_name: DisplayName::from_stored(row.display_name),
                created_at: row.created_at,
                last_login_at: row.last_login_at,
            },
            credentials,
        })
    }
}

// ---------------------------------------------------------------------------
// Proposals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = proposals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProposalRow {
    pub id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub trending: bool,
    pub meme_url: Option<String>,
    pub share_image_url: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = proposals)]
pub(crate) struct NewProposalRow<'a> {
    pub id: &'a str,
    pub author_id: &'a str,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
    pub trending: bool,
}

impl TryFrom<ProposalRow> for Proposal {
    type Error = StoreError;

    fn try_from(row: ProposalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProposalId::new(row.id).map_err(|err| invalid_row("proposal id", err))?,
            author_id: UserId::new(row.author_id).map_err(|err| invalid_row("author id", err))?,
            text: row.text,
            created_at: row.created_at,
            trending: row.trending,
            meme_url: row.meme_url,
            share_image_url: row.share_image_url,
        })
    }
}

/// Proposal joined with its author name and aggregate counts.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct ProposalSummaryRow {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Text)]
    pub author_id: String,
    #[diesel(sql_type = Text)]
    pub text: String,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Bool)]
    pub trending: bool,
    #[diesel(sql_type = Nullable<Text>)]
    pub meme_url: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub share_image_url: Option<String>,
    #[diesel(sql_type = Text)]
    pub author_name: String,
    #[diesel(sql_type = BigInt)]
    pub upvotes: i64,
    #[diesel(sql_type = BigInt)]
    pub downvotes: i64,
    #[diesel(sql_type = BigInt)]
    pub petitions: i64,
    #[diesel(sql_type = BigInt)]
    pub comment_count: i64,
}

impl TryFrom<ProposalSummaryRow> for ProposalSummary {
    type Error = StoreError;

    fn try_from(row: ProposalSummaryRow) -> Result<Self, Self::Error> {
        let proposal = Proposal::try_from(ProposalRow {
            id: row.id,
            author_id: row.author_id,
            text: row.text,
            created_at: row.created_at,
            trending: row.trending,
            meme_url: row.meme_url,
            share_image_url: row.share_image_url,
        })?;
        Ok(Self {
            proposal,
            author_name: DisplayName::from_stored(row.author_name),
            tally: VoteTally {
                upvotes: count_to_u64(row.upvotes),
                downvotes: count_to_u64(row.downvotes),
            },
            comment_count: count_to_u64(row.comment_count),
            petition_count: count_to_u64(row.petitions),
        })
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: String,
    pub proposal_id: String,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: &'a str,
    pub proposal_id: &'a str,
    pub user_id: &'a str,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = StoreError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommentId::new(row.id).map_err(|err| invalid_row("comment id", err))?,
            proposal_id: ProposalId::new(row.proposal_id)
                .map_err(|err| invalid_row("proposal id", err))?,
            user_id: UserId::new(row.user_id).map_err(|err| invalid_row("user id", err))?,
            text: row.text,
            created_at: row.created_at,
        })
    }
}

/// Comment joined with author, tally, and the viewer's vote.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct CommentViewRow {
    #[diesel(sql_type = Text)]
    pub id: String,
    #[diesel(sql_type = Text)]
    pub proposal_id: String,
    #[diesel(sql_type = Text)]
    pub user_id: String,
    #[diesel(sql_type = Text)]
    pub text: String,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Text)]
    pub author_name: String,
    #[diesel(sql_type = BigInt)]
    pub upvotes: i64,
    #[diesel(sql_type = BigInt)]
    pub downvotes: i64,
    #[diesel(sql_type = Nullable<Text>)]
    pub viewer_vote: Option<String>,
}

impl TryFrom<CommentViewRow> for CommentView {
    type Error = StoreError;

    fn try_from(row: CommentViewRow) -> Result<Self, Self::Error> {
        let comment = Comment::try_from(CommentRow {
            id: row.id,
            proposal_id: row.proposal_id,
            user_id: row.user_id,
            text: row.text,
            created_at: row.created_at,
        })?;
        Ok(Self {
            comment,
            author_name: DisplayName::from_stored(row.author_name),
            tally: VoteTally {
                upvotes: count_to_u64(row.upvotes),
                downvotes: count_to_u64(row.downvotes),
            },
            viewer_vote: row.viewer_vote.as_deref().map(parse_vote_type).transpose()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VoteRow {
    pub vote_type: String,
    pub is_petition: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comment_votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentVoteRow {
    pub vote_type: String,
}

/// `RETURNING (xmax = 0) AS inserted` distinguishes insert from update.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct UpsertOutcomeRow {
    #[diesel(sql_type = Bool)]
    pub inserted: bool,
}

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct TallyRow {
    #[diesel(sql_type = BigInt)]
    pub upvotes: i64,
    #[diesel(sql_type = BigInt)]
    pub downvotes: i64,
}

impl From<TallyRow> for VoteTally {
    fn from(row: TallyRow) -> Self {
        Self {
            upvotes: count_to_u64(row.upvotes),
            downvotes: count_to_u64(row.downvotes),
        }
    }
}

// ---------------------------------------------------------------------------
// Petitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct PetitionTotalsRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    #[diesel(sql_type = BigInt)]
    pub verified: i64,
}

#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct PostcodeCountRow {
    #[diesel(sql_type = Text)]
    pub postcode: String,
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
