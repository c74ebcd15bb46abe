//! Vote toggle engine for proposals and comments.
//!
//! The service checks that the subject and voter exist, validates petition
//! details up front, and hands the toggle to the repository, which applies
//! it atomically. The three-way branch itself lives in the store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CastCommentVoteRequest, CastVoteRequest, CommentRepository, CommentVoteToggle,
    ProposalRepository, ProposalVoteToggle, UserRepository, VoteRepository, VotingCommand,
};
use crate::domain::proposals_service::proposal_not_found;
use crate::domain::{Error, PetitionDetails, UserId, VoteOutcome, VoteType};

pub(crate) fn comment_not_found() -> Error {
    Error::not_found("Comment not found.")
}

/// Service implementing [`VotingCommand`].
#[derive(Clone)]
pub struct VotingService<P: ?Sized, C: ?Sized, U: ?Sized, V: ?Sized> {
    proposals: Arc<P>,
    comments: Arc<C>,
    users: Arc<U>,
    votes: Arc<V>,
    clock: Arc<dyn Clock>,
}

impl<P: ?Sized, C: ?Sized, U: ?Sized, V: ?Sized> VotingService<P, C, U, V> {
    pub fn new(
        proposals: Arc<P>,
        comments: Arc<C>,
        users: Arc<U>,
        votes: Arc<V>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            proposals,
            comments,
            users,
            votes,
            clock,
        }
    }
}

impl<P: ?Sized, C: ?Sized, U: ?Sized, V: ?Sized> VotingService<P, C, U, V>
where
    U: UserRepository,
{
    async fn require_user(&self, id: &UserId) -> Result<(), Error> {
        match self.users.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found("User not found.")),
        }
    }
}

/// Resolve the petition side channel of a proposal vote.
///
/// Only upvotes flagged as petitions carry details; details on any other
/// vote are ignored.
fn petition_for(request: &CastVoteRequest) -> Result<(bool, Option<PetitionDetails>), Error> {
    if request.vote_type != VoteType::Upvote || !request.is_petition {
        return Ok((false, None));
    }
    let Some(draft) = request.petition.clone() else {
        return Ok((true, None));
    };
    let details = PetitionDetails::try_from(draft).map_err(|err| {
        Error::invalid_request("Missing petition details.").with_details(serde_json::json!({
            "reason": err.to_string(),
        }))
    })?;
    Ok((true, Some(details)))
}

#[async_trait]
impl<P: ?Sized, C: ?Sized, U: ?Sized, V: ?Sized> VotingCommand for VotingService<P, C, U, V>
where
    P: ProposalRepository,
    C: CommentRepository,
    U: UserRepository,
    V: VoteRepository,
{
    async fn cast_proposal_vote(&self, request: CastVoteRequest) -> Result<VoteOutcome, Error> {
        if self.proposals.find(&request.proposal_id).await?.is_none() {
            return Err(proposal_not_found());
        }
        self.require_user(&request.user_id).await?;
        let (is_petition, petition) = petition_for(&request)?;

        let toggle = ProposalVoteToggle {
            proposal_id: request.proposal_id,
            user_id: request.user_id,
            vote_type: request.vote_type,
            is_petition,
            petition,
            at: self.clock.utc(),
        };
        let action = self.votes.toggle_proposal_vote(&toggle).await?;
        let tally = self.votes.proposal_tally(&toggle.proposal_id).await?;
        let vote_type = action.resulting_vote(toggle.vote_type);
        info!(
            proposal_id = %toggle.proposal_id,
            user_id = %toggle.user_id,
            ?action,
            is_petition,
            "proposal vote toggled"
        );
        Ok(VoteOutcome {
            action,
            vote_type,
            is_petition: is_petition && vote_type.is_some(),
            tally,
        })
    }

    async fn cast_comment_vote(
        &self,
        request: CastCommentVoteRequest,
    ) -> Result<VoteOutcome, Error> {
        if self.comments.find(&request.comment_id).await?.is_none() {
            return Err(comment_not_found());
        }
        self.require_user(&request.user_id).await?;

        let toggle = CommentVoteToggle {
            comment_id: request.comment_id,
            user_id: request.user_id,
            vote_type: request.vote_type,
            at: self.clock.utc(),
        };
        let action = self.votes.toggle_comment_vote(&toggle).await?;
        let tally = self.votes.comment_tally(&toggle.comment_id).await?;
        info!(
            comment_id = %toggle.comment_id,
            user_id = %toggle.user_id,
            ?action,
            "comment vote toggled"
        );
        Ok(VoteOutcome {
            action,
            vote_type: action.resulting_vote(toggle.vote_type),
            is_petition: false,
            tally,
        })
    }
}
