//! Comment services implementing the comment driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CommentRepository, CommentVoteStatus, CommentsCommand, CommentsQuery, CreateCommentRequest,
    ProposalRepository, UserRepository, VoteRepository,
};
use crate::domain::proposals_service::proposal_not_found;
use crate::domain::user_accounts_service::ensure_account;
use crate::domain::voting_service::comment_not_found;
use crate::domain::{
    Comment, CommentId, CommentView, Error, ProposalId, UserId, VoteTally,
};

/// Service implementing [`CommentsQuery`] and [`CommentsCommand`].
#[derive(Clone)]
pub struct CommentsService<C: ?Sized, P: ?Sized, U: ?Sized, V: ?Sized> {
    comments: Arc<C>,
    proposals: Arc<P>,
    users: Arc<U>,
    votes: Arc<V>,
    clock: Arc<dyn Clock>,
}

impl<C: ?Sized, P: ?Sized, U: ?Sized, V: ?Sized> CommentsService<C, P, U, V> {
    pub fn new(
        comments: Arc<C>,
        proposals: Arc<P>,
        users: Arc<U>,
        votes: Arc<V>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            proposals,
            users,
            votes,
            clock,
        }
    }
}

#[async_trait]
impl<C: ?Sized, P: ?Sized, U: ?Sized, V: ?Sized> CommentsQuery for CommentsService<C, P, U, V>
where
    C: CommentRepository,
    P: ProposalRepository,
    U: UserRepository,
    V: VoteRepository,
{
    async fn list(
        &self,
        proposal_id: ProposalId,
        viewer: Option<UserId>,
    ) -> Result<Vec<CommentView>, Error> {
        if self.proposals.find(&proposal_id).await?.is_none() {
            return Err(proposal_not_found());
        }
        Ok(self.comments.list_for_proposal(&proposal_id, viewer).await?)
    }

    async fn vote_status(
        &self,
        comment_id: CommentId,
        viewer: Option<UserId>,
    ) -> Result<CommentVoteStatus, Error> {
        if self.comments.find(&comment_id).await?.is_none() {
            return Err(comment_not_found());
        }
        let vote_type = match viewer {
            Some(viewer) => self.votes.find_comment_vote(&comment_id, &viewer).await?,
            None => None,
        };
        let tally = self.votes.comment_tally(&comment_id).await?;
        Ok(CommentVoteStatus { vote_type, tally })
    }
}

#[async_trait]
impl<C: ?Sized, P: ?Sized, U: ?Sized, V: ?Sized> CommentsCommand for CommentsService<C, P, U, V>
where
    C: CommentRepository,
    P: ProposalRepository,
    U: UserRepository,
    V: VoteRepository,
{
    async fn create(&self, request: CreateCommentRequest) -> Result<CommentView, Error> {
        if self.proposals.find(&request.proposal_id).await?.is_none() {
            return Err(proposal_not_found());
        }
        let now = self.clock.utc();
        let (author, _) =
            ensure_account(self.users.as_ref(), &request.user_id, &request.user_name, now).await?;
        let comment = Comment {
            id: CommentId::random(),
            proposal_id: request.proposal_id,
            user_id: request.user_id,
            text: request.text.into_inner(),
            created_at: now,
        };
        self.comments.insert(&comment).await?;
        info!(comment_id = %comment.id, proposal_id = %comment.proposal_id, "comment created");
        Ok(CommentView {
            comment,
            author_name: author.user.display_name,
            tally: VoteTally::default(),
            viewer_vote: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockCommentRepository, MockProposalRepository, MockUserRepository, MockVoteRepository,
    };
    use crate::domain::test_support::{
        fixture_clock, fixture_timestamp, proposal, proposal_id, user_id,
    };
    use crate::domain::{CommentText, DisplayName, ErrorCode, VoteType};
    use rstest::rstest;

    type Service = CommentsService<
        MockCommentRepository,
        MockProposalRepository,
        MockUserRepository,
        MockVoteRepository,
    >;

    fn service(
        comments: MockCommentRepository,
        proposals: MockProposalRepository,
        users: MockUserRepository,
        votes: MockVoteRepository,
    ) -> Service {
        CommentsService::new(
            Arc::new(comments),
            Arc::new(proposals),
            Arc::new(users),
            Arc::new(votes),
            fixture_clock(),
        )
    }

    fn proposals_with(found: bool) -> MockProposalRepository {
        let mut proposals = MockProposalRepository::new();
        proposals
            .expect_find()
            .returning(move |_| Ok(found.then(|| proposal("p1", "u1"))));
        proposals
    }

    #[rstest]
    #[tokio::test]
    async fn create_stamps_clock_and_returns_zero_tally() {
        let mut users = MockUserRepository::new();
        users.expect_insert_if_absent().return_once(|_| Ok(true));
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().times(1).return_once(|_| Ok(()));
        let service = service(comments, proposals_with(true), users, MockVoteRepository::new());

        let view = service
            .create(CreateCommentRequest {
                proposal_id: proposal_id("p1"),
                user_id: user_id("u9"),
                user_name: DisplayName::new("Lin").expect("name"),
                text: CommentText::new("Yes please").expect("text"),
            })
            .await
            .expect("comment created");
        assert_eq!(view.comment.created_at, fixture_timestamp());
        assert_eq!(view.author_name.as_str(), "Lin");
        assert_eq!(view.tally, VoteTally::default());
    }

    #[rstest]
    #[tokio::test]
    async fn create_on_unknown_proposal_is_not_found() {
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().never();
        let service = service(
            comments,
            proposals_with(false),
            MockUserRepository::new(),
            MockVoteRepository::new(),
        );

        let error = service
            .create(CreateCommentRequest {
                proposal_id: proposal_id("nope"),
                user_id: user_id("u1"),
                user_name: DisplayName::anonymous(),
                text: CommentText::new("hello").expect("text"),
            })
            .await
            .expect_err("not found");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn vote_status_without_viewer_skips_lookup() {
        let mut comments = MockCommentRepository::new();
        comments.expect_find().return_once(|_| {
            Ok(Some(Comment {
                id: CommentId::new("c1").expect("id"),
                proposal_id: proposal_id("p1"),
                user_id: user_id("u1"),
                text: "hi".into(),
                created_at: fixture_timestamp(),
            }))
        });
        let mut votes = MockVoteRepository::new();
        votes.expect_find_comment_vote().never();
        votes.expect_comment_tally().return_once(|_| {
            Ok(VoteTally {
                upvotes: 3,
                downvotes: 1,
            })
        });
        let service = service(
            comments,
            MockProposalRepository::new(),
            MockUserRepository::new(),
            votes,
        );

        let status = service
            .vote_status(CommentId::new("c1").expect("id"), None)
            .await
            .expect("status");
        assert_eq!(status.vote_type, None::<VoteType>);
        assert_eq!(status.tally.net(), 2);
    }
}
