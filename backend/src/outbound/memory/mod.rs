//! In-memory entity store used when no database is configured.
//!
//! A single [`InMemoryStore`] implements every entity repository port over
//! one mutex-guarded state, so vote toggles observe and update the same
//! snapshot atomically. Contents vanish when the process exits.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::petition::rank_postcodes;
use crate::domain::ports::{
    CommentRepository, CommentVoteToggle, PetitionRepository, ProposalAsset, ProposalPage,
    ProposalRepository, ProposalVoteToggle, StoreError, StoredVote, UserRepository,
    VoteRepository,
};
use crate::domain::vote::toggle_action;
use crate::domain::{
    Comment, CommentId, CommentView, DisplayName, LoginCredentials, PetitionDetails,
    PetitionStats, PostcodeCount, Proposal, ProposalId, ProposalSort, ProposalSummary, User,
    UserAccount, UserId, VoteAction, VoteTally, VoteType,
};

#[derive(Debug, Clone, Copy)]
struct VoteRecord {
    vote_type: VoteType,
    is_petition: bool,
}

#[derive(Debug, Clone)]
struct PetitionRecord {
    details: PetitionDetails,
    verified: bool,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, UserAccount>,
    proposals: Vec<Proposal>,
    comments: Vec<Comment>,
    votes: HashMap<(ProposalId, UserId), VoteRecord>,
    comment_votes: HashMap<(CommentId, UserId), VoteType>,
    petitions: HashMap<(ProposalId, UserId), PetitionRecord>,
}

fn tally<'a>(votes: impl Iterator<Item = &'a VoteType>) -> VoteTally {
    votes.fold(VoteTally::default(), |mut tally, vote| {
        match vote {
            VoteType::Upvote => tally.upvotes += 1,
            VoteType::Downvote => tally.downvotes += 1,
        }
        tally
    })
}

impl State {
    fn proposal(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.iter().find(|proposal| &proposal.id == id)
    }

    fn proposal_mut(&mut self, id: &ProposalId) -> Option<&mut Proposal> {
        self.proposals.iter_mut().find(|proposal| &proposal.id == id)
    }

    fn display_name(&self, id: &UserId) -> DisplayName {
        self.users
            .get(id)
            .map_or_else(DisplayName::anonymous, |account| {
                account.user.display_name.clone()
            })
    }

    fn proposal_tally(&self, id: &ProposalId) -> VoteTally {
        tally(
            self.votes
                .iter()
                .filter(|((proposal_id, _), _)| proposal_id == id)
                .map(|(_, record)| &record.vote_type),
        )
    }

    fn comment_tally(&self, id: &CommentId) -> VoteTally {
        tally(
            self.comment_votes
                .iter()
                .filter(|((comment_id, _), _)| comment_id == id)
                .map(|(_, vote)| vote),
        )
    }

    fn summary(&self, proposal: &Proposal) -> ProposalSummary {
        let id = &proposal.id;
        ProposalSummary {
            proposal: proposal.clone(),
            author_name: self.display_name(&proposal.author_id),
            tally: self.proposal_tally(id),
            comment_count: self
                .comments
                .iter()
                .filter(|comment| &comment.proposal_id == id)
                .count() as u64,
            petition_count: self
                .votes
                .iter()
                .filter(|((proposal_id, _), record)| proposal_id == id && record.is_petition)
                .count() as u64,
        }
    }

    fn signatures<'a>(
        &'a self,
        id: &'a ProposalId,
    ) -> impl Iterator<Item = &'a PetitionRecord> + 'a {
        self.petitions
            .iter()
            .filter(move |((proposal_id, user_id), _)| {
                proposal_id == id
                    && self
                        .votes
                        .get(&(proposal_id.clone(), user_id.clone()))
                        .is_some_and(|vote| vote.is_petition)
            })
            .map(|(_, record)| record)
    }
}

/// Mutex-guarded entity store implementing the repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::connection("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_if_absent(&self, user: &User) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        if state.users.contains_key(&user.id) {
            return Ok(false);
        }
        state.users.insert(
            user.id.clone(),
            UserAccount {
                user: user.clone(),
                credentials: None,
            },
        );
        Ok(true)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    async fn set_credentials(
        &self,
        id: &UserId,
        credentials: &LoginCredentials,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let account = state
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::query(format!("user {id} not found")))?;
        account.credentials = Some(credentials.clone());
        Ok(())
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(account) = self.lock()?.users.get_mut(id) {
            account.user.last_login_at = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl ProposalRepository for InMemoryStore {
    async fn insert(&self, proposal: &Proposal) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&proposal.author_id) {
            return Err(StoreError::query("referenced record does not exist"));
        }
        state.proposals.push(proposal.clone());
        Ok(())
    }

    async fn find(&self, id: &ProposalId) -> Result<Option<Proposal>, StoreError> {
        Ok(self.lock()?.proposal(id).cloned())
    }

    async fn find_summary(&self, id: &ProposalId) -> Result<Option<ProposalSummary>, StoreError> {
        let state = self.lock()?;
        Ok(state.proposal(id).map(|proposal| state.summary(proposal)))
    }

    async fn list(
        &self,
        sort: ProposalSort,
        page: PageRequest,
    ) -> Result<ProposalPage, StoreError> {
        let state = self.lock()?;
        let mut summaries: Vec<_> = state
            .proposals
            .iter()
            .map(|proposal| state.summary(proposal))
            .collect();
        summaries.sort_by(|a, b| sort.compare(a, b));
        let total = summaries.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = summaries
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .collect();
        Ok(ProposalPage { items, total })
    }

    async fn set_trending(&self, id: &ProposalId, trending: bool) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let Some(proposal) = state.proposal_mut(id) else {
            return Ok(false);
        };
        proposal.trending = trending;
        Ok(true)
    }

    async fn set_asset_url(
        &self,
        id: &ProposalId,
        asset: ProposalAsset,
        url: &str,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let Some(proposal) = state.proposal_mut(id) else {
            return Ok(false);
        };
        let slot = match asset {
            ProposalAsset::Meme => &mut proposal.meme_url,
            ProposalAsset::ShareImage => &mut proposal.share_image_url,
        };
        *slot = Some(url.to_owned());
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.proposal(&comment.proposal_id).is_none()
            || !state.users.contains_key(&comment.user_id)
        {
            return Err(StoreError::query("referenced record does not exist"));
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn find(&self, id: &CommentId) -> Result<Option<Comment>, StoreError> {
        Ok(self
            .lock()?
            .comments
            .iter()
            .find(|comment| &comment.id == id)
            .cloned())
    }

    async fn list_for_proposal(
        &self,
        proposal_id: &ProposalId,
        viewer: Option<UserId>,
    ) -> Result<Vec<CommentView>, StoreError> {
        let state = self.lock()?;
        let mut views: Vec<_> = state
            .comments
            .iter()
            .filter(|comment| &comment.proposal_id == proposal_id)
            .map(|comment| CommentView {
                comment: comment.clone(),
                author_name: state.display_name(&comment.user_id),
                tally: state.comment_tally(&comment.id),
                viewer_vote: viewer.as_ref().and_then(|viewer| {
                    state
                        .comment_votes
                        .get(&(comment.id.clone(), viewer.clone()))
                        .copied()
                }),
            })
            .collect();
        views.sort_by(|a, b| {
            a.comment
                .created_at
                .cmp(&b.comment.created_at)
                .then_with(|| a.comment.id.cmp(&b.comment.id))
        });
        Ok(views)
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn toggle_proposal_vote(
        &self,
        toggle: &ProposalVoteToggle,
    ) -> Result<VoteAction, StoreError> {
        let mut state = self.lock()?;
        let key = (toggle.proposal_id.clone(), toggle.user_id.clone());
        let existing = state.votes.get(&key).map(|record| record.vote_type);
        let action = toggle_action(existing, toggle.vote_type);
        if action == VoteAction::Removed {
            state.votes.remove(&key);
            return Ok(action);
        }
        state.votes.insert(
            key.clone(),
            VoteRecord {
                vote_type: toggle.vote_type,
                is_petition: toggle.is_petition,
            },
        );
        if let Some(details) = &toggle.petition {
            state.petitions.insert(
                key,
                PetitionRecord {
                    details: details.clone(),
                    verified: true,
                },
            );
        }
        Ok(action)
    }

    async fn toggle_comment_vote(
        &self,
        toggle: &CommentVoteToggle,
    ) -> Result<VoteAction, StoreError> {
        let mut state = self.lock()?;
        let key = (toggle.comment_id.clone(), toggle.user_id.clone());
        let action = toggle_action(state.comment_votes.get(&key).copied(), toggle.vote_type);
        if action == VoteAction::Removed {
            state.comment_votes.remove(&key);
        } else {
            state.comment_votes.insert(key, toggle.vote_type);
        }
        Ok(action)
    }

    async fn proposal_tally(&self, id: &ProposalId) -> Result<VoteTally, StoreError> {
        Ok(self.lock()?.proposal_tally(id))
    }

    async fn comment_tally(&self, id: &CommentId) -> Result<VoteTally, StoreError> {
        Ok(self.lock()?.comment_tally(id))
    }

    async fn find_proposal_vote(
        &self,
        id: &ProposalId,
        user_id: &UserId,
    ) -> Result<Option<StoredVote>, StoreError> {
        Ok(self
            .lock()?
            .votes
            .get(&(id.clone(), user_id.clone()))
            .map(|record| StoredVote {
                vote_type: record.vote_type,
                is_petition: record.is_petition,
            }))
    }

    async fn find_comment_vote(
        &self,
        id: &CommentId,
        user_id: &UserId,
    ) -> Result<Option<VoteType>, StoreError> {
        Ok(self
            .lock()?
            .comment_votes
            .get(&(id.clone(), user_id.clone()))
            .copied())
    }
}

#[async_trait]
impl PetitionRepository for InMemoryStore {
    async fn stats(&self, id: &ProposalId) -> Result<PetitionStats, StoreError> {
        let state = self.lock()?;
        let mut total = 0u64;
        let mut verified = 0u64;
        let mut postcodes: HashMap<&str, u64> = HashMap::new();
        for record in state.signatures(id) {
            total += 1;
            if record.verified {
                verified += 1;
            }
            *postcodes.entry(record.details.postcode()).or_default() += 1;
        }
        let top_postcodes = rank_postcodes(
            postcodes
                .into_iter()
                .map(|(postcode, count)| PostcodeCount {
                    postcode: postcode.to_owned(),
                    count,
                })
                .collect(),
        );
        Ok(PetitionStats {
            proposal_id: id.clone(),
            total_signatures: total,
            verified_signatures: verified,
            top_postcodes,
        })
    }
}
