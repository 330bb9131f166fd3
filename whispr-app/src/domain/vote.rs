use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Backend encoding: `true` is an upvote.
    pub fn as_vote_type(self) -> bool {
        matches!(self, Self::Up)
    }

    pub fn from_vote_type(vote_type: bool) -> Self {
        if vote_type {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// The current user's vote on one entity. Absence of a vote is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoteState {
    #[default]
    None,
    Up,
    Down,
}

impl From<VoteDirection> for VoteState {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => Self::Up,
            VoteDirection::Down => Self::Down,
        }
    }
}

impl VoteState {
    pub fn direction(self) -> Option<VoteDirection> {
        match self {
            Self::None => None,
            Self::Up => Some(VoteDirection::Up),
            Self::Down => Some(VoteDirection::Down),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: u32,
    pub downvotes: u32,
}

impl VoteTally {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self { upvotes, downvotes }
    }

    pub fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }

    pub fn total(&self) -> u64 {
        self.upvotes as u64 + self.downvotes as u64
    }

    fn add(mut self, direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => self.upvotes = self.upvotes.saturating_add(1),
            VoteDirection::Down => self.downvotes = self.downvotes.saturating_add(1),
        }
        self
    }

    fn remove(mut self, direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => self.upvotes = self.upvotes.saturating_sub(1),
            VoteDirection::Down => self.downvotes = self.downvotes.saturating_sub(1),
        }
        self
    }
}

/// Remote call implied by a transition, before vote record ids are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOp {
    Create(VoteDirection),
    Update(VoteDirection),
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub tally: VoteTally,
    pub new_state: VoteState,
    pub op: VoteOp,
}

/// Pure three-state toggle: clicking the active direction clears the vote,
/// clicking the other direction switches it.
pub fn apply_vote(tally: VoteTally, current: VoteState, clicked: VoteDirection) -> VoteTransition {
    match current.direction() {
        None => VoteTransition {
            tally: tally.add(clicked),
            new_state: clicked.into(),
            op: VoteOp::Create(clicked),
        },
        Some(active) if active == clicked => VoteTransition {
            tally: tally.remove(active),
            new_state: VoteState::None,
            op: VoteOp::Delete,
        },
        Some(active) => VoteTransition {
            tally: tally.remove(active).add(clicked),
            new_state: clicked.into(),
            op: VoteOp::Update(clicked),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteTarget {
    Review(uuid::Uuid),
    Reply(uuid::Uuid),
}

impl VoteTarget {
    pub fn id(&self) -> uuid::Uuid {
        match self {
            Self::Review(id) | Self::Reply(id) => *id,
        }
    }
}

/// A vote as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub review_id: Option<uuid::Uuid>,
    pub reply_id: Option<uuid::Uuid>,
    pub vote_type: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl VoteRecord {
    pub fn target(&self) -> Option<VoteTarget> {
        match (self.review_id, self.reply_id) {
            (Some(id), None) => Some(VoteTarget::Review(id)),
            (None, Some(id)) => Some(VoteTarget::Reply(id)),
            _ => None,
        }
    }

    pub fn direction(&self) -> VoteDirection {
        VoteDirection::from_vote_type(self.vote_type)
    }
}

/// Anything that carries an up/down tally the current user can vote on.
pub trait Votable {
    fn target(&self) -> VoteTarget;
    fn owner_id(&self) -> uuid::Uuid;
    fn tally(&self) -> VoteTally;
    fn set_tally(&mut self, tally: VoteTally);
}
