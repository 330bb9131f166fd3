use super::user::User;
use super::vote::{Votable, VoteTally, VoteTarget};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: uuid::Uuid,
    pub review_id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub content: String,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub user: Option<User>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Reply {
    pub fn new(review_id: uuid::Uuid, user_id: uuid::Uuid, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            review_id,
            user_id,
            content,
            upvotes: 0,
            downvotes: 0,
            is_edited: false,
            user: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Votable for Reply {
    fn target(&self) -> VoteTarget {
        VoteTarget::Reply(self.id)
    }

    fn owner_id(&self) -> uuid::Uuid {
        self.user_id
    }

    fn tally(&self) -> VoteTally {
        VoteTally::new(self.upvotes, self.downvotes)
    }

    fn set_tally(&mut self, tally: VoteTally) {
        self.upvotes = tally.upvotes;
        self.downvotes = tally.downvotes;
    }
}
