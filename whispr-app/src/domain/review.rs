use super::user::User;
use super::vote::{Votable, VoteTally, VoteTarget};
use serde::{Deserialize, Serialize};

/// A course or professor review, optionally with its author embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub rating: u8,
    pub content: Option<String>,
    pub course_id: Option<uuid::Uuid>,
    pub professor_id: Option<uuid::Uuid>,
    pub course_instructor_id: Option<uuid::Uuid>,
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

impl Review {
    pub fn new(user_id: uuid::Uuid, rating: u8, content: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id,
            rating,
            content,
            course_id: None,
            professor_id: None,
            course_instructor_id: None,
            upvotes: 0,
            downvotes: 0,
            is_edited: false,
            user: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_tally(mut self, upvotes: u32, downvotes: u32) -> Self {
        self.upvotes = upvotes;
        self.downvotes = downvotes;
        self
    }

    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("anonymous")
    }
}

impl Votable for Review {
    fn target(&self) -> VoteTarget {
        VoteTarget::Review(self.id)
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
