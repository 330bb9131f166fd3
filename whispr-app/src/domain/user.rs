use super::rank::{progress_of, rank_of, RankProgress, RankTier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: uuid::Uuid,
    pub username: String,
    pub bio: Option<String>,
    pub student_since_year: Option<i32>,
    #[serde(default)]
    pub is_muffled: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub echoes: i64,
    #[serde(default)]
    pub followers_count: Option<u32>,
    #[serde(default)]
    pub following_count: Option<u32>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn new(username: String, echoes: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            username,
            bio: None,
            student_since_year: None,
            is_muffled: false,
            is_admin: false,
            echoes,
            followers_count: None,
            following_count: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_muffled(mut self, is_muffled: bool) -> Self {
        self.is_muffled = is_muffled;
        self
    }

    pub fn rank(&self) -> RankTier {
        rank_of(self.echoes)
    }

    pub fn rank_progress(&self) -> RankProgress {
        progress_of(self.echoes)
    }

    pub fn can_vote(&self) -> bool {
        !self.is_muffled
    }
}
