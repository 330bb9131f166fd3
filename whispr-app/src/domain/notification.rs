use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Mention,
    Vote,
    Reply,
    RankChange,
    System,
    Follow,
    FollowerReview,
    FollowerReply,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Mention => "@",
            Self::Vote => "▲",
            Self::Reply => "💬",
            Self::RankChange => "⭐",
            Self::System => "📣",
            Self::Follow => "👋",
            Self::FollowerReview | Self::FollowerReply => "📝",
        }
    }
}

/// Inbox entry kept by the backend for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: uuid::Uuid,
    pub username: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub content: String,
    pub source_id: Option<uuid::Uuid>,
    pub source_type: Option<String>,
    pub actor_username: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "id": "6f1c2a55-2d1e-4c7e-9d59-0e4f5f5b8a11",
            "username": "quietfox",
            "type": "RANK_CHANGE",
            "content": "You reached Reviewer",
            "source_id": null,
            "source_type": null,
            "actor_username": null,
            "is_read": false,
            "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind, NotificationKind::RankChange);
        assert!(!n.is_read);
    }
}
