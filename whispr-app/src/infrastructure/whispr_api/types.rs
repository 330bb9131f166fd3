use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct VoteCreateRequest {
    pub vote_type: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<uuid::Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<uuid::Uuid>,
}

#[derive(Debug, Serialize)]
pub struct NotificationUpdateRequest {
    pub is_read: bool,
}

#[derive(Debug, Serialize)]
pub struct PageQuery {
    pub skip: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct ReviewQuery {
    pub user_id: uuid::Uuid,
    pub skip: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct ReplyQuery {
    pub review_id: uuid::Uuid,
}

/// FastAPI error body. `detail` is a string for handled errors and a list
/// of field errors for validation failures.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub detail: serde_json::Value,
}

impl ErrorResponse {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl VoteCreateRequest {
    pub fn new(target: crate::domain::VoteTarget, direction: crate::domain::VoteDirection) -> Self {
        use crate::domain::VoteTarget;

        let (review_id, reply_id) = match target {
            VoteTarget::Review(id) => (Some(id), None),
            VoteTarget::Reply(id) => (None, Some(id)),
        };
        Self {
            vote_type: direction.as_vote_type(),
            review_id,
            reply_id,
        }
    }
}
