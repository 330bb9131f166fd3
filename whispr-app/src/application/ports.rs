use crate::domain::{User, VoteDirection, VoteRecord, VoteTally, VoteTarget};
use whispr_errors::AppError;

// Implementations in the browser wrap server functions whose futures are not
// `Send`, so these traits stay generic-only and carry no `Send` bounds.
#[allow(async_fn_in_trait)]
pub trait VoteService {
    async fn create_vote(
        &self,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteRecord, AppError>;

    /// Switches the direction of the caller's existing vote on `target`.
    async fn update_vote(
        &self,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteRecord, AppError>;

    async fn delete_vote(&self, vote_id: uuid::Uuid) -> Result<(), AppError>;

    /// Every vote the current user has cast.
    async fn my_votes(&self) -> Result<Vec<VoteRecord>, AppError>;

    /// Authoritative counts for a review or reply.
    async fn tally(&self, target: VoteTarget) -> Result<VoteTally, AppError>;
}

#[allow(async_fn_in_trait)]
pub trait UserService {
    async fn current_user(&self) -> Result<User, AppError>;
}

/// Read access to the logged-in user, plus a way to publish a fresher copy.
pub trait SessionProvider {
    fn user(&self) -> Option<User>;
    fn replace_user(&self, user: User);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub trait NotificationSink {
    fn notify(&self, level: ToastLevel, message: &str);
}
