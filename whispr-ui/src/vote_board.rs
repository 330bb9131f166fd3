use leptos::prelude::*;
use leptos::task::spawn_local;
use whispr_app::application::{PendingVote, VoteBook, VoteCoordinator, VoteOutcome, VoteStore};
use whispr_app::domain::{Votable, VoteDirection, VoteRecord, VoteState, VoteTally, VoteTarget};
use whispr_errors::AppError;

use crate::api::{ServerFnUsers, ServerFnVotes};
use crate::components::ToastSink;
use crate::session::SessionContext;

type Coordinator = VoteCoordinator<ServerFnVotes, ServerFnUsers, SessionContext, ToastSink>;

/// Reactive list of votable items plus the vote book that tracks the
/// viewer's votes on them.
pub struct VoteBoard<T: Send + Sync + 'static> {
    items: RwSignal<Vec<T>>,
    book: RwSignal<VoteBook>,
    session: SessionContext,
    toasts: ToastSink,
}

impl<T: Send + Sync + 'static> Clone for VoteBoard<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for VoteBoard<T> {}

impl<T> VoteBoard<T>
where
    T: Votable + Clone + Send + Sync + 'static,
{
    pub fn new(session: SessionContext, toasts: ToastSink) -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            book: RwSignal::new(VoteBook::new()),
            session,
            toasts,
        }
    }

    /// Board bound to the session and toasts found in context.
    pub fn from_context() -> Self {
        Self::new(
            expect_context::<SessionContext>(),
            expect_context::<ToastSink>(),
        )
    }

    pub fn items(&self) -> RwSignal<Vec<T>> {
        self.items
    }

    pub fn load(&self, items: Vec<T>, votes: &[VoteRecord]) {
        self.items.set(items);
        self.book.set(VoteBook::from_records(votes));
    }

    pub fn append(&self, more: Vec<T>, votes: &[VoteRecord]) {
        self.items.update(|items| items.extend(more));
        self.book.update(|book| book.sync_from(votes));
    }

    pub fn state_of(&self, target: VoteTarget) -> VoteState {
        self.book.with(|book| book.state_of(target))
    }

    pub fn is_pending(&self, target: VoteTarget) -> bool {
        self.book.with(|book| book.is_pending(target))
    }

    pub fn tally_of(&self, target: VoteTarget) -> VoteTally {
        self.items.with(|items| {
            items
                .iter()
                .find(|item| item.target() == target)
                .map(Votable::tally)
                .unwrap_or_default()
        })
    }

    fn coordinator(&self) -> Coordinator {
        VoteCoordinator::new(ServerFnVotes, ServerFnUsers, self.session, self.toasts)
    }

    /// Handles a vote click: applies the optimistic tally right away and
    /// reconciles once the backend answers.
    pub fn cast(&self, target: VoteTarget, clicked: VoteDirection) {
        let board = *self;
        spawn_local(async move {
            if let Err(e) = board.coordinator().cast(&board, target, clicked).await {
                tracing::debug!(?target, "vote not sent: {}", e);
            }
        });
    }
}

impl<T> VoteStore for VoteBoard<T>
where
    T: Votable + Clone + Send + Sync + 'static,
{
    fn begin(
        &self,
        voter_id: uuid::Uuid,
        target: VoteTarget,
        clicked: VoteDirection,
    ) -> Result<PendingVote, AppError> {
        let item = self
            .items
            .try_with_untracked(|items| items.iter().find(|item| item.target() == target).cloned())
            .flatten()
            .ok_or_else(|| AppError::NotFound(format!("{target:?} is not on this page")))?;
        self.book
            .try_update(|book| book.begin(voter_id, &item, clicked))
            .unwrap_or_else(|| Err(AppError::Internal("vote board disposed".to_string())))
    }

    fn settle(
        &self,
        pending: &PendingVote,
        result: Result<Option<VoteRecord>, AppError>,
    ) -> VoteOutcome {
        self.book
            .try_update(|book| book.settle(pending, result))
            .unwrap_or(VoteOutcome::Stale)
    }

    fn set_tally(&self, target: VoteTarget, tally: VoteTally) {
        self.items.update(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.target() == target) {
                item.set_tally(tally);
            }
        });
    }

    fn sync(&self, records: &[VoteRecord]) {
        self.book.update(|book| book.sync_from(records));
    }

    fn in_flight(&self, target: VoteTarget) -> bool {
        self.book
            .try_with_untracked(|book| book.is_pending(target))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::reactive::owner::Owner;
    use std::sync::Mutex;
    use whispr_app::application::{UserService, VoteService};
    use whispr_app::domain::{Review, User};

    /// Backend that accepts creates and rejects everything else.
    #[derive(Default)]
    struct FlakyVotes {
        refuse: Mutex<Option<AppError>>,
    }

    impl VoteService for &FlakyVotes {
        async fn create_vote(
            &self,
            target: VoteTarget,
            direction: VoteDirection,
        ) -> Result<VoteRecord, AppError> {
            if let Some(e) = self.refuse.lock().unwrap().take() {
                return Err(e);
            }
            Ok(VoteRecord {
                id: uuid::Uuid::new_v4(),
                user_id: uuid::Uuid::nil(),
                review_id: Some(target.id()),
                reply_id: None,
                vote_type: direction.as_vote_type(),
                created_at: None,
                updated_at: None,
            })
        }

        async fn update_vote(
            &self,
            _target: VoteTarget,
            _direction: VoteDirection,
        ) -> Result<VoteRecord, AppError> {
            Err(AppError::Network("connection reset".to_string()))
        }

        async fn delete_vote(&self, _vote_id: uuid::Uuid) -> Result<(), AppError> {
            Err(AppError::Network("connection reset".to_string()))
        }

        async fn my_votes(&self) -> Result<Vec<VoteRecord>, AppError> {
            Ok(Vec::new())
        }

        async fn tally(&self, _target: VoteTarget) -> Result<VoteTally, AppError> {
            Err(AppError::Timeout)
        }
    }

    struct SameUser(User);

    impl UserService for SameUser {
        async fn current_user(&self) -> Result<User, AppError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_board_rolls_back_rejected_switch() {
        let owner = Owner::new();
        let voter = User::new("quietfox".to_string(), 12);
        let review = Review::new(uuid::Uuid::new_v4(), 4, None).with_tally(5, 1);
        let target = review.target();

        let (board, session, toasts) = owner.with(|| {
            let session = SessionContext::new();
            session.set(Some(voter.clone()));
            let toasts = ToastSink::new();
            let board = VoteBoard::<Review>::new(session, toasts);
            board.load(vec![review], &[]);
            (board, session, toasts)
        });
        let votes = FlakyVotes::default();
        let coordinator = VoteCoordinator::new(&votes, SameUser(voter), session, toasts);

        coordinator
            .cast(&board, target, VoteDirection::Up)
            .await
            .unwrap();
        assert_eq!(board.tally_of(target), VoteTally::new(6, 1));
        assert_eq!(board.state_of(target), VoteState::Up);

        let outcome = coordinator
            .cast(&board, target, VoteDirection::Down)
            .await
            .unwrap();

        assert!(matches!(outcome, VoteOutcome::RolledBack { .. }));
        assert_eq!(board.tally_of(target), VoteTally::new(6, 1));
        assert_eq!(board.state_of(target), VoteState::Up);
        assert!(!board.is_pending(target));
        let messages: Vec<String> = toasts.current().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["Failed to vote, please try again".to_string()]);
    }

    #[tokio::test]
    async fn test_board_shows_reason_for_refused_vote() {
        let owner = Owner::new();
        let voter = User::new("quietfox".to_string(), 12);
        let review = Review::new(voter.id, 5, None).with_tally(0, 0);
        let target = review.target();

        let (board, session, toasts) = owner.with(|| {
            let session = SessionContext::new();
            session.set(Some(voter.clone()));
            let toasts = ToastSink::new();
            let board = VoteBoard::<Review>::new(session, toasts);
            board.load(vec![review], &[]);
            (board, session, toasts)
        });
        let votes = FlakyVotes::default();
        *votes.refuse.lock().unwrap() = Some(AppError::BadRequest(
            "You cannot vote on your own review".to_string(),
        ));
        let coordinator = VoteCoordinator::new(&votes, SameUser(voter), session, toasts);

        coordinator
            .cast(&board, target, VoteDirection::Up)
            .await
            .unwrap();

        assert_eq!(board.tally_of(target), VoteTally::new(0, 0));
        assert_eq!(board.state_of(target), VoteState::None);
        assert_eq!(toasts.current()[0].level, whispr_app::application::ToastLevel::Error);
        assert_eq!(toasts.current()[0].message, "You cannot vote on your own review");
    }
}
