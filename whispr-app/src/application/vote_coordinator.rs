use super::ports::{NotificationSink, SessionProvider, ToastLevel, UserService, VoteService};
use super::vote_book::{PendingVote, RemoteVoteOp, VoteBook, VoteOutcome, VoteStore};
use crate::domain::{Votable, VoteDirection, VoteRecord, VoteTally, VoteTarget};
use std::cell::RefCell;
use whispr_errors::AppError;

/// Sends a resolved vote operation to the backend.
pub async fn dispatch<V: VoteService>(
    service: &V,
    op: &RemoteVoteOp,
) -> Result<Option<VoteRecord>, AppError> {
    match *op {
        RemoteVoteOp::Create { target, direction } => {
            service.create_vote(target, direction).await.map(Some)
        }
        RemoteVoteOp::Update { target, direction } => {
            service.update_vote(target, direction).await.map(Some)
        }
        RemoteVoteOp::Delete { vote_id } => service.delete_vote(vote_id).await.map(|_| None),
    }
}

/// Server state to fold back into the store once a vote has settled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FollowUp {
    pub records: Option<Vec<VoteRecord>>,
    pub tally: Option<VoteTally>,
}

/// Runs a vote click end to end: gate, optimistic update, remote call,
/// settle, then re-read the server's tally.
#[derive(Clone)]
pub struct VoteCoordinator<V, U, S, N> {
    votes: V,
    users: U,
    session: S,
    sink: N,
}

impl<V, U, S, N> VoteCoordinator<V, U, S, N>
where
    V: VoteService,
    U: UserService,
    S: SessionProvider,
    N: NotificationSink,
{
    pub fn new(votes: V, users: U, session: S, sink: N) -> Self {
        Self {
            votes,
            users,
            session,
            sink,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Checks that a vote may be attempted at all. Nothing is mutated on failure.
    fn authorize(&self) -> Result<uuid::Uuid, AppError> {
        let error = match self.session.user() {
            Some(user) if user.can_vote() => return Ok(user.id),
            Some(_) => AppError::Muffled,
            None => AppError::Unauthorized,
        };
        self.sink.notify(ToastLevel::Error, error.vote_failure_message());
        Err(error)
    }

    /// Reports a click the store refused. Returns fresh vote records when the
    /// store has to be resynced.
    async fn refused(&self, error: &AppError) -> Option<Vec<VoteRecord>> {
        match error {
            AppError::VotePending => {
                self.sink.notify(ToastLevel::Info, error.user_message());
                None
            }
            _ => self.fetch_votes().await,
        }
    }

    /// Full vote flow against any store. The optimistic tally is applied
    /// before the first await.
    pub async fn cast<T: VoteStore + ?Sized>(
        &self,
        store: &T,
        target: VoteTarget,
        clicked: VoteDirection,
    ) -> Result<VoteOutcome, AppError> {
        let voter_id = self.authorize()?;

        let pending = match store.begin(voter_id, target, clicked) {
            Ok(pending) => pending,
            Err(error) => {
                if let Some(records) = self.refused(&error).await {
                    store.sync(&records);
                }
                return Err(error);
            }
        };
        store.set_tally(target, pending.after.tally);

        let result = dispatch(&self.votes, &pending.op).await;
        let outcome = store.settle(&pending, result);
        if let Some(tally) = outcome.restored_tally() {
            store.set_tally(target, tally);
        }

        let follow_up = self.follow_up(&pending, &outcome).await;
        if let Some(records) = &follow_up.records {
            store.sync(records);
        }
        // A newer click owns the tally now.
        if let Some(tally) = follow_up.tally {
            if !store.in_flight(target) {
                store.set_tally(target, tally);
            }
        }
        Ok(outcome)
    }

    /// `cast` for a caller that holds the book and the entity exclusively.
    pub async fn vote<E: Votable>(
        &self,
        book: &mut VoteBook,
        entity: &mut E,
        clicked: VoteDirection,
    ) -> Result<VoteOutcome, AppError> {
        let target = entity.target();
        let store = Exclusive {
            book: RefCell::new(book),
            entity: RefCell::new(entity),
        };
        self.cast(&store, target, clicked).await
    }

    /// Side effects of a settled vote: toasts, echo refresh, server tally,
    /// and fresh vote records when the outcome asks for a resync.
    async fn follow_up(&self, pending: &PendingVote, outcome: &VoteOutcome) -> FollowUp {
        match outcome {
            VoteOutcome::Confirmed { refresh_echoes, .. } => {
                if *refresh_echoes {
                    self.refresh_session().await;
                }
                FollowUp {
                    records: None,
                    tally: self.fetch_tally(pending.target).await,
                }
            }
            VoteOutcome::RolledBack { error, .. } => {
                self.sink.notify(ToastLevel::Error, error.vote_failure_message());
                FollowUp::default()
            }
            VoteOutcome::Resync { error, .. } => {
                let records = self.fetch_votes().await;
                let tally = self.fetch_tally(pending.target).await;
                self.sink.notify(ToastLevel::Info, error.user_message());
                FollowUp { records, tally }
            }
            VoteOutcome::Stale => {
                tracing::debug!(request_id = pending.request_id, "vote outcome superseded");
                FollowUp::default()
            }
        }
    }

    async fn fetch_votes(&self) -> Option<Vec<VoteRecord>> {
        match self.votes.my_votes().await {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("Failed to resync votes: {}", e);
                None
            }
        }
    }

    /// The optimistic tally stays in place when the re-read fails.
    async fn fetch_tally(&self, target: VoteTarget) -> Option<VoteTally> {
        match self.votes.tally(target).await {
            Ok(tally) => Some(tally),
            Err(e) => {
                tracing::warn!(?target, "Failed to re-read vote tally: {}", e);
                None
            }
        }
    }

    /// Echo totals are computed by the backend, so the session user is
    /// re-fetched rather than adjusted locally.
    pub async fn refresh_session(&self) {
        match self.users.current_user().await {
            Ok(user) => self.session.replace_user(user),
            Err(e) => tracing::warn!("Failed to refresh current user: {}", e),
        }
    }
}

/// Single-entity store over borrowed state. Borrows last for one step only.
struct Exclusive<'a, E> {
    book: RefCell<&'a mut VoteBook>,
    entity: RefCell<&'a mut E>,
}

impl<E: Votable> VoteStore for Exclusive<'_, E> {
    fn begin(
        &self,
        voter_id: uuid::Uuid,
        target: VoteTarget,
        clicked: VoteDirection,
    ) -> Result<PendingVote, AppError> {
        let entity = self.entity.borrow();
        if entity.target() != target {
            return Err(AppError::NotFound(format!("{target:?}")));
        }
        self.book.borrow_mut().begin(voter_id, &**entity, clicked)
    }

    fn settle(
        &self,
        pending: &PendingVote,
        result: Result<Option<VoteRecord>, AppError>,
    ) -> VoteOutcome {
        self.book.borrow_mut().settle(pending, result)
    }

    fn set_tally(&self, target: VoteTarget, tally: VoteTally) {
        let mut entity = self.entity.borrow_mut();
        if entity.target() == target {
            entity.set_tally(tally);
        }
    }

    fn sync(&self, records: &[VoteRecord]) {
        self.book.borrow_mut().sync_from(records);
    }

    fn in_flight(&self, target: VoteTarget) -> bool {
        self.book.borrow().is_pending(target)
    }
}
