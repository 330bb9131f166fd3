use crate::domain::{
    apply_vote, Votable, VoteDirection, VoteOp, VoteRecord, VoteState, VoteTally, VoteTarget,
};
use std::collections::HashMap;
use whispr_errors::AppError;

/// The current user's vote on one entity as far as this view knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastVote {
    pub direction: VoteDirection,
    /// Unknown while the `create` that produced this vote is still in flight.
    pub record_id: Option<uuid::Uuid>,
}

/// Tally and vote state of one entity at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteSnapshot {
    pub tally: VoteTally,
    pub vote: Option<CastVote>,
}

impl VoteSnapshot {
    pub fn state(&self) -> VoteState {
        self.vote
            .map(|v| VoteState::from(v.direction))
            .unwrap_or_default()
    }
}

/// Remote call with vote record ids resolved. `Update` needs no record id:
/// the backend's create endpoint rewrites an existing vote on the same target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteVoteOp {
    Create {
        target: VoteTarget,
        direction: VoteDirection,
    },
    Update {
        target: VoteTarget,
        direction: VoteDirection,
    },
    Delete {
        vote_id: uuid::Uuid,
    },
}

/// An optimistic vote awaiting the backend. Holds everything needed to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVote {
    pub request_id: u64,
    pub target: VoteTarget,
    pub self_owned: bool,
    pub op: RemoteVoteOp,
    pub before: VoteSnapshot,
    pub after: VoteSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Backend accepted the vote. `refresh_echoes` is false for self-owned content.
    Confirmed { tally: VoteTally, refresh_echoes: bool },
    /// Backend rejected the vote; `tally` is the restored pre-click value.
    RolledBack { tally: VoteTally, error: AppError },
    /// Local view disagrees with the backend; restore `tally` and reload votes.
    Resync { tally: VoteTally, error: AppError },
    /// A newer operation replaced this one; nothing to apply.
    Stale,
}

impl VoteOutcome {
    /// Tally the entity must be put back to, if the optimistic one was undone.
    pub fn restored_tally(&self) -> Option<VoteTally> {
        match self {
            Self::RolledBack { tally, .. } | Self::Resync { tally, .. } => Some(*tally),
            Self::Confirmed { .. } | Self::Stale => None,
        }
    }
}

/// Where a view keeps its vote cache and entity tallies while a vote runs.
///
/// Methods take `&self` so reactive stores can implement it over signals.
pub trait VoteStore {
    fn begin(
        &self,
        voter_id: uuid::Uuid,
        target: VoteTarget,
        clicked: VoteDirection,
    ) -> Result<PendingVote, AppError>;

    fn settle(
        &self,
        pending: &PendingVote,
        result: Result<Option<VoteRecord>, AppError>,
    ) -> VoteOutcome;

    fn set_tally(&self, target: VoteTarget, tally: VoteTally);

    fn sync(&self, records: &[VoteRecord]);

    fn in_flight(&self, target: VoteTarget) -> bool;
}

/// Vote cache and in-flight operations for one view.
///
/// At most one operation per target is in flight; a second click on the same
/// target is refused until the first one settles.
#[derive(Debug, Clone, Default)]
pub struct VoteBook {
    votes: HashMap<VoteTarget, CastVote>,
    in_flight: HashMap<VoteTarget, u64>,
    next_request_id: u64,
}

impl VoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[VoteRecord]) -> Self {
        let mut book = Self::new();
        book.sync_from(records);
        book
    }

    pub fn state_of(&self, target: VoteTarget) -> VoteState {
        self.votes
            .get(&target)
            .map(|v| VoteState::from(v.direction))
            .unwrap_or_default()
    }

    pub fn is_pending(&self, target: VoteTarget) -> bool {
        self.in_flight.contains_key(&target)
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Applies a click optimistically and returns the operation to send.
    pub fn begin<E: Votable + ?Sized>(
        &mut self,
        voter_id: uuid::Uuid,
        entity: &E,
        clicked: VoteDirection,
    ) -> Result<PendingVote, AppError> {
        let target = entity.target();
        if self.is_pending(target) {
            return Err(AppError::VotePending);
        }

        let current = self.votes.get(&target).copied();
        let before = VoteSnapshot {
            tally: entity.tally(),
            vote: current,
        };
        let transition = apply_vote(before.tally, before.state(), clicked);

        let op = match transition.op {
            VoteOp::Create(direction) => RemoteVoteOp::Create { target, direction },
            VoteOp::Update(direction) => RemoteVoteOp::Update { target, direction },
            VoteOp::Delete => RemoteVoteOp::Delete {
                vote_id: Self::record_id(current)?,
            },
        };

        let after_vote = transition.new_state.direction().map(|direction| CastVote {
            direction,
            record_id: match op {
                RemoteVoteOp::Create { .. } => None,
                _ => current.and_then(|v| v.record_id),
            },
        });
        let after = VoteSnapshot {
            tally: transition.tally,
            vote: after_vote,
        };

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.in_flight.insert(target, request_id);
        self.store(target, after.vote);

        Ok(PendingVote {
            request_id,
            target,
            self_owned: entity.owner_id() == voter_id,
            op,
            before,
            after,
        })
    }

    /// Folds the backend's answer for `pending` back into the cache.
    pub fn settle(
        &mut self,
        pending: &PendingVote,
        result: Result<Option<VoteRecord>, AppError>,
    ) -> VoteOutcome {
        if self.in_flight.get(&pending.target) != Some(&pending.request_id) {
            tracing::debug!(request_id = pending.request_id, "ignoring stale vote result");
            return VoteOutcome::Stale;
        }
        self.in_flight.remove(&pending.target);

        let result = match (result, pending.op) {
            // Already gone on the server is what we wanted anyway.
            (Err(AppError::NotFound(_)), RemoteVoteOp::Delete { .. }) => Ok(None),
            (other, _) => other,
        };

        match result {
            Ok(record) => {
                if let (Some(record), Some(mut vote)) = (record, pending.after.vote) {
                    vote.record_id = Some(record.id);
                    self.store(pending.target, Some(vote));
                }
                VoteOutcome::Confirmed {
                    tally: pending.after.tally,
                    refresh_echoes: !pending.self_owned,
                }
            }
            Err(error) => {
                self.store(pending.target, pending.before.vote);
                let needs_resync = error.is_recoverable_by_resync()
                    || matches!(
                        (&error, pending.op),
                        (AppError::NotFound(_), RemoteVoteOp::Update { .. })
                    );
                tracing::warn!(
                    request_id = pending.request_id,
                    %error,
                    needs_resync,
                    "rolling back optimistic vote"
                );
                if needs_resync {
                    VoteOutcome::Resync {
                        tally: pending.before.tally,
                        error,
                    }
                } else {
                    VoteOutcome::RolledBack {
                        tally: pending.before.tally,
                        error,
                    }
                }
            }
        }
    }

    /// Replaces the cache with server truth, keeping targets that still have
    /// an operation in flight.
    pub fn sync_from(&mut self, records: &[VoteRecord]) {
        let in_flight = &self.in_flight;
        self.votes.retain(|target, _| in_flight.contains_key(target));

        for record in records {
            let Some(target) = record.target() else {
                tracing::warn!(vote_id = %record.id, "vote record without a single target");
                continue;
            };
            if self.in_flight.contains_key(&target) {
                continue;
            }
            self.votes.insert(
                target,
                CastVote {
                    direction: record.direction(),
                    record_id: Some(record.id),
                },
            );
        }
    }

    fn store(&mut self, target: VoteTarget, vote: Option<CastVote>) {
        match vote {
            Some(vote) => {
                self.votes.insert(target, vote);
            }
            None => {
                self.votes.remove(&target);
            }
        }
    }

    fn record_id(current: Option<CastVote>) -> Result<uuid::Uuid, AppError> {
        current
            .and_then(|v| v.record_id)
            .ok_or_else(|| AppError::Conflict("vote record id unknown".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Review;

    fn review(owner: uuid::Uuid) -> Review {
        Review::new(owner, 4, Some("solid lectures".to_string())).with_tally(5, 1)
    }

    fn record_for(target: VoteTarget, direction: VoteDirection) -> VoteRecord {
        let (review_id, reply_id) = match target {
            VoteTarget::Review(id) => (Some(id), None),
            VoteTarget::Reply(id) => (None, Some(id)),
        };
        VoteRecord {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            review_id,
            reply_id,
            vote_type: direction.as_vote_type(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_first_vote_creates() {
        let voter = uuid::Uuid::new_v4();
        let entity = review(uuid::Uuid::new_v4());
        let mut book = VoteBook::new();

        let pending = book.begin(voter, &entity, VoteDirection::Up).unwrap();
        assert_eq!(pending.after.tally, VoteTally::new(6, 1));
        assert_eq!(pending.after.state(), VoteState::Up);
        assert_eq!(
            pending.op,
            RemoteVoteOp::Create {
                target: entity.target(),
                direction: VoteDirection::Up
            }
        );
        assert_eq!(book.state_of(entity.target()), VoteState::Up);
        assert!(book.is_pending(entity.target()));
        assert!(!pending.self_owned);
    }

    #[test]
    fn test_confirmed_create_stores_record_id() {
        let voter = uuid::Uuid::new_v4();
        let mut entity = review(uuid::Uuid::new_v4());
        let mut book = VoteBook::new();

        let pending = book.begin(voter, &entity, VoteDirection::Up).unwrap();
        entity.set_tally(pending.after.tally);
        let record = record_for(entity.target(), VoteDirection::Up);
        let record_id = record.id;
        let outcome = book.settle(&pending, Ok(Some(record)));

        assert_eq!(
            outcome,
            VoteOutcome::Confirmed {
                tally: VoteTally::new(6, 1),
                refresh_echoes: true
            }
        );
        assert!(!book.is_pending(entity.target()));

        // Clicking Up again now deletes the stored record.
        let pending = book.begin(voter, &entity, VoteDirection::Up).unwrap();
        assert_eq!(pending.op, RemoteVoteOp::Delete { vote_id: record_id });
        assert_eq!(pending.after.tally, VoteTally::new(5, 1));
    }

    #[test]
    fn test_rejected_switch_rolls_back() {
        let voter = uuid::Uuid::new_v4();
        let entity = review(uuid::Uuid::new_v4());
        let existing = record_for(entity.target(), VoteDirection::Up);
        let mut book = VoteBook::from_records(&[existing.clone()]);

        let pending = book.begin(voter, &entity, VoteDirection::Down).unwrap();
        assert_eq!(pending.after.tally, VoteTally::new(4, 2));
        assert_eq!(
            pending.op,
            RemoteVoteOp::Update {
                target: entity.target(),
                direction: VoteDirection::Down
            }
        );

        let outcome = book.settle(&pending, Err(AppError::Network("offline".to_string())));
        assert_eq!(
            outcome,
            VoteOutcome::RolledBack {
                tally: VoteTally::new(5, 1),
                error: AppError::Network("offline".to_string())
            }
        );
        assert_eq!(book.state_of(entity.target()), VoteState::Up);
    }

    #[test]
    fn test_second_click_while_pending_is_refused() {
        let voter = uuid::Uuid::new_v4();
        let entity = review(uuid::Uuid::new_v4());
        let mut book = VoteBook::new();

        let _first = book.begin(voter, &entity, VoteDirection::Up).unwrap();
        let second = book.begin(voter, &entity, VoteDirection::Down);
        assert_eq!(second, Err(AppError::VotePending));
        assert_eq!(book.state_of(entity.target()), VoteState::Up);
    }

    #[test]
    fn test_entities_settle_independently() {
        let voter = uuid::Uuid::new_v4();
        let a = review(uuid::Uuid::new_v4());
        let b = review(uuid::Uuid::new_v4());
        let mut book = VoteBook::new();

        let pa = book.begin(voter, &a, VoteDirection::Up).unwrap();
        let pb = book.begin(voter, &b, VoteDirection::Down).unwrap();
        assert_eq!(book.pending_count(), 2);

        // Resolve out of order: b fails, a succeeds.
        let ob = book.settle(&pb, Err(AppError::Timeout));
        let oa = book.settle(&pa, Ok(Some(record_for(a.target(), VoteDirection::Up))));

        assert!(matches!(ob, VoteOutcome::RolledBack { .. }));
        assert!(matches!(oa, VoteOutcome::Confirmed { .. }));
        assert_eq!(book.state_of(a.target()), VoteState::Up);
        assert_eq!(book.state_of(b.target()), VoteState::None);
    }

    #[test]
    fn test_delete_not_found_is_tolerated() {
        let voter = uuid::Uuid::new_v4();
        let entity = review(uuid::Uuid::new_v4());
        let mut book =
            VoteBook::from_records(&[record_for(entity.target(), VoteDirection::Down)]);

        let pending = book.begin(voter, &entity, VoteDirection::Down).unwrap();
        let outcome = book.settle(&pending, Err(AppError::NotFound("Vote not found".to_string())));
        assert!(matches!(outcome, VoteOutcome::Confirmed { .. }));
        assert_eq!(book.state_of(entity.target()), VoteState::None);
    }

    #[test]
    fn test_conflict_asks_for_resync() {
        let voter = uuid::Uuid::new_v4();
        let entity = review(uuid::Uuid::new_v4());
        let mut book = VoteBook::new();

        let pending = book.begin(voter, &entity, VoteDirection::Up).unwrap();
        let outcome = book.settle(&pending, Err(AppError::Conflict("exists".to_string())));
        assert!(matches!(outcome, VoteOutcome::Resync { tally, .. } if tally == VoteTally::new(5, 1)));
        assert_eq!(book.state_of(entity.target()), VoteState::None);
    }

    #[test]
    fn test_self_owned_content_skips_echo_refresh() {
        let voter = uuid::Uuid::new_v4();
        let entity = review(voter);
        let mut book = VoteBook::new();

        let pending = book.begin(voter, &entity, VoteDirection::Up).unwrap();
        assert!(pending.self_owned);
        let outcome = book.settle(&pending, Ok(Some(record_for(entity.target(), VoteDirection::Up))));
        assert!(matches!(
            outcome,
            VoteOutcome::Confirmed {
                refresh_echoes: false,
                ..
            }
        ));
    }

    #[test]
    fn test_settling_twice_is_stale() {
        let voter = uuid::Uuid::new_v4();
        let entity = review(uuid::Uuid::new_v4());
        let mut book = VoteBook::new();

        let pending = book.begin(voter, &entity, VoteDirection::Up).unwrap();
        book.settle(&pending, Err(AppError::Timeout));
        assert_eq!(book.settle(&pending, Ok(None)), VoteOutcome::Stale);
    }

    #[test]
    fn test_sync_keeps_in_flight_targets() {
        let voter = uuid::Uuid::new_v4();
        let pending_entity = review(uuid::Uuid::new_v4());
        let other = review(uuid::Uuid::new_v4());
        let mut book = VoteBook::new();

        book.begin(voter, &pending_entity, VoteDirection::Up).unwrap();
        book.sync_from(&[
            record_for(pending_entity.target(), VoteDirection::Down),
            record_for(other.target(), VoteDirection::Down),
        ]);

        assert_eq!(book.state_of(pending_entity.target()), VoteState::Up);
        assert_eq!(book.state_of(other.target()), VoteState::Down);
    }
}
