mod ports;
mod vote_book;
mod vote_coordinator;

pub use ports::{NotificationSink, SessionProvider, ToastLevel, UserService, VoteService};
pub use vote_book::{
    CastVote, PendingVote, RemoteVoteOp, VoteBook, VoteOutcome, VoteSnapshot,
    VoteStore,
};
pub use vote_coordinator::{dispatch, FollowUp, VoteCoordinator};
