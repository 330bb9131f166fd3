mod notification;
mod rank;
mod reply;
mod review;
mod user;
mod vote;

pub use notification::{Notification, NotificationKind};
pub use rank::{echoes_from_f64, progress_of, rank_of, RankProgress, RankTier};
pub use reply::Reply;
pub use review::Review;
pub use user::User;
pub use vote::{
    apply_vote, Votable, VoteDirection, VoteOp, VoteRecord, VoteState, VoteTally, VoteTarget,
    VoteTransition,
};
