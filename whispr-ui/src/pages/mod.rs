mod feed;
mod notifications;
mod profile;

pub use feed::FeedPage;
pub use notifications::NotificationsPage;
pub use profile::{MyReviewsPage, ProfilePage};
