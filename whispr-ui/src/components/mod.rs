mod error_display;
mod loading_spinner;
mod muffled_banner;
mod rank_badge;
mod review_card;
mod toast;
mod vote_buttons;

pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use muffled_banner::MuffledBanner;
pub use rank_badge::{RankBadge, RankProgressBar};
pub use review_card::{ReviewCard, ReviewList};
pub use toast::{Toast, ToastHost, ToastSink};
pub use vote_buttons::VoteButtons;
