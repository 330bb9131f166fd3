mod client;
mod types;

pub use client::{auth_token_from_cookie_header, WhisprApiClient, AUTH_COOKIE};
