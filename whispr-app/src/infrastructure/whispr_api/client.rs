use super::types::{
    ErrorResponse, NotificationUpdateRequest, PageQuery, ReplyQuery, ReviewQuery,
    VoteCreateRequest,
};
use crate::application::{UserService, VoteService};
use crate::domain::{
    Notification, Reply, Review, User, Votable, VoteDirection, VoteRecord, VoteTally, VoteTarget,
};
use crate::infrastructure::config::WhisprConfig;
use reqwest::header::{COOKIE, ACCEPT};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;
use whispr_errors::AppError;

/// Name of the cookie the backend issues after CAS login.
pub const AUTH_COOKIE: &str = "auth_token";

/// HTTP client for the Whispr backend. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone)]
pub struct WhisprApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl WhisprApiClient {
    pub fn new(config: &WhisprConfig) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.clone(),
            auth_token: None,
        })
    }

    /// Copy of this client that authenticates as the holder of `token`.
    pub fn with_auth_token(&self, token: Option<String>) -> Self {
        Self {
            auth_token: token,
            ..self.clone()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    pub async fn feed(&self, skip: u32, limit: u32) -> Result<Vec<Review>, AppError> {
        let req = self
            .request(Method::GET, "feed/")?
            .query(&PageQuery { skip, limit });
        self.send_json(req).await
    }

    pub async fn reviews_by_user(
        &self,
        user_id: uuid::Uuid,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Review>, AppError> {
        let req = self
            .request(Method::GET, "reviews/")?
            .query(&ReviewQuery {
                user_id,
                skip,
                limit,
            });
        self.send_json(req).await
    }

    pub async fn review(&self, review_id: uuid::Uuid) -> Result<Review, AppError> {
        let req = self.request(Method::GET, &format!("reviews/{review_id}"))?;
        self.send_json(req).await
    }

    pub async fn reply(&self, reply_id: uuid::Uuid) -> Result<Reply, AppError> {
        let req = self.request(Method::GET, &format!("replies/{reply_id}"))?;
        self.send_json(req).await
    }

    pub async fn replies_for(&self, review_id: uuid::Uuid) -> Result<Vec<Reply>, AppError> {
        let req = self
            .request(Method::GET, "replies/")?
            .query(&ReplyQuery { review_id });
        self.send_json(req).await
    }

    pub async fn user_by_username(&self, username: &str) -> Result<User, AppError> {
        if username.is_empty() || !username.chars().all(char::is_alphanumeric) {
            return Err(AppError::BadRequest(format!("invalid username {username:?}")));
        }
        let req = self.request(Method::GET, &format!("users/by-username/{username}"))?;
        self.send_json(req).await
    }

    pub async fn follow(&self, user_id: uuid::Uuid) -> Result<User, AppError> {
        let req = self.request(Method::POST, &format!("users/{user_id}/follow"))?;
        self.send_json(req).await
    }

    pub async fn unfollow(&self, user_id: uuid::Uuid) -> Result<User, AppError> {
        let req = self.request(Method::POST, &format!("users/{user_id}/unfollow"))?;
        self.send_json(req).await
    }

    pub async fn notifications(&self, skip: u32, limit: u32) -> Result<Vec<Notification>, AppError> {
        let req = self
            .request(Method::GET, "notifications/")?
            .query(&PageQuery { skip, limit });
        self.send_json(req).await
    }

    pub async fn mark_notification_read(&self, id: uuid::Uuid) -> Result<Notification, AppError> {
        let req = self
            .request(Method::PUT, &format!("notifications/{id}"))?
            .json(&NotificationUpdateRequest { is_read: true });
        self.send_json(req).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), AppError> {
        let req = self.request(Method::PUT, "notifications/mark-all-read")?;
        self.send_empty(req).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AppError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| AppError::Internal(format!("bad API path {path}: {e}")))?;

        let mut req = self
            .http_client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.auth_token {
            req = req.header(COOKIE, format!("{AUTH_COOKIE}={token}"));
        }
        Ok(req)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, AppError> {
        let response = self.execute(req).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to decode response: {}", e)))
    }

    async fn send_empty(&self, req: RequestBuilder) -> Result<(), AppError> {
        self.execute(req).await.map(|_| ())
    }

    async fn execute(&self, req: RequestBuilder) -> Result<Response, AppError> {
        let response = req.send().await.map_err(map_transport_error)?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message())
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());

        if status.is_server_error() {
            tracing::error!("Whispr API error: {} {} - {}", status, url, body);
        } else {
            tracing::warn!("Whispr API rejected {}: {} - {}", url, status, detail);
        }
        Err(AppError::from_status(status.as_u16(), detail))
    }
}

impl VoteService for WhisprApiClient {
    async fn create_vote(
        &self,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteRecord, AppError> {
        let req = self
            .request(Method::POST, "votes/")?
            .json(&VoteCreateRequest::new(target, direction));
        self.send_json(req).await
    }

    /// The backend has no update route; `POST /votes/` rewrites the caller's
    /// existing vote on the same target.
    async fn update_vote(
        &self,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteRecord, AppError> {
        let req = self
            .request(Method::POST, "votes/")?
            .json(&VoteCreateRequest::new(target, direction));
        self.send_json(req).await
    }

    async fn delete_vote(&self, vote_id: uuid::Uuid) -> Result<(), AppError> {
        let req = self.request(Method::DELETE, &format!("votes/{vote_id}"))?;
        self.send_empty(req).await
    }

    async fn my_votes(&self) -> Result<Vec<VoteRecord>, AppError> {
        let req = self
            .request(Method::GET, "votes/me")?
            .query(&PageQuery { skip: 0, limit: 1000 });
        self.send_json(req).await
    }

    async fn tally(&self, target: VoteTarget) -> Result<VoteTally, AppError> {
        match target {
            VoteTarget::Review(id) => self.review(id).await.map(|r| r.tally()),
            VoteTarget::Reply(id) => self.reply(id).await.map(|r| r.tally()),
        }
    }
}

impl UserService for WhisprApiClient {
    async fn current_user(&self) -> Result<User, AppError> {
        if !self.is_authenticated() {
            return Err(AppError::Unauthorized);
        }
        let req = self.request(Method::GET, "auth/me")?;
        self.send_json(req).await
    }
}

fn map_transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout
    } else {
        AppError::Network(e.to_string())
    }
}

/// Pulls the backend auth token out of a browser `Cookie` header.
pub fn auth_token_from_cookie_header(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
