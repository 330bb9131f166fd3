//! Server functions forwarding to the Whispr backend, and the browser-side
//! adapters that let the vote coordinator call them.

use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use server_fn::ServerFnError;
use whispr_app::application::{UserService, VoteService};
use whispr_app::domain::{
    Notification, Reply, Review, User, VoteDirection, VoteRecord, VoteTally, VoteTarget,
};
use whispr_errors::AppError;

/// A page of reviews together with the viewer's votes on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewBatch {
    pub reviews: Vec<Review>,
    pub votes: Vec<VoteRecord>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    pub user: User,
    pub is_self: bool,
    pub reviews: ReviewBatch,
}

#[cfg(feature = "ssr")]
mod backend {
    use server_fn::ServerFnError;
    use whispr_app::infrastructure::whispr_api::{auth_token_from_cookie_header, WhisprApiClient};
    use whispr_app::AppContext;
    use whispr_errors::AppError;

    /// API client authenticated with the cookie of the request being served.
    pub fn client() -> Result<(AppContext, WhisprApiClient), ServerFnError> {
        use axum::http::header::COOKIE;
        use axum::http::request::Parts;
        use leptos::prelude::use_context;

        let ctx = use_context::<AppContext>()
            .ok_or_else(|| ServerFnError::new("AppContext missing from server context"))?;
        let token = use_context::<Parts>().and_then(|parts| {
            parts
                .headers
                .get(COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(auth_token_from_cookie_header)
        });
        let api = ctx.api_for(token);
        Ok((ctx, api))
    }

    pub fn to_server_error(e: AppError) -> ServerFnError {
        ServerFnError::new(e.to_string())
    }

    /// Anonymous visitors simply have no votes.
    pub async fn my_votes_or_empty(api: &WhisprApiClient) -> Result<Vec<whispr_app::domain::VoteRecord>, ServerFnError> {
        use whispr_app::application::VoteService;

        if !api.is_authenticated() {
            return Ok(Vec::new());
        }
        match api.my_votes().await {
            Ok(votes) => Ok(votes),
            Err(AppError::Unauthorized) | Err(AppError::Muffled) => Ok(Vec::new()),
            Err(e) => Err(to_server_error(e)),
        }
    }
}

#[server(GetSessionUserFn, "/api", endpoint = "session_user")]
pub async fn get_session_user() -> Result<Option<User>, ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    match api.current_user().await {
        Ok(user) => Ok(Some(user)),
        Err(AppError::Unauthorized) => Ok(None),
        Err(e) => Err(to_server_error(e)),
    }
}

#[server(GetFeedFn, "/api", endpoint = "feed")]
pub async fn get_feed(skip: u32) -> Result<ReviewBatch, ServerFnError> {
    use backend::{client, my_votes_or_empty, to_server_error};

    let (ctx, api) = client()?;
    let limit = ctx.config.feed_page_size;
    let reviews = api.feed(skip, limit).await.map_err(to_server_error)?;
    let votes = my_votes_or_empty(&api).await?;
    tracing::debug!(skip, count = reviews.len(), "loaded feed page");

    Ok(ReviewBatch {
        has_more: reviews.len() as u32 == limit,
        reviews,
        votes,
    })
}

#[server(GetProfileFn, "/api", endpoint = "profile")]
pub async fn get_profile(username: Option<String>) -> Result<ProfileData, ServerFnError> {
    use backend::{client, my_votes_or_empty, to_server_error};

    let (ctx, api) = client()?;
    let viewer = match api.current_user().await {
        Ok(user) => Some(user),
        Err(AppError::Unauthorized) => None,
        Err(e) => return Err(to_server_error(e)),
    };

    let user = match (username, &viewer) {
        (Some(name), _) => api.user_by_username(&name).await.map_err(to_server_error)?,
        (None, Some(me)) => me.clone(),
        (None, None) => return Err(to_server_error(AppError::Unauthorized)),
    };
    let is_self = viewer.as_ref().is_some_and(|v| v.id == user.id);

    let limit = ctx.config.feed_page_size;
    let reviews = api
        .reviews_by_user(user.id, 0, limit)
        .await
        .map_err(to_server_error)?;
    let votes = my_votes_or_empty(&api).await?;

    Ok(ProfileData {
        user,
        is_self,
        reviews: ReviewBatch {
            has_more: reviews.len() as u32 == limit,
            reviews,
            votes,
        },
    })
}

#[server(GetRepliesFn, "/api", endpoint = "replies")]
pub async fn get_replies(review_id: uuid::Uuid) -> Result<Vec<Reply>, ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    api.replies_for(review_id).await.map_err(to_server_error)
}

/// Server functions carry a vote target as an id plus a reply flag.
#[cfg_attr(not(feature = "ssr"), allow(dead_code))]
fn vote_target(target_id: uuid::Uuid, is_reply: bool) -> VoteTarget {
    if is_reply {
        VoteTarget::Reply(target_id)
    } else {
        VoteTarget::Review(target_id)
    }
}

fn target_parts(target: VoteTarget) -> (uuid::Uuid, bool) {
    (target.id(), matches!(target, VoteTarget::Reply(_)))
}

#[server(CreateVoteFn, "/api", endpoint = "create_vote")]
pub async fn create_vote_fn(
    target_id: uuid::Uuid,
    is_reply: bool,
    vote_type: bool,
) -> Result<VoteRecord, ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    api.create_vote(
        vote_target(target_id, is_reply),
        VoteDirection::from_vote_type(vote_type),
    )
    .await
    .map_err(to_server_error)
}

#[server(UpdateVoteFn, "/api", endpoint = "update_vote")]
pub async fn update_vote_fn(
    target_id: uuid::Uuid,
    is_reply: bool,
    vote_type: bool,
) -> Result<VoteRecord, ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    api.update_vote(
        vote_target(target_id, is_reply),
        VoteDirection::from_vote_type(vote_type),
    )
    .await
    .map_err(to_server_error)
}

#[server(GetTallyFn, "/api", endpoint = "tally")]
pub async fn get_tally_fn(target_id: uuid::Uuid, is_reply: bool) -> Result<VoteTally, ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    api.tally(vote_target(target_id, is_reply))
        .await
        .map_err(to_server_error)
}

#[server(DeleteVoteFn, "/api", endpoint = "delete_vote")]
pub async fn delete_vote_fn(vote_id: uuid::Uuid) -> Result<(), ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    api.delete_vote(vote_id).await.map_err(to_server_error)
}

#[server(GetMyVotesFn, "/api", endpoint = "my_votes")]
pub async fn get_my_votes() -> Result<Vec<VoteRecord>, ServerFnError> {
    use backend::{client, my_votes_or_empty};

    let (_, api) = client()?;
    my_votes_or_empty(&api).await
}

#[server(SetFollowFn, "/api", endpoint = "set_follow")]
pub async fn set_follow(user_id: uuid::Uuid, follow: bool) -> Result<User, ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    let result = if follow {
        api.follow(user_id).await
    } else {
        api.unfollow(user_id).await
    };
    result.map_err(to_server_error)
}

#[server(GetNotificationsFn, "/api", endpoint = "notifications")]
pub async fn get_notifications() -> Result<Vec<Notification>, ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    api.notifications(0, 50).await.map_err(to_server_error)
}

#[server(MarkNotificationReadFn, "/api", endpoint = "mark_notification_read")]
pub async fn mark_notification_read(id: uuid::Uuid) -> Result<Notification, ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    api.mark_notification_read(id).await.map_err(to_server_error)
}

#[server(MarkAllReadFn, "/api", endpoint = "mark_all_read")]
pub async fn mark_all_notifications_read() -> Result<(), ServerFnError> {
    use backend::{client, to_server_error};

    let (_, api) = client()?;
    api.mark_all_notifications_read().await.map_err(to_server_error)
}

/// Turns a server function failure back into the backend's error.
pub fn app_error(e: ServerFnError) -> AppError {
    match e {
        ServerFnError::ServerError(msg) => msg.parse().unwrap_or_else(|never| match never {}),
        other => AppError::Network(other.to_string()),
    }
}

/// Vote service that goes through this app's own server functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerFnVotes;

impl VoteService for ServerFnVotes {
    async fn create_vote(
        &self,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteRecord, AppError> {
        let (target_id, is_reply) = target_parts(target);
        create_vote_fn(target_id, is_reply, direction.as_vote_type())
            .await
            .map_err(app_error)
    }

    async fn update_vote(
        &self,
        target: VoteTarget,
        direction: VoteDirection,
    ) -> Result<VoteRecord, AppError> {
        let (target_id, is_reply) = target_parts(target);
        update_vote_fn(target_id, is_reply, direction.as_vote_type())
            .await
            .map_err(app_error)
    }

    async fn delete_vote(&self, vote_id: uuid::Uuid) -> Result<(), AppError> {
        delete_vote_fn(vote_id).await.map_err(app_error)
    }

    async fn my_votes(&self) -> Result<Vec<VoteRecord>, AppError> {
        get_my_votes().await.map_err(app_error)
    }

    async fn tally(&self, target: VoteTarget) -> Result<VoteTally, AppError> {
        let (target_id, is_reply) = target_parts(target);
        get_tally_fn(target_id, is_reply).await.map_err(app_error)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ServerFnUsers;

impl UserService for ServerFnUsers {
    async fn current_user(&self) -> Result<User, AppError> {
        get_session_user()
            .await
            .map_err(app_error)?
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_text_maps_back() {
        let err = ServerFnError::new(AppError::Conflict("Already voted".to_string()).to_string());
        assert_eq!(app_error(err), AppError::Conflict("Already voted".to_string()));
    }

    #[test]
    fn test_other_failures_are_network() {
        let err: ServerFnError = ServerFnError::Request("connection refused".to_string());
        assert!(matches!(app_error(err), AppError::Network(_)));
    }

    #[test]
    fn test_reply_targets_keep_their_kind() {
        let reply = VoteTarget::Reply(uuid::Uuid::new_v4());
        let (id, is_reply) = target_parts(reply);
        assert!(is_reply);
        assert_eq!(vote_target(id, is_reply), reply);
    }
}
