use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use server_fn::ServerFnError;
use whispr_app::application::{NotificationSink, ToastLevel};
use whispr_app::domain::{Review, User};

use crate::api::{app_error, get_profile, set_follow, ProfileData};
use crate::components::{
    ErrorDisplay, LoadingSpinner, MuffledBanner, RankBadge, RankProgressBar, ReviewList, ToastSink,
};
use crate::session::SessionContext;
use crate::vote_board::VoteBoard;

/// Public profile at `/u/:username`.
#[component]
pub fn ProfilePage() -> impl IntoView {
    let params = use_params_map();
    let username = move || params.read().get("username").unwrap_or_default();
    let profile = Resource::new(username, |name| get_profile(Some(name)));

    view! { <ProfileLoader profile=profile/> }
}

/// The session user's own reviews at `/me`.
#[component]
pub fn MyReviewsPage() -> impl IntoView {
    let profile = Resource::new(|| (), |_| get_profile(None));

    view! { <ProfileLoader profile=profile/> }
}

#[component]
fn ProfileLoader(profile: Resource<Result<ProfileData, ServerFnError>>) -> impl IntoView {
    let board = VoteBoard::<Review>::from_context();

    view! {
        <MuffledBanner/>
        <Suspense fallback=|| view! { <LoadingSpinner label="Loading profile..."/> }>
            {move || {
                profile.get().map(|result| match result {
                    Ok(data) => {
                        board.load(data.reviews.reviews, &data.reviews.votes);
                        view! {
                            <ProfileHeader user=data.user is_self=data.is_self/>
                            <ReviewList board=board/>
                        }
                        .into_any()
                    }
                    Err(e) => view! {
                        <ErrorDisplay
                            error=app_error(e)
                            on_retry=Callback::new(move |_| profile.refetch())
                        />
                    }
                    .into_any(),
                })
            }}
        </Suspense>
    }
}

/// Follow actions to offer: `true` follows, `false` unfollows. The backend
/// does not report whether the viewer already follows this user, and both
/// calls are idempotent, so both are offered until one has succeeded.
fn follow_actions(following: Option<bool>) -> &'static [bool] {
    match following {
        None => &[true, false],
        Some(true) => &[false],
        Some(false) => &[true],
    }
}

#[component]
fn ProfileHeader(user: User, is_self: bool) -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let toasts = expect_context::<ToastSink>();

    // The session copy is refreshed after votes, so the viewer's own rank
    // follows their echoes without reloading the page.
    let fallback_echoes = user.echoes;
    let echoes = Signal::derive(move || {
        if is_self {
            session
                .current()
                .map(|u| u.echoes)
                .unwrap_or(fallback_echoes)
        } else {
            fallback_echoes
        }
    });

    // Unknown until the viewer follows or unfollows from this page.
    let following = RwSignal::new(None::<bool>);
    let busy = RwSignal::new(false);
    let user_id = user.id;
    let display_name = user.username.clone();

    let run_follow = Callback::new(move |follow: bool| {
        let name = display_name.clone();
        busy.set(true);
        spawn_local(async move {
            match set_follow(user_id, follow).await {
                Ok(me) => {
                    following.set(Some(follow));
                    session.set(Some(me));
                    let message = if follow {
                        format!("Following {name}")
                    } else {
                        format!("Unfollowed {name}")
                    };
                    toasts.notify(ToastLevel::Success, &message);
                }
                Err(e) => toasts.notify(ToastLevel::Error, app_error(e).user_message()),
            }
            busy.set(false);
        });
    });

    view! {
        <section class="profile">
            <div class="profile__heading">
                <h1 class="profile__name">{user.username.clone()}</h1>
                <RankBadge echoes=echoes/>
            </div>
            {user.bio.clone().map(|bio| view! { <p class="profile__bio">{bio}</p> })}
            <dl class="profile__stats">
                <dt>"Echoes"</dt>
                <dd>{move || echoes.get()}</dd>
                <dt>"Followers"</dt>
                <dd>{user.followers_count.unwrap_or_default()}</dd>
                <dt>"Following"</dt>
                <dd>{user.following_count.unwrap_or_default()}</dd>
                {user.student_since_year.map(|year| view! {
                    <dt>"Student since"</dt>
                    <dd>{year}</dd>
                })}
            </dl>
            <RankProgressBar echoes=echoes/>
            <Show when=move || !is_self && session.is_logged_in()>
                <div class="profile__follow-actions">
                    {move || {
                        follow_actions(following.get())
                            .iter()
                            .map(|&follow| view! {
                                <button
                                    class="profile__follow"
                                    disabled=move || busy.get()
                                    on:click=move |_| run_follow.run(follow)
                                >
                                    {if follow { "Follow" } else { "Unfollow" }}
                                </button>
                            })
                            .collect_view()
                    }}
                </div>
            </Show>
        </section>
    }
}
