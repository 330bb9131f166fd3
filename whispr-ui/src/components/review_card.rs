use leptos::prelude::*;
use leptos::task::spawn_local;
use whispr_app::domain::{Reply, Review, User, Votable, VoteDirection};
use whispr_errors::AppError;

use super::{ErrorDisplay, RankBadge, VoteButtons};
use crate::api::{app_error, get_my_votes, get_replies};
use crate::session::SessionContext;
use crate::vote_board::VoteBoard;

fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn posted_on(created_at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    created_at
        .map(|t| t.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

/// Feed entries come without their author, so they get no profile link.
fn profile_href(author: Option<&User>) -> Option<String> {
    author.map(|user| format!("/u/{}", user.username))
}

#[component]
pub fn ReviewCard(review: Review, board: VoteBoard<Review>) -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let target = review.target();
    let author = review.author_name().to_string();
    let author_echoes = review.user.as_ref().map(|u| u.echoes).unwrap_or_default();
    let author_link = match profile_href(review.user.as_ref()) {
        Some(href) => view! { <a class="review-card__author" href=href>{author}</a> }.into_any(),
        None => view! { <span class="review-card__author">{author}</span> }.into_any(),
    };
    let owner_id = review.user_id;

    view! {
        <article class="review-card">
            <header class="review-card__header">
                {author_link}
                <RankBadge echoes=author_echoes/>
                <span class="review-card__rating">{stars(review.rating)}</span>
                <time class="review-card__date">{posted_on(review.created_at)}</time>
                {review.is_edited.then(|| view! { <span class="review-card__edited">"(edited)"</span> })}
            </header>
            <p class="review-card__content">{review.content.clone().unwrap_or_default()}</p>
            <footer class="review-card__footer">
                <VoteButtons
                    state=Signal::derive(move || board.state_of(target))
                    tally=Signal::derive(move || board.tally_of(target))
                    disabled=Signal::derive(move || {
                        board.is_pending(target) || session.is_muffled() || session.is_user(owner_id)
                    })
                    on_vote=Callback::new(move |direction: VoteDirection| board.cast(target, direction))
                />
                <ReplyThread review_id=review.id/>
            </footer>
        </article>
    }
}

#[component]
pub fn ReviewList(board: VoteBoard<Review>) -> impl IntoView {
    view! {
        <Show
            when=move || board.items().with(|items| !items.is_empty())
            fallback=|| view! { <p class="review-list__empty">"No reviews yet."</p> }
        >
            <div class="review-list">
                <For
                    each=move || board.items().get()
                    key=|review| review.id
                    children=move |review: Review| view! { <ReviewCard review=review board=board/> }
                />
            </div>
        </Show>
    }
}

/// Replies under a review, fetched the first time the thread is opened.
#[component]
fn ReplyThread(review_id: uuid::Uuid) -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let board = VoteBoard::<Reply>::from_context();
    let open = RwSignal::new(false);
    let loaded = RwSignal::new(false);
    let error = RwSignal::new(None::<AppError>);

    let toggle = move |_: leptos::ev::MouseEvent| {
        open.update(|o| *o = !*o);
        if !open.get_untracked() || loaded.get_untracked() {
            return;
        }
        spawn_local(async move {
            let replies = get_replies(review_id).await.map_err(app_error);
            let votes = get_my_votes().await.map_err(app_error);
            match (replies, votes) {
                (Ok(replies), Ok(votes)) => {
                    board.load(replies, &votes);
                    loaded.set(true);
                    error.set(None);
                }
                (Err(e), _) | (_, Err(e)) => error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="reply-thread">
            <button class="reply-thread__toggle" on:click=toggle>
                {move || if open.get() { "Hide replies" } else { "Show replies" }}
            </button>
            <Show when=move || open.get()>
                {move || error.get().map(|e| view! { <ErrorDisplay error=e/> })}
                <ul class="reply-thread__list">
                    <For
                        each=move || board.items().get()
                        key=|reply| reply.id
                        children=move |reply: Reply| {
                            let target = reply.target();
                            let owner_id = reply.user_id;
                            let author = reply
                                .user
                                .as_ref()
                                .map(|u| u.username.clone())
                                .unwrap_or_else(|| "anonymous".to_string());
                            view! {
                                <li class="reply">
                                    <span class="reply__author">{author}</span>
                                    <p class="reply__content">{reply.content.clone()}</p>
                                    <VoteButtons
                                        state=Signal::derive(move || board.state_of(target))
                                        tally=Signal::derive(move || board.tally_of(target))
                                        disabled=Signal::derive(move || {
                                            board.is_pending(target)
                                                || session.is_muffled()
                                                || session.is_user(owner_id)
                                        })
                                        on_vote=Callback::new(move |direction: VoteDirection| {
                                            board.cast(target, direction)
                                        })
                                    />
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_clamps_to_five() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
        assert_eq!(stars(0), "☆☆☆☆☆");
    }

    #[test]
    fn test_posted_on_formats_date() {
        use chrono::TimeZone;
        let t = chrono::Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(posted_on(Some(t)), "Mar 07, 2024");
        assert_eq!(posted_on(None), "");
    }

    #[test]
    fn test_anonymous_author_has_no_profile_link() {
        assert_eq!(profile_href(None), None);
        let author = User::new("owl42".to_string(), 51);
        assert_eq!(profile_href(Some(&author)), Some("/u/owl42".to_string()));
    }
}
