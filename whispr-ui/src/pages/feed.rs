use leptos::prelude::*;
use leptos::task::spawn_local;
use whispr_app::application::{NotificationSink, ToastLevel};
use whispr_app::domain::Review;

use crate::api::{app_error, get_feed};
use crate::components::{ErrorDisplay, LoadingSpinner, MuffledBanner, ReviewList, ToastSink};
use crate::vote_board::VoteBoard;

#[component]
pub fn FeedPage() -> impl IntoView {
    let toasts = expect_context::<ToastSink>();
    let board = VoteBoard::<Review>::from_context();
    let first_page = Resource::new(|| (), |_| get_feed(0));
    let has_more = RwSignal::new(false);
    let loading_more = RwSignal::new(false);

    let load_more = move |_: leptos::ev::MouseEvent| {
        let skip = board.items().with_untracked(Vec::len) as u32;
        loading_more.set(true);
        spawn_local(async move {
            match get_feed(skip).await {
                Ok(batch) => {
                    has_more.set(batch.has_more);
                    board.append(batch.reviews, &batch.votes);
                }
                Err(e) => toasts.notify(ToastLevel::Error, app_error(e).user_message()),
            }
            loading_more.set(false);
        });
    };

    view! {
        <MuffledBanner/>
        <h1 class="page__title">"Latest reviews"</h1>
        <Suspense fallback=|| view! { <LoadingSpinner label="Gathering the latest whispers..."/> }>
            {move || {
                first_page.get().map(|result| match result {
                    Ok(batch) => {
                        has_more.set(batch.has_more);
                        board.load(batch.reviews, &batch.votes);
                        view! { <ReviewList board=board/> }.into_any()
                    }
                    Err(e) => view! {
                        <ErrorDisplay
                            error=app_error(e)
                            on_retry=Callback::new(move |_| first_page.refetch())
                        />
                    }
                    .into_any(),
                })
            }}
        </Suspense>
        <Show when=move || has_more.get()>
            <button
                class="feed__more"
                disabled=move || loading_more.get()
                on:click=load_more
            >
                {move || if loading_more.get() { "Loading..." } else { "Load more" }}
            </button>
        </Show>
    }
}
