use leptos::prelude::*;
use whispr_app::domain::{VoteDirection, VoteState, VoteTally};

/// Up/down arrows with the net score between them. Both buttons are
/// disabled while `disabled` is set.
#[component]
pub fn VoteButtons(
    #[prop(into)] state: Signal<VoteState>,
    #[prop(into)] tally: Signal<VoteTally>,
    #[prop(into)] disabled: Signal<bool>,
    #[prop(into)] on_vote: Callback<VoteDirection>,
) -> impl IntoView {
    let arrow_class = move |direction: VoteDirection| {
        if state.get().direction() == Some(direction) {
            "vote__arrow vote__arrow--active"
        } else {
            "vote__arrow"
        }
    };

    view! {
        <div class="vote" class:vote--pending=move || disabled.get()>
            <button
                class=move || arrow_class(VoteDirection::Up)
                aria-label="Upvote"
                disabled=move || disabled.get()
                on:click=move |_| on_vote.run(VoteDirection::Up)
            >
                "▲"
            </button>
            <span class="vote__score">{move || tally.get().score()}</span>
            <button
                class=move || arrow_class(VoteDirection::Down)
                aria-label="Downvote"
                disabled=move || disabled.get()
                on:click=move |_| on_vote.run(VoteDirection::Down)
            >
                "▼"
            </button>
        </div>
    }
}
