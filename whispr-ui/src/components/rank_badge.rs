use leptos::prelude::*;
use whispr_app::domain::{progress_of, rank_of};

/// Tier pill showing icon and name for an echo total.
#[component]
pub fn RankBadge(#[prop(into)] echoes: Signal<i64>) -> impl IntoView {
    let tier = move || rank_of(echoes.get());

    view! {
        <span
            class="rank-badge"
            style=move || format!("background: {};", tier().gradient())
            title=move || format!("{} echoes", echoes.get())
        >
            <span class="rank-badge__icon">{move || tier().icon()}</span>
            <span class="rank-badge__name">{move || tier().name()}</span>
        </span>
    }
}

#[component]
pub fn RankProgressBar(#[prop(into)] echoes: Signal<i64>) -> impl IntoView {
    let progress = move || progress_of(echoes.get());

    let caption = move || {
        let p = progress();
        match (p.next_tier, p.echoes_to_next) {
            (Some(next), Some(remaining)) => format!("{remaining} echoes to {}", next.name()),
            _ => "Highest rank reached".to_string(),
        }
    };

    view! {
        <div class="rank-progress">
            <div class="rank-progress__track">
                <div
                    class="rank-progress__fill"
                    style=move || {
                        let p = progress();
                        format!("width: {}%; background: {};", p.percent(), p.tier.color())
                    }
                ></div>
            </div>
            <p class="rank-progress__caption">{caption}</p>
        </div>
    }
}
