use leptos::prelude::*;

use crate::session::SessionContext;

#[component]
pub fn MuffledBanner() -> impl IntoView {
    let session = expect_context::<SessionContext>();

    view! {
        <Show when=move || session.is_muffled()>
            <div class="muffled-banner" role="alert">
                "Your account is muffled. You can read reviews but cannot vote or post."
            </div>
        </Show>
    }
}
