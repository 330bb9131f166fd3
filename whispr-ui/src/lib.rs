pub mod api;
pub mod components;
pub mod pages;
pub mod session;
pub mod vote_board;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use api::get_session_user;
use components::{RankBadge, ToastHost, ToastSink};
use pages::{FeedPage, MyReviewsPage, NotificationsPage, ProfilePage};
use session::SessionContext;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = SessionContext::new();
    provide_context(session);
    provide_context(ToastSink::new());

    let current_user = Resource::new(|| (), |_| get_session_user());
    Effect::new(move |_| match current_user.get() {
        Some(Ok(user)) => session.set(user),
        Some(Err(e)) => tracing::warn!("Failed to load session user: {}", e),
        None => {}
    });

    view! {
        <Title text="Whispr | Anonymous campus reviews"/>
        <Meta name="description" content="Anonymous reviews of courses and professors"/>
        <Stylesheet id="leptos" href="/pkg/whispr.css"/>

        <Router>
            <NavBar/>
            <main class="container">
                <Routes fallback=|| "Page not found">
                    <Route path=path!("/") view=FeedPage/>
                    <Route path=path!("/u/:username") view=ProfilePage/>
                    <Route path=path!("/me") view=MyReviewsPage/>
                    <Route path=path!("/notifications") view=NotificationsPage/>
                </Routes>
            </main>
            <ToastHost/>
        </Router>
    }
}

#[component]
fn NavBar() -> impl IntoView {
    let session = expect_context::<SessionContext>();

    view! {
        <nav class="nav">
            <a href="/" class="nav__brand">"Whispr"</a>
            {move || match session.current() {
                Some(user) => view! {
                    <div class="nav__user">
                        <a href="/notifications">"Notifications"</a>
                        <a href="/me">{user.username.clone()}</a>
                        <RankBadge echoes=user.echoes/>
                    </div>
                }
                .into_any(),
                None => view! {
                    <span class="nav__guest">"Browsing anonymously"</span>
                }
                .into_any(),
            }}
        </nav>
    }
}

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
