#![recursion_limit = "256"]

use axum::{routing::post, Router};
use leptos::prelude::*;
use leptos_axum::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use whispr_app::AppContext;
use whispr_ui::api::{
    CreateVoteFn, DeleteVoteFn, GetFeedFn, GetMyVotesFn, GetNotificationsFn, GetProfileFn,
    GetRepliesFn, GetSessionUserFn, GetTallyFn, MarkAllReadFn, MarkNotificationReadFn, SetFollowFn,
    UpdateVoteFn,
};
use whispr_ui::App;

fn register_server_fns() {
    use server_fn::axum::register_explicit;

    register_explicit::<GetSessionUserFn>();
    register_explicit::<GetFeedFn>();
    register_explicit::<GetProfileFn>();
    register_explicit::<GetRepliesFn>();
    register_explicit::<GetMyVotesFn>();
    register_explicit::<CreateVoteFn>();
    register_explicit::<UpdateVoteFn>();
    register_explicit::<DeleteVoteFn>();
    register_explicit::<GetTallyFn>();
    register_explicit::<SetFollowFn>();
    register_explicit::<GetNotificationsFn>();
    register_explicit::<MarkNotificationReadFn>();
    register_explicit::<MarkAllReadFn>();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,whispr_app=debug".into()),
        )
        .init();

    let conf = get_configuration(Some("Cargo.toml")).expect("Failed to load Leptos config");
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    let app_context = match AppContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Failed to configure backend client: {}", e);
            std::process::exit(1);
        }
    };

    let routes = generate_route_list(App);
    register_server_fns();

    let app = Router::new()
        .route("/api/{*fn_name}", post({
            let ctx = app_context.clone();
            move |req| {
                let ctx = ctx.clone();
                async move {
                    handle_server_fns_with_context(
                        move || provide_context(ctx.clone()),
                        req
                    ).await
                }
            }
        }))
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let ctx = app_context.clone();
                move || provide_context(ctx.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(leptos_options);

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Backend API: {}", app_context.config.api_url);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}

fn shell(options: LeptosOptions) -> impl IntoView {
    use leptos_meta::*;

    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🤫</text></svg>"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}
