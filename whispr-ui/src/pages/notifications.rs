use leptos::prelude::*;
use leptos::task::spawn_local;
use whispr_app::application::{NotificationSink, ToastLevel};
use whispr_app::domain::Notification;

use crate::api::{app_error, get_notifications, mark_all_notifications_read, mark_notification_read};
use crate::components::{ErrorDisplay, LoadingSpinner, ToastSink};

fn unread_count(items: &[Notification]) -> usize {
    items.iter().filter(|n| !n.is_read).count()
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let toasts = expect_context::<ToastSink>();
    let inbox = Resource::new(|| (), |_| get_notifications());
    let items = RwSignal::new(Vec::<Notification>::new());

    let mark_read = move |id: uuid::Uuid| {
        spawn_local(async move {
            match mark_notification_read(id).await {
                Ok(updated) => items.update(|list| {
                    if let Some(n) = list.iter_mut().find(|n| n.id == updated.id) {
                        *n = updated;
                    }
                }),
                Err(e) => toasts.notify(ToastLevel::Error, app_error(e).user_message()),
            }
        });
    };

    let mark_all = move |_: leptos::ev::MouseEvent| {
        spawn_local(async move {
            match mark_all_notifications_read().await {
                Ok(()) => items.update(|list| list.iter_mut().for_each(|n| n.is_read = true)),
                Err(e) => toasts.notify(ToastLevel::Error, app_error(e).user_message()),
            }
        });
    };

    view! {
        <div class="notifications">
            <header class="notifications__header">
                <h1 class="page__title">"Notifications"</h1>
                <button
                    class="notifications__mark-all"
                    disabled=move || items.with(|list| unread_count(list) == 0)
                    on:click=mark_all
                >
                    "Mark all as read"
                </button>
            </header>
            <Suspense fallback=|| view! { <LoadingSpinner label="Checking your notifications..."/> }>
                {move || {
                    inbox.get().map(|result| match result {
                        Ok(list) => {
                            items.set(list);
                            view! {
                                <ul class="notifications__list">
                                    <For
                                        each=move || items.get()
                                        key=|n| (n.id, n.is_read)
                                        children=move |n: Notification| {
                                            let id = n.id;
                                            let is_read = n.is_read;
                                            view! {
                                                <li
                                                    class="notification"
                                                    class:notification--unread=!is_read
                                                    on:click=move |_| if !is_read { mark_read(id) }
                                                >
                                                    <span class="notification__icon">{n.kind.icon()}</span>
                                                    <span class="notification__content">{n.content}</span>
                                                </li>
                                            }
                                        }
                                    />
                                </ul>
                            }
                            .into_any()
                        }
                        Err(e) => view! {
                            <ErrorDisplay
                                error=app_error(e)
                                on_retry=Callback::new(move |_| inbox.refetch())
                            />
                        }
                        .into_any(),
                    })
                }}
            </Suspense>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whispr_app::domain::NotificationKind;

    fn notification(is_read: bool) -> Notification {
        Notification {
            id: uuid::Uuid::new_v4(),
            username: "sam".to_string(),
            kind: NotificationKind::Vote,
            content: "Someone upvoted your review".to_string(),
            source_id: None,
            source_type: None,
            actor_username: None,
            is_read,
            created_at: None,
        }
    }

    #[test]
    fn test_unread_count() {
        let items = vec![notification(false), notification(true), notification(false)];
        assert_eq!(unread_count(&items), 2);
        assert_eq!(unread_count(&[]), 0);
    }
}
