use leptos::prelude::*;
use whispr_app::application::{NotificationSink, ToastLevel};

const TOAST_LIFETIME: std::time::Duration = std::time::Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

/// Queue of transient messages rendered by `ToastHost`.
#[derive(Debug, Clone, Copy)]
pub struct ToastSink {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl ToastSink {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    /// Snapshot of the queue, oldest first.
    pub fn current(&self) -> Vec<Toast> {
        self.toasts.get_untracked()
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    fn push(&self, level: ToastLevel, message: &str) -> u64 {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                level,
                message: message.to_string(),
            })
        });
        id
    }
}

impl Default for ToastSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for ToastSink {
    fn notify(&self, level: ToastLevel, message: &str) {
        let id = self.push(level, message);

        #[cfg(feature = "hydrate")]
        {
            let sink = *self;
            set_timeout(move || sink.dismiss(id), TOAST_LIFETIME);
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (id, TOAST_LIFETIME);
    }
}

fn level_class(level: ToastLevel) -> &'static str {
    match level {
        ToastLevel::Info => "toast toast--info",
        ToastLevel::Success => "toast toast--success",
        ToastLevel::Error => "toast toast--error",
    }
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let sink = expect_context::<ToastSink>();

    view! {
        <div class="toasts" aria-live="polite">
            <For
                each=move || sink.toasts.get()
                key=|toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div class=level_class(toast.level) role="status">
                            <span class="toast__message">{toast.message}</span>
                            <button
                                class="toast__close"
                                aria-label="Dismiss"
                                on:click=move |_| sink.dismiss(id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_queues_and_dismiss_removes() {
        let owner = leptos::reactive::owner::Owner::new();
        owner.with(|| {
            let sink = ToastSink::new();
            sink.notify(ToastLevel::Error, "Failed to vote, please try again");
            sink.notify(ToastLevel::Info, "Vote already in flight");

            let toasts = sink.toasts.get_untracked();
            assert_eq!(toasts.len(), 2);
            assert_eq!(toasts[0].level, ToastLevel::Error);
            assert_ne!(toasts[0].id, toasts[1].id);

            sink.dismiss(toasts[0].id);
            let left = sink.toasts.get_untracked();
            assert_eq!(left.len(), 1);
            assert_eq!(left[0].message, "Vote already in flight");
        });
    }
}
