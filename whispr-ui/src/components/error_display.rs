use leptos::prelude::*;
use whispr_errors::AppError;

/// What the reader can do about a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    LogIn,
    BackToFeed,
    Retry,
}

fn heading(error: &AppError) -> &'static str {
    match error {
        AppError::Unauthorized => "This page is for logged-in students",
        AppError::Muffled => "Your account is muffled",
        AppError::NotFound(_) => "Nothing whispered here",
        AppError::Network(_) | AppError::Timeout => "Whispr is out of earshot",
        _ => "Something went wrong",
    }
}

fn recovery(error: &AppError) -> Recovery {
    match error {
        AppError::Unauthorized | AppError::Muffled => Recovery::LogIn,
        AppError::NotFound(_) | AppError::Forbidden(_) => Recovery::BackToFeed,
        _ => Recovery::Retry,
    }
}

#[component]
pub fn ErrorDisplay(
    error: AppError,
    #[prop(optional)] on_retry: Option<Callback<()>>,
) -> impl IntoView {
    let action = match (recovery(&error), on_retry) {
        (Recovery::Retry, Some(retry)) => view! {
            <button class="error__retry" on:click=move |_| retry.run(())>
                "Try again"
            </button>
        }
        .into_any(),
        (Recovery::LogIn, _) => view! {
            <p class="error__hint">"Log in with your campus account, then reload."</p>
        }
        .into_any(),
        (Recovery::BackToFeed, _) | (Recovery::Retry, None) => view! {
            <a class="error__back" href="/">"Back to the feed"</a>
        }
        .into_any(),
    };

    view! {
        <div class="error">
            <p class="error__title">{heading(&error)}</p>
            <p class="error__message">{error.user_message().to_string()}</p>
            {action}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_content_sends_reader_back_to_feed() {
        let error = AppError::NotFound("User not found".to_string());
        assert_eq!(heading(&error), "Nothing whispered here");
        assert_eq!(recovery(&error), Recovery::BackToFeed);
    }

    #[test]
    fn test_auth_errors_ask_for_login_not_retry() {
        assert_eq!(recovery(&AppError::Unauthorized), Recovery::LogIn);
        assert_eq!(recovery(&AppError::Muffled), Recovery::LogIn);
        assert_eq!(recovery(&AppError::Timeout), Recovery::Retry);
    }
}
