use leptos::prelude::*;
use whispr_app::application::SessionProvider;
use whispr_app::domain::User;

/// Logged-in user shared through Leptos context.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    user: RwSignal<Option<User>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            user: RwSignal::new(None),
        }
    }

    pub fn current(&self) -> Option<User> {
        self.user.get()
    }

    pub fn set(&self, user: Option<User>) {
        self.user.set(user);
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.with(Option::is_some)
    }

    /// True when `user_id` is the logged-in user.
    pub fn is_user(&self, user_id: uuid::Uuid) -> bool {
        self.user
            .with(|u| u.as_ref().is_some_and(|u| u.id == user_id))
    }

    pub fn is_muffled(&self) -> bool {
        self.user
            .with(|u| u.as_ref().is_some_and(|u| u.is_muffled))
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for SessionContext {
    fn user(&self) -> Option<User> {
        self.user.get_untracked()
    }

    fn replace_user(&self, user: User) {
        self.user.set(Some(user));
    }
}
