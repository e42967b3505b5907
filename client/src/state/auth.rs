//! Auth stub service: the current session, its preferences, and favorites.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login forms, the profile menu, and favorite buttons drive this service.
//! There is no identity provider behind it: every sign-in resolves to a
//! locally built session after a simulated delay, and the session snapshot
//! is persisted under `auth_state` so reloads stay signed in.
//!
//! DESIGN
//! ======
//! Observable state is `{ user, is_authenticated, is_loading }`. Every
//! operation sets `is_loading`, notifies, does its work, then clears
//! `is_loading` and notifies again on every exit path, so subscribers see
//! exactly two notifications per call. Failures leave the session untouched.
//! Only `user` and `is_authenticated` are persisted.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::state::saved::Category;
use crate::util::clock;
use crate::util::observer::{Observers, Subscription};
use crate::util::storage::{StorageAdapter, keys};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const DEMO_USER_ID: &str = "demo_user_123";
pub const DEMO_USER_EMAIL: &str = "demo@careermap.com";
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_AVATAR: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face";

/// UI colour scheme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: String,
    pub theme: Theme,
    pub notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { language: "en".to_owned(), theme: Theme::Light, notifications: true }
    }
}

/// Favorited content ids per category, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<String>,
    #[serde(default)]
    pub business: Vec<String>,
}

impl Favorites {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Careers => &self.careers,
            Category::Jobs => &self.jobs,
            Category::Business => &self.business,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Careers => &mut self.careers,
            Category::Jobs => &mut self.jobs,
            Category::Business => &mut self.business,
        }
    }

    pub fn contains(&self, category: Category, id: &str) -> bool {
        self.get(category).iter().any(|existing| existing == id)
    }

    /// Append `id` unless already present. Returns true when inserted.
    pub fn insert(&mut self, category: Category, id: &str) -> bool {
        if self.contains(category, id) {
            return false;
        }
        self.get_mut(category).push(id.to_owned());
        true
    }

    /// Returns true when `id` was present.
    pub fn remove(&mut self, category: Category, id: &str) -> bool {
        let list = self.get_mut(category);
        let before = list.len();
        list.retain(|existing| existing != id);
        list.len() != before
    }
}

/// The signed-in identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    /// Display name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub favorites: Favorites,
}

impl Session {
    /// The fixed session handed out by stub sign-in.
    pub fn demo() -> Self {
        Self {
            id: DEMO_USER_ID.to_owned(),
            email: DEMO_USER_EMAIL.to_owned(),
            name: DEMO_USER_NAME.to_owned(),
            avatar: Some(DEMO_USER_AVATAR.to_owned()),
            preferences: Preferences::default(),
            favorites: Favorites::default(),
        }
    }
}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<Session>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedAuth {
    #[serde(default)]
    user: Option<Session>,
    #[serde(default)]
    is_authenticated: bool,
}

/// Shallow profile patch; `None` fields are left as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub preferences: Option<Preferences>,
    pub favorites: Option<Favorites>,
}

impl ProfileUpdate {
    fn apply(self, session: &mut Session) {
        if let Some(id) = self.id {
            session.id = id;
        }
        if let Some(email) = self.email {
            session.email = email;
        }
        if let Some(name) = self.name {
            session.name = name;
        }
        if let Some(avatar) = self.avatar {
            session.avatar = Some(avatar);
        }
        if let Some(preferences) = self.preferences {
            session.preferences = preferences;
        }
        if let Some(favorites) = self.favorites {
            session.favorites = favorites;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub language: Option<String>,
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
}

impl PreferencesUpdate {
    fn apply(self, preferences: &mut Preferences) {
        if let Some(language) = self.language {
            preferences.language = language;
        }
        if let Some(theme) = self.theme {
            preferences.theme = theme;
        }
        if let Some(notifications) = self.notifications {
            preferences.notifications = notifications;
        }
    }
}

pub struct AuthService {
    config: ClientConfig,
    storage: StorageAdapter,
    state: RefCell<AuthState>,
    observers: Observers<AuthState>,
}

impl AuthService {
    /// Build the service and restore any persisted session.
    pub fn new(config: ClientConfig, storage: StorageAdapter) -> Self {
        let persisted = storage.load_json::<PersistedAuth>(keys::AUTH_STATE).unwrap_or_default();
        let state = match persisted.user {
            Some(user) if persisted.is_authenticated => {
                AuthState { user: Some(user), is_authenticated: true, is_loading: false }
            }
            _ => AuthState::default(),
        };
        Self { config, storage, state: RefCell::new(state), observers: Observers::new() }
    }

    /// Copy of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<Session> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Call `listener` with a state snapshot after every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AuthState) + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Sign in through Google, or the demo session while no provider is wired up.
    ///
    /// # Errors
    ///
    /// Stub sign-in does not fail; the `Result` keeps the signature aligned
    /// with the other sign-in paths.
    pub async fn sign_in_with_google(&self) -> Result<Session> {
        if !self.config.auth_stub {
            leptos::logging::warn!("Google Auth not configured, using stub mode");
        }
        self.begin();
        clock::sleep(self.config.auth_latency.google_sign_in).await;
        self.establish(Ok(Session::demo()))
    }

    /// # Errors
    ///
    /// Returns `ClientError::Validation` for an empty email or a password
    /// shorter than [`MIN_PASSWORD_LEN`].
    pub async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<Session> {
        self.begin();
        clock::sleep(self.config.auth_latency.email_sign_in).await;
        let outcome = validate_credentials(email, password).map(|()| {
            let email = email.trim();
            let local_part = email.split('@').next().filter(|part| !part.is_empty()).unwrap_or("User");
            Session { email: email.to_owned(), name: local_part.to_owned(), ..Session::demo() }
        });
        self.establish(outcome)
    }

    /// # Errors
    ///
    /// Returns `ClientError::Validation` for an empty email or name, or a
    /// password shorter than [`MIN_PASSWORD_LEN`].
    pub async fn sign_up_with_email(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        self.begin();
        clock::sleep(self.config.auth_latency.sign_up).await;
        let outcome = validate_credentials(email, password).and_then(|()| {
            let name = name.trim();
            if name.is_empty() {
                return Err(ClientError::Validation("name is required".to_owned()));
            }
            Ok(Session {
                id: format!("user_{}", Uuid::new_v4().simple()),
                email: email.trim().to_owned(),
                name: name.to_owned(),
                ..Session::demo()
            })
        });
        self.establish(outcome)
    }

    /// Drop the session from memory and storage.
    pub async fn sign_out(&self) {
        self.begin();
        clock::sleep(self.config.auth_latency.sign_out).await;
        {
            let mut state = self.state.borrow_mut();
            state.user = None;
            state.is_authenticated = false;
        }
        self.storage.remove(keys::AUTH_STATE);
        self.end_loading();
    }

    /// Shallow-merge `update` into the current session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` when nobody is signed in.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Session> {
        self.mutate_session(|session| {
            update.apply(session);
            session.clone()
        })
    }

    /// Shallow-merge `update` into the current session's preferences.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` when nobody is signed in.
    pub async fn update_preferences(&self, update: PreferencesUpdate) -> Result<Session> {
        self.mutate_session(|session| {
            update.apply(&mut session.preferences);
            session.clone()
        })
    }

    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` when nobody is signed in.
    pub async fn add_to_favorites(&self, category: Category, id: &str) -> Result<()> {
        self.mutate_session(|session| {
            session.favorites.insert(category, id);
        })
    }

    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` when nobody is signed in.
    pub async fn remove_from_favorites(&self, category: Category, id: &str) -> Result<()> {
        self.mutate_session(|session| {
            session.favorites.remove(category, id);
        })
    }

    /// False when signed out.
    pub fn is_favorited(&self, category: Category, id: &str) -> bool {
        self.state.borrow().user.as_ref().is_some_and(|user| user.favorites.contains(category, id))
    }

    fn begin(&self) {
        self.state.borrow_mut().is_loading = true;
        self.notify();
    }

    fn end_loading(&self) {
        self.state.borrow_mut().is_loading = false;
        self.notify();
    }

    fn finish<T>(&self, outcome: Result<T>) -> Result<T> {
        self.end_loading();
        outcome
    }

    fn establish(&self, outcome: Result<Session>) -> Result<Session> {
        if let Ok(session) = &outcome {
            let mut state = self.state.borrow_mut();
            state.user = Some(session.clone());
            state.is_authenticated = true;
        }
        if outcome.is_ok() {
            self.persist();
        }
        self.finish(outcome)
    }

    fn mutate_session<T>(&self, f: impl FnOnce(&mut Session) -> T) -> Result<T> {
        self.begin();
        let outcome = match self.state.borrow_mut().user.as_mut() {
            Some(session) => Ok(f(session)),
            None => Err(ClientError::NotAuthenticated),
        };
        if outcome.is_ok() {
            self.persist();
        }
        self.finish(outcome)
    }

    fn persist(&self) {
        let state = self.state.borrow();
        let snapshot = PersistedAuth { user: state.user.clone(), is_authenticated: state.is_authenticated };
        self.storage.save_json(keys::AUTH_STATE, &snapshot);
    }

    fn notify(&self) {
        let snapshot = self.state();
        self.observers.notify(&snapshot);
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(ClientError::Validation("email is required".to_owned()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(format!("password must be at least {MIN_PASSWORD_LEN} characters")));
    }
    Ok(())
}
