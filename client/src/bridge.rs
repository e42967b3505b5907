//! Leptos signal bridge.
//!
//! Services notify plain callbacks; components want signals. Each helper
//! seeds an `RwSignal` with the current snapshot and keeps it in step with
//! later notifications. Signals disposed with their owner are skipped.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use leptos::prelude::*;

use crate::app::AppContext;
use crate::i18n::{I18n, LanguageState};
use crate::state::auth::{AuthService, AuthState};
use crate::state::saved::{SavedItems, SavedStore};

pub fn auth_signal(auth: &AuthService) -> RwSignal<AuthState> {
    let signal = RwSignal::new(auth.state());
    let _subscription = auth.subscribe(move |state| {
        let _ = signal.try_set(state.clone());
    });
    signal
}

pub fn language_signal(i18n: &I18n) -> RwSignal<LanguageState> {
    let signal = RwSignal::new(i18n.state());
    let _subscription = i18n.subscribe(move |state| {
        let _ = signal.try_set(*state);
    });
    signal
}

pub fn saved_signal(saved: &SavedStore) -> RwSignal<SavedItems> {
    let signal = RwSignal::new(saved.all().clone());
    let _subscription = saved.subscribe(move |items| {
        let _ = signal.try_set(items.clone());
    });
    signal
}

/// Signals handed to components through context.
#[derive(Clone, Copy)]
pub struct AppSignals {
    pub auth: RwSignal<AuthState>,
    pub language: RwSignal<LanguageState>,
    pub saved: RwSignal<SavedItems>,
}

impl AppSignals {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            auth: auth_signal(&ctx.auth),
            language: language_signal(&ctx.i18n),
            saved: saved_signal(&ctx.saved.borrow()),
        }
    }
}

/// Create the app signals and place them in the current reactive context.
pub fn provide_app_signals(ctx: &AppContext) -> AppSignals {
    let signals = AppSignals::new(ctx);
    provide_context(signals);
    signals
}
