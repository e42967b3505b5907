//! Composition root.
//!
//! `AppContext` builds every service over one storage backend and one
//! transport, and is the single owner handed to the UI (via leptos context
//! in the browser, directly in tests and the CLI).

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ClientConfig;
use crate::i18n::I18n;
use crate::net::api::ApiClient;
use crate::net::transport::Transport;
use crate::net::user_api::UserApi;
use crate::state::auth::AuthService;
use crate::state::progress::{self, ProgressSnapshot};
use crate::state::saved::SavedStore;
use crate::util::storage::{KeyValueStore, StorageAdapter};
use crate::util::theme;

pub struct AppContext {
    pub config: ClientConfig,
    pub storage: StorageAdapter,
    pub saved: Rc<RefCell<SavedStore>>,
    pub auth: Rc<AuthService>,
    pub api: Rc<ApiClient>,
    pub i18n: Rc<I18n>,
    #[cfg(feature = "hydrate")]
    sync: RefCell<Option<crate::util::storage::StorageListener>>,
}

impl AppContext {
    pub fn new(config: ClientConfig, backend: Rc<dyn KeyValueStore>, transport: Rc<dyn Transport>) -> Self {
        let detected = crate::i18n::resolver::detect_language();
        Self::with_detected_language(config, backend, transport, detected.as_deref())
    }

    /// Like `new`, with the browser-language hint supplied by the caller.
    pub fn with_detected_language(
        config: ClientConfig,
        backend: Rc<dyn KeyValueStore>,
        transport: Rc<dyn Transport>,
        detected: Option<&str>,
    ) -> Self {
        let storage = StorageAdapter::new(backend);
        Self {
            saved: Rc::new(RefCell::new(SavedStore::new(storage.clone()))),
            auth: Rc::new(AuthService::new(config.clone(), storage.clone())),
            api: Rc::new(ApiClient::new(&config, Rc::clone(&transport))),
            i18n: Rc::new(I18n::with_detected(storage.clone(), transport, detected)),
            storage,
            config,
            #[cfg(feature = "hydrate")]
            sync: RefCell::new(None),
        }
    }

    /// `localStorage` + `fetch`, configured from build-time environment.
    #[cfg(feature = "hydrate")]
    pub fn browser() -> Self {
        Self::new(
            ClientConfig::from_build_env(),
            Rc::new(crate::util::storage::BrowserStorage),
            Rc::new(crate::net::transport::BrowserTransport),
        )
    }

    /// Apply the stored theme, start cross-tab sync, and kick off the
    /// initial dictionary load and health check.
    #[cfg(feature = "hydrate")]
    pub fn start(&self) {
        theme::apply(theme::read_preference(&self.storage));
        *self.sync.borrow_mut() = crate::state::saved::install_cross_tab_sync(Rc::clone(&self.saved));

        let i18n = Rc::clone(&self.i18n);
        leptos::task::spawn_local(async move { i18n.load_current().await });
        let api = Rc::clone(&self.api);
        leptos::task::spawn_local(async move {
            api.check_health().await;
        });
    }

    pub fn user_api(&self) -> UserApi<'_> {
        self.api.user(&self.storage)
    }

    pub fn progress_snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            current_language: self.i18n.language().as_str().to_owned(),
            dark_mode: theme::read_preference(&self.storage),
            current_user: self.auth.current_user(),
        }
    }

    /// Persist the current snapshot and mark the save prompt as handled.
    pub fn save_progress(&self) {
        progress::save_progress_snapshot(&self.storage, &self.progress_snapshot());
        progress::mark_save_prompt_seen(&self.storage);
    }

    pub fn should_show_save_prompt(&self) -> bool {
        progress::should_show_save_prompt(&self.storage)
    }
}
