//! Language selection and translated-string lookup.
//!
//! DESIGN
//! ======
//! The active dictionary starts as built-in English and is replaced once the
//! per-language file at `/data/translations/{code}.json` arrives. Each load
//! carries a generation number; a load that finishes after a newer language
//! change is dropped instead of overwriting the newer selection.
//!
//! Any failure to fetch or parse a language file falls back to English.

#[cfg(test)]
#[path = "resolver_test.rs"]
mod resolver_test;

use std::cell::RefCell;
use std::rc::Rc;

use leptos::logging::warn;

use super::dictionary::{Dictionary, english};
use super::format::{self, DEFAULT_CURRENCY, LocaleFormatter};
use super::languages::{Language, LanguageCode, SUPPORTED_LANGUAGES};
use crate::error::{ClientError, Result};
use crate::net::api::fallback;
use crate::net::transport::Transport;
use crate::util::clock::now_ms;
use crate::util::observer::{Observers, Subscription};
use crate::util::storage::{StorageAdapter, keys};

/// Snapshot delivered to language subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageState {
    pub language: LanguageCode,
    pub is_loading: bool,
}

struct Inner {
    language: LanguageCode,
    dictionary: Rc<Dictionary>,
    is_loading: bool,
    generation: u64,
}

pub struct I18n {
    storage: StorageAdapter,
    transport: Rc<dyn Transport>,
    formatter: Box<dyn LocaleFormatter>,
    inner: RefCell<Inner>,
    observers: Observers<LanguageState>,
}

/// Stored choice if supported, else the detected one, else English.
pub fn initial_language(stored: Option<&str>, detected: Option<&str>) -> LanguageCode {
    stored
        .and_then(LanguageCode::parse)
        .or_else(|| detected.and_then(LanguageCode::from_tag))
        .unwrap_or_default()
}

/// Primary language of the browser, e.g. `hi` for `hi-IN`.
pub fn detect_language() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()?.navigator().language()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

fn apply_document_language(code: LanguageCode) {
    #[cfg(feature = "hydrate")]
    {
        let Some(root) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.document_element()) else {
            return;
        };
        let _ = root.set_attribute("lang", code.as_str());
        let _ = root.set_attribute("dir", "ltr");
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = code;
    }
}

fn parse_code(code: &str) -> Result<LanguageCode> {
    LanguageCode::parse(code).ok_or_else(|| ClientError::Validation(format!("unsupported language: {code}")))
}

fn default_formatter() -> Box<dyn LocaleFormatter> {
    #[cfg(feature = "hydrate")]
    {
        Box::new(format::IntlFormatter)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Box::new(format::BasicFormatter)
    }
}

impl I18n {
    pub fn new(storage: StorageAdapter, transport: Rc<dyn Transport>) -> Self {
        let detected = detect_language();
        Self::with_detected(storage, transport, detected.as_deref())
    }

    /// Construct with an explicit detected-language hint instead of asking the browser.
    pub fn with_detected(storage: StorageAdapter, transport: Rc<dyn Transport>, detected: Option<&str>) -> Self {
        let stored = storage.read(keys::USER_LANGUAGE);
        let language = initial_language(stored.as_deref(), detected);
        Self {
            storage,
            transport,
            formatter: default_formatter(),
            inner: RefCell::new(Inner {
                language,
                dictionary: Rc::new(english().clone()),
                is_loading: false,
                generation: 0,
            }),
            observers: Observers::new(),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl LocaleFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn language(&self) -> LanguageCode {
        self.inner.borrow().language
    }

    pub fn is_loading(&self) -> bool {
        self.inner.borrow().is_loading
    }

    pub fn state(&self) -> LanguageState {
        let inner = self.inner.borrow();
        LanguageState { language: inner.language, is_loading: inner.is_loading }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&LanguageState) + 'static,
    {
        self.observers.subscribe(listener)
    }

    pub fn current_language_info(&self) -> &'static Language {
        self.language().info()
    }

    pub fn supported_languages(&self) -> &'static [Language] {
        &SUPPORTED_LANGUAGES
    }

    /// None of the supported scripts are right-to-left.
    pub fn is_rtl(&self) -> bool {
        false
    }

    /// Switch language, persist the choice and load its dictionary.
    pub async fn change_language(&self, code: LanguageCode) {
        self.switch(code, true).await;
    }

    /// `change_language` for an untyped code.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when `code` is not supported.
    pub async fn change_language_code(&self, code: &str) -> Result<()> {
        self.change_language(parse_code(code)?).await;
        Ok(())
    }

    /// Switch language and load its dictionary without touching the stored
    /// preference.
    pub async fn preview_language(&self, code: LanguageCode) {
        self.switch(code, false).await;
    }

    /// `preview_language` for an untyped code.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when `code` is not supported.
    pub async fn preview_language_code(&self, code: &str) -> Result<()> {
        self.preview_language(parse_code(code)?).await;
        Ok(())
    }

    async fn switch(&self, code: LanguageCode, persist: bool) {
        let generation = {
            let mut inner = self.inner.borrow_mut();
            inner.language = code;
            inner.is_loading = true;
            inner.generation += 1;
            inner.generation
        };
        if persist {
            self.storage.write(keys::USER_LANGUAGE, code.as_str());
        }
        apply_document_language(code);
        self.notify();
        self.load(code, generation).await;
    }

    /// Load the dictionary for the language chosen at construction.
    pub async fn load_current(&self) {
        let (code, generation) = {
            let mut inner = self.inner.borrow_mut();
            inner.is_loading = true;
            inner.generation += 1;
            (inner.language, inner.generation)
        };
        self.notify();
        self.load(code, generation).await;
    }

    async fn load(&self, code: LanguageCode, generation: u64) {
        let dictionary = self.fetch_dictionary(code).await;
        {
            let mut inner = self.inner.borrow_mut();
            if inner.generation != generation {
                return;
            }
            inner.dictionary = Rc::new(dictionary);
            inner.is_loading = false;
        }
        self.notify();
    }

    async fn fetch_dictionary(&self, code: LanguageCode) -> Dictionary {
        let path = fallback::translations(code.as_str());
        match self.transport.load_static(&path).await {
            Ok(response) if response.is_success() => match serde_json::from_str(&response.body) {
                Ok(dictionary) => return dictionary,
                Err(e) => warn!("Failed to load translations for {code}: {e}"),
            },
            Ok(response) => warn!("Failed to load translations for {code}: status {}", response.status),
            Err(e) => warn!("Failed to load translations for {code}: {e}"),
        }
        english().clone()
    }

    /// Translated string for a dotted key, or the key itself.
    pub fn t(&self, key: &str) -> String {
        self.t_or(key, "")
    }

    /// Translated string for a dotted key, or `fallback` when it is non-empty.
    pub fn t_or(&self, key: &str, fallback: &str) -> String {
        let dictionary = Rc::clone(&self.inner.borrow().dictionary);
        match dictionary.lookup(key) {
            Some(text) => text.to_owned(),
            None if !fallback.is_empty() => fallback.to_owned(),
            None => key.to_owned(),
        }
    }

    fn locale(&self) -> &'static str {
        self.language().locale()
    }

    pub fn format_number(&self, value: f64) -> String {
        self.formatter.number(self.locale(), value)
    }

    /// Defaults to rupees when `currency` is `None`.
    pub fn format_currency(&self, amount: f64, currency: Option<&str>) -> String {
        self.formatter.currency(self.locale(), amount, currency.unwrap_or(DEFAULT_CURRENCY))
    }

    pub fn format_date(&self, timestamp_ms: i64) -> String {
        self.formatter.date(self.locale(), timestamp_ms)
    }

    pub fn format_relative_time(&self, timestamp_ms: i64) -> String {
        self.format_relative_time_at(timestamp_ms, now_ms())
    }

    pub fn format_relative_time_at(&self, timestamp_ms: i64, now_ms: i64) -> String {
        self.formatter.relative_time(self.locale(), timestamp_ms, now_ms)
    }

    fn notify(&self) {
        self.observers.notify(&self.state());
    }
}

/// Run `change_language` on the browser task queue.
#[cfg(feature = "hydrate")]
pub fn spawn_change_language(i18n: Rc<I18n>, code: LanguageCode) {
    leptos::task::spawn_local(async move { i18n.change_language(code).await });
}
