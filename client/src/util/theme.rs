//! Dark mode preference.
//!
//! Reads the stored preference through the storage adapter and applies a
//! `data-theme` attribute to the `<html>` element. Toggling writes the new
//! preference back.
//!
//! TRADE-OFFS
//! ==========
//! Without a stored preference the browser's `prefers-color-scheme` decides.
//! Outside the browser there is no system preference and `apply` is a no-op.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::state::auth::Theme;
use crate::util::storage::{StorageAdapter, keys};

/// Read the dark mode preference.
///
/// Returns the stored value when one exists, else the system preference.
pub fn read_preference(storage: &StorageAdapter) -> bool {
    match storage.read(keys::DARK_MODE).as_deref() {
        Some("true") => true,
        Some(_) => false,
        None => system_prefers_dark(),
    }
}

fn system_prefers_dark() -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .map_or(false, |mq| mq.matches())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Apply the `data-theme` attribute on the `<html>` element.
pub fn apply(enabled: bool) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(el) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.document_element()) {
            let _ = el.set_attribute("data-theme", Theme::from_dark(enabled).as_str());
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = enabled;
    }
}

/// Flip dark mode, apply it, and persist the new preference.
pub fn toggle(storage: &StorageAdapter, current: bool) -> bool {
    let next = !current;
    apply(next);
    storage.write(keys::DARK_MODE, if next { "true" } else { "false" });
    next
}

/// Session theme matching the current preference.
pub fn current_theme(storage: &StorageAdapter) -> Theme {
    Theme::from_dark(read_preference(storage))
}
