//! CareerMap client: local-first persistence and data access.
//!
//! Saved items, the stub auth session, and the language choice live in the
//! browser's key-value storage; catalogue data comes from the API with static
//! JSON files as fallback. Everything compiles natively as well, with
//! in-memory storage and no-op browser hooks, so the services can be driven
//! from tests and the CLI.

pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod i18n;
pub mod net;
pub mod state;
pub mod util;

pub use app::AppContext;
pub use config::ClientConfig;
pub use error::{ClientError, Result};

/// WASM entry point: install the panic hook, start the app services, and
/// provide their signals to the root reactive owner.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let ctx = AppContext::browser();
    ctx.start();
    let owner = leptos::prelude::Owner::new();
    owner.set();
    owner.with(|| bridge::provide_app_signals(&ctx));
    leptos::logging::log!("CareerMap client ready ({})", ctx.i18n.current_language_info().name);
    // Services and their signals live for the whole page session.
    std::mem::forget(owner);
    std::mem::forget(ctx);
}
