//! Client-side state owned by the application composition root.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the current session, `saved` the user's pinned items, and
//! `progress` the one-shot prompt flag plus the device progress snapshot.
//! All of them persist through `util::storage`.

pub mod auth;
pub mod progress;
pub mod saved;
