//! Networking: transport seam, API fallback adapter, and user sync.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` abstracts HTTP, `api` layers remote-then-static fallback on
//! top of it, `user_api` falls back to local storage instead, and `types`
//! holds the shared wire DTOs.

pub mod api;
pub mod transport;
pub mod types;
pub mod user_api;

#[cfg(test)]
pub(crate) mod testing;
