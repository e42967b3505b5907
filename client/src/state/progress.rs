//! One-time "save your progress" prompt and the device-local progress snapshot.

#[cfg(test)]
#[path = "progress_test.rs"]
mod progress_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::auth::Session;
use crate::util::storage::{StorageAdapter, keys};

/// How long a visitor browses before the save prompt appears.
pub const SAVE_PROMPT_DELAY: Duration = Duration::from_secs(180);

/// Point-in-time copy of the selections worth restoring on this device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub current_language: String,
    pub dark_mode: bool,
    #[serde(default)]
    pub current_user: Option<Session>,
}

/// True until the prompt has been shown once on this device.
pub fn should_show_save_prompt(storage: &StorageAdapter) -> bool {
    storage.read(keys::SAVE_PROMPT_SEEN).is_none()
}

pub fn mark_save_prompt_seen(storage: &StorageAdapter) {
    storage.write(keys::SAVE_PROMPT_SEEN, "1");
}

pub fn save_progress_snapshot(storage: &StorageAdapter, snapshot: &ProgressSnapshot) {
    storage.save_json(keys::PROGRESS_SNAPSHOT, snapshot);
}

pub fn load_progress_snapshot(storage: &StorageAdapter) -> Option<ProgressSnapshot> {
    storage.load_json(keys::PROGRESS_SNAPSHOT)
}
