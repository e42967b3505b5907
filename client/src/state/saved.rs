//! Saved-items store: user-pinned careers, jobs, and business ideas.
//!
//! SYSTEM CONTEXT
//! ==============
//! Bookmark buttons, the saved-items page, and the export/import dialog all
//! read and mutate this store. Each category persists under its own storage
//! key as a most-recent-first JSON array.
//!
//! DESIGN
//! ======
//! In-memory state is authoritative for queries; every mutation writes the
//! whole category list back through the storage adapter before returning.
//! Other tabs are reconciled through `apply_storage_change`, which re-reads a
//! category when its key changes. Concurrent writers race and the last
//! persisted write wins. Subscribers get a snapshot of every category after
//! each change, local or reconciled.

#[cfg(test)]
#[path = "saved_test.rs"]
mod saved_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::util::clock::{self, MS_PER_DAY};
use crate::util::observer::{Observers, Subscription};
use crate::util::storage::{StorageAdapter, StorageChange, keys};

/// Nominal `localStorage` quota used for usage reporting.
pub const STORAGE_BUDGET: usize = 5 * 1024 * 1024;
pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// The three fixed collections a user can save into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Careers,
    Jobs,
    Business,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Careers, Category::Jobs, Category::Business];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Careers => "careers",
            Self::Jobs => "jobs",
            Self::Business => "business",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }

    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Careers => keys::SAVED_CAREERS,
            Self::Jobs => keys::SAVED_JOBS,
            Self::Business => keys::SAVED_BUSINESS,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-pinned reference to external content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    /// Unique within its category.
    pub id: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Snapshot of the content at save time; opaque to this layer.
    #[serde(default)]
    pub data: Value,
    /// Epoch milliseconds.
    pub saved_at: i64,
}

/// Content of a save request, before a timestamp is assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct NewSavedItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub data: Value,
}

impl NewSavedItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, data: Value) -> Self {
        Self { id: id.into(), title: title.into(), description: None, data }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// All three category lists, serialized as the export document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedItems {
    #[serde(default)]
    pub careers: Vec<SavedItem>,
    #[serde(default)]
    pub jobs: Vec<SavedItem>,
    #[serde(default)]
    pub business: Vec<SavedItem>,
}

impl SavedItems {
    pub fn get(&self, category: Category) -> &[SavedItem] {
        match category {
            Category::Careers => &self.careers,
            Category::Jobs => &self.jobs,
            Category::Business => &self.business,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<SavedItem> {
        match category {
            Category::Careers => &mut self.careers,
            Category::Jobs => &mut self.jobs,
            Category::Business => &mut self.business,
        }
    }
}

/// Storage used by the saved-item keys against [`STORAGE_BUDGET`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StorageUsage {
    pub used: usize,
    pub available: usize,
    pub percentage: u32,
}

pub struct SavedStore {
    storage: StorageAdapter,
    items: SavedItems,
    now: fn() -> i64,
    observers: Observers<SavedItems>,
}

impl SavedStore {
    /// Build the store, loading every category from storage.
    pub fn new(storage: StorageAdapter) -> Self {
        let items = SavedItems {
            careers: load_category(&storage, Category::Careers),
            jobs: load_category(&storage, Category::Jobs),
            business: load_category(&storage, Category::Business),
        };
        Self { storage, items, now: clock::now_ms, observers: Observers::new() }
    }

    /// Replace the clock used to stamp new items.
    #[must_use]
    pub fn with_clock(mut self, now: fn() -> i64) -> Self {
        self.now = now;
        self
    }

    pub fn items(&self, category: Category) -> &[SavedItem] {
        self.items.get(category)
    }

    pub fn all(&self) -> &SavedItems {
        &self.items
    }

    /// Register `listener` for a snapshot of every category after each change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SavedItems) + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Save `item` at the front of `category`, replacing any entry with the same id.
    pub fn add(&mut self, category: Category, item: NewSavedItem) {
        let saved = SavedItem {
            id: item.id,
            category,
            title: item.title,
            description: item.description,
            data: item.data,
            saved_at: (self.now)(),
        };
        let list = self.items.get_mut(category);
        list.retain(|existing| existing.id != saved.id);
        list.insert(0, saved);
        self.persist(category);
        self.notify();
    }

    pub fn remove(&mut self, category: Category, id: &str) {
        self.items.get_mut(category).retain(|existing| existing.id != id);
        self.persist(category);
        self.notify();
    }

    /// Remove the item when saved, else add it. Returns the new saved state.
    pub fn toggle(&mut self, category: Category, item: NewSavedItem) -> bool {
        if self.is_saved(category, &item.id) {
            self.remove(category, &item.id);
            false
        } else {
            self.add(category, item);
            true
        }
    }

    pub fn is_saved(&self, category: Category, id: &str) -> bool {
        self.items.get(category).iter().any(|item| item.id == id)
    }

    /// Size of one category, or of all of them when `category` is `None`.
    pub fn count(&self, category: Option<Category>) -> usize {
        match category {
            Some(c) => self.items.get(c).len(),
            None => Category::ALL.iter().map(|c| self.items.get(*c).len()).sum(),
        }
    }

    /// Most recently saved items across all categories, newest first.
    pub fn recent(&self, limit: usize) -> Vec<SavedItem> {
        let mut all: Vec<SavedItem> =
            Category::ALL.iter().flat_map(|c| self.items.get(*c).iter().cloned()).collect();
        all.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        all.truncate(limit);
        all
    }

    pub fn clear(&mut self, category: Category) {
        self.items.get_mut(category).clear();
        self.persist(category);
        self.notify();
    }

    /// Pretty-printed JSON export keyed by category name.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Parse` if the items cannot be serialized.
    pub fn export(&self, category: Option<Category>) -> Result<String> {
        let document = match category {
            Some(c) => {
                let mut map = serde_json::Map::new();
                map.insert(c.as_str().to_owned(), serde_json::to_value(self.items.get(c))?);
                Value::Object(map)
            }
            None => serde_json::to_value(&self.items)?,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Merge an exported document into the store, skipping ids already saved.
    ///
    /// Returns how many items were added. Categories processed before an
    /// error stay merged.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Parse` for malformed JSON and
    /// `ClientError::Validation` when the document or an item has the wrong shape.
    pub fn import(&mut self, contents: &str) -> Result<usize> {
        let document: Value =
            serde_json::from_str(contents).map_err(|e| ClientError::Parse(format!("invalid file format: {e}")))?;
        let Value::Object(entries) = document else {
            return Err(ClientError::Validation("invalid file format: expected an object keyed by category".to_owned()));
        };

        let mut added = 0;
        for (key, value) in entries {
            let (Some(category), Value::Array(raw_items)) = (Category::parse(&key), value) else {
                continue;
            };
            let list = self.items.get_mut(category);
            let before = list.len();
            let mut failure = None;
            for raw in raw_items {
                match serde_json::from_value::<SavedItem>(raw) {
                    Ok(mut item) => {
                        item.category = category;
                        if !list.iter().any(|existing| existing.id == item.id) {
                            list.push(item);
                        }
                    }
                    Err(e) => {
                        failure = Some(ClientError::Validation(format!("invalid {category} item: {e}")));
                        break;
                    }
                }
            }
            added += list.len() - before;
            self.persist(category);
            if let Some(err) = failure {
                self.notify();
                return Err(err);
            }
        }
        self.notify();
        Ok(added)
    }

    /// Drop items saved more than `max_age_days` ago. Returns how many were removed.
    pub fn cleanup(&mut self, max_age_days: u32) -> usize {
        self.cleanup_at(max_age_days, (self.now)())
    }

    /// [`cleanup`](Self::cleanup) against an explicit current time.
    ///
    /// Filters the in-memory lists; a category is persisted only when it
    /// lost items. Writes from other tabs arrive through
    /// [`apply_storage_change`](Self::apply_storage_change).
    pub fn cleanup_at(&mut self, max_age_days: u32, now_ms: i64) -> usize {
        let cutoff = now_ms - i64::from(max_age_days) * MS_PER_DAY;
        let mut removed = 0;
        for category in Category::ALL {
            let list = self.items.get_mut(category);
            let before = list.len();
            list.retain(|item| item.saved_at > cutoff);
            let dropped = before - list.len();
            if dropped > 0 {
                removed += dropped;
                self.persist(category);
            }
        }
        if removed > 0 {
            self.notify();
        }
        removed
    }

    /// Reconcile with a write made by another browsing context.
    ///
    /// Returns true when a category was reloaded.
    pub fn apply_storage_change(&mut self, change: &StorageChange) -> bool {
        let mut reloaded = false;
        for category in Category::ALL {
            if change.affects(category.storage_key()) {
                *self.items.get_mut(category) = load_category(&self.storage, category);
                reloaded = true;
            }
        }
        if reloaded {
            self.notify();
        }
        reloaded
    }

    /// Re-read every category from storage.
    pub fn reload(&mut self) {
        self.apply_storage_change(&StorageChange { key: None });
    }

    pub fn storage_usage(&self) -> StorageUsage {
        if !self.storage.is_available() {
            return StorageUsage::default();
        }
        let used: usize = Category::ALL.iter().map(|c| self.storage.stored_len(c.storage_key())).sum();
        let available = STORAGE_BUDGET.saturating_sub(used);
        let percentage = u32::try_from((used * 100 + STORAGE_BUDGET / 2) / STORAGE_BUDGET).unwrap_or(100);
        StorageUsage { used, available, percentage }
    }

    fn persist(&self, category: Category) {
        self.storage.save_json(category.storage_key(), &self.items.get(category));
    }

    fn notify(&self) {
        let snapshot = self.items.clone();
        self.observers.notify(&snapshot);
    }
}

fn load_category(storage: &StorageAdapter, category: Category) -> Vec<SavedItem> {
    storage.load_json(category.storage_key()).unwrap_or_default()
}

/// Download name for an export of `category` (or everything).
pub fn export_file_name(category: Option<Category>, now_ms: i64) -> String {
    let scope = category.map_or("all", Category::as_str);
    format!("careermap-saved-{scope}-{now_ms}.json")
}

/// Keep `store` in sync with saved-item writes made by other tabs.
#[cfg(feature = "hydrate")]
pub fn install_cross_tab_sync(
    store: std::rc::Rc<std::cell::RefCell<SavedStore>>,
) -> Option<crate::util::storage::StorageListener> {
    crate::util::storage::install_storage_listener(move |change| match store.try_borrow_mut() {
        Ok(mut store) => {
            store.apply_storage_change(&change);
        }
        Err(_) => leptos::logging::warn!("saved store busy; dropped storage change {:?}", change.key),
    })
}
