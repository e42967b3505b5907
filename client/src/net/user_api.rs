//! User preference and favorites sync.
//!
//! Writes and reads go to the API first; when it cannot be reached they land
//! in local storage under `user_preferences` / `user_favorites` instead, so
//! the app keeps working offline. Local favorites are a map of
//! `category -> id -> data`.

#[cfg(test)]
#[path = "user_api_test.rs"]
mod user_api_test;

use serde_json::{Map, Value, json};

use super::api::{ApiClient, encode};
use super::types::RequestOptions;
use crate::state::saved::Category;
use crate::util::storage::{StorageAdapter, keys};

type LocalFavorites = Map<String, Value>;

fn favorites_endpoint(category: Option<Category>) -> String {
    match category {
        Some(category) => format!("/user/favorites?type={category}"),
        None => "/user/favorites".to_owned(),
    }
}

fn favorite_endpoint(category: Category, id: &str) -> String {
    format!("/user/favorites/{category}/{}", encode(id))
}

pub struct UserApi<'a> {
    client: &'a ApiClient,
    storage: &'a StorageAdapter,
}

impl ApiClient {
    pub fn user<'a>(&'a self, storage: &'a StorageAdapter) -> UserApi<'a> {
        UserApi { client: self, storage }
    }
}

impl UserApi<'_> {
    /// Returns true when the API accepted the write.
    pub async fn save_preferences(&self, preferences: &Value) -> bool {
        if self.post("/user/preferences", preferences).await {
            return true;
        }
        self.storage.save_json(keys::USER_PREFERENCES, preferences);
        false
    }

    pub async fn preferences(&self) -> Value {
        if let Some(remote) = self.client.try_remote("/user/preferences", RequestOptions::get()).await {
            return remote;
        }
        self.storage.load_json(keys::USER_PREFERENCES).unwrap_or_else(|| json!({}))
    }

    /// Returns true when the API accepted the write.
    pub async fn save_favorite(&self, category: Category, id: &str, data: Value) -> bool {
        let body = json!({ "type": category, "id": id, "data": data });
        if self.post("/user/favorites", &body).await {
            return true;
        }
        let mut local = self.local_favorites();
        let bucket = local.entry(category.as_str()).or_insert_with(|| Value::Object(Map::new()));
        if !bucket.is_object() {
            *bucket = Value::Object(Map::new());
        }
        if let Value::Object(bucket) = bucket {
            bucket.insert(id.to_owned(), data);
        }
        self.storage.save_json(keys::USER_FAVORITES, &local);
        false
    }

    /// All favorites, or only those of `category`.
    pub async fn favorites(&self, category: Option<Category>) -> Value {
        if let Some(remote) = self.client.try_remote(&favorites_endpoint(category), RequestOptions::get()).await {
            return remote;
        }
        let local = self.local_favorites();
        match category {
            Some(category) => local.get(category.as_str()).cloned().unwrap_or_else(|| json!({})),
            None => Value::Object(local),
        }
    }

    /// Returns true when the API accepted the removal.
    pub async fn remove_favorite(&self, category: Category, id: &str) -> bool {
        let removed = self
            .client
            .try_remote::<Value>(&favorite_endpoint(category, id), RequestOptions::delete())
            .await
            .is_some();
        if removed {
            return true;
        }
        let mut local = self.local_favorites();
        if let Some(Value::Object(bucket)) = local.get_mut(category.as_str()) {
            bucket.remove(id);
            self.storage.save_json(keys::USER_FAVORITES, &local);
        }
        false
    }

    async fn post(&self, endpoint: &str, body: &Value) -> bool {
        let Ok(options) = RequestOptions::post_json(body) else {
            return false;
        };
        self.client.try_remote::<Value>(endpoint, options).await.is_some()
    }

    fn local_favorites(&self) -> LocalFavorites {
        self.storage.load_json(keys::USER_FAVORITES).unwrap_or_default()
    }
}
