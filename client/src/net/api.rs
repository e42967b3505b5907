//! API fallback adapter.
//!
//! Every data request goes to `{api_base}{endpoint}` first. When that fails
//! for any reason (network, non-2xx, malformed or unsuccessful envelope) the
//! adapter loads a static JSON file shipped with the app instead and returns
//! its contents as-is.
//!
//! ERROR HANDLING
//! ==============
//! Only a failure of both sources reaches the caller, as
//! `ClientError::Unavailable`. Health checks and analytics never fail.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;
use std::time::Duration;

use leptos::logging::{debug_warn, error, log, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::transport::{Transport, TransportError};
use super::types::{ApiEnvelope, RequestOptions};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::util::clock::now_ms;

/// Characters left bare in query values and path segments.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Static files served alongside the app.
pub mod fallback {
    pub const PLACEHOLDERS: &str = "/data/placeholders.json";
    pub const INTERESTS: &str = "/data/interests.json";
    pub const BUSINESS_IDEAS: &str = "/data/business_ideas.json";
    pub const JOBS_SEED: &str = "/data/jobs_seed.json";
    pub const LANGUAGES: &str = "/data/languages.json";

    pub fn translations(lang: &str) -> String {
        format!("/data/translations/{lang}.json")
    }
}

pub(crate) fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn career_generate_endpoint(stage: &str, goal: &str) -> String {
    format!("/careers/generate?stage={}&goal={}", encode(stage), encode(goal))
}

fn career_endpoint(id: &str) -> String {
    format!("/careers/{}", encode(id))
}

fn interests_search_endpoint(query: &str) -> String {
    format!("/interests/search?q={}", encode(query))
}

fn interests_category_endpoint(category: &str) -> String {
    format!("/interests/category/{}", encode(category))
}

fn business_idea_endpoint(id: &str) -> String {
    format!("/business/ideas/{}", encode(id))
}

fn business_search_endpoint(query: &str) -> String {
    format!("/business/search?q={}", encode(query))
}

fn business_category_endpoint(category: &str) -> String {
    format!("/business/category/{}", encode(category))
}

fn job_endpoint(id: &str) -> String {
    format!("/jobs/{}", encode(id))
}

fn jobs_search_endpoint(query: &str) -> String {
    format!("/jobs/search?q={}", encode(query))
}

fn jobs_type_endpoint(kind: JobType) -> String {
    format!("/jobs/type/{}", kind.as_str())
}

fn jobs_latest_endpoint(limit: usize) -> String {
    format!("/jobs/latest?limit={limit}")
}

fn translations_endpoint(lang: &str) -> String {
    format!("/translations/{}", encode(lang))
}

/// Why the remote leg of a request was abandoned.
#[derive(Debug, thiserror::Error)]
enum RemoteFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("API error: {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("API reported failure: {}", .0.as_deref().unwrap_or("no detail"))]
    Rejected(Option<String>),
}

/// Why the static fallback could not be used.
#[derive(Debug, thiserror::Error)]
enum FallbackFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("status {0}")]
    Status(u16),
    #[error("malformed file: {0}")]
    Malformed(String),
}

/// Unwrap a remote envelope into its payload.
fn decode_envelope<T: DeserializeOwned>(body: &str) -> std::result::Result<T, RemoteFailure> {
    let envelope: ApiEnvelope<Value> =
        serde_json::from_str(body).map_err(|e| RemoteFailure::Malformed(e.to_string()))?;
    if !envelope.success {
        return Err(RemoteFailure::Rejected(envelope.error));
    }
    serde_json::from_value(envelope.data.unwrap_or(Value::Null)).map_err(|e| RemoteFailure::Malformed(e.to_string()))
}

pub struct ApiClient {
    base: String,
    transport: Rc<dyn Transport>,
    health_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, transport: Rc<dyn Transport>) -> Self {
        Self { base: config.api_base.clone(), transport, health_timeout: config.health_timeout }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base)
    }

    /// Fetch `endpoint` from the API, or `fallback` from static data.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unavailable` when both sources fail.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        fallback: &str,
        options: Option<RequestOptions>,
    ) -> Result<T> {
        match self.fetch_remote(endpoint, options.unwrap_or_default()).await {
            Ok(data) => return Ok(data),
            Err(reason) => warn!("API fallback: {endpoint} -> {fallback} ({reason})"),
        }
        self.fetch_fallback(fallback).await.map_err(|reason| {
            error!("Fallback failed for {fallback}: {reason}");
            ClientError::Unavailable { endpoint: endpoint.to_owned(), fallback: fallback.to_owned() }
        })
    }

    async fn fetch_remote<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> std::result::Result<T, RemoteFailure> {
        let options = options.with_json_content_type();
        let response = self.transport.send(&self.url(endpoint), &options).await?;
        if !response.is_success() {
            return Err(RemoteFailure::Status(response.status));
        }
        decode_envelope(&response.body)
    }

    async fn fetch_fallback<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, FallbackFailure> {
        let response = self.transport.load_static(path).await?;
        if !response.is_success() {
            return Err(FallbackFailure::Status(response.status));
        }
        serde_json::from_str(&response.body).map_err(|e| FallbackFailure::Malformed(e.to_string()))
    }

    /// Send a raw request to the API and return the envelope payload.
    /// Used by adapters that fall back to something other than a static file.
    pub(crate) async fn try_remote<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Option<T> {
        match self.fetch_remote(endpoint, options).await {
            Ok(data) => Some(data),
            Err(reason) => {
                warn!("API request {endpoint} failed: {reason}");
                None
            }
        }
    }

    /// GET `{base}/health` bounded by the configured timeout.
    pub async fn check_health(&self) -> bool {
        let options = RequestOptions::get().with_timeout(self.health_timeout);
        let online = matches!(
            self.transport.send(&self.url("/health"), &options).await,
            Ok(response) if response.is_success()
        );
        if online {
            log!("API Status: Online");
        } else {
            log!("API Status: Offline (using fallback data)");
        }
        online
    }

    pub async fn is_offline_mode(&self) -> bool {
        !self.check_health().await
    }

    /// Fire-and-forget analytics event.
    pub async fn track_event(&self, event: &str, data: Value) {
        let payload = json!({ "event": event, "data": data, "timestamp": now_ms() });
        let options = match RequestOptions::post_json(&payload) {
            Ok(options) => options.with_json_content_type(),
            Err(e) => {
                debug_warn!("Analytics tracking skipped: {e}");
                return;
            }
        };
        match self.transport.send(&self.url("/analytics/track"), &options).await {
            Ok(response) if response.is_success() => {}
            Ok(response) => debug_warn!("Analytics tracking failed: status {}", response.status),
            Err(e) => debug_warn!("Analytics tracking failed: {e}"),
        }
    }

    /// Aggregate counters, zeroed when the API cannot supply them.
    pub async fn stats(&self) -> Value {
        self.try_remote("/analytics/stats", RequestOptions::get())
            .await
            .unwrap_or_else(|| json!({ "views": 0, "users": 0, "conversions": 0 }))
    }

    pub fn careers(&self) -> CareersApi<'_> {
        CareersApi { client: self }
    }

    pub fn interests(&self) -> InterestsApi<'_> {
        InterestsApi { client: self }
    }

    pub fn business(&self) -> BusinessApi<'_> {
        BusinessApi { client: self }
    }

    pub fn jobs(&self) -> JobsApi<'_> {
        JobsApi { client: self }
    }

    pub fn language(&self) -> LanguageApi<'_> {
        LanguageApi { client: self }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .field("health_timeout", &self.health_timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobType {
    Government,
    Private,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Government => "government",
            Self::Private => "private",
        }
    }
}

// Endpoint groups. Each method is generic over the payload type so
// callers can decode straight into their own view models or keep `Value`.
// All of them return `ClientError::Unavailable` when both sources fail.

pub struct CareersApi<'a> {
    client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl CareersApi<'_> {
    pub async fn placeholders<T: DeserializeOwned>(&self) -> Result<T> {
        self.client.request("/careers/placeholders", fallback::PLACEHOLDERS, None).await
    }

    pub async fn generate_path<T: DeserializeOwned>(&self, stage: &str, goal: &str) -> Result<T> {
        self.client.request(&career_generate_endpoint(stage, goal), fallback::PLACEHOLDERS, None).await
    }

    pub async fn career_map<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.client.request(&career_endpoint(id), fallback::PLACEHOLDERS, None).await
    }
}

pub struct InterestsApi<'a> {
    client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl InterestsApi<'_> {
    pub async fn all<T: DeserializeOwned>(&self) -> Result<T> {
        self.client.request("/interests", fallback::INTERESTS, None).await
    }

    pub async fn search<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        self.client.request(&interests_search_endpoint(query), fallback::INTERESTS, None).await
    }

    pub async fn by_category<T: DeserializeOwned>(&self, category: &str) -> Result<T> {
        self.client.request(&interests_category_endpoint(category), fallback::INTERESTS, None).await
    }
}

pub struct BusinessApi<'a> {
    client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl BusinessApi<'_> {
    pub async fn ideas<T: DeserializeOwned>(&self) -> Result<T> {
        self.client.request("/business/ideas", fallback::BUSINESS_IDEAS, None).await
    }

    pub async fn idea<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.client.request(&business_idea_endpoint(id), fallback::BUSINESS_IDEAS, None).await
    }

    pub async fn search<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        self.client.request(&business_search_endpoint(query), fallback::BUSINESS_IDEAS, None).await
    }

    pub async fn by_category<T: DeserializeOwned>(&self, category: &str) -> Result<T> {
        self.client.request(&business_category_endpoint(category), fallback::BUSINESS_IDEAS, None).await
    }
}

pub struct JobsApi<'a> {
    client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl JobsApi<'_> {
    pub async fn all<T: DeserializeOwned>(&self) -> Result<T> {
        self.client.request("/jobs", fallback::JOBS_SEED, None).await
    }

    pub async fn job<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.client.request(&job_endpoint(id), fallback::JOBS_SEED, None).await
    }

    pub async fn search<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        self.client.request(&jobs_search_endpoint(query), fallback::JOBS_SEED, None).await
    }

    pub async fn by_type<T: DeserializeOwned>(&self, kind: JobType) -> Result<T> {
        self.client.request(&jobs_type_endpoint(kind), fallback::JOBS_SEED, None).await
    }

    pub async fn latest<T: DeserializeOwned>(&self, limit: usize) -> Result<T> {
        self.client.request(&jobs_latest_endpoint(limit), fallback::JOBS_SEED, None).await
    }
}

pub struct LanguageApi<'a> {
    client: &'a ApiClient,
}

#[allow(clippy::missing_errors_doc)]
impl LanguageApi<'_> {
    pub async fn translations<T: DeserializeOwned>(&self, lang: &str) -> Result<T> {
        self.client.request(&translations_endpoint(lang), &fallback::translations(lang), None).await
    }

    pub async fn languages<T: DeserializeOwned>(&self) -> Result<T> {
        self.client.request("/languages", fallback::LANGUAGES, None).await
    }
}
