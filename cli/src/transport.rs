//! `reqwest` transport with static fallback files read from disk.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use careermap_client::net::transport::{Transport, TransportError};
use careermap_client::net::types::{HttpResponse, Method, RequestOptions};

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    data_dir: PathBuf,
}

fn map_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_timeout() { TransportError::Timeout } else { TransportError::Network(err.to_string()) }
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent("careermap-cli").build()?;
        Ok(Self { client, data_dir: data_dir.into() })
    }

    /// Map `/data/x.json` into the data directory. `None` for paths that
    /// would escape it.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.data_dir.join(relative))
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse, TransportError> {
        let method = match options.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut request = self.client.request(method, url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(map_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest)?;
        tracing::debug!(%url, status, "api response");
        Ok(HttpResponse { status, body })
    }

    async fn load_static(&self, path: &str) -> Result<HttpResponse, TransportError> {
        let Some(file) = self.resolve(path) else {
            return Ok(HttpResponse::new(404, ""));
        };
        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(HttpResponse::new(200, body)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(file = %file.display(), "static file missing");
                Ok(HttpResponse::new(404, ""))
            }
            Err(e) => Err(TransportError::Network(e.to_string())),
        }
    }
}
