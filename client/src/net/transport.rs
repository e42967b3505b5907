//! HTTP transport seam.
//!
//! Client-side (hydrate): `BrowserTransport` issues fetches via `gloo-net`.
//! Native hosts plug in their own implementation, and tests script one.

use async_trait::async_trait;

use super::types::{HttpResponse, RequestOptions};

/// Failure to complete an HTTP exchange at all. Non-2xx responses are not
/// transport errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
}

#[async_trait(?Send)]
pub trait Transport {
    /// Perform a request against `url`.
    ///
    /// # Errors
    ///
    /// Returns an error when no response was received.
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse, TransportError>;

    /// Fetch a static same-origin resource such as `/data/jobs_seed.json`.
    ///
    /// # Errors
    ///
    /// Returns an error when the resource could not be reached.
    async fn load_static(&self, path: &str) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTransport;

#[cfg(feature = "hydrate")]
fn network(err: gloo_net::Error) -> TransportError {
    TransportError::Network(err.to_string())
}

#[cfg(feature = "hydrate")]
async fn with_timeout<F>(fetch: F, limit: std::time::Duration) -> Result<HttpResponse, TransportError>
where
    F: std::future::Future<Output = Result<HttpResponse, TransportError>>,
{
    use futures::future::{Either, select};

    let fetch = std::pin::pin!(fetch);
    let timer = std::pin::pin!(gloo_timers::future::sleep(limit));
    match select(fetch, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(TransportError::Timeout),
    }
}

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse, TransportError> {
        use gloo_net::http::Request;

        use super::types::Method;

        let mut builder = match options.method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
            Method::Put => Request::put(url),
            Method::Delete => Request::delete(url),
        };
        for (name, value) in &options.headers {
            builder = builder.header(name, value);
        }
        let request = match &options.body {
            Some(body) => builder.body(body.clone()),
            None => builder.build(),
        }
        .map_err(network)?;

        let fetch = async move {
            let response = request.send().await.map_err(network)?;
            let status = response.status();
            let body = response.text().await.map_err(network)?;
            Ok(HttpResponse { status, body })
        };
        match options.timeout {
            Some(limit) => with_timeout(fetch, limit).await,
            None => fetch.await,
        }
    }

    async fn load_static(&self, path: &str) -> Result<HttpResponse, TransportError> {
        self.send(path, &RequestOptions::get()).await
    }
}
