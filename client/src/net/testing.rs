//! Scripted transport for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use futures::channel::oneshot;

use super::transport::{Transport, TransportError};
use super::types::{HttpResponse, RequestOptions};

type Reply = Result<HttpResponse, TransportError>;

/// Unknown URLs fail like an unreachable host; unknown static paths 404.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: RefCell<HashMap<String, Reply>>,
    statics: RefCell<HashMap<String, Reply>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    pub(crate) calls: RefCell<Vec<(String, RequestOptions)>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, url: &str, status: u16, body: impl Into<String>) {
        self.routes.borrow_mut().insert(url.to_owned(), Ok(HttpResponse::new(status, body)));
    }

    pub(crate) fn fail(&self, url: &str, error: TransportError) {
        self.routes.borrow_mut().insert(url.to_owned(), Err(error));
    }

    pub(crate) fn serve_static(&self, path: &str, body: impl Into<String>) {
        self.statics.borrow_mut().insert(path.to_owned(), Ok(HttpResponse::new(200, body)));
    }

    pub(crate) fn fail_static(&self, path: &str, error: TransportError) {
        self.statics.borrow_mut().insert(path.to_owned(), Err(error));
    }

    /// Hold `load_static(path)` until the paired sender fires.
    pub(crate) fn gate(&self, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(path.to_owned(), rx);
        tx
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse, TransportError> {
        self.calls.borrow_mut().push((url.to_owned(), options.clone()));
        let reply = self.routes.borrow().get(url).cloned();
        reply.unwrap_or_else(|| Err(TransportError::Network(format!("unreachable: {url}"))))
    }

    async fn load_static(&self, path: &str) -> Result<HttpResponse, TransportError> {
        let gate = self.gates.borrow_mut().remove(path);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let reply = self.statics.borrow().get(path).cloned();
        reply.unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
    }
}
