//! In-memory transport and tokio runtime for controller tests.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use super::fetch::{FetchError, RawResponse, Transport};
use super::runtime::{LocalFuture, Runtime};

/// Spawns on the current `LocalSet`
pub struct TokioRuntime;

impl Runtime for TokioRuntime {
    fn spawn(&self, task: LocalFuture) {
        tokio::task::spawn_local(task);
    }

    fn sleep(&self, duration: Duration) -> LocalFuture {
        Box::pin(tokio::time::sleep(duration))
    }
}

type Responder = Box<dyn Fn(&str) -> RawResponse>;

/// Records requested URLs and answers through a closure
pub struct MockTransport {
    requests: RefCell<Vec<String>>,
    delays: RefCell<VecDeque<Duration>>,
    responder: Responder,
}

impl MockTransport {
    pub fn new(responder: impl Fn(&str) -> RawResponse + 'static) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            delays: RefCell::new(VecDeque::new()),
            responder: Box::new(responder),
        }
    }

    /// Answer every request with the same JSON body
    pub fn with_body(body: serde_json::Value) -> Self {
        let body = body.to_string();
        Self::new(move |_| RawResponse::new(200, body.clone()))
    }

    /// Latency of the next requests, in order
    pub fn push_delay(&self, delay: Duration) {
        self.delays.borrow_mut().push_back(delay);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Requested URLs with the query string percent-decoded
    pub fn decoded_requests(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|url| {
                urlencoding::decode(url)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| url.clone())
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        let delay = self.delays.borrow_mut().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok((self.responder)(url))
    }
}

/// Value of `page[offset]` in a decoded URL
pub fn page_offset(url: &str) -> usize {
    query_value(url, "page[offset]")
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// Value of `page[limit]` in a decoded URL
pub fn page_limit(url: &str) -> Option<usize> {
    query_value(url, "page[limit]").and_then(|value| value.parse().ok())
}

pub fn query_value<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let query = url.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}
