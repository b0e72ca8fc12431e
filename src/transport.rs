//! Transport layer abstraction.
//!
//! The provider is polymorphic over anything that can perform a single
//! GET carrying the canonical query and hand back a parsed response.
//! A reqwest-backed [`HttpTransport`] is bundled as the default
//! collaborator; tests use the scriptable [`mock::MockTransport`].

use crate::error::{TransportError, TransportResult};
use crate::query::Query;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::time::Duration;

/// A table row, opaque to the provider.
pub type Item = serde_json::Value;

/// Opaque cancellation token threaded through to the transport.
///
/// The core never interprets it; each transport implementation wraps its
/// own cancellation primitive inside this.
pub struct CancelToken(Box<dyn Any + Send + Sync>);

impl CancelToken {
    /// Wraps a transport-specific cancellation value.
    pub fn new<T: Any + Send + Sync + 'static>(inner: T) -> Self {
        Self(Box::new(inner))
    }

    /// Unwraps back to the transport-specific type.
    pub fn downcast<T: Any + Send + Sync + 'static>(self) -> Option<T> {
        self.0.downcast::<T>().ok().map(|b| *b)
    }

    /// Borrows the transport-specific type.
    pub fn downcast_ref<T: Any + Send + Sync + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

/// Response shape consumed from a server-side processing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Row count after filtering.
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,
    /// Total row count before filtering.
    #[serde(rename = "recordsTotal")]
    pub records_total: u64,
    /// The page of rows; endpoints may send `null` for an empty page.
    #[serde(default)]
    pub data: Option<Vec<Item>>,
}

/// Performs the single outbound read of a retrieval.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `query` to `url` as GET request parameters and parses the
    /// response. The cancellation token, when present, is the caller's;
    /// implementations may honor or ignore it.
    async fn get(
        &self,
        url: &str,
        query: &Query,
        cancel: Option<&CancelToken>,
    ) -> TransportResult<FetchResponse>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a 30 second request timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");
        Self { client }
    }

    /// Creates a transport around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &Query,
        _cancel: Option<&CancelToken>,
    ) -> TransportResult<FetchResponse> {
        let response = self
            .client
            .get(url)
            .query(&query.to_pairs())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// A mock transport for testing.
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scriptable transport that records every request it receives and
    /// answers from a queue of prepared results.
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<TransportResult<FetchResponse>>>,
        requests: Mutex<Vec<(String, Query)>>,
        cancels_seen: Mutex<usize>,
    }

    impl MockTransport {
        /// Creates a mock with no scripted responses.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a successful response.
        pub fn push_ok(&self, response: FetchResponse) {
            self.responses.lock().unwrap().push_back(Ok(response));
        }

        /// Queues a failure.
        pub fn push_err(&self, err: TransportError) {
            self.responses.lock().unwrap().push_back(Err(err));
        }

        /// URLs and queries received so far, in call order.
        pub fn requests(&self) -> Vec<(String, Query)> {
            self.requests.lock().unwrap().clone()
        }

        /// Number of calls made.
        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        /// Number of calls that carried a cancellation token.
        pub fn cancels_seen(&self) -> usize {
            *self.cancels_seen.lock().unwrap()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(
            &self,
            url: &str,
            query: &Query,
            cancel: Option<&CancelToken>,
        ) -> TransportResult<FetchResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), query.clone()));
            if cancel.is_some() {
                *self.cancels_seen.lock().unwrap() += 1;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("no scripted response".into())))
        }
    }
}
