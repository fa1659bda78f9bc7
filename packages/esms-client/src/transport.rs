//! HTTP seam between the client and the gateway.
//!
//! [`ReqwestTransport`] is the production implementation; [`MockTransport`]
//! returns canned responses and records every request for assertions.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

use crate::error::{EsmsError, Result};

/// Status and raw body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a GET with query parameters and waits for the full body.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<TransportResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client with a request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EsmsError::transport)?;
        Ok(Self { client })
    }

    /// Use a caller-configured client (proxy, TLS, pooling settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SmsTransport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<TransportResponse> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(EsmsError::transport)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(EsmsError::transport)?;
        debug!(status, bytes = body.len(), "Gateway response received");

        Ok(TransportResponse { status, body })
    }
}

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first query parameter called `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

enum MockReply {
    Respond(TransportResponse),
    Fail(Box<dyn Fn() -> EsmsError + Send + Sync>),
}

/// Mock transport for testing.
///
/// Replies are consumed in the order they were queued; once the queue is
/// empty every request gets `200 {}`.
///
/// # Example
///
/// ```rust
/// use esms_client::transport::MockTransport;
///
/// let mock = MockTransport::new()
///     .with_json(200, r#"{"CodeResult": "100", "SMSID": "abc123"}"#);
/// assert_eq!(mock.call_count(), 0);
/// ```
#[derive(Default)]
pub struct MockTransport {
    replies: Arc<RwLock<VecDeque<MockReply>>>,
    calls: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body text.
    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .write()
            .unwrap()
            .push_back(MockReply::Respond(TransportResponse::new(status, body)));
        self
    }

    /// Alias of [`MockTransport::with_response`] for JSON bodies.
    pub fn with_json(self, status: u16, body: impl Into<String>) -> Self {
        self.with_response(status, body)
    }

    /// Queue a transport failure. `make_error` is called when the reply is used.
    pub fn with_error<F>(self, make_error: F) -> Self
    where
        F: Fn() -> EsmsError + Send + Sync + 'static,
    {
        self.replies
            .write()
            .unwrap()
            .push_back(MockReply::Fail(Box::new(make_error)));
        self
    }

    /// All requests received so far.
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.read().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<RecordedRequest> {
        self.calls.read().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl SmsTransport for MockTransport {
    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<TransportResponse> {
        self.calls.write().unwrap().push(RecordedRequest {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });

        let reply = self.replies.write().unwrap().pop_front();
        match reply {
            Some(MockReply::Respond(resp)) => Ok(resp),
            Some(MockReply::Fail(make_error)) => Err(make_error()),
            None => Ok(TransportResponse::new(200, "{}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_in_order_and_records() {
        let mock = MockTransport::new()
            .with_response(200, "first")
            .with_response(500, "second");

        let query = vec![("Phone", "0900000000".to_string())];
        let a = mock.get("http://gw/send", &query).await.unwrap();
        let b = mock.get("http://gw/send", &query).await.unwrap();
        let c = mock.get("http://gw/send", &query).await.unwrap();

        assert_eq!(a, TransportResponse::new(200, "first"));
        assert_eq!(b, TransportResponse::new(500, "second"));
        assert_eq!(c, TransportResponse::new(200, "{}"));
        assert!(!b.is_success());

        assert_eq!(mock.call_count(), 3);
        let last = mock.last_call().unwrap();
        assert_eq!(last.url, "http://gw/send");
        assert_eq!(last.param("Phone"), Some("0900000000"));
        assert_eq!(last.param("Content"), None);
    }

    #[tokio::test]
    async fn test_mock_error_reply() {
        let mock = MockTransport::new()
            .with_error(|| EsmsError::Config("boom".into()));

        let err = mock.get("http://gw/send", &[]).await.unwrap_err();
        assert!(matches!(err, EsmsError::Config(_)));
        assert_eq!(mock.call_count(), 1);
    }
}
