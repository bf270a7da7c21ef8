use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: http::Method, url: String) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: Bytes::new(),
            timeout: None,
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new(http::Method::GET, url.to_string())
    }
}

/// Phase breakdown for one hop, as measured by the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTimings {
    pub blocked: Duration,
    pub connecting: Duration,
    pub tls_handshaking: Duration,
    pub sending: Duration,
    pub waiting: Duration,
    pub receiving: Duration,
}

impl HttpTimings {
    /// Time on the wire for the request itself: sending + waiting + receiving.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.sending + self.waiting + self.receiving
    }
}

/// One completed request/response pair. Redirects produce one hop each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHop {
    pub url: String,
    pub status: u16,
    /// e.g. `HTTP/1.1`
    pub proto: String,
    pub timings: HttpTimings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpExchange {
    /// In issue order; the last hop is the final response.
    pub hops: Vec<HttpHop>,
    /// Final response headers (lowercased names).
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpExchange {
    #[must_use]
    pub fn final_hop(&self) -> Option<&HttpHop> {
        self.hops.last()
    }

    pub fn body_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    Failed,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("http request timed out after {0:?}")]
    Timeout(Duration),

    #[error("http request failed: {0}")]
    Failed(String),
}

impl TransportError {
    #[must_use]
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            Self::Timeout(_) => TransportErrorKind::Timeout,
            Self::Failed(_) => TransportErrorKind::Failed,
        }
    }
}

/// Executes requests (DNS, TCP, TLS, redirects) on behalf of a VU.
///
/// Only the result is consumed here; classification runs after the future resolves.
pub trait Transport: Send + Sync + 'static {
    fn execute(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = std::result::Result<HttpExchange, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_excludes_connection_setup() {
        let t = HttpTimings {
            blocked: Duration::from_millis(100),
            connecting: Duration::from_millis(50),
            tls_handshaking: Duration::from_millis(25),
            sending: Duration::from_millis(1),
            waiting: Duration::from_millis(10),
            receiving: Duration::from_millis(2),
        };
        assert_eq!(t.duration(), Duration::from_millis(13));
    }

    #[test]
    fn transport_error_kinds() {
        assert_eq!(
            TransportError::Timeout(Duration::from_secs(1)).kind().to_string(),
            "timeout"
        );
        assert_eq!(
            TransportError::Failed("refused".to_string()).to_string(),
            "http request failed: refused"
        );
    }
}
