use std::time::Duration;

use mantle_domain::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use mantle_domain::MantleError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

/// HTTP client with a per-call timeout and request/response logging.
///
/// Transient network errors are surfaced, not retried; the only retry loop
/// in the system is the documented management-status poll.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, MantleError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, MantleError> {
        let request = builder.build().map_err(request_error)?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(request_error(err))
            }
        }
    }
}

/// Classify a reqwest failure into the domain error set.
pub(crate) fn request_error(err: reqwest::Error) -> MantleError {
    if err.is_timeout() {
        MantleError::Network(format!("request timed out: {err}"))
    } else if err.is_connect() {
        MantleError::Network(format!("connection failed: {err}"))
    } else {
        MantleError::Network(err.to_string())
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-call timeout (defaults to 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a User-Agent header for every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers attached to every request.
    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient, MantleError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| MantleError::Config(format!("failed to construct http client: {err}")))?;

        Ok(HttpClient { client })
    }
}
