//! Blocking HTTP round trips over a shared async client.
//!
//! Uses async reqwest internally on a shared tokio runtime, but presents a
//! sync interface so rayon workers can call it directly.

use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

/// Timeouts applied to every request made through [`http_client`].
#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout (connect + send + read body)
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
        }
    }
}

static HTTP_CONFIG: OnceLock<HttpConfig> = OnceLock::new();

/// Install the process-wide HTTP settings.
///
/// Must be called before the first request; later calls are ignored with a warning.
pub fn set_http_config(config: HttpConfig) {
    if HTTP_CONFIG.set(config).is_err() {
        log::warn!("HTTP config already initialised, ignoring {config:?}");
    }
}

/// Current HTTP settings (defaults if never set)
pub fn http_config() -> &'static HttpConfig {
    HTTP_CONFIG.get_or_init(HttpConfig::default)
}

/// Transport-level failure talking to a remote endpoint
#[derive(Debug)]
pub struct HttpError {
    /// Status code when the server answered
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(s) => write!(f, "HTTP {s}: {}", self.message),
            None => write!(f, "HTTP error: {}", self.message),
        }
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Create HTTP error from reqwest error, without the request URL
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into an [`HttpError`] carrying a body excerpt
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(HttpError {
            status: Some(self.status),
            message: excerpt(&self.body, 200).to_string(),
        })
    }
}

/// First `max` bytes of `s`, cut on a char boundary
pub fn excerpt(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    let config = http_config();
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .pool_max_idle_per_host(8)
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Send a request and read the whole body, blocking the calling thread.
///
/// Non-2xx statuses are returned as a normal [`HttpResponse`]; only transport
/// failures (connect, timeout, body read) become [`HttpError`].
pub fn execute(request: reqwest::RequestBuilder) -> Result<HttpResponse, HttpError> {
    SHARED_RUNTIME.handle().block_on(async {
        let response = request.send().await.map_err(HttpError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(HttpError::from_reqwest)?;
        Ok(HttpResponse { status, body })
    })
}
