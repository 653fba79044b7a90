//! Transport client: connection configuration and HTTP execution.
//!
//! # Design
//! [`Transport`] is the seam between the pure request builder and the
//! network. [`HttpTransport`] implements it on top of a `ureq` agent built
//! once from a [`TransportConfig`]; an agent is never reconfigured in place.
//!
//! There is no process-wide client. [`ClientManager`] is an ordinary value
//! that hands out shared clients and swaps in a freshly built one on
//! [`ClientManager::configure`]; anyone still holding the previous `Arc`
//! keeps using it. [`create_client`] builds an isolated, unshared client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{ConfigError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const BASE_URL_ENV: &str = "COUNT_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "COUNT_API_TIMEOUT_MS";

/// Connection options for a transport client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Sent with every request unless the request sets the same header.
    pub headers: Vec<(String, String)>,
    /// Browser cookie-jar flag. Kept for configuration parity; a native
    /// client has no ambient credentials, so it changes nothing on the wire.
    /// Credentials go in `headers` and are always sent.
    pub with_credentials: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            with_credentials: false,
        }
    }
}

impl TransportConfig {
    /// Defaults with the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Read `COUNT_API_BASE_URL` and `COUNT_API_TIMEOUT_MS`, falling back to
    /// the defaults for whichever is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var(BASE_URL_ENV).ok();
        let timeout = std::env::var(TIMEOUT_ENV).ok();
        Self::from_values(base_url.as_deref(), timeout.as_deref())
    }

    fn from_values(base_url: Option<&str>, timeout_ms: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match base_url {
            Some(url) if url.trim().is_empty() => return Err(ConfigError::EmptyBaseUrl),
            Some(url) => Self::new(url.trim()),
            None => Self::default(),
        };
        if let Some(raw) = timeout_ms {
            let ms: u64 = raw.trim().parse().map_err(|source| ConfigError::InvalidTimeout {
                value: raw.to_string(),
                source,
            })?;
            config.timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add or replace a default header (names compare case-insensitively).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Record the flag. Does not filter or add any header.
    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    /// Default headers merged under the request's own.
    pub fn effective_headers(&self, request: &HttpRequest) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = self
            .headers
            .iter()
            .filter(|(k, _)| !request.headers.iter().any(|(rk, _)| rk.eq_ignore_ascii_case(k)))
            .cloned()
            .collect();
        merged.extend(request.headers.iter().cloned());
        merged
    }
}

/// Executes a request and returns whatever response the server sent.
///
/// Any status code counts as a response, whatever its body holds. `Err`
/// means the request could not be sent, or no response came back.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking HTTP transport backed by a `ureq` agent.
pub struct HttpTransport {
    config: TransportConfig,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Self {
        // Status codes are data here; the SDK interprets them itself.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self { config, agent }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.path, "sending request");
        let headers = self.config.effective_headers(request);
        let body = request.body.as_deref().map(str::as_bytes);

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&request.path), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&request.path), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&request.path), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&request.path), &headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(&request.path), &headers), body),
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // The status already arrived; a body that cannot be read or decoded
        // must not turn the response into "no response".
        let body = match response.body_mut().read_to_vec() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!(status, url = %request.path, error = %err, "discarding unreadable response body");
                String::new()
            }
        };
        debug!(status, url = %request.path, "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Errors raised while building the request mean nothing was sent.
fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => TransportError::Request(err.into()),
        other => TransportError::NoResponse(other.into()),
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

/// Build an independently configured client that nobody else shares.
pub fn create_client(config: TransportConfig) -> HttpTransport {
    HttpTransport::new(config)
}

/// Holds the current shared client and replaces it wholesale on
/// reconfiguration.
#[derive(Debug, Default)]
pub struct ClientManager {
    current: Option<Arc<HttpTransport>>,
}

impl ClientManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out with a client built from `config`.
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            current: Some(Arc::new(HttpTransport::new(config))),
        }
    }

    /// Replace the active client. Clients already handed out are untouched.
    pub fn configure(&mut self, config: TransportConfig) -> Arc<HttpTransport> {
        info!(base_url = %config.base_url, timeout_ms = config.timeout.as_millis() as u64, "configuring count API client");
        let client = Arc::new(HttpTransport::new(config));
        self.current = Some(Arc::clone(&client));
        client
    }

    /// The active client, built from defaults if none was configured yet.
    pub fn client(&mut self) -> Arc<HttpTransport> {
        Arc::clone(
            self.current
                .get_or_insert_with(|| Arc::new(HttpTransport::new(TransportConfig::default()))),
        )
    }

    /// Configuration of the active client, if one exists.
    pub fn config(&self) -> Option<&TransportConfig> {
        self.current.as_deref().map(HttpTransport::config)
    }
}
