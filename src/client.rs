use reqwest::Url;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::config::{DEFAULT_TIMEOUT, DEFAULT_URL, load_config};
use crate::error::{TmbError, format_remote_error};

#[derive(Clone)]
pub struct ClientConfig {
    /// Base API URL, typically `https://api.tmb.cat/v1`.
    pub url: String,
    /// Application identifier from the TMB developer portal.
    pub app_id: String,
    /// Application key from the TMB developer portal.
    pub app_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Application credentials, sent as query parameters on every request.
#[derive(Clone)]
pub(crate) struct Credentials {
    app_id: String,
    app_key: String,
}

impl Credentials {
    fn as_query(&self) -> [(&str, &str); 2] {
        [
            ("app_id", self.app_id.as_str()),
            ("app_key", self.app_key.as_str()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .finish()
    }
}

/// Blocking HTTP handle shared by [`TransitCatalog`](crate::TransitCatalog),
/// [`ArrivalForecast`](crate::ArrivalForecast) and
/// [`TripPlanner`](crate::TripPlanner).
///
/// Holds only immutable data, so clones are cheap and can be used from any
/// thread.
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    credentials: Credentials,
    timeout: Duration,

    http: HttpClient,
}

impl Client {
    /// Creates a client for the public TMB endpoint.
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Result<Self, TmbError> {
        Self::with_config(ClientConfig {
            url: DEFAULT_URL.to_string(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Creates a client from `TMB_APP_ID`, `TMB_APP_KEY` and the optional
    /// `TMB_API_URL`.
    pub fn from_env() -> Result<Self, TmbError> {
        Self::with_config(load_config()?)
    }

    pub fn with_config(cfg: ClientConfig) -> Result<Self, TmbError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("tmb-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("tmb-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                TmbError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            url: cfg.url,
            credentials: Credentials {
                app_id: cfg.app_id,
                app_key: cfg.app_key,
            },
            timeout: cfg.timeout,
            http,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves `segments` below the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a stop or line code can
    /// never add path components, a query or a fragment. Empty, `.` and `..`
    /// segments are rejected.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, TmbError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| matches!(s.trim(), "" | "." | ".."))
        {
            return Err(TmbError::InvalidCode {
                value: bad.to_string(),
            });
        }

        let mut url = Url::parse(&self.url).map_err(|e| {
            TmbError::Configuration(format!("invalid base url {}: {}", self.url, e))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                TmbError::Configuration(format!("base url {} cannot carry a path", self.url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs the endpoint at `segments` and deserializes the JSON body.
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, TmbError> {
        self.fetch_json(self.endpoint(segments)?, params)
    }

    /// GETs `url` and deserializes the JSON body.
    ///
    /// Credentials are appended after `params`; URLs reported in errors and
    /// logs never carry them.
    pub(crate) fn fetch_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, TmbError> {
        debug!(%url, ?params, "GET");

        let resp = self
            .http
            .get(url.clone())
            .query(params)
            .query(&self.credentials.as_query())
            .timeout(self.timeout)
            .send()
            .map_err(|source| TmbError::Transport {
                url: url.to_string(),
                source: source.without_url(),
            })?;

        let status = resp.status();
        let text = resp.text().map_err(|source| TmbError::Transport {
            url: url.to_string(),
            source: source.without_url(),
        })?;
        debug!(%url, %status, bytes = text.len(), "response");

        if !status.is_success() {
            return Err(format_remote_error(status, url.as_str(), &text));
        }

        serde_json::from_str::<T>(&text).map_err(|e| TmbError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
