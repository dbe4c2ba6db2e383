use reqwest::StatusCode;
use thiserror::Error;

use crate::models::Coordinates;

/// Errors returned by every TMB operation.
#[derive(Debug, Error)]
pub enum TmbError {
    /// The API answered with a non-success HTTP status.
    #[error("TMB API request failed: HTTP {status} for url ({url})\n{message}")]
    Remote {
        status: StatusCode,
        url: String,
        message: String,
    },

    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("could not reach TMB API ({url}): {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not JSON of the expected shape.
    #[error("failed to parse TMB API JSON (url={url}): {reason}")]
    MalformedResponse { url: String, reason: String },

    /// No bus line carries this name.
    #[error("no bus line named {name:?}")]
    InvalidLine { name: String },

    /// A stop or line code that cannot stand as a single URL path segment
    /// (empty, `.` or `..`).
    #[error("invalid stop or line code {value:?}")]
    InvalidCode { value: String },

    /// The planner returned no itinerary to pick the shortest from.
    #[error("no itineraries found from {from} to {to}")]
    NoItineraries { from: Coordinates, to: Coordinates },

    /// Missing credentials, unusable base URL, or HTTP client setup failure.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl TmbError {
    /// True when the failure happened talking to the API, either at transport
    /// level or as a non-success status.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Transport { .. })
    }

    /// True when the request gave up after the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }
}

// TMB error bodies come in two flavours, {"status":"error","message":...}
// and the gateway's {"code":...,"message":...}. Only the message is shared.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct TmbErrorResponse {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

pub(crate) fn format_remote_error(status: StatusCode, url: &str, body: &str) -> TmbError {
    let server_message = serde_json::from_str::<TmbErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string());

    let message = if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        format!(
            "TMB authentication failed.\n- Check the app_id and app_key of your application at https://developer.tmb.cat\n- Ensure the application has access to this API\n\nServer message: {}",
            server_message
        )
    } else if status == StatusCode::NOT_FOUND {
        format!(
            "Resource not found: the stop, line or endpoint does not exist.\n\nServer message: {}",
            server_message
        )
    } else {
        server_message
    };

    TmbError::Remote {
        status,
        url: url.to_string(),
        message,
    }
}
