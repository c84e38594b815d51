//! Error taxonomy and transport mapping for the proxy.
//!
//! Upstream-facing failures (login rejected, data fetch rejected,
//! unexpected payload shape) map to 502: this service acts as a gateway
//! and an upstream failure is not its fault. Local misconfiguration and
//! anything unanticipated (network failure, malformed JSON) map to 500.
//! Every failure produces a response; a request is never left
//! unanswered.

use http::StatusCode;
use serde_json::{Value, json};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `WATTTIME_USERNAME` / `WATTTIME_PASSWORD` missing or empty.
    /// No upstream call is attempted.
    #[error("Missing WattTime credentials")]
    MissingCredentials,

    /// The login call returned a non-success status or timed out.
    #[error("WattTime login failed{}", fmt_status(.status))]
    LoginFailed {
        status: Option<u16>,
        details: String,
    },

    /// Login succeeded at the HTTP level but the body carried no token.
    #[error("No WattTime token returned")]
    NoToken,

    /// The signal call returned a non-success status or timed out.
    #[error("WattTime data fetch failed{}", fmt_status(.status))]
    DataFetchFailed {
        status: Option<u16>,
        details: String,
    },

    /// The signal call succeeded but the payload did not match the
    /// expected `{"data": [{"value": <number>, ...}]}` shape. Carries
    /// the raw parsed payload for diagnostics.
    #[error("Unexpected WattTime response format")]
    UnexpectedFormat { payload: Value },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl Error {
    /// Transport status for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::LoginFailed { .. }
            | Error::NoToken
            | Error::DataFetchFailed { .. }
            | Error::UnexpectedFormat { .. } => StatusCode::BAD_GATEWAY,
            Error::MissingCredentials | Error::Http(_) | Error::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body reported to the caller for this failure.
    pub fn response_body(&self) -> Value {
        match self {
            Error::MissingCredentials => json!({ "error": "Missing WattTime credentials" }),
            Error::LoginFailed { details, .. } => {
                json!({ "error": "WattTime login failed", "details": details })
            }
            Error::NoToken => json!({ "error": "No WattTime token returned" }),
            Error::DataFetchFailed { details, .. } => {
                json!({ "error": "WattTime data fetch failed", "details": details })
            }
            Error::UnexpectedFormat { payload } => {
                json!({ "error": "Unexpected WattTime response format", "details": payload })
            }
            other => json!({ "error": other.to_string() }),
        }
    }
}
