//! Process configuration: WattTime credentials and the upstream profile.
//!
//! Credentials come from the hosting environment at request time. The
//! upstream profile captures the differences between the v3 and v2
//! WattTime APIs (base URLs and one extra query pair) so the client
//! and proxy never branch on version.

use std::env;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{Error, Result};

/// Default balancing authority when the request does not name one.
pub const DEFAULT_REGION: &str = "CAISO_NORTH";

/// Environment variable holding the WattTime account username.
pub const USERNAME_VAR: &str = "WATTTIME_USERNAME";

/// Environment variable holding the WattTime account password.
pub const PASSWORD_VAR: &str = "WATTTIME_PASSWORD";

/// Environment variable selecting the upstream API version (`v3`/`v2`).
pub const API_VERSION_VAR: &str = "WATTTIME_API_VERSION";

/// WattTime account credentials.
///
/// Both fields must be non-empty; construction fails otherwise, before
/// any upstream call is attempted. The password is redacted from debug
/// output and never logged.
#[derive(Clone)]
pub struct WattTimeCredentials {
    pub username: String,
    pub password: String,
}

impl WattTimeCredentials {
    /// Build credentials, rejecting empty values.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(Error::MissingCredentials);
        }
        Ok(WattTimeCredentials { username, password })
    }

    /// Read credentials from `WATTTIME_USERNAME` / `WATTTIME_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        Self::new(
            env::var(USERNAME_VAR).unwrap_or_default(),
            env::var(PASSWORD_VAR).unwrap_or_default(),
        )
    }

    /// Value for the `Authorization` header of the login call.
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64.encode(raw))
    }
}

impl std::fmt::Debug for WattTimeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WattTimeCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Upstream API contract version.
///
/// The v3 and v2 WattTime APIs differ only in endpoint URLs and in the
/// extra query pair sent with the signal request; the exchange itself
/// is identical.
#[derive(Debug, Clone)]
pub struct UpstreamProfile {
    /// Login endpoint URL.
    pub login_url: String,
    /// Signal endpoint URL; the query string is appended per request.
    pub signal_url: String,
    /// Extra query pair sent alongside `ba=<region>`.
    pub extra_query: Option<(&'static str, &'static str)>,
}

impl UpstreamProfile {
    /// WattTime API v3: `/v3/signal-index` with `signal=co2_moer`.
    pub fn v3() -> Self {
        UpstreamProfile {
            login_url: "https://api.watttime.org/v3/login".to_string(),
            signal_url: "https://api.watttime.org/v3/signal-index".to_string(),
            extra_query: Some(("signal", "co2_moer")),
        }
    }

    /// WattTime API v2: `/index` with `style=all`.
    pub fn v2() -> Self {
        UpstreamProfile {
            login_url: "https://api2.watttime.org/v2/login".to_string(),
            signal_url: "https://api2.watttime.org/index".to_string(),
            extra_query: Some(("style", "all")),
        }
    }

    /// Select the profile via `WATTTIME_API_VERSION`; defaults to v3.
    pub fn from_env() -> Self {
        match env::var(API_VERSION_VAR).ok().as_deref() {
            Some("v2") => Self::v2(),
            _ => Self::v3(),
        }
    }

    /// Query pairs for the signal request for `region`.
    ///
    /// The region string is forwarded verbatim; no validation against
    /// a known region list.
    pub fn signal_query(&self, region: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("ba", region.to_string())];
        if let Some((key, value)) = self.extra_query {
            query.push((key, value.to_string()));
        }
        query
    }
}
