use serde::Deserialize;

/// Body of a WattTime login response.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the subsequent data request. Absent or empty
    /// means the login call succeeded at the HTTP level but the
    /// exchange cannot continue.
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Returns the token if it is present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Body of a WattTime signal response.
///
/// Readings arrive ordered most-recent-first; the first element is
/// authoritative and is never aggregated with the rest.
#[derive(Debug, Deserialize)]
pub struct SignalResponse {
    pub data: Vec<SignalReading>,
}

/// A single emissions reading.
#[derive(Debug, Deserialize)]
pub struct SignalReading {
    /// Marginal operating emissions rate in lbs CO₂ per MWh.
    pub value: f64,
    /// Upstream-provided timestamp; informational only.
    #[serde(default)]
    pub point_time: Option<String>,
}
