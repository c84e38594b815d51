use serde::{Deserialize, Serialize};

/// API response body for the `/api/intensity` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityResponse {
    /// Carbon intensity in grams of CO₂ per kWh.
    pub intensity: f64,
}
