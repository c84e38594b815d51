//! Request orchestration for the intensity endpoint.
//!
//! The flow is strictly linear: credential check, login, token
//! extraction, signal fetch, unit conversion. Any step short-circuits
//! to a terminal error. There are no retries, and the token is never
//! reused across requests.

use tracing::info;
use url::form_urlencoded;

use crate::client::WattTimeClient;
use crate::config::{DEFAULT_REGION, WattTimeCredentials};
use crate::error::Result;
use crate::units::lbs_per_mwh_to_g_per_kwh;

/// Run the full authenticate-then-fetch exchange for `region`.
///
/// Returns the carbon intensity in g CO₂/kWh. The two upstream calls
/// are sequential: the signal fetch needs the token from the login.
pub async fn fetch_intensity(
    client: &WattTimeClient,
    credentials: &WattTimeCredentials,
    region: &str,
) -> Result<f64> {
    let token = client.login(credentials).await?;

    let lbs_per_mwh = client.latest_signal(&token, region).await?;
    let intensity = lbs_per_mwh_to_g_per_kwh(lbs_per_mwh);
    info!(region, intensity, "Computed carbon intensity (gCO2/kWh)");

    Ok(intensity)
}

/// Extract the `ba` query parameter from a request query string.
///
/// Falls back to [`DEFAULT_REGION`] when the parameter is absent or
/// empty. Whatever string the caller supplies is forwarded upstream
/// verbatim.
pub fn region_from_query(query: Option<&str>) -> String {
    let ba = query.and_then(|q| {
        form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == "ba")
            .map(|(_, value)| value.into_owned())
    });

    match ba {
        Some(ba) if !ba.is_empty() => ba,
        _ => DEFAULT_REGION.to_string(),
    }
}
