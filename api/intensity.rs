use serde_json::json;
use tracing::error;
use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};

use carbon_intensity_api::client::WattTimeClient;
use carbon_intensity_api::config::{UpstreamProfile, WattTimeCredentials};
use carbon_intensity_api::models::intensity::IntensityResponse;
use carbon_intensity_api::proxy::{fetch_intensity, region_from_query};

#[tokio::main]
async fn main() -> Result<(), Error> {
    carbon_intensity_api::init_tracing();
    run(handler).await
}

/// GET /api/intensity — current carbon intensity for a balancing authority.
///
/// The optional `ba` query parameter selects the region (default
/// `CAISO_NORTH`). Returns `{ "intensity": <gCO2/kWh> }` on success;
/// upstream failures map to 502 and local failures to 500, each with a
/// JSON error body.
pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    if *req.method() != http::Method::GET {
        let error = json!({
            "error": "Method not allowed",
            "message": "Use GET to query carbon intensity"
        });
        return Ok(Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Content-Type", "application/json")
            .body(Body::Text(error.to_string()))?);
    }

    let region = region_from_query(req.uri().query());

    let credentials = match WattTimeCredentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Missing WattTime credentials");
            return error_response(&e);
        }
    };

    let client = WattTimeClient::new(UpstreamProfile::from_env());
    match fetch_intensity(&client, &credentials, &region).await {
        Ok(intensity) => {
            let body = serde_json::to_string(&IntensityResponse { intensity })?;
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .body(Body::Text(body))?)
        }
        Err(e) => {
            error!(error = %e, %region, "Carbon intensity request failed");
            error_response(&e)
        }
    }
}

fn error_response(error: &carbon_intensity_api::Error) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(error.status_code())
        .header("Content-Type", "application/json")
        .body(Body::Text(error.response_body().to_string()))?)
}
