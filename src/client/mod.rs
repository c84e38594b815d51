//! WattTime HTTP client.
//!
//! Wraps the two-call exchange against the WattTime API: a Basic-Auth
//! login that yields a short-lived bearer token, then a signal fetch
//! authorized by that token. The token is used once and discarded; no
//! caching or retries happen at this layer.

use std::time::Duration;

use reqwest::{Client, header};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{UpstreamProfile, WattTimeCredentials};
use crate::error::{Error, Result};
use crate::models::watttime::{LoginResponse, SignalResponse};

/// Timeout applied to each outbound call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the WattTime API.
#[derive(Debug, Clone)]
pub struct WattTimeClient {
    client: Client,
    profile: UpstreamProfile,
}

impl WattTimeClient {
    /// Create a client for the given upstream profile.
    pub fn new(profile: UpstreamProfile) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        WattTimeClient { client, profile }
    }

    /// Log in with Basic Auth and return the bearer token.
    pub async fn login(&self, credentials: &WattTimeCredentials) -> Result<String> {
        debug!(
            username = %credentials.username,
            url = %self.profile.login_url,
            "Logging in to WattTime"
        );

        let response = self
            .client
            .get(&self.profile.login_url)
            .header(header::AUTHORIZATION, credentials.basic_auth_header())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::LoginFailed {
                        status: None,
                        details: format!(
                            "login request timed out after {}s",
                            REQUEST_TIMEOUT.as_secs()
                        ),
                    }
                } else {
                    Error::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "WattTime login failed");
            return Err(Error::LoginFailed {
                status: Some(status.as_u16()),
                details,
            });
        }

        let body: Value = serde_json::from_str(&response.text().await?)?;
        let login: LoginResponse = serde_json::from_value(body).unwrap_or_default();
        match login.token() {
            Some(token) => {
                debug!("Received WattTime token");
                Ok(token.to_string())
            }
            None => {
                warn!("No token in WattTime login response");
                Err(Error::NoToken)
            }
        }
    }

    /// Fetch the most recent signal reading for `region`.
    ///
    /// Returns the raw reading in lbs CO₂/MWh. Readings arrive ordered
    /// most-recent-first; only the first element is used.
    pub async fn latest_signal(&self, token: &str, region: &str) -> Result<f64> {
        let query = self.profile.signal_query(region);
        debug!(url = %self.profile.signal_url, region, "Fetching carbon intensity signal");

        let response = self
            .client
            .get(&self.profile.signal_url)
            .query(&query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::DataFetchFailed {
                        status: None,
                        details: format!(
                            "signal request timed out after {}s",
                            REQUEST_TIMEOUT.as_secs()
                        ),
                    }
                } else {
                    Error::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), region, "WattTime data fetch failed");
            return Err(Error::DataFetchFailed {
                status: Some(status.as_u16()),
                details,
            });
        }

        let payload: Value = serde_json::from_str(&response.text().await?)?;
        let signal: SignalResponse = match serde_json::from_value(payload.clone()) {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(%payload, "Unexpected WattTime response format");
                return Err(Error::UnexpectedFormat { payload });
            }
        };

        match signal.data.first() {
            Some(reading) => Ok(reading.value),
            None => {
                warn!(%payload, "WattTime returned an empty data array");
                Err(Error::UnexpectedFormat { payload })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_profile(uri: &str) -> UpstreamProfile {
        UpstreamProfile {
            login_url: format!("{uri}/v3/login"),
            signal_url: format!("{uri}/v3/signal-index"),
            extra_query: Some(("signal", "co2_moer")),
        }
    }

    fn test_credentials() -> WattTimeCredentials {
        WattTimeCredentials::new("user", "pass").unwrap()
    }

    async fn mount_login(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v3/login"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    async fn mount_signal(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v3/signal-index"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_sends_basic_auth_and_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/login"))
            .and(header("Authorization", "Basic dXNlcjpwYXNz"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"token":"abc"}"#))
            .mount(&server)
            .await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        let token = client.login(&test_credentials()).await.unwrap();
        assert_eq!(token, "abc");
    }

    #[tokio::test]
    async fn test_login_non_2xx_surfaces_status_and_body() {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(403).set_body_string("forbidden")).await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        let err = client.login(&test_credentials()).await.unwrap_err();
        match err {
            Error::LoginFailed { status, details } => {
                assert_eq!(status, Some(403));
                assert_eq!(details, "forbidden");
            }
            other => panic!("expected LoginFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_without_token_is_no_token() {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#)).await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        assert!(matches!(
            client.login(&test_credentials()).await,
            Err(Error::NoToken)
        ));
    }

    #[tokio::test]
    async fn test_login_empty_token_is_no_token() {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(200).set_body_string(r#"{"token":""}"#)).await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        assert!(matches!(
            client.login(&test_credentials()).await,
            Err(Error::NoToken)
        ));
    }

    #[tokio::test]
    async fn test_login_non_json_body_is_internal_error() {
        let server = MockServer::start().await;
        mount_login(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        let err = client.login(&test_credentials()).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_connection_failure_is_internal_error() {
        let server = MockServer::start().await;
        let profile = test_profile(&server.uri());
        drop(server);

        let client = WattTimeClient::new(profile);
        let err = client.login(&test_credentials()).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_signal_returns_first_reading() {
        let server = MockServer::start().await;
        mount_signal(
            &server,
            ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"value":1000.0,"point_time":"2026-01-15T08:00:00Z"},{"value":900.0}]}"#,
            ),
        )
        .await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        let value = client.latest_signal("abc", "CAISO_NORTH").await.unwrap();
        assert_eq!(value, 1000.0);
    }

    #[tokio::test]
    async fn test_signal_sends_region_and_bearer_token() {
        let server = MockServer::start().await;
        // The mock only matches when the query and auth header are
        // exactly what the request should carry.
        Mock::given(method("GET"))
            .and(path("/v3/signal-index"))
            .and(query_param("ba", "DE"))
            .and(query_param("signal", "co2_moer"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"data":[{"value":42.0}]}"#),
            )
            .mount(&server)
            .await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        let value = client.latest_signal("abc", "DE").await.unwrap();
        assert_eq!(value, 42.0);
    }

    #[tokio::test]
    async fn test_signal_non_2xx_surfaces_status_and_body() {
        let server = MockServer::start().await;
        mount_signal(&server, ResponseTemplate::new(500).set_body_string("boom")).await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        let err = client.latest_signal("abc", "CAISO_NORTH").await.unwrap_err();
        match err {
            Error::DataFetchFailed { status, details } => {
                assert_eq!(status, Some(500));
                assert_eq!(details, "boom");
            }
            other => panic!("expected DataFetchFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_signal_missing_data_is_unexpected_format() {
        let server = MockServer::start().await;
        mount_signal(
            &server,
            ResponseTemplate::new(200).set_body_string(r#"{"error":"no signal"}"#),
        )
        .await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        let err = client.latest_signal("abc", "CAISO_NORTH").await.unwrap_err();
        match err {
            Error::UnexpectedFormat { payload } => {
                assert_eq!(payload, serde_json::json!({ "error": "no signal" }));
            }
            other => panic!("expected UnexpectedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_signal_empty_data_is_unexpected_format() {
        let server = MockServer::start().await;
        mount_signal(&server, ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#)).await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        assert!(matches!(
            client.latest_signal("abc", "CAISO_NORTH").await,
            Err(Error::UnexpectedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_signal_non_array_data_is_unexpected_format() {
        let server = MockServer::start().await;
        mount_signal(&server, ResponseTemplate::new(200).set_body_string(r#"{"data":5}"#)).await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        assert!(matches!(
            client.latest_signal("abc", "CAISO_NORTH").await,
            Err(Error::UnexpectedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_signal_non_numeric_value_is_unexpected_format() {
        let server = MockServer::start().await;
        mount_signal(
            &server,
            ResponseTemplate::new(200).set_body_string(r#"{"data":[{"value":"high"}]}"#),
        )
        .await;

        let client = WattTimeClient::new(test_profile(&server.uri()));
        assert!(matches!(
            client.latest_signal("abc", "CAISO_NORTH").await,
            Err(Error::UnexpectedFormat { .. })
        ));
    }
}
