//! Shared HTTP plumbing for the provider clients

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{config::GeocodingConfig, error::GeocodingError};

/// Build the HTTP client every provider uses
pub(crate) fn build_client(config: &GeocodingConfig) -> Result<Client, GeocodingError> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| GeocodingError::ConfigurationError(e.to_string()))
}

/// GET `url` with `params` and decode the JSON body
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    timeout_secs: u64,
) -> Result<T, GeocodingError> {
    debug!(%url, "Provider request");

    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| map_send_error(&e, timeout_secs))?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodingError::RateLimitExceeded {
            retry_after_secs: response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok()),
        });
    }

    if status.is_server_error() {
        return Err(GeocodingError::ServiceUnavailable(format!("HTTP {status}")));
    }

    if !status.is_success() {
        return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| map_send_error(&e, timeout_secs))?;

    serde_json::from_str(&body).map_err(|e| GeocodingError::ParseError(e.to_string()))
}

/// GET `url` and report whether it answered with a success status
pub(crate) async fn probe(client: &Client, url: &str, params: &[(&str, String)]) -> bool {
    client
        .get(url)
        .query(params)
        .send()
        .await
        .is_ok_and(|r| r.status().is_success())
}

fn map_send_error(e: &reqwest::Error, timeout_secs: u64) -> GeocodingError {
    if e.is_timeout() {
        GeocodingError::Timeout { timeout_secs }
    } else {
        GeocodingError::ConnectionFailed(e.to_string())
    }
}
