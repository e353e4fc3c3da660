//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub catalog: ServiceStatus,
    pub geocoder: ServiceStatus,
}

/// Status of a dependency
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub healthy: bool,
}

/// Readiness check - is the catalogue reachable?
///
/// Geocoder health is reported but never blocks readiness; address search
/// degrades to empty results when it is down.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let (catalog_healthy, geocoder_healthy) =
        tokio::join!(state.catalog.is_available(), state.geocoder.is_available());

    let status_code = if catalog_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready: catalog_healthy,
            catalog: ServiceStatus {
                healthy: catalog_healthy,
            },
            geocoder: ServiceStatus {
                healthy: geocoder_healthy,
            },
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_crate_version() {
        let Json(resp) = health_check().await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn readiness_response_serialization() {
        let resp = ReadinessResponse {
            ready: true,
            catalog: ServiceStatus { healthy: true },
            geocoder: ServiceStatus { healthy: false },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ready"], true);
        assert_eq!(json["geocoder"]["healthy"], false);
    }
}
