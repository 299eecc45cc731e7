use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;
use crate::models::credential::Credential;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub runway_credential: ComponentHealth,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: Option<String>,
}

/// GET /health — liveness plus configuration status.
///
/// A missing server-side Runway key only degrades the service: callers can
/// still supply their own key per request.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let credential_check = match Credential::from_config(&state.config) {
        Ok(_) => ComponentHealth {
            status: "ok".to_string(),
            detail: None,
        },
        Err(e) => ComponentHealth {
            status: "missing".to_string(),
            detail: Some(e.to_string()),
        },
    };

    let all_healthy = credential_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            runway_credential: credential_check,
        },
    };

    (StatusCode::OK, Json(response))
}
