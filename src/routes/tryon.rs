use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::credential::{Credential, CredentialError};
use crate::models::tryon::{TryOnErrorResponse, TryOnRequest, TryOnResponse};
use crate::services::cancel::CancelSignal;
use crate::services::runway::TaskError;
use crate::services::tryon::TryOnError;

type ErrorReply = (StatusCode, Json<TryOnErrorResponse>);

/// POST /api/v1/try-on — Generate a try-on composite and wait for the result.
///
/// A client that disconnects drops this future, which stops the poll loop
/// and its pending timer.
pub async fn submit_try_on(
    State(state): State<AppState>,
    Json(request): Json<TryOnRequest>,
) -> Result<Json<TryOnResponse>, ErrorReply> {
    let request_id = Uuid::new_v4();

    request
        .validate()
        .map_err(|e| error_reply(request_id, StatusCode::BAD_REQUEST, "validate", e.to_string()))?;

    let credential =
        Credential::resolve(request.api_key.as_deref(), &state.config).map_err(|e| {
            let status = match e {
                CredentialError::Missing => StatusCode::UNAUTHORIZED,
                CredentialError::Malformed => StatusCode::BAD_REQUEST,
            };
            error_reply(request_id, status, "credential", e.to_string())
        })?;

    tracing::info!(
        request_id = %request_id,
        item = %request.item.name,
        item_type = %request.item.item_type,
        "Try-on requested"
    );

    let outcome = state
        .orchestrator
        .perform_virtual_try_on(
            &request.base_image,
            &request.item,
            &credential,
            &CancelSignal::never(),
        )
        .await
        .map_err(|e| error_reply(request_id, status_for(&e), e.stage(), e.to_string()))?;

    Ok(Json(TryOnResponse {
        request_id,
        task_id: outcome.task_id,
        output_url: outcome.output_url,
        ratio: outcome.ratio.to_string(),
        model: outcome.model,
    }))
}

fn status_for(error: &TryOnError) -> StatusCode {
    match error.task_error() {
        None => StatusCode::UNPROCESSABLE_ENTITY,
        Some(TaskError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        Some(TaskError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
        Some(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_reply(request_id: Uuid, status: StatusCode, stage: &str, error: String) -> ErrorReply {
    (
        status,
        Json(TryOnErrorResponse {
            request_id,
            stage: stage.to_string(),
            error,
        }),
    )
}
