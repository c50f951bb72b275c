use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use super::{AppState, EvaluateBody};
use crate::error::EvalError;

/// GET /health — liveness probe, no secrets leaked
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /evaluatePhoto — run the evaluation pipeline on one image
pub(super) async fn handle_evaluate(
    State(state): State<AppState>,
    body: Result<Json<EvaluateBody>, JsonRejection>,
) -> Response {
    // a missing image field and an unparseable body are the same caller
    // error: there is nothing to evaluate
    let image = match body {
        Ok(Json(EvaluateBody { image: Some(image) })) if !image.trim().is_empty() => image,
        _ => return missing_image(),
    };

    match state.evaluator.evaluate(&image).await {
        Ok(evaluation) => (StatusCode::OK, Json(evaluation)).into_response(),
        Err(EvalError::MissingInput) => missing_image(),
        Err(error) => {
            tracing::error!("photo evaluation failed: {error}");
            let body = serde_json::json!({
                "error": "Internal Server Error",
                "message": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

fn missing_image() -> Response {
    let body = serde_json::json!({ "error": "Image is required." });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
