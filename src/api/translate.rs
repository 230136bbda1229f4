use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::{ApiError, ApiResult};
use crate::models::{TranslateRequest, TranslateResponse};
use crate::state::AppState;
use crate::translate::MISSING_QUERY;

/// POST /api/nl-search - Natural-language to structured query:
///   1. Inference (primary pipeline with bounded wait, else secondary model)
///   2. Constraint validation and correction
///   3. Operator heuristics, author and object resolution, synonym expansion
///   4. Ranked query variants
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> ApiResult<Json<TranslateResponse>> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!("Rejected request body: {e}");
        ApiError::BadRequest(MISSING_QUERY.to_string())
    })?;

    // Run on its own task so a panic anywhere in the pipeline becomes a 500
    let translator = state.translator.clone();
    let response = tokio::spawn(async move { translator.translate(&req).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Translation failed: {e}")))??;

    Ok(Json(response))
}

/// Any method other than POST on the translation route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
