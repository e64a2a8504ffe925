use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    auth::CurrentSession,
    error::{AppError, AppResult},
    facts::{FactOutcome, MISSING_SUBJECT_ERROR},
    middleware::RequestId,
    routes::AppState,
};

impl IntoResponse for FactOutcome {
    fn into_response(self) -> Response {
        match self {
            FactOutcome::Fact(fact) => (StatusCode::OK, Json(json!({ "fact": fact }))).into_response(),
            FactOutcome::Error(error) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": error }))).into_response()
            }
        }
    }
}

/// Handler for the fun-fact endpoint
///
/// Reads the favorite from the user store rather than the session token so a
/// stale cookie never yields a fact about the previous favorite.
pub async fn fun_fact(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    CurrentSession(session): CurrentSession,
) -> AppResult<FactOutcome> {
    let user = state.session_user(&session).await?;

    let Some(movie) = user.favorite() else {
        return Err(AppError::InvalidInput(MISSING_SUBJECT_ERROR.to_string()));
    };

    tracing::info!(
        request_id = %request_id,
        user_id = %session.sub,
        movie = %movie,
        models = ?state.facts.models(),
        "Generating fun fact"
    );

    let outcome = state.facts.generate(movie, &request_id.to_string()).await;

    if let FactOutcome::Error(message) = &outcome {
        tracing::warn!(request_id = %request_id, error = %message, "Fun fact unavailable");
    }

    Ok(outcome)
}
