use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::routes::AppState;

/// Verifies the session token, if any, and stores the claims in request
/// extensions. Requests without a valid session continue unauthenticated.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(claims) = state.sessions.from_headers(request.headers()) {
        request.extensions_mut().insert(claims);
    }

    next.run(request).await
}
