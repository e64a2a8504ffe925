use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::SessionClaims,
    guard::{self, GuardDecision},
};

/// Applies the page access rules to every non-excluded path.
///
/// Must run after the session middleware so the claims are already resolved.
pub async fn route_guard_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if guard::is_excluded(&path) {
        return next.run(request).await;
    }

    let claim = request
        .extensions()
        .get::<SessionClaims>()
        .map(SessionClaims::claim);

    match guard::decide(&path, claim.as_ref()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectTo(target) => {
            tracing::debug!(
                path = %path,
                authenticated = claim.is_some(),
                target = target,
                "Route guard redirect"
            );
            Redirect::temporary(target).into_response()
        }
    }
}
