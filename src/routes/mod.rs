use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::{IdentityProvider, SessionClaims, SessionKeys},
    db::UserStore,
    error::{AppError, AppResult},
    facts::FactResolver,
    middleware::{
        make_span_with_request_id, request_id_middleware, route_guard_middleware,
        session_middleware,
    },
    models::UserRecord,
    services::MovieProvider,
};

pub mod auth;
pub mod extract;
pub mod favorite_movie;
pub mod funfact;
pub mod pages;
pub mod recommendations;
pub mod titles;

/// Shared application state
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub movies: Arc<dyn MovieProvider>,
    pub facts: FactResolver,
    pub sessions: SessionKeys,
    pub identity: Arc<dyn IdentityProvider>,
    /// Origin allowed to call the API with credentials
    pub public_url: String,
}

impl AppState {
    /// Stored record behind a verified session.
    ///
    /// A token can outlive its record, e.g. after a restart with the in-memory
    /// store. Such sessions are rejected and the cookie cleared.
    pub async fn session_user(&self, session: &SessionClaims) -> AppResult<UserRecord> {
        match self.users.find(&session.sub).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(user_id = %session.sub, "Session refers to unknown user");
                Err(AppError::StaleSession)
            }
        }
    }
}

/// Creates the application router with all routes
///
/// Layer order, outermost first: request id, tracing, CORS, session, route guard.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(page_routes())
        .nest("/api", api_routes())
        .fallback(not_found)
        .layer(middleware::from_fn(route_guard_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(cors_layer(&state.public_url))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Guarded page view-models
fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login))
        .route("/favorite-movie", get(pages::favorite_movie_setup))
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signin", get(auth::signin))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/signout", post(auth::signout))
        .route("/session", get(auth::session))
        .route("/search-movies", get(titles::search))
        .route("/recommendations", get(recommendations::recommend))
        .route("/favorite-movie", post(favorite_movie::update))
        .route("/funfact", get(funfact::fun_fact))
}

fn cors_layer(public_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(public_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(error = %e, public_url = %public_url, "Invalid PUBLIC_URL, CORS disabled");
            layer
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
