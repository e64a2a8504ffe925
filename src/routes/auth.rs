use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::{session::cookie_value, CurrentSession, SessionClaims},
    error::{AppError, AppResult},
    guard::{HOME_PATH, LOGIN_PATH},
    routes::{extract::ApiQuery, AppState},
};

pub const OAUTH_STATE_COOKIE: &str = "reel_oauth_state";
const OAUTH_STATE_PATH: &str = "/api/auth";
const OAUTH_STATE_MAX_AGE: i64 = 600;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub favorite_movie: Option<String>,
    pub favorite_movie_tmdb_id: Option<i64>,
    pub favorite_movie_poster: Option<String>,
    pub favorite_movie_backdrop: Option<String>,
}

impl From<SessionClaims> for SessionResponse {
    fn from(claims: SessionClaims) -> Self {
        let favorite_movie = claims.favorite().map(str::to_string);
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            image: claims.picture,
            favorite_movie,
            favorite_movie_tmdb_id: claims.favorite_movie_tmdb_id,
            favorite_movie_poster: claims.favorite_movie_poster,
            favorite_movie_backdrop: claims.favorite_movie_backdrop,
        }
    }
}

/// Starts the OAuth flow with a fresh anti-forgery state
pub async fn signin(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let oauth_state = Uuid::new_v4().to_string();
    let location = state.identity.authorize_url(&oauth_state)?;

    let cookie = state.sessions.cookie_with(
        OAUTH_STATE_COOKIE,
        &oauth_state,
        OAUTH_STATE_PATH,
        OAUTH_STATE_MAX_AGE,
    );

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::temporary(&location),
    ))
}

/// OAuth redirect target: exchanges the code, upserts the user and signs
/// them in
pub async fn callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<CallbackQuery>,
) -> AppResult<impl IntoResponse> {
    let clear_state = state
        .sessions
        .cookie_with(OAUTH_STATE_COOKIE, "", OAUTH_STATE_PATH, 0);

    if let Some(error) = params.error.as_deref() {
        tracing::warn!(provider = state.identity.name(), error = %error, "OAuth sign in declined");
        return Ok((
            AppendHeaders(vec![(header::SET_COOKIE, clear_state)]),
            Redirect::temporary(LOGIN_PATH),
        ));
    }

    let expected = cookie_value(&headers, OAUTH_STATE_COOKIE);
    if expected.is_none() || expected != params.state {
        return Err(AppError::InvalidInput("Invalid OAuth state".to_string()));
    }

    let code = params
        .code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing authorization code".to_string()))?;

    let profile = state.identity.exchange_code(code).await?;
    let user = state.users.upsert_profile(&profile).await?;
    let token = state.sessions.issue(&user)?;

    tracing::info!(
        user_id = %user.id,
        provider = state.identity.name(),
        has_favorite = user.favorite().is_some(),
        "User signed in"
    );

    Ok((
        AppendHeaders(vec![
            (header::SET_COOKIE, state.sessions.cookie(&token)),
            (header::SET_COOKIE, clear_state),
        ]),
        Redirect::temporary(HOME_PATH),
    ))
}

pub async fn signout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.sessions.clear_cookie())],
        Json(json!({ "signedOut": true })),
    )
}

/// Current session user
pub async fn session(CurrentSession(claims): CurrentSession) -> Json<SessionResponse> {
    Json(SessionResponse::from(claims))
}
