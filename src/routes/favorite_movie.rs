use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    auth::CurrentSession,
    error::{AppError, AppResult},
    models::{FavoriteMovie, UserRecord},
    routes::{extract::ApiJson, AppState},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMovieResponse {
    pub favorite_movie: Option<String>,
    pub favorite_movie_tmdb_id: Option<i64>,
    pub favorite_movie_poster: Option<String>,
    pub favorite_movie_backdrop: Option<String>,
}

impl From<&UserRecord> for FavoriteMovieResponse {
    fn from(user: &UserRecord) -> Self {
        Self {
            favorite_movie: user.favorite_movie.clone(),
            favorite_movie_tmdb_id: user.favorite_movie_tmdb_id,
            favorite_movie_poster: user.favorite_movie_poster.clone(),
            favorite_movie_backdrop: user.favorite_movie_backdrop.clone(),
        }
    }
}

/// Saves the favorite movie and reissues the session cookie so the route
/// guard sees the completed profile on the next page load.
pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    ApiJson(payload): ApiJson<Value>,
) -> AppResult<impl IntoResponse> {
    let favorite = FavoriteMovie::from_payload(&payload)?;

    // A token can outlive its record; see `AppState::session_user`
    let user = match state.users.set_favorite(&session.sub, &favorite).await {
        Err(AppError::NotFound(_)) => return Err(AppError::StaleSession),
        other => other?,
    };
    let token = state.sessions.issue(&user)?;

    tracing::info!(
        user_id = %user.id,
        movie = %favorite.movie,
        tmdb_id = ?favorite.tmdb_id,
        "Favorite movie updated"
    );

    Ok((
        [(header::SET_COOKIE, state.sessions.cookie(&token))],
        Json(FavoriteMovieResponse::from(&user)),
    ))
}
