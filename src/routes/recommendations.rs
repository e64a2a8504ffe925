use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    auth::CurrentSession,
    error::AppResult,
    models::MovieSummary,
    routes::{extract::ApiQuery, AppState},
    services::recommendations::{self, DEFAULT_LIMIT},
};

/// Upper bound on `limit`, two TMDB pages worth
const MAX_LIMIT: usize = 40;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub results: Vec<MovieSummary>,
}

/// Handler for recommendations endpoint
///
/// Uses the stored favorite so the list follows updates made in other sessions.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    ApiQuery(params): ApiQuery<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let user = state.session_user(&session).await?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let results = match user.favorite() {
        Some(movie) => {
            recommendations::get_recommended_movies(
                state.movies.as_ref(),
                movie,
                user.favorite_movie_tmdb_id,
                limit,
            )
            .await
        }
        None => Vec::new(),
    };

    Ok(Json(RecommendationResponse { results }))
}
