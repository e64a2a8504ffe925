use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::MovieSummary,
    routes::{extract::ApiQuery, AppState},
    services::title_search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<MovieSummary>,
}

/// Handler for movie search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let results = title_search::search_movies(state.movies.as_ref(), params.query.as_deref()).await?;
    Ok(Json(SearchResponse { results }))
}
