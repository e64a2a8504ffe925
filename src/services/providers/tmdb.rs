//! TMDB (The Movie Database) provider
//!
//! Accepts either a v3 API key, sent as the `api_key` query parameter, or a v4
//! read token given as `Bearer <token>`, sent as the `Authorization` header.

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{TmdbErrorBody, TmdbMovie, TmdbPage},
    services::providers::{MovieProvider, Relation},
};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const LANGUAGE: &str = "en-US";
const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: Option<String>, api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("TMDB_API_KEY is not configured.".to_string()))
    }

    /// GET `path` with the given query parameters and decode the JSON body
    async fn fetch<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> AppResult<T> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.api_url, path);

        let mut request = self.http_client.get(&url).query(params);
        request = match api_key.strip_prefix(BEARER_PREFIX) {
            Some(_) => request.header(reqwest::header::AUTHORIZATION, api_key),
            None => request.query(&[("api_key", api_key)]),
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(status, &body);

            tracing::warn!(
                path = %path,
                status = %status,
                message = %message,
                provider = "tmdb",
                "TMDB request failed"
            );

            return Err(AppError::Upstream { status, message });
        }

        Ok(response.json::<T>().await?)
    }
}

/// TMDB's `status_message`, else the status reason phrase
fn upstream_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<TmdbErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "TMDB request failed.".to_string())
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<TmdbMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let page: TmdbPage = self
                    .fetch(
                        "/search/movie",
                        &[
                            ("language", LANGUAGE.to_string()),
                            ("query", query.to_string()),
                            ("include_adult", "false".to_string()),
                            ("page", "1".to_string()),
                        ],
                    )
                    .await?;

                tracing::info!(
                    query = %query,
                    results = page.results.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn movie_details(&self, id: u64) -> AppResult<TmdbMovie> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(id),
            DETAILS_CACHE_TTL,
            async move {
                self.fetch::<TmdbMovie>(&format!("/movie/{}", id), &[("language", LANGUAGE.to_string())])
                    .await
            }
        )
    }

    async fn related_movies(&self, id: u64, relation: Relation) -> AppResult<Vec<TmdbMovie>> {
        let key = match relation {
            Relation::Recommendations => CacheKey::Recommendations(id),
            Relation::Similar => CacheKey::Similar(id),
        };

        cached!(self.cache, key, DETAILS_CACHE_TTL, async move {
            let page: TmdbPage = self
                .fetch(
                    &format!("/movie/{}/{}", id, relation.path_segment()),
                    &[
                        ("language", LANGUAGE.to_string()),
                        ("page", "1".to_string()),
                    ],
                )
                .await?;

            tracing::info!(
                movie_id = id,
                relation = relation.path_segment(),
                results = page.results.len(),
                provider = "tmdb",
                "Related movies fetched"
            );

            Ok::<_, AppError>(page.results)
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
