use crate::{error::AppResult, models::MovieSummary, services::providers::MovieProvider};

/// Queries shorter than this return no results without calling the provider
pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_RESULTS: usize = 12;

/// Service function for movie search
///
/// Applies the query policy, then delegates to the configured provider and
/// keeps the first [`MAX_RESULTS`] entries that have a title.
pub async fn search_movies(
    provider: &dyn MovieProvider,
    query: Option<&str>,
) -> AppResult<Vec<MovieSummary>> {
    let query = query.map(str::trim).unwrap_or_default();

    if query.chars().count() < MIN_QUERY_CHARS {
        return Ok(Vec::new());
    }

    let movies = provider.search_movies(query).await?;

    Ok(movies
        .iter()
        .filter(|movie| movie.display_title().is_some_and(|title| !title.is_empty()))
        .take(MAX_RESULTS)
        .map(MovieSummary::search_result)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::TmdbMovie,
        services::providers::MockMovieProvider,
    };
    use axum::http::StatusCode;

    fn movie(id: u64, title: Option<&str>) -> TmdbMovie {
        TmdbMovie {
            id,
            title: title.map(str::to_string),
            name: None,
            release_date: Some("1995-12-15".to_string()),
            poster_path: None,
            backdrop_path: None,
            overview: None,
            original_language: None,
        }
    }

    #[tokio::test]
    async fn test_short_queries_skip_provider() {
        let mut provider = MockMovieProvider::new();
        provider.expect_search_movies().never();

        for query in [None, Some(""), Some("   "), Some(" H ")] {
            let results = search_movies(&provider, query).await.unwrap();
            assert!(results.is_empty());
        }
    }

    #[tokio::test]
    async fn test_results_capped_and_untitled_skipped() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_search_movies()
            .withf(|query| query == "Heat")
            .times(1)
            .returning(|_| {
                let mut movies = vec![movie(1, None)];
                movies.extend((2..=20).map(|id| movie(id, Some("Heat"))));
                Ok(movies)
            });

        let results = search_movies(&provider, Some("  Heat ")).await.unwrap();

        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results[0].id, 2);
        assert_eq!(results[0].release_year.as_deref(), Some("1995"));
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let mut provider = MockMovieProvider::new();
        provider.expect_search_movies().returning(|_| {
            Err(AppError::Upstream {
                status: StatusCode::UNAUTHORIZED,
                message: "Invalid API key".to_string(),
            })
        });

        let result = search_movies(&provider, Some("Heat")).await;

        assert!(matches!(
            result,
            Err(AppError::Upstream { status, .. }) if status == StatusCode::UNAUTHORIZED
        ));
    }
}
