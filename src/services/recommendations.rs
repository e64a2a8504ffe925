use std::collections::HashSet;

use crate::{
    models::MovieSummary,
    services::providers::{MovieProvider, Relation},
};

pub const DEFAULT_LIMIT: usize = 12;

/// Generates movie recommendations for a favorite title
///
/// The base movie is looked up by TMDB id when known, otherwise by searching
/// the title and taking the first hit. Recommended titles come first, then
/// similar ones, skipping the base movie and duplicates, up to `limit`.
///
/// Provider failures only shrink the result; this never errors.
pub async fn get_recommended_movies(
    provider: &dyn MovieProvider,
    title: &str,
    tmdb_id: Option<i64>,
    limit: usize,
) -> Vec<MovieSummary> {
    let title = title.trim();
    let tmdb_id = tmdb_id
        .filter(|id| *id > 0)
        .and_then(|id| u64::try_from(id).ok());

    if limit == 0 || (title.is_empty() && tmdb_id.is_none()) {
        return Vec::new();
    }

    let Some(base_id) = resolve_base_movie(provider, title, tmdb_id).await else {
        tracing::info!(title = %title, "No base movie found for recommendations");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut collected = Vec::new();

    for relation in Relation::ALL {
        let movies = match provider.related_movies(base_id, relation).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    movie_id = base_id,
                    relation = relation.path_segment(),
                    provider = provider.name(),
                    "Related movie lookup failed"
                );
                continue;
            }
        };

        for movie in movies {
            if movie.id == 0 || movie.id == base_id || !seen.insert(movie.id) {
                continue;
            }
            collected.push(MovieSummary::detailed(&movie));
            if collected.len() >= limit {
                return collected;
            }
        }
    }

    collected
}

async fn resolve_base_movie(
    provider: &dyn MovieProvider,
    title: &str,
    tmdb_id: Option<u64>,
) -> Option<u64> {
    if let Some(id) = tmdb_id {
        match provider.movie_details(id).await {
            Ok(movie) => return Some(movie.id),
            Err(e) => {
                tracing::error!(error = %e, movie_id = id, "Movie lookup failed");
            }
        }
    }

    if title.is_empty() {
        return None;
    }

    match provider.search_movies(title).await {
        Ok(results) => results.first().map(|movie| movie.id),
        Err(e) => {
            tracing::error!(error = %e, title = %title, "Movie search failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::TmdbMovie, services::providers::MockMovieProvider};
    use mockall::predicate::{always, eq};

    fn movie(id: u64) -> TmdbMovie {
        TmdbMovie {
            id,
            title: Some(format!("Movie {}", id)),
            name: None,
            release_date: None,
            poster_path: Some(format!("/{}.jpg", id)),
            backdrop_path: None,
            overview: None,
            original_language: None,
        }
    }

    fn provider_with_related(
        recommendations: Vec<u64>,
        similar: Vec<u64>,
    ) -> MockMovieProvider {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_movie_details()
            .with(eq(27205))
            .returning(|id| Ok(movie(id)));
        provider
            .expect_related_movies()
            .with(always(), eq(Relation::Recommendations))
            .returning(move |_, _| Ok(recommendations.iter().copied().map(movie).collect()));
        provider
            .expect_related_movies()
            .with(always(), eq(Relation::Similar))
            .returning(move |_, _| Ok(similar.iter().copied().map(movie).collect()));
        provider.expect_name().return_const("mock");
        provider
    }

    #[tokio::test]
    async fn test_dedupes_and_skips_base_movie() {
        let provider = provider_with_related(vec![1, 27205, 2, 3], vec![2, 4, 1, 5]);

        let movies = get_recommended_movies(&provider, "Inception", Some(27205), 12).await;

        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_limit_stops_early() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_movie_details()
            .returning(|id| Ok(movie(id)));
        provider
            .expect_related_movies()
            .with(always(), eq(Relation::Recommendations))
            .times(1)
            .returning(|_, _| Ok((1..=10).map(movie).collect()));
        provider
            .expect_related_movies()
            .with(always(), eq(Relation::Similar))
            .never();

        let movies = get_recommended_movies(&provider, "Inception", Some(27205), 3).await;

        assert_eq!(movies.len(), 3);
    }

    #[tokio::test]
    async fn test_falls_back_to_title_search() {
        let mut provider = MockMovieProvider::new();
        provider.expect_movie_details().returning(|_| {
            Err(AppError::ExternalApi("lookup failed".to_string()))
        });
        provider
            .expect_search_movies()
            .withf(|query| query == "Inception")
            .times(1)
            .returning(|_| Ok(vec![movie(27205), movie(99)]));
        provider
            .expect_related_movies()
            .with(eq(27205), always())
            .times(2)
            .returning(|_, _| Ok(vec![movie(7)]));

        let movies = get_recommended_movies(&provider, "Inception", Some(31337), 12).await;

        assert_eq!(movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![7]);
    }

    #[tokio::test]
    async fn test_failed_relation_is_skipped() {
        let mut provider = MockMovieProvider::new();
        provider.expect_search_movies().returning(|_| Ok(vec![movie(10)]));
        provider
            .expect_related_movies()
            .with(always(), eq(Relation::Recommendations))
            .returning(|_, _| Err(AppError::ExternalApi("boom".to_string())));
        provider
            .expect_related_movies()
            .with(always(), eq(Relation::Similar))
            .returning(|_, _| Ok(vec![movie(11)]));
        provider.expect_name().return_const("mock");

        let movies = get_recommended_movies(&provider, "Heat", None, 12).await;

        assert_eq!(movies.len(), 1);
        assert_eq!(
            movies[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/11.jpg")
        );
    }

    #[tokio::test]
    async fn test_nothing_to_look_up() {
        let mut provider = MockMovieProvider::new();
        provider.expect_search_movies().never();
        provider.expect_movie_details().never();

        assert!(get_recommended_movies(&provider, "  ", None, 12).await.is_empty());
        assert!(get_recommended_movies(&provider, "  ", Some(0), 12).await.is_empty());
    }

    #[tokio::test]
    async fn test_no_search_hit_returns_empty() {
        let mut provider = MockMovieProvider::new();
        provider.expect_search_movies().returning(|_| Ok(Vec::new()));
        provider.expect_related_movies().never();

        assert!(get_recommended_movies(&provider, "Nonexistent Film", None, 12)
            .await
            .is_empty());
    }
}
