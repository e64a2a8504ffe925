//! View-models for the guarded pages.
//!
//! The route guard has already run by the time these handlers see a request,
//! so `/` and `/favorite-movie` always have a session and `/login` never does.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    auth::{CurrentSession, SessionClaims},
    error::AppResult,
    models::{MovieSummary, PosterTile, FEATURED_MOVIES},
    routes::AppState,
    services::recommendations::{self, DEFAULT_LIMIT},
};

const NO_EMAIL: &str = "No email on file";
const FUN_FACT_ENDPOINT: &str = "/api/funfact";
const SEARCH_ENDPOINT: &str = "/api/search-movies";
const SIGN_IN_URL: &str = "/api/auth/signin";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomeUser {
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub user: HomeUser,
    pub favorite_movie: Option<String>,
    pub fun_fact_endpoint: &'static str,
    pub heading: String,
    pub hero_backdrop: String,
    pub trending: Vec<PosterTile>,
    pub recommended: Vec<MovieSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub sign_in_url: &'static str,
    pub provider: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMovieSetupView {
    pub current_favorite: Option<String>,
    pub search_endpoint: &'static str,
}

/// Assembles the home page from the session and its recommendations
pub fn build_home_view(session: &SessionClaims, recommended: Vec<MovieSummary>) -> HomeView {
    let favorite = session.favorite();

    let mut trending: Vec<PosterTile> = recommended
        .iter()
        .filter_map(|movie| {
            movie.poster_url.as_ref().map(|poster| PosterTile {
                title: movie.title.clone(),
                poster: poster.clone(),
            })
        })
        .collect();

    if trending.is_empty() {
        trending = FEATURED_MOVIES
            .iter()
            .map(|movie| PosterTile {
                title: movie.title.to_string(),
                poster: movie.poster.to_string(),
            })
            .collect();
    }

    let heading = match favorite {
        Some(movie) if !recommended.is_empty() => format!("Because you liked {}", movie),
        _ => "Trending Picks".to_string(),
    };

    let hero_backdrop = session
        .favorite_movie_backdrop
        .clone()
        .or_else(|| recommended.first().and_then(|m| m.backdrop_url.clone()))
        .or_else(|| session.favorite_movie_poster.clone())
        .unwrap_or_else(|| FEATURED_MOVIES[0].backdrop.to_string());

    HomeView {
        user: HomeUser {
            name: session.name.clone(),
            email: session.email.clone().unwrap_or_else(|| NO_EMAIL.to_string()),
            image: session.picture.clone(),
        },
        favorite_movie: favorite.map(str::to_string),
        fun_fact_endpoint: FUN_FACT_ENDPOINT,
        heading,
        hero_backdrop,
        trending,
        recommended,
    }
}

/// Home page
pub async fn home(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<HomeView>> {
    let recommended = match session.favorite() {
        Some(movie) => {
            recommendations::get_recommended_movies(
                state.movies.as_ref(),
                movie,
                session.favorite_movie_tmdb_id,
                DEFAULT_LIMIT,
            )
            .await
        }
        None => Vec::new(),
    };

    Ok(Json(build_home_view(&session, recommended)))
}

/// Sign-in page
pub async fn login(State(state): State<Arc<AppState>>) -> Json<LoginView> {
    Json(LoginView {
        sign_in_url: SIGN_IN_URL,
        provider: state.identity.name(),
    })
}

/// Favorite movie setup page
pub async fn favorite_movie_setup(
    CurrentSession(session): CurrentSession,
) -> Json<FavoriteMovieSetupView> {
    Json(FavoriteMovieSetupView {
        current_favorite: session.favorite().map(str::to_string),
        search_endpoint: SEARCH_ENDPOINT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(favorite: Option<&str>) -> SessionClaims {
        SessionClaims {
            sub: "google-1".to_string(),
            email: None,
            name: Some("Fan".to_string()),
            picture: None,
            favorite_movie: favorite.map(str::to_string),
            favorite_movie_tmdb_id: None,
            favorite_movie_poster: None,
            favorite_movie_backdrop: None,
            iat: 0,
            exp: 0,
        }
    }

    fn movie(id: u64, poster: Option<&str>, backdrop: Option<&str>) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            release_year: None,
            poster_url: poster.map(str::to_string),
            backdrop_url: backdrop.map(str::to_string),
            overview: None,
        }
    }

    #[test]
    fn test_featured_fallback_without_recommendations() {
        let view = build_home_view(&session(Some("Heat")), Vec::new());

        assert_eq!(view.heading, "Trending Picks");
        assert_eq!(view.trending.len(), FEATURED_MOVIES.len());
        assert_eq!(view.hero_backdrop, FEATURED_MOVIES[0].backdrop);
        assert_eq!(view.user.email, NO_EMAIL);
        assert_eq!(view.fun_fact_endpoint, "/api/funfact");
    }

    #[test]
    fn test_recommendations_drive_heading_and_tiles() {
        let recommended = vec![
            movie(1, Some("p1"), Some("b1")),
            movie(2, None, Some("b2")),
            movie(3, Some("p3"), None),
        ];

        let view = build_home_view(&session(Some("Heat")), recommended);

        assert_eq!(view.heading, "Because you liked Heat");
        assert_eq!(
            view.trending.iter().map(|t| t.poster.as_str()).collect::<Vec<_>>(),
            vec!["p1", "p3"]
        );
        assert_eq!(view.hero_backdrop, "b1");
        assert_eq!(view.recommended.len(), 3);
    }

    #[test]
    fn test_hero_prefers_favorite_artwork() {
        let mut claims = session(Some("Heat"));
        claims.favorite_movie_poster = Some("fav-poster".to_string());

        let view = build_home_view(&claims, vec![movie(1, None, None)]);
        assert_eq!(view.hero_backdrop, "fav-poster");

        claims.favorite_movie_backdrop = Some("fav-backdrop".to_string());
        let view = build_home_view(&claims, vec![movie(1, None, Some("b1"))]);
        assert_eq!(view.hero_backdrop, "fav-backdrop");
    }

    #[test]
    fn test_posterless_recommendations_fall_back_to_featured_tiles() {
        let view = build_home_view(&session(Some("Heat")), vec![movie(1, None, None)]);

        assert_eq!(view.trending.len(), FEATURED_MOVIES.len());
        assert_eq!(view.trending[0].title, FEATURED_MOVIES[0].title);
    }
}
