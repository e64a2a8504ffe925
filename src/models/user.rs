use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Persisted user row, keyed by the OAuth subject
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub favorite_movie: Option<String>,
    pub favorite_movie_tmdb_id: Option<i64>,
    pub favorite_movie_poster: Option<String>,
    pub favorite_movie_backdrop: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a record for a first-time sign in
    pub fn from_profile(profile: &ProviderProfile) -> Self {
        let now = Utc::now();
        Self {
            id: profile.id.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            image: profile.image.clone(),
            favorite_movie: None,
            favorite_movie_tmdb_id: None,
            favorite_movie_poster: None,
            favorite_movie_backdrop: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Favorite title, ignoring blank values
    pub fn favorite(&self) -> Option<&str> {
        self.favorite_movie
            .as_deref()
            .map(str::trim)
            .filter(|movie| !movie.is_empty())
    }

    pub fn apply_favorite(&mut self, favorite: &FavoriteMovie) {
        self.favorite_movie = Some(favorite.movie.clone());
        self.favorite_movie_tmdb_id = favorite.tmdb_id;
        self.favorite_movie_poster = favorite.poster_url.clone();
        self.favorite_movie_backdrop = favorite.backdrop_url.clone();
        self.updated_at = Utc::now();
    }
}

/// Identity returned by the OAuth provider after a successful sign in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderProfile {
    /// Stable subject identifier
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// A validated favorite-movie selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMovie {
    pub movie: String,
    pub tmdb_id: Option<i64>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

impl FavoriteMovie {
    /// Coerces a loosely typed request body.
    ///
    /// `movie` must be a non-blank string. Anything else in the optional
    /// fields is dropped to `None` rather than rejected.
    pub fn from_payload(payload: &Value) -> AppResult<Self> {
        let movie = payload
            .get("movie")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        if movie.is_empty() {
            return Err(AppError::InvalidInput(
                "Please provide a movie title.".to_string(),
            ));
        }

        Ok(Self {
            movie: movie.to_string(),
            tmdb_id: payload.get("tmdbId").and_then(whole_number),
            poster_url: trimmed_string(payload.get("posterUrl")),
            backdrop_url: trimmed_string(payload.get("backdropUrl")),
        })
    }
}

fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && n.fract() == 0.0)
            .map(|n| n as i64)
    })
}

fn trimmed_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
