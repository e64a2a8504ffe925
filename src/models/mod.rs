use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod featured;
pub mod user;

pub use featured::{FeaturedMovie, FEATURED_MOVIES};
pub use user::{FavoriteMovie, ProviderProfile, UserRecord};

/// Base URL for TMDB artwork
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Fallback when TMDB gives neither a title nor a name
const UNTITLED: &str = "Untitled";

/// TMDB image width variants used by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W500,
    W780,
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSize::W500 => write!(f, "w500"),
            ImageSize::W780 => write!(f, "w780"),
        }
    }
}

/// Builds a full image URL from a TMDB file path such as `/abc.jpg`
pub fn image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{}{}", TMDB_IMAGE_BASE, size, p))
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie record from TMDB search, details, recommendations and similar endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
}

impl TmdbMovie {
    /// Title for display, preferring `title` over the TV-style `name`
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }

    /// First four characters of the release date
    pub fn release_year(&self) -> Option<String> {
        self.release_date
            .as_deref()
            .map(|date| date.chars().take(4).collect::<String>())
            .filter(|year| !year.is_empty())
    }
}

/// One page of TMDB list results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Error body TMDB returns with non-success statuses
#[derive(Debug, Default, Deserialize)]
pub struct TmdbErrorBody {
    #[serde(default)]
    pub status_message: Option<String>,
}

// ============================================================================
// Client-facing Types
// ============================================================================

/// Movie as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

impl MovieSummary {
    /// Search results: both images at w500, no overview
    pub fn search_result(movie: &TmdbMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.display_title().unwrap_or(UNTITLED).to_string(),
            release_year: movie.release_year(),
            poster_url: image_url(movie.poster_path.as_deref(), ImageSize::W500),
            backdrop_url: image_url(movie.backdrop_path.as_deref(), ImageSize::W500),
            overview: None,
        }
    }

    /// Details and recommendations: wider backdrop plus overview
    pub fn detailed(movie: &TmdbMovie) -> Self {
        Self {
            id: movie.id,
            title: movie.display_title().unwrap_or(UNTITLED).to_string(),
            release_year: movie.release_year(),
            poster_url: image_url(movie.poster_path.as_deref(), ImageSize::W500),
            backdrop_url: image_url(movie.backdrop_path.as_deref(), ImageSize::W780),
            overview: movie.overview.clone(),
        }
    }
}

/// Poster tile on the home page grid
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PosterTile {
    pub title: String,
    pub poster: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmdb_movie() -> TmdbMovie {
        TmdbMovie {
            id: 27205,
            title: Some("Inception".to_string()),
            name: None,
            release_date: Some("2010-07-15".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            overview: Some("A thief who steals corporate secrets.".to_string()),
            original_language: Some("en".to_string()),
        }
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url(Some("/abc.jpg"), ImageSize::W780),
            Some("https://image.tmdb.org/t/p/w780/abc.jpg".to_string())
        );
        assert_eq!(image_url(Some(""), ImageSize::W500), None);
        assert_eq!(image_url(None, ImageSize::W500), None);
    }

    #[test]
    fn test_search_result_shape() {
        let summary = MovieSummary::search_result(&tmdb_movie());

        assert_eq!(summary.title, "Inception");
        assert_eq!(summary.release_year.as_deref(), Some("2010"));
        assert_eq!(
            summary.backdrop_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/backdrop.jpg")
        );
        assert!(summary.overview.is_none());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["releaseYear"], "2010");
        assert_eq!(
            json["posterUrl"],
            "https://image.tmdb.org/t/p/w500/poster.jpg"
        );
        assert!(json.get("overview").is_none());
    }

    #[test]
    fn test_detailed_uses_wide_backdrop() {
        let summary = MovieSummary::detailed(&tmdb_movie());
        assert_eq!(
            summary.backdrop_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w780/backdrop.jpg")
        );
        assert_eq!(
            summary.overview.as_deref(),
            Some("A thief who steals corporate secrets.")
        );
    }

    #[test]
    fn test_title_fallbacks() {
        let mut movie = tmdb_movie();
        movie.title = None;
        movie.name = Some("Alt Name".to_string());
        assert_eq!(MovieSummary::search_result(&movie).title, "Alt Name");

        movie.name = None;
        assert_eq!(MovieSummary::search_result(&movie).title, "Untitled");
    }

    #[test]
    fn test_missing_images_serialize_as_null() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"id": 1, "title": "Bare"}"#).unwrap();
        let json = serde_json::to_value(MovieSummary::search_result(&movie)).unwrap();

        assert!(json["posterUrl"].is_null());
        assert!(json["backdropUrl"].is_null());
        assert!(json.get("releaseYear").is_none());
    }
}
