//! Movie metadata provider abstraction
//!
//! Search, details and related-title lookups all go through one provider so
//! the ids returned by search can be fed straight back into lookups.

use crate::{error::AppResult, models::TmdbMovie};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Kind of related-title list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Recommendations,
    Similar,
}

impl Relation {
    /// Lists are consulted in this order when building recommendations
    pub const ALL: [Relation; 2] = [Relation::Recommendations, Relation::Similar];

    pub fn path_segment(&self) -> &'static str {
        match self {
            Relation::Recommendations => "recommendations",
            Relation::Similar => "similar",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Search movies by title, first results page only
    async fn search_movies(&self, query: &str) -> AppResult<Vec<TmdbMovie>>;

    /// Fetch a single movie by provider id
    async fn movie_details(&self, id: u64) -> AppResult<TmdbMovie>;

    /// Fetch the first page of titles related to `id`
    async fn related_movies(&self, id: u64, relation: Relation) -> AppResult<Vec<TmdbMovie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
