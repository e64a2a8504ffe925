use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{FavoriteMovie, ProviderProfile, UserRecord},
};

const USER_COLUMNS: &str = "id, email, name, image, favorite_movie, favorite_movie_tmdb_id, \
     favorite_movie_poster, favorite_movie_backdrop, created_at, updated_at";

/// Persistence for user records
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, id: &str) -> AppResult<Option<UserRecord>>;

    /// Creates the user on first sign in, otherwise refreshes profile fields.
    /// The favorite movie is never touched here.
    async fn upsert_profile(&self, profile: &ProviderProfile) -> AppResult<UserRecord>;

    /// Replaces the favorite movie; fails with `NotFound` for unknown users
    async fn set_favorite(&self, id: &str, favorite: &FavoriteMovie) -> AppResult<UserRecord>;

    fn name(&self) -> &'static str;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find(&self, id: &str) -> AppResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upsert_profile(&self, profile: &ProviderProfile) -> AppResult<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (id, email, name, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                email = COALESCE(EXCLUDED.email, users.email),
                name = COALESCE(EXCLUDED.name, users.name),
                image = COALESCE(EXCLUDED.image, users.image),
                updated_at = now()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.image)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = %user.id, store = "postgres", "User profile upserted");

        Ok(user)
    }

    async fn set_favorite(&self, id: &str, favorite: &FavoriteMovie) -> AppResult<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                favorite_movie = $2,
                favorite_movie_tmdb_id = $3,
                favorite_movie_poster = $4,
                favorite_movie_backdrop = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&favorite.movie)
        .bind(favorite.tmdb_id)
        .bind(&favorite.poster_url)
        .bind(&favorite.backdrop_url)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// Process-local store used when no database is configured
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find(&self, id: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn upsert_profile(&self, profile: &ProviderProfile) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        let user = users
            .entry(profile.id.clone())
            .and_modify(|existing| {
                if profile.email.is_some() {
                    existing.email = profile.email.clone();
                }
                if profile.name.is_some() {
                    existing.name = profile.name.clone();
                }
                if profile.image.is_some() {
                    existing.image = profile.image.clone();
                }
                existing.updated_at = Utc::now();
            })
            .or_insert_with(|| UserRecord::from_profile(profile));

        Ok(user.clone())
    }

    async fn set_favorite(&self, id: &str, favorite: &FavoriteMovie) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        user.apply_favorite(favorite);
        Ok(user.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProviderProfile {
        ProviderProfile {
            id: "google-42".to_string(),
            email: Some("fan@example.com".to_string()),
            name: Some("Film Fan".to_string()),
            image: None,
        }
    }

    fn favorite() -> FavoriteMovie {
        FavoriteMovie {
            movie: "Spirited Away".to_string(),
            tmdb_id: Some(129),
            poster_url: None,
            backdrop_url: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_favorite() {
        let store = InMemoryUserStore::new();

        store.upsert_profile(&profile()).await.unwrap();
        store.set_favorite("google-42", &favorite()).await.unwrap();

        let updated = store
            .upsert_profile(&ProviderProfile {
                name: Some("Renamed Fan".to_string()),
                email: None,
                ..profile()
            })
            .await
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Renamed Fan"));
        assert_eq!(updated.email.as_deref(), Some("fan@example.com"));
        assert_eq!(updated.favorite(), Some("Spirited Away"));
    }

    #[tokio::test]
    async fn test_set_favorite_unknown_user() {
        let store = InMemoryUserStore::new();

        let result = store.set_favorite("nobody", &favorite()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find() {
        let store = InMemoryUserStore::new();
        assert!(store.find("google-42").await.unwrap().is_none());

        store.upsert_profile(&profile()).await.unwrap();
        let found = tokio_test::assert_ok!(store.find("google-42").await);
        assert_eq!(found.map(|u| u.id), Some("google-42".to_string()));
    }
}
