use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reel_facts_api::{
    auth::{GoogleIdentityProvider, SessionKeys},
    config::Config,
    db::{create_pool, create_redis_client, Cache, InMemoryUserStore, PgUserStore, UserStore},
    facts::FactResolver,
    routes::{create_router, AppState},
    services::{OpenAiCompletionClient, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_facts_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let users: Arc<dyn UserStore> = match config.database_url.as_deref() {
        Some(url) => Arc::new(PgUserStore::new(create_pool(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set, users are kept in memory");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let (cache, cache_handle) = match config.redis_url.as_deref() {
        Some(url) => Cache::new(create_redis_client(url)?),
        None => {
            tracing::warn!("REDIS_URL not set, TMDB responses will not be cached");
            Cache::disabled()
        }
    };

    let cache_enabled = cache.is_enabled();

    let movies = TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    )?;

    let completion = OpenAiCompletionClient::new(
        config.openai_api_key.clone().unwrap_or_default(),
        config.openai_api_url.clone(),
    )?;
    let facts = FactResolver::new(config.fact_config(), Arc::new(completion));

    let identity = GoogleIdentityProvider::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.oauth_redirect_url(),
    )?;

    let sessions = SessionKeys::new(&config.session_secret, config.session_ttl_hours)
        .with_secure_cookies(config.public_url.starts_with("https://"));

    tracing::info!(
        user_store = users.name(),
        cache_enabled,
        models = ?facts.models(),
        public_url = %config.public_url,
        "Application state initialized"
    );

    let state = Arc::new(AppState {
        users,
        movies: Arc::new(movies),
        facts,
        sessions,
        identity: Arc::new(identity),
        public_url: config.public_url.clone(),
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
