use serde::Deserialize;

use crate::{auth::session::MAX_SESSION_TTL_HOURS, facts::FactConfig};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; the in-memory user store is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL; TMDB responses are not cached when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TMDB API key, either a v3 key or a `Bearer <v4 token>`
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// OpenAI API key
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Comma-separated model fallback list, highest priority first
    #[serde(default)]
    pub openai_model: Option<String>,

    /// OpenAI API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Secret used to sign session tokens
    pub session_secret: String,

    /// Session lifetime in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Google OAuth client id
    #[serde(default)]
    pub google_client_id: String,

    /// Google OAuth client secret
    #[serde(default)]
    pub google_client_secret: String,

    /// Public base URL the OAuth provider redirects back to
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_session_ttl_hours() -> i64 {
    24 * 30
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Rejects values that would break session issuing
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.session_secret.trim().is_empty() {
            anyhow::bail!("Failed to load config: SESSION_SECRET must not be empty");
        }

        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            anyhow::bail!(
                "Failed to load config: SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            );
        }

        Ok(())
    }

    /// Fact resolver settings derived from the OpenAI variables
    pub fn fact_config(&self) -> FactConfig {
        FactConfig::from_parts(
            self.openai_api_key.clone(),
            self.openai_model.as_deref(),
        )
    }

    /// OAuth redirect target registered with the provider
    pub fn oauth_redirect_url(&self) -> String {
        format!(
            "{}/api/auth/callback",
            self.public_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: Vec<(&str, &str)>) -> Config {
        envy::from_iter::<_, Config>(
            vars.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = config_from(vec![("SESSION_SECRET", "s3cret")]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert!(config.database_url.is_none());
        assert!(config.openai_api_key.is_none());
        assert_eq!(
            config.fact_config().models,
            vec!["gpt-4o-mini".to_string(), "gpt-3.5-turbo".to_string()]
        );
    }

    #[test]
    fn test_session_ttl_bounds() {
        let config = config_from(vec![("SESSION_SECRET", "s3cret")]);
        assert_eq!(config.session_ttl_hours, 720);
        assert!(config.validate().is_ok());

        let year = config_from(vec![("SESSION_SECRET", "s3cret"), ("SESSION_TTL_HOURS", "8760")]);
        assert!(year.validate().is_ok());

        for ttl in ["0", "-5", "8761", "10000000000"] {
            let config = config_from(vec![("SESSION_SECRET", "s3cret"), ("SESSION_TTL_HOURS", ttl)]);
            assert!(config.validate().is_err(), "ttl {} accepted", ttl);
        }
    }

    #[test]
    fn test_blank_secret_rejected() {
        let config = config_from(vec![("SESSION_SECRET", "   ")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_model_list_from_env() {
        let config = config_from(vec![
            ("SESSION_SECRET", "s3cret"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4.1-mini, gpt-4o-mini"),
        ]);

        let facts = config.fact_config();
        assert_eq!(facts.api_key.as_deref(), Some("sk-test"));
        assert_eq!(facts.models, vec!["gpt-4.1-mini", "gpt-4o-mini"]);
    }

    #[test]
    fn test_oauth_redirect_url_trims_trailing_slash() {
        let config = config_from(vec![
            ("SESSION_SECRET", "s3cret"),
            ("PUBLIC_URL", "https://reel.example.com/"),
        ]);

        assert_eq!(
            config.oauth_redirect_url(),
            "https://reel.example.com/api/auth/callback"
        );
    }
}
