use std::time::Duration;

use reqwest::{Client as HttpClient, Url};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::ProviderProfile,
};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// OAuth identity provider used by the sign-in flow
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to; `state` is echoed back to the callback
    fn authorize_url(&self, state: &str) -> AppResult<String>;

    /// Trades an authorization code for the signed-in user's profile
    async fn exchange_code(&self, code: &str) -> AppResult<ProviderProfile>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl From<UserInfo> for ProviderProfile {
    fn from(info: UserInfo) -> Self {
        Self {
            id: info.sub,
            email: info.email,
            name: info.name,
            image: info.picture,
        }
    }
}

#[derive(Clone)]
pub struct GoogleIdentityProvider {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            client_id,
            client_secret,
            redirect_url,
        })
    }

    fn ensure_configured(&self) -> AppResult<()> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(AppError::Configuration(
                "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be configured.".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorize_url(&self, state: &str) -> AppResult<String> {
        self.ensure_configured()?;

        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| AppError::Internal(format!("Invalid authorize URL: {}", e)))?;

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> AppResult<ProviderProfile> {
        self.ensure_configured()?;

        let response = self
            .http_client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Google token exchange returned status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;

        let response = self
            .http_client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "Google userinfo returned status {}",
                status
            )));
        }

        let info: UserInfo = response.json().await?;

        tracing::info!(user_id = %info.sub, provider = "google", "OAuth code exchanged");

        Ok(info.into())
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(client_id: &str) -> GoogleIdentityProvider {
        GoogleIdentityProvider::new(
            client_id.to_string(),
            "client-secret".to_string(),
            "http://localhost:3000/api/auth/callback".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_authorize_url_carries_state_and_redirect() {
        let url = provider("client-123").authorize_url("nonce-1").unwrap();
        let parsed = Url::parse(&url).unwrap();
        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();

        assert_eq!(parsed.host_str(), Some("accounts.google.com"));
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["state"], "nonce-1");
        assert_eq!(params["redirect_uri"], "http://localhost:3000/api/auth/callback");
        assert_eq!(params["scope"], "openid email profile");
    }

    #[test]
    fn test_unconfigured_provider() {
        let result = provider("").authorize_url("nonce-1");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_userinfo_maps_to_profile() {
        let info: UserInfo = serde_json::from_str(
            r#"{"sub":"1098","email":"fan@example.com","picture":"https://lh3.example/p.png"}"#,
        )
        .unwrap();

        let profile = ProviderProfile::from(info);

        assert_eq!(profile.id, "1098");
        assert_eq!(profile.name, None);
        assert_eq!(profile.image.as_deref(), Some("https://lh3.example/p.png"));
    }
}
