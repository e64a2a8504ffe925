//! Signed session tokens.
//!
//! The session is an HS256 JWT stored in an HttpOnly cookie (or sent as a
//! bearer token). It carries the profile fields pages need, including the
//! favorite movie that the route guard keys on, so page requests never touch
//! the user store.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    guard::SessionClaim,
    models::UserRecord,
};

pub const SESSION_COOKIE: &str = "reel_session";

/// Longest accepted session lifetime, one year
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Token payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub favorite_movie: Option<String>,
    pub favorite_movie_tmdb_id: Option<i64>,
    pub favorite_movie_poster: Option<String>,
    pub favorite_movie_backdrop: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_user(user: &UserRecord, ttl: Duration) -> AppResult<Self> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal("Session expiry out of range".to_string()))?;

        Ok(Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.image.clone(),
            favorite_movie: user.favorite().map(str::to_string),
            favorite_movie_tmdb_id: user.favorite_movie_tmdb_id,
            favorite_movie_poster: user.favorite_movie_poster.clone(),
            favorite_movie_backdrop: user.favorite_movie_backdrop.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    pub fn favorite(&self) -> Option<&str> {
        self.favorite_movie
            .as_deref()
            .map(str::trim)
            .filter(|movie| !movie.is_empty())
    }

    /// What the route guard needs to know about this session
    pub fn claim(&self) -> SessionClaim {
        SessionClaim::new(self.favorite().is_some())
    }
}

/// Signing material and cookie policy for sessions
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    secure_cookies: bool,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS)),
            secure_cookies: false,
        }
    }

    /// Adds the `Secure` attribute to issued cookies
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    pub fn issue(&self, user: &UserRecord) -> AppResult<String> {
        self.encode(&SessionClaims::for_user(user, self.ttl)?)
    }

    pub fn encode(&self, claims: &SessionClaims) -> AppResult<String> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    /// Verified claims, or `None` for a missing, tampered or expired token
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<SessionClaims>(token, &self.decoding, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                None
            }
        }
    }

    /// Resolves the session from request headers
    pub fn from_headers(&self, headers: &HeaderMap) -> Option<SessionClaims> {
        token_from_headers(headers).and_then(|token| self.verify(&token))
    }

    pub fn cookie(&self, token: &str) -> String {
        self.cookie_with(SESSION_COOKIE, token, "/", self.ttl.num_seconds())
    }

    pub fn clear_cookie(&self) -> String {
        self.cookie_with(SESSION_COOKIE, "", "/", 0)
    }

    /// Builds an HttpOnly, SameSite=Lax cookie
    pub fn cookie_with(&self, name: &str, value: &str, path: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; Path={}; HttpOnly; SameSite=Lax; Max-Age={}",
            name, value, path, max_age
        );
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Cookie that removes the session, for responses built without `SessionKeys`
pub fn expired_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Value of the named cookie from the `Cookie` header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Session token from the cookie, falling back to `Authorization: Bearer`
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// Extractor for handlers that require a signed-in user.
///
/// Reads the claims the session middleware placed in request extensions and
/// rejects with 401 when there are none.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(CurrentSession)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderProfile;
    use axum::http::HeaderValue;

    fn user(favorite: Option<&str>) -> UserRecord {
        let mut user = UserRecord::from_profile(&ProviderProfile {
            id: "google-7".to_string(),
            email: Some("fan@example.com".to_string()),
            name: Some("Fan".to_string()),
            image: None,
        });
        user.favorite_movie = favorite.map(str::to_string);
        user
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = SessionKeys::new("test-secret", 1);

        let token = keys.issue(&user(Some("Heat"))).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, "google-7");
        assert_eq!(claims.favorite(), Some("Heat"));
        assert_eq!(claims.claim(), SessionClaim::new(true));
    }

    #[test]
    fn test_blank_favorite_is_incomplete_profile() {
        let keys = SessionKeys::new("test-secret", 1);

        let token = keys.issue(&user(Some("  "))).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.claim(), SessionClaim::new(false));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = SessionKeys::new("secret-a", 1).issue(&user(None)).unwrap();
        assert!(SessionKeys::new("secret-b", 1).verify(&token).is_none());
        assert!(SessionKeys::new("secret-a", 1).verify("not-a-jwt").is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = SessionKeys::new("test-secret", 1);
        let mut claims = SessionClaims::for_user(&user(Some("Heat")), Duration::hours(1)).unwrap();
        claims.iat -= 7200;
        claims.exp -= 7200;

        let token = keys.encode(&claims).unwrap();

        assert!(keys.verify(&token).is_none());
    }

    #[test]
    fn test_oversized_ttl_is_clamped() {
        let keys = SessionKeys::new("test-secret", 10_000_000_000);

        let token = keys.issue(&user(Some("Heat"))).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, MAX_SESSION_TTL_HOURS * 3600);
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let result = SessionClaims::for_user(&user(None), Duration::MAX);

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_token_from_cookie_or_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; reel_session=abc.def.ghi"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer xyz"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));

        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let keys = SessionKeys::new("s", 2).with_secure_cookies(true);

        let cookie = keys.cookie("tok");
        assert!(cookie.starts_with("reel_session=tok; Path=/; HttpOnly; SameSite=Lax"));
        assert!(cookie.contains("Max-Age=7200"));
        assert!(cookie.ends_with("; Secure"));

        assert!(keys.clear_cookie().contains("Max-Age=0"));
    }
}
