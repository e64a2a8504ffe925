//! Page access rules.
//!
//! Every page request is classified against three well-known paths and
//! decided from the caller's session claim. The decision is a pure function:
//! token verification happens upstream and arrives here as `Option<SessionClaim>`.

/// Sign-in page
pub const LOGIN_PATH: &str = "/login";
/// Favorite-movie setup page, required before anything else is reachable
pub const PROFILE_SETUP_PATH: &str = "/favorite-movie";
/// Landing page for fully set up users
pub const HOME_PATH: &str = "/";

/// Path prefixes that bypass the guard entirely
const EXCLUDED_PREFIXES: [&str; 3] = ["/api", "/assets", "/health"];

/// Resolved identity for the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaim {
    pub authenticated: bool,
    pub has_favorite_movie: bool,
}

impl SessionClaim {
    pub fn new(has_favorite_movie: bool) -> Self {
        Self {
            authenticated: true,
            has_favorite_movie,
        }
    }
}

/// Classification of a request path by exact match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Login,
    ProfileSetup,
    Other,
}

impl RouteClass {
    pub fn of(path: &str) -> Self {
        match path {
            LOGIN_PATH => RouteClass::Login,
            PROFILE_SETUP_PATH => RouteClass::ProfileSetup,
            _ => RouteClass::Other,
        }
    }
}

/// Outcome of evaluating a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectTo(&'static str),
}

/// Returns true for paths the guard never evaluates: API routes (including the
/// OAuth callback), static assets, and anything that looks like a file.
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }) || path.contains('.')
}

/// Decides whether a page request may proceed.
///
/// A claim whose `authenticated` flag is false is treated the same as no claim.
pub fn decide(path: &str, claim: Option<&SessionClaim>) -> GuardDecision {
    let route = RouteClass::of(path);

    let claim = match claim {
        Some(claim) if claim.authenticated => claim,
        _ => {
            return match route {
                RouteClass::Login => GuardDecision::Allow,
                _ => GuardDecision::RedirectTo(LOGIN_PATH),
            };
        }
    };

    match (route, claim.has_favorite_movie) {
        (RouteClass::Login, _) => GuardDecision::RedirectTo(HOME_PATH),
        (RouteClass::ProfileSetup, true) => GuardDecision::RedirectTo(HOME_PATH),
        (RouteClass::ProfileSetup, false) => GuardDecision::Allow,
        (RouteClass::Other, false) => GuardDecision::RedirectTo(PROFILE_SETUP_PATH),
        (RouteClass::Other, true) => GuardDecision::Allow,
    }
}
