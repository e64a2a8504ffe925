pub mod google;
pub mod session;

pub use google::{GoogleIdentityProvider, IdentityProvider};
pub use session::{CurrentSession, SessionClaims, SessionKeys, SESSION_COOKIE};
