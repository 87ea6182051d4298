//! Request handlers for the web layer.

pub mod auth;
pub mod inventory;

pub use auth::*;
pub use inventory::*;

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::Mutex;

use crate::auth::SessionManager;
use crate::config::SessionConfig;
use crate::web::flash::{self, FlashCategory};
use crate::web::middleware::SESSION_COOKIE;
use crate::Database;

/// Application state shared across handlers.
pub struct AppState {
    /// Connection pool wrapper; cheap to clone.
    pub db: Database,
    /// Live sessions and the login limiter.
    pub sessions: Mutex<SessionManager>,
    /// Mark the session cookie `Secure`.
    pub secure_cookie: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, session_config: &SessionConfig) -> Self {
        Self {
            db,
            sessions: Mutex::new(SessionManager::from_config(session_config)),
            secure_cookie: session_config.secure_cookie,
        }
    }

    /// Build the cookie that carries a session token.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .build()
    }
}

/// Queue a flash and redirect (303).
pub(crate) fn redirect_with_flash(
    jar: CookieJar,
    category: FlashCategory,
    message: impl Into<String>,
    to: &str,
) -> Response {
    let jar = flash::push(jar, category, message);
    (jar, Redirect::to(to)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_cookie_attributes() {
        let db = Database::open_in_memory().await.unwrap();
        let state = AppState::new(db, &SessionConfig::default());

        let cookie = state.session_cookie("token-1".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "token-1");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
    }
}
