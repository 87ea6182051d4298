//! Session authentication middleware.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::sync::Arc;

use crate::db::{User, UserRepository};
use crate::web::error::PageError;
use crate::web::flash;
use crate::web::handlers::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "deptstock_session";

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// Extractor for the logged-in user.
///
/// [`require_identity`] puts the user into the request extensions; without
/// it the extractor redirects to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}

/// Session token from the cookie jar, if one is set.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Middleware that admits only requests with a live session.
///
/// Anything else is redirected to the login page before the handler runs,
/// so a rejected request never touches the database beyond the user
/// lookup.
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(&jar) else {
        return redirect_to_login(jar);
    };

    let user_id = {
        let mut sessions = state.sessions.lock().await;
        match sessions.touch_session(&token) {
            Ok(session) => session.user_id,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session");
                return redirect_to_login(jar.remove(Cookie::build(SESSION_COOKIE).path("/")));
            }
        }
    };

    let user = match UserRepository::new(state.db.pool()).get_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id, "Session refers to a missing user");
            state.sessions.lock().await.logout(&token);
            return redirect_to_login(jar.remove(Cookie::build(SESSION_COOKIE).path("/")));
        }
        Err(e) => return PageError::from(e).into_response(),
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

fn redirect_to_login(jar: CookieJar) -> Response {
    let jar = flash::danger(jar, "Please log in to access this page.");
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}
