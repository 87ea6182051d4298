//! Signup, login and logout handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::sync::Arc;

use super::{redirect_with_flash, AppState};
use crate::auth::{authenticate, register, RegistrationRequest};
use crate::db::{DepartmentRepository, UserRepository};
use crate::web::dto::{LoginForm, LoginPage, Page, SignupForm, SignupPage};
use crate::web::error::PageError;
use crate::web::flash::{self, FlashCategory};
use crate::web::middleware::{session_token, CurrentUser, LOGIN_PATH, SESSION_COOKIE};

/// GET /signup - Signup form with the department choices.
pub async fn signup_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<SignupPage>>), PageError> {
    let departments = DepartmentRepository::new(state.db.pool()).list().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, Json(Page::new(flashes, SignupPage { departments }))))
}

/// POST /signup - Register a new user.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Response {
    // 0 never names a department, so an unparsable choice is reported as
    // unknown after the other fields are checked.
    let department_id = form.department_id.trim().parse::<i64>().unwrap_or(0);

    let request = RegistrationRequest::new(
        form.username.trim(),
        form.email.trim(),
        form.password,
        department_id,
        form.job_id.trim(),
    );

    match register(state.db.pool(), request).await {
        Ok(_) => redirect_with_flash(
            jar,
            FlashCategory::Success,
            "Registration successful! Please login.",
            LOGIN_PATH,
        ),
        Err(e) if e.is_user_error() => {
            tracing::debug!(error = %e, "Registration rejected");
            redirect_with_flash(jar, FlashCategory::Danger, e.to_string(), "/signup")
        }
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            PageError::internal("An internal error occurred").into_response()
        }
    }
}

/// GET /login - Login form.
pub async fn login_page(jar: CookieJar) -> (CookieJar, Json<Page<LoginPage>>) {
    let (jar, flashes) = flash::take(jar);
    (jar, Json(Page::new(flashes, LoginPage {})))
}

/// POST /login - Check credentials and start a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let username = form.username.trim();
    let user = UserRepository::new(state.db.pool())
        .get_by_username(username)
        .await?;

    let result = authenticate(&state.sessions, username, &form.password, user.as_ref()).await;

    let response = match result {
        Ok(session) => {
            if let Some(previous) = session_token(&jar) {
                state.sessions.lock().await.logout(&previous);
            }
            let jar = jar.add(state.session_cookie(session.token));
            redirect_with_flash(jar, FlashCategory::Success, "Logged in successfully!", "/")
        }
        Err(e) => redirect_with_flash(jar, FlashCategory::Danger, e.to_string(), LOGIN_PATH),
    };
    Ok(response)
}

/// GET /logout - End the current session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Response {
    if let Some(token) = session_token(&jar) {
        state.sessions.lock().await.logout(&token);
    }
    tracing::info!(username = %user.username, "User logged out");

    let jar = flash::success(
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        "Logged out successfully!",
    );
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}
