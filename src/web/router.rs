//! Router configuration for the web layer.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_item, add_item_page, department_view, home, login, login_page, logout, signup,
    signup_page, update_item, update_item_page, AppState,
};
use super::middleware::require_identity;

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Routes reachable without a session
    let public_routes = Router::new()
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login));

    // Routes that require a session
    let protected_routes = Router::new()
        .route("/", get(home))
        .route("/logout", get(logout))
        .route("/department/:id", get(department_view))
        .route("/add_item", get(add_item_page).post(add_item))
        .route("/update_item/:id", get(update_item_page).post(update_item))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_identity,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
