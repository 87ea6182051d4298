//! Web Authentication Tests
//!
//! Integration tests for signup, login, logout and the session gate.

mod common;

use axum::http::StatusCode;
use common::*;
use deptstock::config::SessionConfig;
use deptstock::UserRepository;

// ============================================================================
// Signup Tests
// ============================================================================

#[tokio::test]
async fn test_signup_success() {
    let (server, db) = create_test_server().await;

    let response = signup(&server, "alice", "a@x.com", "1").await;
    assert_redirect(&response, "/login");

    let page = get_page(&server, "/login").await;
    assert_eq!(
        flash_messages(&page),
        vec!["Registration successful! Please login."]
    );
    assert_eq!(page["flashes"][0]["category"], "success");

    let user = UserRepository::new(db.pool())
        .get_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.department_id, 1);
    assert_eq!(user.job_id, "JOB-1");
    assert_ne!(user.password, PASSWORD);
}

#[tokio::test]
async fn test_signup_page_lists_departments() {
    let (server, _db) = create_test_server().await;

    let page = get_page(&server, "/signup").await;
    let names: Vec<&str> = page["data"]["departments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();

    assert_eq!(
        names,
        vec![
            "Accounts",
            "Sales & Purchases",
            "IT & Marketing",
            "Masters and Costings"
        ]
    );
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let (server, db) = create_test_server().await;
    signup(&server, "alice", "a@x.com", "1").await;

    let response = signup(&server, "alice", "other@x.com", "2").await;
    assert_redirect(&response, "/signup");

    let page = get_page(&server, "/signup").await;
    assert!(flash_messages(&page).contains(&"Username already exists".to_string()));
    assert_eq!(UserRepository::new(db.pool()).count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_signup_duplicate_email_ignores_case() {
    let (server, db) = create_test_server().await;
    signup(&server, "alice", "a@x.com", "1").await;

    let response = signup(&server, "bob", "A@X.COM", "1").await;
    assert_redirect(&response, "/signup");

    let page = get_page(&server, "/signup").await;
    assert!(flash_messages(&page).contains(&"Email already registered".to_string()));
    assert_eq!(UserRepository::new(db.pool()).count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let (server, db) = create_test_server().await;

    let response = signup(&server, "alice", "ax.com", "1").await;
    assert_redirect(&response, "/signup");

    let page = get_page(&server, "/signup").await;
    assert_eq!(flash_messages(&page), vec!["Invalid email address"]);
    assert_eq!(page["flashes"][0]["category"], "danger");
    assert_eq!(UserRepository::new(db.pool()).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_signup_unknown_department() {
    let (server, db) = create_test_server().await;

    for department_id in ["99", "", "sales"] {
        let response = signup(&server, "alice", "a@x.com", department_id).await;
        assert_redirect(&response, "/signup");

        let page = get_page(&server, "/signup").await;
        assert_eq!(flash_messages(&page), vec!["Unknown department"]);
    }
    assert_eq!(UserRepository::new(db.pool()).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_signup_missing_field() {
    let (server, db) = create_test_server().await;

    let response = server
        .post("/signup")
        .form(&[
            ("username", "alice"),
            ("email", "a@x.com"),
            ("password", PASSWORD),
            ("department_id", "1"),
        ])
        .await;
    assert_redirect(&response, "/signup");

    let page = get_page(&server, "/signup").await;
    assert_eq!(flash_messages(&page), vec!["Job ID is required"]);
    assert_eq!(UserRepository::new(db.pool()).count().await.unwrap(), 0);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let (server, _db) = create_test_server().await;
    signup(&server, "alice", "a@x.com", "1").await;

    let response = login(&server, "alice", PASSWORD).await;
    assert_redirect(&response, "/");

    let page = get_page(&server, "/").await;
    assert!(flash_messages(&page).contains(&"Logged in successfully!".to_string()));
    assert_eq!(page["data"]["user"]["username"], "alice");
    assert_eq!(page["data"]["departments"].as_array().unwrap().len(), 4);
    assert!(page["data"]["user"].get("password").is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (server, _db) = create_test_server().await;
    signup(&server, "alice", "a@x.com", "1").await;
    get_page(&server, "/login").await;

    let response = login(&server, "alice", "wrong").await;
    assert_redirect(&response, "/login");

    let page = get_page(&server, "/login").await;
    assert_eq!(flash_messages(&page), vec!["Invalid username or password"]);

    // Still not logged in
    let response = server.get("/").await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_login_unknown_user_same_message() {
    let (server, _db) = create_test_server().await;

    let response = login(&server, "nobody", PASSWORD).await;
    assert_redirect(&response, "/login");

    let page = get_page(&server, "/login").await;
    assert_eq!(flash_messages(&page), vec!["Invalid username or password"]);
}

#[tokio::test]
async fn test_login_lockout() {
    let session = SessionConfig {
        max_login_attempts: 2,
        ..SessionConfig::default()
    };
    let (server, _db) = create_test_server_with(session).await;
    signup(&server, "alice", "a@x.com", "1").await;

    login(&server, "alice", "wrong").await;
    login(&server, "alice", "wrong").await;
    get_page(&server, "/login").await;

    // Locked even with the right password
    let response = login(&server, "alice", PASSWORD).await;
    assert_redirect(&response, "/login");

    let page = get_page(&server, "/login").await;
    let messages = flash_messages(&page);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Too many failed login attempts"));

    let response = server.get("/").await;
    assert_redirect(&response, "/login");
}

// ============================================================================
// Logout and Session Gate Tests
// ============================================================================

#[tokio::test]
async fn test_logout() {
    let (server, _db) = create_test_server().await;
    signup_and_login(&server, "alice").await;
    get_page(&server, "/").await;

    let response = server.get("/logout").await;
    assert_redirect(&response, "/login");

    let page = get_page(&server, "/login").await;
    assert_eq!(flash_messages(&page), vec!["Logged out successfully!"]);

    let response = server.get("/").await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_unauthenticated_redirects_to_login() {
    let (server, _db) = create_test_server().await;

    for path in ["/", "/logout", "/department/1", "/add_item", "/update_item/1"] {
        let response = server.get(path).await;
        assert_redirect(&response, "/login");
    }

    let page = get_page(&server, "/login").await;
    assert!(flash_messages(&page).contains(&"Please log in to access this page.".to_string()));
}

#[tokio::test]
async fn test_forged_session_cookie_rejected() {
    let (server, _db) = create_test_server().await;

    let response = server
        .get("/")
        .add_cookie(axum_extra::extract::cookie::Cookie::new(
            "deptstock_session",
            "not-a-real-token",
        ))
        .await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_health_check() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    response.assert_text("OK");
}
