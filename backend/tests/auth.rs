mod support;

use reqwest::StatusCode;
use support::{location, spawn_app, ADMIN, MANAGER};

#[tokio::test]
async fn admin_pages_redirect_anonymous_visitors_to_login() {
    let app = spawn_app().await;

    for path in [
        "/admin",
        "/admin/contacts",
        "/admin/billing-events",
        "/admin/billing-analytics",
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/admin/login");
    }
}

#[tokio::test]
async fn valid_credentials_open_the_dashboard() {
    let app = spawn_app().await;

    let response = app.login(ADMIN).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let dashboard = app.get("/admin").await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let body = dashboard.text().await.unwrap();
    assert!(body.contains("Welcome, owner"));
    assert!(body.contains("Billing analytics"));

    let login_page = app.get("/admin/login").await;
    assert_eq!(location(&login_page), "/admin");
}

#[tokio::test]
async fn wrong_password_is_refused_with_a_message() {
    let app = spawn_app().await;

    let response = app.login((ADMIN.0, "not the password")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");

    let page = app.get("/admin/login").await.text().await.unwrap();
    assert!(page.contains("Invalid username or password."));
    assert_eq!(app.get("/admin").await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn managers_cannot_open_billing_pages() {
    let app = spawn_app().await;
    app.login(MANAGER).await;

    assert_eq!(app.get("/admin/contacts").await.status(), StatusCode::OK);
    assert_eq!(app.get("/admin/billing-events").await.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        app.get("/admin/billing-analytics").await.status(),
        StatusCode::FORBIDDEN
    );

    let dashboard = app.get("/admin").await.text().await.unwrap();
    assert!(!dashboard.contains("Billing analytics"));
}

#[tokio::test]
async fn admins_can_open_billing_pages() {
    let app = spawn_app().await;
    app.login(ADMIN).await;

    assert_eq!(app.get("/admin/billing-events").await.status(), StatusCode::OK);
    assert_eq!(app.get("/admin/billing-analytics").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = spawn_app().await;
    app.login(ADMIN).await;
    assert_eq!(app.get("/admin").await.status(), StatusCode::OK);

    let response = app.post_form("/admin/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");

    assert_eq!(app.get("/admin").await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn sixth_login_attempt_in_the_window_is_refused() {
    let app = spawn_app().await;

    for _ in 0..5 {
        let response = app.login(("nobody", "guess")).await;
        assert_eq!(location(&response), "/admin/login");
    }

    let response = app.login(ADMIN).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");

    let page = app.get("/admin/login").await.text().await.unwrap();
    assert!(page.contains("Too many login attempts"));
    assert_eq!(app.get("/admin").await.status(), StatusCode::SEE_OTHER);
}
