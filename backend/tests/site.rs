mod support;

use reqwest::StatusCode;
use support::{spawn_app, spawn_app_without_database};

#[tokio::test]
async fn home_lists_seeded_landing_pages() {
    let app = spawn_app().await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("TruView Glass"));
    assert!(body.contains("Clear glass, clear roads."));
    assert!(body.contains("Fort Collins"));
}

#[tokio::test]
async fn landing_page_substitutes_service_and_location() {
    let app = spawn_app().await;

    let response = app.get("/services/windshield-repair/Fort%20Collins").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Same-day Windshield Repair for Fort Collins drivers."));
    assert!(body.contains("Book a repair"));
    assert!(body.contains("Good as new."));
    assert!(body.contains("Anywhere in town."));
    assert!(!body.contains("{{service}}"));
}

#[tokio::test]
async fn hero_image_renders_as_an_escaped_img_tag() {
    let app = spawn_app().await;

    let body = app
        .get("/services/windshield-repair/Fort%20Collins")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"<img class="hero-image" src=""#));
    assert!(!body.contains("background-image"));
    assert!(!body.contains("');color:red"));
}

#[tokio::test]
async fn unknown_location_or_service_is_not_found() {
    let app = spawn_app().await;

    for path in [
        "/services/windshield-repair/Boulder",
        "/services/tint/Fort%20Collins",
        "/services/windshield-repair/fort%20collins",
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        assert!(response.text().await.unwrap().contains("Page not found"));
    }
}

#[tokio::test]
async fn sitemap_lists_static_and_landing_urls() {
    let app = spawn_app().await;

    let response = app.get("/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/xml"
    );
    let body = response.text().await.unwrap();
    assert!(body.starts_with("<?xml"));
    assert_eq!(body.matches("<loc>").count(), 4);
    assert!(body.contains("windshield-repair"));
    assert!(body.contains("Fort%20Collins"));
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = spawn_app().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn health_reports_unavailable_database() {
    let app = spawn_app_without_database().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unavailable");
}

#[tokio::test]
async fn about_page_renders() {
    let app = spawn_app().await;
    let response = app.get("/about").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("About TruView Glass"));
}
