mod common;

use axum_test::TestServer;
use chrono::Duration;
use common::{ADMIN_KEY, TestApp};
use serde_json::{Value, json};

fn post(server: &TestServer, path: &str, body: Value) -> axum_test::TestRequest {
    server
        .post(path)
        .add_query_param("key", ADMIN_KEY)
        .json(&body)
}

#[tokio::test]
async fn test_create_link_with_custom_code() {
    let app = TestApp::new();

    let response = post(
        &app.server,
        "/api/admin/links",
        json!({
            "shortCode": "docs",
            "destinationUrl": "https://example.com/docs",
            "notes": "team docs"
        }),
    )
    .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["shortCode"], "docs");
    assert_eq!(body["destinationUrl"], "https://example.com/docs");
    assert_eq!(body["notes"], "team docs");
    assert_eq!(body["url"], "/docs");
    assert_eq!(body["message"], "Link created successfully");

    let redirect = app.server.get("/docs").await;
    assert_eq!(redirect.status_code(), 301);
}

#[tokio::test]
async fn test_create_link_generates_code() {
    let app = TestApp::new();

    let response = post(
        &app.server,
        "/api/admin/links",
        json!({ "destinationUrl": "https://example.com/generated" }),
    )
    .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let code = body["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 5);
    assert!(
        code.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    );
    assert!(app.links.by_code(code).is_some());
}

#[tokio::test]
async fn test_create_link_duplicate_code_conflicts() {
    let app = TestApp::new();
    app.seed_link("docs", "https://example.com/docs").await;

    let response = post(
        &app.server,
        "/api/admin/links",
        json!({ "shortCode": "docs", "destinationUrl": "https://example.com/other" }),
    )
    .await;

    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "SHORTCODE_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_create_link_rejects_insecure_destination() {
    let app = TestApp::new();

    let response = post(
        &app.server,
        "/api/admin/links",
        json!({ "shortCode": "plain", "destinationUrl": "http://example.com" }),
    )
    .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INSECURE_PROTOCOL");
    assert!(app.links.by_code("plain").is_none());
}

#[tokio::test]
async fn test_create_link_rejects_private_destination() {
    let app = TestApp::new();

    for destination in [
        "https://localhost/admin",
        "https://127.0.0.1/",
        "https://10.1.2.3/",
        "https://192.168.0.1/",
        "https://169.254.169.254/latest",
        "https://[::1]/",
    ] {
        let response = post(
            &app.server,
            "/api/admin/links",
            json!({ "destinationUrl": destination }),
        )
        .await;

        assert_eq!(response.status_code(), 400, "{destination}");
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "PRIVATE_NETWORK_BLOCKED");
    }
}

#[tokio::test]
async fn test_create_link_rejects_reserved_code() {
    let app = TestApp::new();

    let response = post(
        &app.server,
        "/api/admin/links",
        json!({ "shortCode": "analytics", "destinationUrl": "https://example.com" }),
    )
    .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "RESERVED_SHORTCODE");
}

#[tokio::test]
async fn test_create_link_rejects_code_with_slash() {
    let app = TestApp::new();

    let response = post(
        &app.server,
        "/api/admin/links",
        json!({ "shortCode": "a/b", "destinationUrl": "https://example.com" }),
    )
    .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_SHORTCODE");
}

#[tokio::test]
async fn test_create_link_requires_destination() {
    let app = TestApp::new();

    let response = post(&app.server, "/api/admin/links", json!({ "shortCode": "x" })).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_list_links_newest_first_with_pagination() {
    let app = TestApp::new();
    for i in 0..3 {
        app.seed_link(&format!("code{i}"), &format!("https://example.com/{i}"))
            .await;
        app.clock.advance(Duration::minutes(1));
    }

    let response = app
        .server
        .get("/api/admin/links")
        .add_query_param("key", ADMIN_KEY)
        .add_query_param("limit", 2)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["short_code"], "code2");
    assert_eq!(links[1]["short_code"], "code1");
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 2, "total": 3, "pages": 2 })
    );
}

#[tokio::test]
async fn test_list_links_caps_limit() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/admin/links")
        .add_query_param("key", ADMIN_KEY)
        .add_query_param("limit", 500)
        .await;

    let body: Value = response.json();
    assert_eq!(body["pagination"]["limit"], 100);
}

#[tokio::test]
async fn test_list_links_huge_page_is_clamped() {
    let app = TestApp::new();
    app.seed_link("docs", "https://example.com/docs").await;

    let response = app
        .server
        .get("/api/admin/links")
        .add_query_param("key", ADMIN_KEY)
        .add_query_param("page", i64::MAX)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["pagination"]["page"], 1_000_000);
    assert_eq!(body["pagination"]["total"], 1);
    assert!(body["links"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_links_search() {
    let app = TestApp::new();
    app.seed_link("docs", "https://example.com/docs").await;
    app.seed_link("blog", "https://blog.example.org/").await;
    app.seed_link("gh", "https://github.com/example").await;

    let response = app
        .server
        .get("/api/admin/links")
        .add_query_param("key", ADMIN_KEY)
        .add_query_param("search", "blog")
        .await;

    let body: Value = response.json();
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["links"][0]["short_code"], "blog");
}

#[tokio::test]
async fn test_update_link() {
    let app = TestApp::new();
    let link = app.seed_link("docs", "https://example.com/docs").await;

    let response = app
        .server
        .put(&format!("/api/admin/links/{}", link.id))
        .add_query_param("key", ADMIN_KEY)
        .json(&json!({
            "shortCode": "handbook",
            "destinationUrl": "https://example.com/handbook",
            "notes": "renamed"
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["shortCode"], "handbook");
    assert_eq!(body["message"], "Link updated successfully");

    let stored = app.links.get(link.id).unwrap();
    assert_eq!(stored.short_code, "handbook");
    assert_eq!(stored.notes.as_deref(), Some("renamed"));
    assert_eq!(app.server.get("/docs").await.status_code(), 404);
}

#[tokio::test]
async fn test_update_link_keeps_own_code() {
    let app = TestApp::new();
    let link = app.seed_link("docs", "https://example.com/docs").await;

    let response = app
        .server
        .put(&format!("/api/admin/links/{}", link.id))
        .add_query_param("key", ADMIN_KEY)
        .json(&json!({ "shortCode": "docs", "destinationUrl": "https://example.com/v2" }))
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_update_link_conflicts_with_other_link() {
    let app = TestApp::new();
    app.seed_link("docs", "https://example.com/docs").await;
    let other = app.seed_link("blog", "https://example.com/blog").await;

    let response = app
        .server
        .put(&format!("/api/admin/links/{}", other.id))
        .add_query_param("key", ADMIN_KEY)
        .json(&json!({ "shortCode": "docs", "destinationUrl": "https://example.com/blog" }))
        .await;

    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_update_missing_link() {
    let app = TestApp::new();

    let response = app
        .server
        .put("/api/admin/links/999")
        .add_query_param("key", ADMIN_KEY)
        .json(&json!({ "shortCode": "x", "destinationUrl": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "LINK_NOT_FOUND");
}

#[tokio::test]
async fn test_delete_link_removes_analytics() {
    let app = TestApp::new();
    let link = app.seed_link("docs", "https://example.com/docs").await;
    app.server.get("/docs").await;

    let response = app
        .server
        .delete(&format!("/api/admin/links/{}", link.id))
        .add_query_param("key", ADMIN_KEY)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "Link deleted successfully");
    assert_eq!(body["id"], link.id);
    assert!(app.links.get(link.id).is_none());
    assert!(app.analytics.events().is_empty());
}

#[tokio::test]
async fn test_delete_missing_link() {
    let app = TestApp::new();

    let response = app
        .server
        .delete("/api/admin/links/999")
        .add_query_param("key", ADMIN_KEY)
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_reset_link_stats() {
    let app = TestApp::new();
    let link = app.seed_link("docs", "https://example.com/docs").await;
    app.server.get("/docs").await;
    app.server.get("/docs").await;

    let response = app
        .server
        .post(&format!("/api/admin/links/{}/reset", link.id))
        .add_query_param("key", ADMIN_KEY)
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["analyticsRecordsDeleted"], 2);

    let stored = app.links.get(link.id).unwrap();
    assert_eq!(stored.click_count, 0);
    assert_eq!(stored.last_clicked, None);
    assert!(app.analytics.events().is_empty());
}

#[tokio::test]
async fn test_reset_missing_link() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/admin/links/999/reset")
        .add_query_param("key", ADMIN_KEY)
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_click_then_reset_scenario() {
    let app = TestApp::new();
    let link = app.seed_link("test", "https://example.com").await;

    let first = app.server.get("/test").await;
    assert_eq!(first.header("location"), "https://example.com");
    assert_eq!(app.links.get(link.id).unwrap().click_count, 1);

    let second = app.server.get("/test?utm=1").await;
    assert_eq!(second.header("location"), "https://example.com?utm=1");
    assert_eq!(app.links.get(link.id).unwrap().click_count, 2);

    app.server
        .post(&format!("/api/admin/links/{}/reset", link.id))
        .add_query_param("key", ADMIN_KEY)
        .await;

    assert_eq!(app.links.get(link.id).unwrap().click_count, 0);
    assert!(app.analytics.events().is_empty());
}
