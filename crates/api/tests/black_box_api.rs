use reqwest::StatusCode;
use serde_json::{json, Value};

use userbase_api::app::{build_app, services::AppServices};
use userbase_api::config::{CorsConfig, CorsOrigins};
use userbase_infra::DbClient;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(AppServices::in_memory(), CorsConfig::default()).await
    }

    async fn spawn_with(services: AppServices, cors: CorsConfig) -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = build_app(services, &cors);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn list_users(client: &reqwest::Client, srv: &TestServer) -> Vec<Value> {
    let res = client.get(srv.url("/users")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    body["value"].as_array().cloned().expect("value is an array")
}

#[tokio::test]
async fn user_lifecycle_create_list_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(srv.url("/users"))
        .json(&json!({ "name": "Ana", "email": "ana@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: Value = res.json().await.unwrap();
    let id = created["value"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["value"]["name"], "Ana");
    assert_eq!(created["value"]["email"], "ana@x.com");

    // List contains it
    let users = list_users(&client, &srv).await;
    assert!(users.iter().any(|u| u == &created["value"]));

    // Update
    let res = client
        .put(srv.url(&format!("/users/{id}")))
        .json(&json!({ "name": "Ana B", "email": "ana@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(
        updated["value"],
        json!({ "id": id, "name": "Ana B", "email": "ana@x.com" })
    );

    // Reads see the new values, not the old
    let users = list_users(&client, &srv).await;
    let stored = users.iter().find(|u| u["id"] == id.as_str()).unwrap();
    assert_eq!(stored["name"], "Ana B");

    // Delete returns the removed row
    let res = client
        .delete(srv.url(&format!("/users/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: Value = res.json().await.unwrap();
    assert_eq!(deleted["value"], updated["value"]);

    // Gone from the list
    let users = list_users(&client, &srv).await;
    assert!(users.iter().all(|u| u["id"] != id.as_str()));
}

#[tokio::test]
async fn unknown_id_yields_null_value_by_default() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(srv.url("/users/00000000-0000-0000-0000-000000000000"))
        .json(&json!({ "name": "Nobody", "email": "no@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "value": null }));

    let res = client
        .delete(srv.url("/users/00000000-0000-0000-0000-000000000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "value": null }));
}

#[tokio::test]
async fn unknown_id_is_404_in_strict_mode() {
    let services = AppServices::new(DbClient::in_memory(), true);
    let srv = TestServer::spawn_with(services, CorsConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .delete(srv.url("/users/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn malformed_bodies_are_rejected_before_persistence() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let bad_bodies = [
        json!({ "name": "Ana" }),
        json!({ "email": "ana@x.com" }),
        json!({ "name": "", "email": "ana@x.com" }),
        json!({ "name": "Ana", "email": "   " }),
        json!({ "name": 1, "email": "ana@x.com" }),
    ];

    for body in bad_bodies {
        let res = client
            .post(srv.url("/users"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: Value = res.json().await.unwrap();
        assert_eq!(err["error"], "validation_error");
    }

    let res = client
        .post(srv.url("/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Nothing reached the store.
    assert!(list_users(&client, &srv).await.is_empty());
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let headers = res.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert_eq!(headers["referrer-policy"], "no-referrer");
    assert!(headers.contains_key("strict-transport-security"));
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin_only() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .request(reqwest::Method::OPTIONS, srv.url("/users"))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");

    let res = client
        .get(srv.url("/users"))
        .header("origin", "https://evil.example")
        .send()
        .await
        .unwrap();
    assert!(!res.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn wildcard_cors_allows_any_origin() {
    let cors = CorsConfig {
        origins: CorsOrigins::Any,
        allow_credentials: false,
    };
    let srv = TestServer::spawn_with(AppServices::in_memory(), cors).await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/users"))
        .header("origin", "https://anywhere.example")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn docs_and_openapi_are_served() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/openapi.json")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["cache-control"], "no-store");
    let doc: Value = res.json().await.unwrap();
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    assert!(doc["paths"]["/users/{id}"]["put"].is_object());

    let res = client.get(srv.url("/docs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("/openapi.json"));
}
