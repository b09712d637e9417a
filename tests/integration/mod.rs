//! Integration tests for the user service.
//!
//! Each test boots the real router on an ephemeral localhost port and talks
//! to it over HTTP.

use std::net::SocketAddr;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use user_service::api::{create_router, AppState};

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn start_server(state: AppState) -> TestApp {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, create_router(state)).await {
            eprintln!("server error: {}", e);
        }
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn test_user_lifecycle_over_http() {
    let app = start_server(AppState::new()).await;

    let res = app
        .client
        .post(app.url("/users"))
        .json(&json!({"id": "u1", "name": "Ann"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"id": "u1", "name": "Ann"}));

    let res = app.client.get(app.url("/users/u1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"id": "u1", "name": "Ann"}));

    let res = app
        .client
        .put(app.url("/users/u1"))
        .json(&json!({"id": "ignored", "name": "Annie"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"id": "u1", "name": "Annie"}));

    let res = app.client.delete(app.url("/users/u1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());

    let res = app.client.get(app.url("/users/u1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"error": "User not found"}));
}

#[tokio::test]
async fn test_unknown_user_on_empty_store() {
    let app = start_server(AppState::new()).await;

    let res = app
        .client
        .get(app.url("/users/doesnotexist"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"error": "User not found"}));
}

#[tokio::test]
async fn test_invalid_json_body_is_rejected() {
    let app = start_server(AppState::new()).await;

    let res = app
        .client
        .post(app.url("/users"))
        .header("content-type", "application/json")
        .body("{\"id\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(!body["error"].as_str().unwrap_or_default().is_empty());

    let res = app.client.get(app.url("/users")).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));
}

#[tokio::test]
async fn test_empty_id_collides_when_allowed() {
    let app = start_server(AppState::new().with_allow_empty_id(true)).await;

    for name in ["first", "second"] {
        let res = app
            .client
            .post(app.url("/users"))
            .json(&json!({"name": name}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = app.client.get(app.url("/users")).send().await.unwrap();
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!([{"id": "", "name": "second"}])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_are_not_lost() {
    let state = AppState::new();
    let app = start_server(state.clone()).await;
    let n = 100;

    let requests = (0..n).map(|i| {
        let request = app
            .client
            .post(app.url("/users"))
            .json(&json!({"id": format!("user-{i}"), "n": i}));
        async move { request.send().await.map(|res| res.status()) }
    });
    for status in futures::future::join_all(requests).await {
        assert_eq!(status.unwrap(), StatusCode::CREATED);
    }

    let res = app.client.get(app.url("/users")).send().await.unwrap();
    let users: Vec<Value> = res.json().await.unwrap();
    assert_eq!(users.len(), n);
    assert_eq!(state.store.len().await, n);
}
