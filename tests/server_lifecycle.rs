//! End-to-end tests over a real socket using the client SDK.

use std::time::Duration;

use axum::http::StatusCode;
use user_service::HttpServer;
use user_service_client::client::UserFields;
use user_service_client::UserClient;

mod common;

use common::{get, start_server, test_config};

fn client(url: &str) -> UserClient {
    let http = reqwest_client();
    UserClient::with_client(http, url)
}

fn reqwest_client() -> user_service_client::client::HttpClient {
    user_service_client::client::HttpClient::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn crud_round_trip_over_http() {
    let server = start_server(HttpServer::new(test_config()).unwrap()).await;
    let api = client(&server.url());

    let health = api.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service.as_deref(), Some("user-service"));
    assert_eq!(api.ready().await.unwrap().status, "ready");

    let listed = api.list().await.unwrap();
    assert_eq!(listed.count, 3);

    let created = api
        .create(&UserFields {
            name: Some("Dana Scully".into()),
            email: Some("dana@company.com".into()),
            role: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(created.role, "User");

    let updated = api
        .update(
            created.id,
            &UserFields {
                role: Some("Agent".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, "Agent");
    assert_eq!(updated.name, "Dana Scully");
    assert_eq!(api.get(4).await.unwrap(), updated);

    assert_eq!(api.delete(4).await.unwrap(), "User deleted");
    let err = api.get(4).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.to_string().contains("User not found"));

    let metrics = api.metrics().await.unwrap();
    assert!(metrics.contains("http_requests_total"));

    server.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}

#[tokio::test]
async fn create_without_email_is_rejected_over_http() {
    let server = start_server(HttpServer::new(test_config()).unwrap()).await;
    let api = client(&server.url());

    let err = api
        .create(&UserFields {
            name: Some("Nameless".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert!(err.to_string().contains("Name and email are required"));

    server.shutdown.trigger();
}

#[tokio::test]
async fn shutdown_marks_service_as_draining() {
    let server = HttpServer::new(test_config()).unwrap();
    let readiness = server.state().readiness.clone();
    let router = server.router();
    let running = start_server(server).await;

    assert!(readiness.is_ready());
    assert_eq!(get(&router, "/ready").await.status, StatusCode::OK);

    running.shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), running.handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();

    assert!(!readiness.is_ready());
    let res = get(&router, "/ready").await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.json()["status"], "draining");
}

#[tokio::test]
async fn servers_keep_separate_stores() {
    let a = start_server(HttpServer::new(test_config()).unwrap()).await;
    let b = start_server(HttpServer::new(test_config()).unwrap()).await;

    client(&a.url()).delete(1).await.unwrap();
    assert!(client(&a.url()).get(1).await.is_err());
    assert_eq!(client(&b.url()).get(1).await.unwrap().name, "Alice Johnson");

    a.shutdown.trigger();
    b.shutdown.trigger();
}
