//! End-to-end tests: CSV to index to HTTP answer, with offline backends.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use stockwise_gateway::{Gateway, GatewayConfig};
use stockwise_integration_tests::{write_csv, Harness, ScriptedProvider};
use stockwise_memory::IndexState;
use stockwise_rag::SYSTEM_PROMPT;
use tempfile::TempDir;
use tower::ServiceExt;

fn question(text: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/rag-inventory-search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "question": text }).to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_single_row_answer_over_http() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(dir.path(), &["ABC123,WH1,2024-01-01,SALE,5,"]);
    let harness = Harness::start(&csv, &dir.path().join("index"), 5).await;
    let app = Gateway::new(GatewayConfig::default(), harness.service.clone()).router();

    let response = app
        .oneshot(question("What happened to SKU ABC123?"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["answer"], ScriptedProvider::REPLY);

    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(
        sources[0]["metadata"],
        json!({
            "sku": "ABC123",
            "warehouse": "WH1",
            "txn_date": "2024-01-01",
            "txn_type": "SALE"
        })
    );
    assert!(sources[0]["content"].as_str().unwrap().contains("- SKU: ABC123"));
    assert!(sources[0]["content"].as_str().unwrap().contains("- Notes: N/A"));

    let prompts = harness.provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0][0].content.starts_with(SYSTEM_PROMPT));
    assert!(prompts[0][0].content.contains("- SKU: ABC123"));
    assert_eq!(prompts[0][1].content, "What happened to SKU ABC123?");
}

#[tokio::test]
async fn test_k_larger_than_corpus_returns_everything() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(
        dir.path(),
        &[
            "ABC123,WH1,2024-01-01,SALE,5,",
            "ABC123,WH2,2024-01-02,RECEIPT,40,restock",
            "XYZ9,WH1,2024-01-03,SALE,1,",
        ],
    );
    let harness = Harness::start(&csv, &dir.path().join("index"), 10).await;

    let response = harness.service.answer("ABC123 SALE").await.unwrap();
    assert_eq!(response.sources.len(), 3);

    let mut warehouses: Vec<_> = response
        .sources
        .iter()
        .map(|s| (s.metadata.sku.as_str(), s.metadata.warehouse.as_str()))
        .collect();
    warehouses.sort();
    assert_eq!(warehouses, [("ABC123", "WH1"), ("ABC123", "WH2"), ("XYZ9", "WH1")]);
}

#[tokio::test]
async fn test_second_start_reuses_index_without_reembedding() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("index");
    let csv = write_csv(
        dir.path(),
        &["ABC123,WH1,2024-01-01,SALE,5,", "XYZ9,WH1,2024-01-03,SALE,1,"],
    );

    let first = Harness::start(&csv, &store, 5).await;
    assert_eq!(first.embeddings.embedded(), 2);
    let first_answer = first.service.answer("XYZ9").await.unwrap();
    drop(first);

    let second = Harness::start(&csv, &store, 5).await;
    assert_eq!(second.embeddings.embedded(), 0);
    assert_eq!(second.index.len().await, 2);

    let second_answer = second.service.answer("XYZ9").await.unwrap();
    assert_eq!(first_answer, second_answer);
}

#[tokio::test]
async fn test_restart_after_csv_removed() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("index");
    let csv = write_csv(dir.path(), &["ABC123,WH1,2024-01-01,SALE,5,"]);

    drop(Harness::start(&csv, &store, 5).await);
    std::fs::remove_file(&csv).unwrap();

    let harness = Harness::start(&csv, &store, 5).await;
    assert_eq!(harness.index.state(), IndexState::Ready);

    let response = harness.service.answer("ABC123").await.unwrap();
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].metadata.sku, "ABC123");
}

#[tokio::test]
async fn test_health_and_preflight() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(
        dir.path(),
        &["ABC123,WH1,2024-01-01,SALE,5,", "XYZ9,WH1,2024-01-03,SALE,1,"],
    );
    let harness = Harness::start(&csv, &dir.path().join("index"), 5).await;
    let gateway = Gateway::new(GatewayConfig::default(), harness.service.clone());

    let health = gateway
        .router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(json_body(health).await["documents"], 2);

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/rag-inventory-search")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = gateway.router().oneshot(preflight).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_blank_question_rejected_before_backends() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(dir.path(), &["ABC123,WH1,2024-01-01,SALE,5,"]);
    let harness = Harness::start(&csv, &dir.path().join("index"), 5).await;
    let embedded = harness.embeddings.embedded();
    let app = Gateway::new(GatewayConfig::default(), harness.service.clone()).router();

    let response = app.oneshot(question("  ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.embeddings.embedded(), embedded);
    assert!(harness.provider.prompts().is_empty());
}
