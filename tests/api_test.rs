use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use txn_recon_rust::{api, ReconcileService};

fn app() -> Router {
    api::router(Arc::new(ReconcileService::default()))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn invocation_reconciles_documents() {
    let response = app()
        .oneshot(post_json(
            "/invocations",
            json!({
                "operation": "reconcile",
                "leftDocument": [{"Amount": 100, "Rest ID": "5"}],
                "rightDocument": [{"Amount": 100, "Rest ID": "5"}],
                "profileContext": {"profileName": "Demo"}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["summary"]["totalTransactions"], 2);
    assert_eq!(body["summary"]["reconciledCount"], 1);
    assert_eq!(body["reconciliationResults"][0]["confidence"], 100.0);
    assert_eq!(body["reconciliationResults"][0]["isReconciled"], true);
    assert_eq!(body["metadata"]["profileContext"]["profileName"], "Demo");
}

#[tokio::test]
async fn invocation_defaults_profile_context_to_empty_object() {
    let response = app()
        .oneshot(post_json(
            "/invocations",
            json!({"leftDocument": [{"Amount": 10}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["metadata"]["profileContext"], json!({}));
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let response = app()
        .oneshot(post_json("/invocations", json!({"operation": "extract"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unknown operation: extract");
}

#[tokio::test]
async fn empty_request_returns_no_data_label() {
    let response = app()
        .oneshot(post_json("/api/reconcile", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["analysis"], "No data received for reconciliation");
    assert_eq!(body["reconciliationResults"], json!([]));
    assert_eq!(body["metadata"]["profileContext"], Value::Null);
}

#[tokio::test]
async fn export_returns_csv_rows() {
    let response = app()
        .oneshot(post_json(
            "/api/reconcile/export",
            json!({
                "leftDocument": [{"Amount": 40, "Rest ID": "77"}],
                "rightDocument": [{"Amount": 42, "Description": "Order #77 delivery"}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let body = body_string(response).await;
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1,left-0,right-0,40.00,42.00,high confidence,95.00,true,"));
}
