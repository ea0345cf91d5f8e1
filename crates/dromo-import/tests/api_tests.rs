//! HTTP API integration tests
//!
//! Exercise the full router against an in-process provider and object store.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use dromo_import::providers::{CreatedImport, ImportProvider, MemoryObjectStore, ObjectStore};
use dromo_import::{build_router, AppState, Error, ImportConfig, Result, StatusStore};

/// Provider that hands out sequential import ids
#[derive(Default)]
struct FakeDromo {
    creates: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl ImportProvider for FakeDromo {
    async fn create_import(&self, _filename: &str) -> Result<CreatedImport> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(Error::upstream("Dromo API error (create import): HTTP 503 - down"));
        }
        Ok(CreatedImport {
            import_id: format!("imp_{}", n),
            upload_url: format!("https://upload.test/imp_{}", n),
        })
    }

    async fn upload_file(&self, _upload_url: &str, _data: Bytes) -> Result<()> {
        Ok(())
    }

    async fn fetch_processed_data(&self, import_id: &str) -> Result<Bytes> {
        Ok(Bytes::from(format!("id\n{}\n", import_id)))
    }

    fn name(&self) -> &str {
        "fake-dromo"
    }
}

struct TestApp {
    router: Router,
    provider: Arc<FakeDromo>,
    store: Arc<StatusStore>,
}

fn test_app_with(provider: FakeDromo) -> TestApp {
    let provider = Arc::new(provider);
    let objects = Arc::new(MemoryObjectStore::new());
    objects.insert("uploads/people.csv", "name,email\nada,ada@example.com\n");
    objects.insert("uploads/orders.csv", "order,total\n1,9.99\n");

    let mut config = ImportConfig::default();
    config.export.enabled = false;

    let store = Arc::new(StatusStore::in_memory());
    let state = AppState::with_parts(
        config,
        provider.clone(),
        Some(objects as Arc<dyn ObjectStore>),
        Arc::clone(&store),
    );

    TestApp {
        router: build_router(state),
        provider,
        store,
    }
}

fn test_app() -> TestApp {
    test_app_with(FakeDromo::default())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, value)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn import_file_is_retrievable_by_id() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/import-file",
            json!({ "s3_key": "uploads/people.csv", "filename": "people.csv" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["message"], "Import started successfully");
    let import_id = body["import_id"].as_str().unwrap().to_string();

    let (status, record) = send(&app.router, get(&format!("/import-status/{}", import_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["import_id"], import_id.as_str());
    assert_eq!(record["status"], "PENDING");
    assert_eq!(record["filename"], "people.csv");
    assert_eq!(record["s3_key"], "uploads/people.csv");
}

#[tokio::test]
async fn unknown_import_status_is_404() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/import-status/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}

#[tokio::test]
async fn empty_s3_key_is_rejected_before_provider_call() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_json("/import-file", json!({ "s3_key": "", "filename": "people.csv" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "validation_error");
    assert_eq!(app.provider.creates.load(Ordering::SeqCst), 0);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn missing_fields_and_bad_json_are_400() {
    let app = test_app();

    let (status, _) = send(
        &app.router,
        post_json("/import-file", json!({ "s3_key": "uploads/people.csv" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/import-file")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.provider.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn provider_failure_is_502() {
    let app = test_app_with(FakeDromo {
        fail: true,
        ..Default::default()
    });

    let (status, body) = send(
        &app.router,
        post_json(
            "/import-file",
            json!({ "s3_key": "uploads/people.csv", "filename": "people.csv" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["type"], "upstream_error");
    assert!(app.store.is_empty());

    // The failure does not affect later requests
    let (status, _) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_source_object_is_502() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/import-file",
            json!({ "s3_key": "uploads/missing.csv", "filename": "missing.csv" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["type"], "storage_error");
    assert_eq!(app.provider.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn webhook_sets_status_and_is_idempotent() {
    let app = test_app();

    let (_, body) = send(
        &app.router,
        post_json(
            "/import-file",
            json!({ "s3_key": "uploads/people.csv", "filename": "people.csv" }),
        ),
    )
    .await;
    let import_id = body["import_id"].as_str().unwrap().to_string();

    let payload = json!({ "data": { "id": import_id, "status": "SUCCESSFUL" } });

    let (status, ack) = send(&app.router, post_json("/webhook", payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "COMPLETED");
    assert_eq!(ack["import_id"], import_id.as_str());
    let first = app.store.get(&import_id).unwrap();

    let (status, _) = send(&app.router, post_json("/webhook", payload)).await;
    assert_eq!(status, StatusCode::OK);
    let second = app.store.get(&import_id).unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.message, second.message);
    assert_eq!(second.filename, "people.csv");

    let (_, record) = send(&app.router, get(&format!("/import-status/{}", import_id))).await;
    assert_eq!(record["status"], "COMPLETED");
}

#[tokio::test]
async fn webhook_for_unknown_import_creates_record() {
    let app = test_app();

    let (status, _) = send(
        &app.router,
        post_json("/webhook", json!({ "import_id": "external_7", "status": "FAILED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, record) = send(&app.router, get("/import-status/external_7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["status"], "FAILED");
    assert_eq!(record["error"], "Import failed");
}

#[tokio::test]
async fn invalid_webhook_is_400_without_mutation() {
    let app = test_app();

    for payload in [
        json!({ "status": "COMPLETED" }),
        json!({ "import_id": "imp_1" }),
        json!({ "data": { "status": "FAILED" } }),
        json!({ "import_id": "imp_1", "status": "TELEPORTED" }),
    ] {
        let (status, body) = send(&app.router, post_json("/webhook", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "validation_error");
    }

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn list_imports_returns_every_record() {
    let app = test_app();

    for (key, name) in [
        ("uploads/people.csv", "people.csv"),
        ("uploads/orders.csv", "orders.csv"),
    ] {
        let (status, _) = send(
            &app.router,
            post_json("/import-file", json!({ "s3_key": key, "filename": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app.router, get("/imports")).await;
    assert_eq!(status, StatusCode::OK);

    let mut names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["filename"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["orders.csv", "people.csv"]);
}

#[tokio::test]
async fn health_is_fixed_regardless_of_store() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    send(
        &app.router,
        post_json("/webhook", json!({ "import_id": "imp_9", "status": "PROCESSING" })),
    )
    .await;

    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn info_lists_endpoints() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "dromo-import");
    assert!(body["endpoints"]["POST /webhook"].is_string());

    let (status, _) = send(&app.router, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
}
