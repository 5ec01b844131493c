use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tower::ServiceExt;

use packbay::server::router::{RegistryState, registry_router};
use packbay::store::StoreHandle;

async fn test_app() -> (Router, StoreHandle) {
    let store = packbay::store::spawn().await;
    let state = RegistryState::new(store.clone(), &BTreeMap::new());
    (registry_router(state), store)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = serde_json::from_slice(&bytes).expect("response body was not JSON");
    (status, value)
}

#[tokio::test]
async fn update_release_route_resolution_and_validation() {
    let (app, store) = test_app().await;

    // 1. No selector at all -> 404 package_release_not_found
    let (status, body) = post_json(
        &app,
        "/api/package_releases/update",
        json!({ "is_locked": true }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "package_release_not_found");

    // 2. Unresolvable name@version with an empty delta -> still 404 (resolution first)
    let (status, body) = post_json(
        &app,
        "/api/package_releases/update",
        json!({ "package_name_with_version": "ghost@0.0.1" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "package_release_not_found");

    let pkg = store.insert_package("foo", None).await.expect("insert package");
    let r1 = store
        .insert_release(&pkg.package_id, "1.0.0")
        .await
        .expect("insert release");

    // 3. Resolvable release with an empty delta -> 400 no_fields_provided
    let (status, body) = post_json(
        &app,
        "/api/package_releases/update",
        json!({ "package_release_id": r1.package_release_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "no_fields_provided");
    assert_eq!(body["message"], "No fields provided to update");

    // 4. Sparse merge: only present fields overwrite
    let (status, body) = post_json(
        &app,
        "/api/package_releases/update",
        json!({
            "package_name_with_version": "foo@1.0.0",
            "license": "MIT"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let r1_now = store
        .get_release(&r1.package_release_id)
        .await
        .expect("get release")
        .expect("release exists");
    assert_eq!(r1_now.license.as_deref(), Some("MIT"));
    assert!(!r1_now.is_locked, "untouched fields keep their values");

    // 5. Malformed JSON -> 400 with our error body shape
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/package_releases/update")
                .header("content-type", "application/json")
                .body(Body::from("not-json"))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body: Value = serde_json::from_slice(&bytes).expect("error body was not JSON");
    assert_eq!(body["error_code"], "invalid_request_body");
}

#[tokio::test]
async fn update_release_route_enforces_single_latest() {
    let (app, store) = test_app().await;

    let pkg = store.insert_package("foo", None).await.expect("insert package");
    let r1 = store
        .insert_release(&pkg.package_id, "1.0.0")
        .await
        .expect("insert release");
    let r2 = store
        .insert_release(&pkg.package_id, "2.0.0")
        .await
        .expect("insert release");

    // Unrelated package: its latest flag must never be touched by foo's fanout.
    let other = store.insert_package("unrelated", None).await.expect("insert package");
    let other_r = store
        .insert_release(&other.package_id, "1.0.0")
        .await
        .expect("insert release");
    let (status, _) = post_json(
        &app,
        "/api/package_releases/update",
        json!({ "package_release_id": other_r.package_release_id, "is_latest": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Promote r1, then r2 via name@version
    let (status, _) = post_json(
        &app,
        "/api/package_releases/update",
        json!({ "package_release_id": r1.package_release_id, "is_latest": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/api/package_releases/update",
        json!({ "package_name_with_version": "foo@2.0.0", "is_latest": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let r1_now = store
        .get_release(&r1.package_release_id)
        .await
        .expect("get release")
        .expect("release exists");
    let r2_now = store
        .get_release(&r2.package_release_id)
        .await
        .expect("get release")
        .expect("release exists");
    assert!(!r1_now.is_latest, "previous latest sibling demoted");
    assert!(r2_now.is_latest);

    // Demoting r2 must not re-promote anything
    let (status, _) = post_json(
        &app,
        "/api/package_releases/update",
        json!({ "package_release_id": r2.package_release_id, "is_latest": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let releases = store
        .list_releases(&pkg.package_id)
        .await
        .expect("list releases");
    assert!(releases.iter().all(|r| !r.is_latest));

    let other_now = store
        .get_release(&other_r.package_release_id)
        .await
        .expect("get release")
        .expect("release exists");
    assert!(other_now.is_latest, "fanout stays within the package");
}

#[tokio::test]
async fn update_release_route_ai_review_stub() {
    let (app, store) = test_app().await;

    let pkg = store.insert_package("foo", None).await.expect("insert package");
    let r1 = store
        .insert_release(&pkg.package_id, "1.0.0")
        .await
        .expect("insert release");

    let (status, _) = post_json(
        &app,
        "/api/package_releases/update",
        json!({ "package_release_id": r1.package_release_id, "ai_review_requested": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let r1_now = store
        .get_release(&r1.package_release_id)
        .await
        .expect("get release")
        .expect("release exists");
    assert_eq!(
        r1_now.ai_review_text.as_deref(),
        Some("Placeholder AI Review Text")
    );
}
