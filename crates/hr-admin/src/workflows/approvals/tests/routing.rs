use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

#[tokio::test]
async fn open_route_returns_progress_view() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let body = serde_json::to_value(request()).expect("request serializes");
    let response = router
        .oneshot(post_json("/api/v1/approvals", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["approval_id"], json!("apr-000001"));
    assert_eq!(payload["status"], json!("pending"));
    assert_eq!(payload["candidate_status"], json!("approval_pending"));
    assert_eq!(payload["current_level"], json!(1));
    assert_eq!(payload["current_title"], json!("Assistant Manager HR"));
    assert_eq!(payload["timeline"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn open_route_rejects_short_approver_list() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let mut body = serde_json::to_value(request()).expect("request serializes");
    body["approver_emails"] = json!(["amhr@example.com"]);
    let response = router
        .oneshot(post_json("/api/v1/approvals", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approve_route_advances_and_reject_route_closes() {
    let (service, _) = build_service();
    let approval = service.open(request()).expect("opens");
    let router = router_with_service(service);
    let base = format!("/api/v1/approvals/{}", approval.id.0);

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("{base}/approve"),
            &json!({ "approver_email": APPROVERS[0], "comments": "strong interview" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], json!("in_progress"));
    assert_eq!(payload["current_title"], json!("Manager HR"));
    assert_eq!(payload["timeline"][0]["comments"], json!("strong interview"));

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("{base}/reject"),
            &json!({ "approver_email": APPROVERS[1] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["candidate_status"], json!("rejected"));

    let response = router
        .oneshot(post_json(
            &format!("{base}/approve"),
            &json!({ "approver_email": APPROVERS[2] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn approve_route_forbids_other_approvers() {
    let (service, _) = build_service();
    let approval = service.open(request()).expect("opens");
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/approvals/{}/approve", approval.id.0),
            &json!({ "approver_email": "intruder@example.com" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("level 1"));
}

#[tokio::test]
async fn progress_route_returns_not_found_for_unknown_id() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/approvals/apr-999999")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
