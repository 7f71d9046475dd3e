//! HTTP-level tests for `/api/v1/results`.

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{create_test_router, post_user, send};

async fn post_result(router: &axum::Router, user_id: i64, value: serde_json::Value) -> i64 {
    let resp = send(
        router,
        Method::POST,
        "/api/v1/results",
        Some(json!({"result": value, "user_id": user_id, "time": "2020-01-01 00:00:00"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
    resp.body["result"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn create_round_trips_value_owner_and_time() {
    let router = create_test_router().await;
    let uid = post_user(&router, "alice").await;
    let rid = post_result(&router, uid, json!(42)).await;

    let resp = send(&router, Method::GET, &format!("/api/v1/results/{rid}"), None).await;
    assert_eq!(resp.status, StatusCode::OK);

    let result = &resp.body["result"];
    assert_eq!(result["id"], rid);
    assert_eq!(result["result"], 42);
    assert_eq!(result["user_id"]["id"], uid);
    assert_eq!(result["user_id"]["username"], "alice");
    assert!(result["user_id"].get("password").is_none());
    assert_eq!(result["time"], "2020-01-01T00:00:00Z");
}

#[tokio::test]
async fn create_with_missing_fields_is_422() {
    let router = create_test_router().await;
    let uid = post_user(&router, "alice").await;

    for body in [
        Some(json!({"user_id": uid, "time": "2020-01-01"})),
        Some(json!({"result": 1, "time": "2020-01-01"})),
        Some(json!({"result": 1, "user_id": uid})),
        Some(json!({"result": null, "user_id": uid, "time": "2020-01-01"})),
        None,
    ] {
        let resp = send(&router, Method::POST, "/api/v1/results", body).await;
        assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            resp.body,
            json!({"code": 422, "message": "Parameters result, user_id and time are required"})
        );
    }
}

#[tokio::test]
async fn create_for_unknown_user_is_400() {
    let router = create_test_router().await;

    let resp = send(
        &router,
        Method::POST,
        "/api/v1/results",
        Some(json!({"result": 1, "user_id": 999, "time": "2020-01-01"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"code": 400, "message": "User Id Not Found"}));
}

#[tokio::test]
async fn unparseable_time_falls_back_to_now() {
    let router = create_test_router().await;
    let uid = post_user(&router, "alice").await;

    let resp = send(
        &router,
        Method::POST,
        "/api/v1/results",
        Some(json!({"result": "x", "user_id": uid, "time": "not a date"})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let time = resp.body["result"]["time"].as_str().unwrap();
    let parsed = chrono::DateTime::parse_from_rfc3339(time).unwrap();
    assert!(parsed.timestamp() > 1_600_000_000);
}

#[tokio::test]
async fn list_and_list_by_user() {
    let router = create_test_router().await;
    let alice = post_user(&router, "alice").await;
    let bob = post_user(&router, "bob").await;

    let resp = send(&router, Method::GET, "/api/v1/results", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({"results": []}));

    post_result(&router, alice, json!(1)).await;
    post_result(&router, alice, json!(2)).await;
    post_result(&router, bob, json!(3)).await;

    let resp = send(&router, Method::GET, "/api/v1/results", None).await;
    assert_eq!(resp.body["results"].as_array().unwrap().len(), 3);

    let resp = send(
        &router,
        Method::GET,
        &format!("/api/v1/results/user/{alice}"),
        None,
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
    let values: Vec<_> = resp.body["user_results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["result"].clone())
        .collect();
    assert_eq!(values, [json!(1), json!(2)]);

    for uri in ["/api/v1/results/user/999", "/api/v1/results/user/abc"] {
        let resp = send(&router, Method::GET, uri, None).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, json!({"user_results": []}));
    }
}

#[tokio::test]
async fn partial_update_and_errors() {
    let router = create_test_router().await;
    let uid = post_user(&router, "alice").await;
    let rid = post_result(&router, uid, json!(42)).await;
    let uri = format!("/api/v1/results/{rid}");

    let resp = send(&router, Method::PUT, &uri, Some(json!({"result": 43}))).await;
    assert_eq!(resp.status, StatusCode::ACCEPTED);
    assert_eq!(resp.body["result"]["result"], 43);
    assert_eq!(resp.body["result"]["time"], "2020-01-01T00:00:00Z");

    let resp = send(&router, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        resp.body,
        json!({"code": 422, "message": "There must be at least one parameter"})
    );

    let resp = send(&router, Method::PUT, &uri, Some(json!({"user_id": 999}))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = send(
        &router,
        Method::PUT,
        "/api/v1/results/999",
        Some(json!({"result": 1})),
    )
    .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let router = create_test_router().await;
    let uid = post_user(&router, "alice").await;
    let rid = post_result(&router, uid, json!(42)).await;
    let uri = format!("/api/v1/results/{rid}");

    let resp = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = send(&router, Method::GET, &uri, None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_owner_cascades() {
    let router = create_test_router().await;
    let uid = post_user(&router, "alice").await;
    let rid = post_result(&router, uid, json!(42)).await;

    let resp = send(&router, Method::DELETE, &format!("/api/v1/users/{uid}"), None).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = send(&router, Method::GET, &format!("/api/v1/results/{rid}"), None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn options_report_allowed_methods() {
    let router = create_test_router().await;

    let resp = send(&router, Method::OPTIONS, "/api/v1/results", None).await;
    assert_eq!(resp.headers[header::ALLOW], "GET,POST");

    let resp = send(&router, Method::OPTIONS, "/api/v1/results/1", None).await;
    assert_eq!(resp.headers[header::ALLOW], "GET,PUT,DELETE");
    assert_eq!(resp.body, json!([]));
}
