use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt as _;

async fn app() -> Router {
    let pool = lotto_server::build_pool(":memory:", 1).unwrap();
    lotto_server::service::ensure_default_categories(&pool)
        .await
        .unwrap();
    lotto_server::build_router(pool, &["http://localhost:3000".to_owned()])
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, name: &str) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"username": name, "email": format!("{name}@example.com")})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_reports_database() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "UP");
    assert_eq!(body["data"]["database"], "UP");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/api/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/{game}/ticket"].is_object(), "{body}");
}

#[tokio::test]
async fn unknown_game_is_not_found() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/api/v1/keno/draw", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["status"], 404);
}

#[tokio::test]
async fn duplicate_user_conflicts() {
    let app = app().await;
    register(&app, "alice").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({"username": "alice", "email": "other@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invalid_ticket_lists_every_violation() {
    let app = app().await;
    let user_id = register(&app, "bob").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/mega/ticket",
        Some(json!({"user_id": user_id, "numbers": [1, 1, 46]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let errors = body["error"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3, "{body}");
    assert!(errors.iter().all(|e| e["field"] == "numbers"));
}

#[tokio::test]
async fn categories_come_in_precedence_order() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/api/v1/power/categories", None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Jackpot 1", "Jackpot 2", "First", "Second", "Third"]);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/mega/categories",
        Some(json!({"name": "Bonus", "match_count": 2, "include_bonus": true})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn publish_settle_and_read_results() {
    let app = app().await;
    let user_id = register(&app, "carol").await;

    let (status, ticket) = call(
        &app,
        Method::POST,
        "/api/v1/mega/ticket",
        Some(json!({"user_id": user_id, "numbers": [6, 5, 4, 3, 2, 1]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{ticket}");
    assert_eq!(ticket["data"]["numbers"], json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(ticket["data"]["drawing_id"], Value::Null);
    let ticket_id = ticket["data"]["id"].as_i64().unwrap();

    let (status, published) = call(
        &app,
        Method::POST,
        "/api/v1/mega/draw",
        Some(json!({"draw_time": "2099-01-01T18:00:00", "numbers": [1, 2, 3, 7, 8, 9]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{published}");
    assert_eq!(published["data"]["attached_tickets"], 1);
    let drawing_id = published["data"]["drawing"]["id"].as_i64().unwrap();

    // same game and time again
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/mega/draw",
        Some(json!({"draw_time": "2099-01-01T18:00:00", "numbers": [1, 2, 3, 4, 5, 6]})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&app, Method::GET, &format!("/api/v1/tickets/{ticket_id}/result"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let settle_uri = format!("/api/v1/mega/draw/{drawing_id}/settle");
    let (status, report) = call(&app, Method::POST, &settle_uri, None).await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["data"]["settled"], 1);
    assert_eq!(report["data"]["winners"], 1);
    assert_eq!(report["data"]["total_awarded"], 30_000);

    let (_, again) = call(&app, Method::POST, &settle_uri, None).await;
    assert_eq!(again["data"]["settled"], 0);
    assert_eq!(again["data"]["already_settled"], 1);
    assert_eq!(again["data"]["total_awarded"], 0);

    let (status, result) = call(&app, Method::GET, &format!("/api/v1/tickets/{ticket_id}/result"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["data"]["matched_numbers"], json!([1, 2, 3]));
    assert_eq!(result["data"]["matched_bonus"], false);
    assert_eq!(result["data"]["prize_amount"], 30_000);

    let (_, results) = call(&app, Method::GET, &format!("/api/v1/drawings/{drawing_id}/results"), None).await;
    assert_eq!(results["data"].as_array().map(Vec::len), Some(1));

    // published drawings take no more tickets
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/mega/ticket",
        Some(json!({"user_id": user_id, "numbers": [1, 2, 3, 4, 5, 6], "drawing_id": drawing_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, latest) = call(&app, Method::GET, "/api/v1/mega/draw", None).await;
    assert_eq!(latest["data"]["id"], drawing_id);
}

#[tokio::test]
async fn generated_power_drawing_and_attach() {
    let app = app().await;
    let user_id = register(&app, "dave").await;

    let (status, published) = call(
        &app,
        Method::POST,
        "/api/v1/power/draw",
        Some(json!({"draw_time": "2099-02-01T18:00:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{published}");
    let drawing = &published["data"]["drawing"];
    assert_eq!(drawing["numbers"].as_array().map(Vec::len), Some(6));
    assert!(drawing["bonus_number"].is_i64());
    let drawing_id = drawing["id"].as_i64().unwrap();

    let (_, ticket) = call(
        &app,
        Method::POST,
        "/api/v1/mega/ticket",
        Some(json!({"user_id": user_id, "numbers": [1, 2, 3, 4, 5, 6]})),
    )
    .await;
    let ticket_id = ticket["data"]["id"].as_i64().unwrap();

    // mega ticket, power drawing
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/v1/tickets/{ticket_id}/drawing"),
        Some(json!({"drawing_id": drawing_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, draws) = call(&app, Method::GET, "/api/v1/power/draws?limit=500", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draws["data"].as_array().map(Vec::len), Some(1));

    let (_, tickets) = call(&app, Method::GET, &format!("/api/v1/users/{user_id}/tickets"), None).await;
    assert_eq!(tickets["data"][0]["id"], ticket_id);
}

#[tokio::test]
async fn update_user_profile() {
    let app = app().await;
    let user_id = register(&app, "erin").await;
    register(&app, "frank").await;

    let uri = format!("/api/v1/users/{user_id}");
    let (status, body) = call(&app, Method::PUT, &uri, Some(json!({"email": "Erin@Example.org"}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["email"], "erin@example.org");
    assert_eq!(body["data"]["username"], "erin");

    let (status, _) = call(&app, Method::PUT, &uri, Some(json!({"username": "frank"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&app, Method::GET, "/api/v1/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn preflight(app: &Router, origin: &str) -> axum::http::Response<Body> {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/mega/ticket")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let app = app().await;

    let allowed = preflight(&app, "http://localhost:3000").await;
    assert!(allowed.status().is_success());
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    let methods = allowed.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_owned();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "{methods}");
    }

    let denied = preflight(&app, "http://evil.example").await;
    assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
