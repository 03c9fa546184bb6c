use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use elibrary::api;
use elibrary::db;
use elibrary::infrastructure::AppState;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test app state
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

async fn call(app: &Router, method: &str, query: &str, body: Body) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(format!("/library/api.php?{}", query))
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn json_body(payload: Value) -> Body {
    Body::from(serde_json::to_vec(&payload).unwrap())
}

async fn book_count(db: &DatabaseConnection) -> u64 {
    elibrary::models::book::Entity::find()
        .count(db)
        .await
        .unwrap()
}

async fn create_book(app: &Router) -> i64 {
    let (status, json) = call(
        app,
        "POST",
        "action=create",
        json_body(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_get_book_not_found() {
    let state = setup_test_state().await;
    let app = api::api_router(state);

    let (status, json) = call(&app, "GET", "action=get&id=999", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"success": false, "error": "Book not found"}));

    // Ids that are not integers never match
    let (status, _) = call(&app, "GET", "action=get&id=1%27%20OR%20%271%27=%271", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_book_invalid_input() {
    let state = setup_test_state().await;
    let db = state.db().clone();
    let app = api::api_router(state);

    // Test Invalid JSON
    let (status, json) = call(&app, "POST", "action=create", Body::from("invalid json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid JSON data");

    // Missing author, blank title
    for payload in [
        json!({"title": "Dune"}),
        json!({"author": "Herbert"}),
        json!({"title": "", "author": "Herbert"}),
    ] {
        let (status, json) = call(&app, "POST", "action=create", json_body(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Title and Author are required");
    }

    assert_eq!(book_count(&db).await, 0);
}

#[tokio::test]
async fn test_update_book_errors() {
    let state = setup_test_state().await;
    let app = api::api_router(state);
    let id = create_book(&app).await;

    // Non-existent book
    let (status, json) = call(
        &app,
        "POST",
        "action=update&id=999",
        json_body(json!({"title": "Non-existent Book"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Book not found");

    // Missing id wins over an empty payload
    let (status, json) = call(&app, "POST", "action=update&id=999", json_body(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Book not found");

    // Nothing to update
    let (status, json) = call(&app, "POST", &format!("action=update&id={}", id), json_body(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No fields to update");

    // Malformed body
    let (status, json) = call(&app, "POST", &format!("action=update&id={}", id), Body::from("{")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid JSON data");

    // Blanking a required field
    let (status, _) = call(
        &app,
        "POST",
        &format!("action=update&id={}", id),
        json_body(json!({"author": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = call(&app, "GET", &format!("action=get&id={}", id), Body::empty()).await;
    assert_eq!(json["data"]["title"], "Dune");
    assert_eq!(json["data"]["author"], "Herbert");
}

#[tokio::test]
async fn test_delete_missing_book_leaves_catalog_unchanged() {
    let state = setup_test_state().await;
    let db = state.db().clone();
    let app = api::api_router(state);
    create_book(&app).await;

    let (status, json) = call(&app, "DELETE", "action=delete&id=999", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Book not found");
    assert_eq!(book_count(&db).await, 1);
}

#[tokio::test]
async fn test_invalid_endpoints() {
    let state = setup_test_state().await;
    let app = api::api_router(state);

    for (method, query) in [
        ("GET", ""),
        ("GET", "action=unknown"),
        ("GET", "action=get"),
        ("POST", "action=update"),
        ("POST", "action=list"),
        ("GET", "action=create"),
        ("DELETE", "action=delete"),
        ("PUT", "action=update&id=1"),
    ] {
        let (status, json) = call(&app, method, query, Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, query);
        assert_eq!(json, json!({"success": false, "error": "Invalid endpoint"}));
    }
}

#[tokio::test]
async fn test_store_failure_reports_500() {
    let state = setup_test_state().await;
    let db = state.db().clone();
    let app = api::api_router(state);

    db.execute_unprepared("DROP TABLE books").await.unwrap();

    let (status, json) = call(&app, "GET", "action=list", Body::empty()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().starts_with("Failed to fetch books"));

    let (status, json) = call(
        &app,
        "POST",
        "action=create",
        json_body(json!({"title": "Dune", "author": "Herbert"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().starts_with("Failed to create book"));
}
