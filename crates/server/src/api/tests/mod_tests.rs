use super::*;
use axum::{
    body::{self, Body},
    http::Request,
    response::Response,
};
use server_api::ApiContext;
use storage::Storage;
use tower::ServiceExt;

async fn test_app() -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let state = Arc::new(AppState {
        api: ApiContext::new(storage.clone()),
    });
    (routes().with_state(state), storage)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn lists_seeded_menu_in_id_order() {
    let (app, _storage) = test_app().await;
    let request = Request::get("/api/menu").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body: MenuListResponse = serde_json::from_value(json_body(response).await).expect("dto");
    assert!(body.success);
    let names: Vec<_> = body.menu_items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Spaghetti Bolognese", "Caesar Salad"]);
}

#[tokio::test]
async fn post_adds_item_from_string_or_number_price() {
    let (app, storage) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/menu",
            serde_json::json!({ "dish": "  Pizza ", "price": "$12.50" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["menuItem"]["name"], "Pizza");
    assert_eq!(body["menuItem"]["price"], 12.5);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/menu",
            serde_json::json!({ "dish": "Soup", "price": 4 }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(storage.count_menu_items().await.expect("count"), 4);
}

#[tokio::test]
async fn post_rejects_invalid_input_with_codes() {
    let (app, storage) = test_app().await;
    let cases = [
        (serde_json::json!({ "dish": " ", "price": "10" }), "name_missing"),
        (serde_json::json!({ "price": "10" }), "name_missing"),
        (serde_json::json!({ "dish": 7, "price": "10" }), "name_missing"),
        (serde_json::json!({ "dish": "Pizza", "price": "abc" }), "invalid_price"),
        (serde_json::json!({ "dish": "Pizza", "price": "$" }), "invalid_price"),
        (serde_json::json!({ "dish": "Pizza" }), "invalid_price"),
        (serde_json::json!({ "dish": "Pizza", "price": true }), "invalid_price"),
        (serde_json::json!({ "dish": "Pizza", "price": 0 }), "negative_price"),
        (serde_json::json!({ "dish": "Pizza", "price": "-3" }), "negative_price"),
    ];

    for (payload, code) in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/menu", payload.clone()))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], code, "{payload}");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    assert_eq!(storage.count_menu_items().await.expect("count"), 2);
}

#[tokio::test]
async fn put_updates_existing_item_in_place() {
    let (app, storage) = test_app().await;
    let item = storage
        .insert_menu_item("Spaghetti Bolognese", 12.0)
        .await
        .expect("insert");

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/menu/{}", item.id),
            serde_json::json!({ "dish": "Spaghetti", "price": 13.5 }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body: MenuItemResponse = serde_json::from_value(json_body(response).await).expect("dto");
    assert_eq!(body.menu_item.id, item.id);
    assert_eq!(body.menu_item.name, "Spaghetti");
    assert_eq!(body.menu_item.price, 13.5);
}

#[tokio::test]
async fn put_on_missing_item_is_not_found() {
    let (app, _storage) = test_app().await;
    for uri in ["/api/menu/9999", "/api/menu/abc"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                uri,
                serde_json::json!({ "dish": "X", "price": 1 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json_body(response).await["error"], "not_found");
    }
}

#[tokio::test]
async fn put_validates_before_not_found() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/menu/9999",
            serde_json::json!({ "dish": "X", "price": "-1" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "negative_price");
}

#[tokio::test]
async fn delete_returns_row_then_not_found() {
    let (app, storage) = test_app().await;
    let item = storage
        .insert_menu_item("Gelato", 4.0)
        .await
        .expect("insert");
    let uri = format!("/api/menu/{}", item.id);

    let request = Request::delete(&uri).body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["menuItem"]["name"], "Gelato");

    let request = Request::delete(&uri).body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Menu item ikke fundet");
}

#[tokio::test]
async fn storage_failure_is_database_error() {
    let (app, storage) = test_app().await;
    storage.close().await;

    let request = Request::get("/api/menu").body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "database_error");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/menu",
            serde_json::json!({ "dish": "Pizza", "price": "9" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "database_error");
    assert_eq!(body["message"], "Database fejl");
}
