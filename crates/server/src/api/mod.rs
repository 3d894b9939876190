//! JSON API under `/api/menu`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use server_api::{add_menu_item, edit_menu_item, list_menu, remove_menu_item};
use shared::{
    domain::MenuItemId,
    error::{ApiError, ErrorCode},
    protocol::{ErrorResponse, MenuItemPayload, MenuItemResponse, MenuListResponse},
};
use tracing::error;

use crate::{app_state::AppState, messages::api_message};

type ApiFailure = (StatusCode, Json<ErrorResponse>);

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/menu", get(http_list_menu).post(http_add_menu_item))
        .route(
            "/api/menu/:id",
            put(http_edit_menu_item).delete(http_remove_menu_item),
        )
}

async fn http_list_menu(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MenuListResponse>, ApiFailure> {
    let items = list_menu(&state.api).await.map_err(failure)?;
    Ok(Json(MenuListResponse::ok(items)))
}

async fn http_add_menu_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MenuItemPayload>,
) -> Result<Json<MenuItemResponse>, ApiFailure> {
    let item = add_menu_item(&state.api, req.dish(), req.price())
        .await
        .map_err(failure)?;
    Ok(Json(MenuItemResponse::ok(item)))
}

async fn http_edit_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<MenuItemPayload>,
) -> Result<Json<MenuItemResponse>, ApiFailure> {
    let id = parse_id(&id)?;
    let item = edit_menu_item(&state.api, id, req.dish(), req.price())
        .await
        .map_err(failure)?;
    Ok(Json(MenuItemResponse::ok(item)))
}

async fn http_remove_menu_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MenuItemResponse>, ApiFailure> {
    let id = parse_id(&id)?;
    let item = remove_menu_item(&state.api, id).await.map_err(failure)?;
    Ok(Json(MenuItemResponse::ok(item)))
}

// An id that cannot name a row is reported like any other missing row.
fn parse_id(raw: &str) -> Result<MenuItemId, ApiFailure> {
    raw.trim().parse::<i64>().map(MenuItemId).map_err(|_| {
        failure(ApiError::new(
            ErrorCode::NotFound,
            format!("menu item id '{raw}' is not a number"),
        ))
    })
}

fn failure(err: ApiError) -> ApiFailure {
    let code = match err.code {
        ErrorCode::ItemNotFound => ErrorCode::NotFound,
        other => other,
    };
    let status = if code.is_validation() {
        StatusCode::BAD_REQUEST
    } else if code.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        error!(detail = %err.message, "menu api storage failure");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(code, api_message(code))))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
