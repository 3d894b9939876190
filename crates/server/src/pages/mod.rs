//! HTML form flow. Every POST answers with a redirect back to
//! `/edit-menu`, carrying `?error=<code>` when something went wrong.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use server_api::{add_menu_item, edit_menu_item, list_menu, load_menu_item, remove_menu_item};
use shared::{
    domain::MenuItemId,
    error::{ApiError, ErrorCode},
    normalize::RawPrice,
};
use tracing::error;

use crate::app_state::AppState;

mod render;

pub(crate) const MENU_PAGE: &str = "/edit-menu";

#[derive(Debug, Deserialize)]
struct MenuPageQuery {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemQuery {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddForm {
    dish: Option<String>,
    price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EditForm {
    id: Option<String>,
    dish: Option<String>,
    price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteForm {
    id: Option<String>,
}

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route(MENU_PAGE, get(menu_page))
        .route("/menu", post(add_item))
        .route("/menu/edit", get(edit_page).post(edit_item))
        .route("/menu/delete", post(delete_item))
}

async fn root() -> Redirect {
    Redirect::to(MENU_PAGE)
}

async fn menu_page(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MenuPageQuery>,
) -> Html<String> {
    let requested = q.error.as_deref().and_then(ErrorCode::from_code);
    match list_menu(&state.api).await {
        Ok(items) => Html(render::menu_page(&items, requested)),
        Err(err) => {
            error!(detail = %err.message, "failed to load menu page");
            Html(render::menu_page(&[], Some(ErrorCode::DatabaseError)))
        }
    }
}

async fn edit_page(State(state): State<Arc<AppState>>, Query(q): Query<ItemQuery>) -> Response {
    let Some(id) = parse_id(q.id.as_deref()) else {
        return redirect_with(ErrorCode::ItemNotFound);
    };
    match load_menu_item(&state.api, id).await {
        Ok(item) => Html(render::edit_page(&item)).into_response(),
        Err(err) => redirect_with_error(err),
    }
}

async fn add_item(State(state): State<Arc<AppState>>, Form(form): Form<AddForm>) -> Response {
    let dish = form.dish.as_deref().unwrap_or_default();
    let price = RawPrice::from(form.price.as_deref());
    match add_menu_item(&state.api, dish, price).await {
        Ok(_) => Redirect::to(MENU_PAGE).into_response(),
        Err(err) => redirect_with_error(err),
    }
}

async fn edit_item(State(state): State<Arc<AppState>>, Form(form): Form<EditForm>) -> Response {
    let Some(id) = parse_id(form.id.as_deref()) else {
        return redirect_with(ErrorCode::ItemNotFound);
    };
    let dish = form.dish.as_deref().unwrap_or_default();
    let price = RawPrice::from(form.price.as_deref());
    match edit_menu_item(&state.api, id, dish, price).await {
        Ok(_) => Redirect::to(MENU_PAGE).into_response(),
        Err(err) => redirect_with_error(err),
    }
}

async fn delete_item(State(state): State<Arc<AppState>>, Form(form): Form<DeleteForm>) -> Response {
    let Some(id) = parse_id(form.id.as_deref()) else {
        return redirect_with(ErrorCode::ItemNotFound);
    };
    match remove_menu_item(&state.api, id).await {
        Ok(_) => Redirect::to(MENU_PAGE).into_response(),
        Err(err) => redirect_with_error(err),
    }
}

fn parse_id(raw: Option<&str>) -> Option<MenuItemId> {
    raw?.trim().parse::<i64>().ok().map(MenuItemId)
}

fn redirect_with_error(err: ApiError) -> Response {
    let code = match err.code {
        ErrorCode::NotFound => ErrorCode::ItemNotFound,
        ErrorCode::DatabaseError => {
            error!(detail = %err.message, "menu page storage failure");
            ErrorCode::DatabaseError
        }
        other => other,
    };
    redirect_with(code)
}

fn redirect_with(code: ErrorCode) -> Response {
    Redirect::to(&format!("{MENU_PAGE}?error={code}")).into_response()
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
