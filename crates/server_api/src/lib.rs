//! Menu operations shared by the HTML pages and the JSON API.
//!
//! Every mutating call normalizes its raw input first; only a normalized
//! item reaches storage. All outcomes come back as [`ApiError`] codes so the
//! two transports can present them however they like.

use shared::{
    domain::{MenuItem, MenuItemId},
    error::{ApiError, ErrorCode},
    normalize::{normalize, RawPrice},
};
use storage::{Storage, StorageError};
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

impl ApiContext {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

pub async fn list_menu(ctx: &ApiContext) -> Result<Vec<MenuItem>, ApiError> {
    ctx.storage.list_menu_items().await.map_err(unavailable)
}

pub async fn load_menu_item(ctx: &ApiContext, id: MenuItemId) -> Result<MenuItem, ApiError> {
    ctx.storage
        .get_menu_item(id)
        .await
        .map_err(unavailable)?
        .ok_or_else(|| not_found(id))
}

pub async fn add_menu_item(
    ctx: &ApiContext,
    raw_name: &str,
    raw_price: RawPrice<'_>,
) -> Result<MenuItem, ApiError> {
    let input = normalize(raw_name, raw_price).map_err(rejected)?;
    let item = ctx
        .storage
        .insert_menu_item(&input.name, input.price)
        .await
        .map_err(unavailable)?;
    info!(id = %item.id, name = %item.name, price = item.price, "menu item added");
    Ok(item)
}

pub async fn edit_menu_item(
    ctx: &ApiContext,
    id: MenuItemId,
    raw_name: &str,
    raw_price: RawPrice<'_>,
) -> Result<MenuItem, ApiError> {
    let input = normalize(raw_name, raw_price).map_err(rejected)?;
    let item = ctx
        .storage
        .update_menu_item(id, &input.name, input.price)
        .await
        .map_err(unavailable)?
        .ok_or_else(|| not_found(id))?;
    info!(id = %item.id, name = %item.name, price = item.price, "menu item updated");
    Ok(item)
}

pub async fn remove_menu_item(ctx: &ApiContext, id: MenuItemId) -> Result<MenuItem, ApiError> {
    let item = ctx
        .storage
        .delete_menu_item(id)
        .await
        .map_err(unavailable)?
        .ok_or_else(|| not_found(id))?;
    info!(id = %item.id, name = %item.name, "menu item deleted");
    Ok(item)
}

fn rejected(err: shared::normalize::ValidationError) -> ApiError {
    warn!(code = %err.code(), "menu item input rejected");
    ApiError::from(err)
}

fn not_found(id: MenuItemId) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("menu item {id} not found"))
}

fn unavailable(err: StorageError) -> ApiError {
    ApiError::new(ErrorCode::DatabaseError, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
