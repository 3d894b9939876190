use serde::{Deserialize, Serialize};

use crate::{
    domain::MenuItem,
    error::{ApiError, ErrorCode},
    normalize::RawPrice,
};

/// Body of `POST /api/menu` and `PUT /api/menu/{id}`.
///
/// Both fields are kept as loose JSON so that a wrong type is reported as a
/// validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemPayload {
    #[serde(default)]
    pub dish: Option<serde_json::Value>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
}

impl MenuItemPayload {
    pub fn new(dish: impl Into<String>, price: serde_json::Value) -> Self {
        Self {
            dish: Some(serde_json::Value::String(dish.into())),
            price: Some(price),
        }
    }

    /// The dish name if it was sent as a JSON string, otherwise empty.
    pub fn dish(&self) -> &str {
        self.dish
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
    }

    pub fn price(&self) -> RawPrice<'_> {
        self.price.as_ref().map_or(RawPrice::Missing, RawPrice::from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuListResponse {
    pub success: bool,
    pub menu_items: Vec<MenuItem>,
}

impl MenuListResponse {
    pub fn ok(menu_items: Vec<MenuItem>) -> Self {
        Self {
            success: true,
            menu_items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub success: bool,
    pub menu_item: MenuItem,
}

impl MenuItemResponse {
    pub fn ok(menu_item: MenuItem) -> Self {
        Self {
            success: true,
            menu_item,
        }
    }
}

/// Failure body of every JSON endpoint: `{success: false, error, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error,
            message: message.into(),
        }
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(value: ApiError) -> Self {
        Self::new(value.code, value.message)
    }
}
