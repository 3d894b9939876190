use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(MenuItemId);

/// One dish on the menu as persisted by the store.
///
/// `price` is always a positive amount with at most two fractional digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: f64,
}

impl MenuItem {
    /// Price formatted the way the menu pages show it, e.g. `12.00`.
    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price)
    }
}
