use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use thiserror::Error;
use tracing::{error, info};

use shared::domain::{MenuItem, MenuItemId};

/// Rows inserted when the menu table is found empty at startup.
pub const SEED_MENU: [(&str, i64); 2] = [("Spaghetti Bolognese", 1200), ("Caesar Salad", 900)];

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Any failure of the persistence layer. Callers report all variants the
/// same way: storage is unavailable.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database operation failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("price {0} does not fit the price column")]
    PriceOutOfRange(f64),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl Storage {
    /// Opens the database and makes sure the menu table exists and is seeded.
    pub async fn new(database_url: &str) -> Result<Self> {
        let storage = Self::connect(database_url, &PoolSettings::default()).await?;
        storage
            .ensure_schema_and_seed()
            .await
            .context("failed to initialize menu_items table")?;
        Ok(storage)
    }

    /// Opens a pool without touching the schema.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url '{database_url}'"))?
            .create_if_missing(true);

        // An in-memory database vanishes with its last connection.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new().min_connections(1).idle_timeout(None::<Duration>)
        } else {
            SqlitePoolOptions::new().idle_timeout(settings.idle_timeout)
        };
        let pool = pool_options
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to connect to '{database_url}'"))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("menu database pool closed");
    }

    /// Creates `menu_items` when missing and inserts the seed rows when the
    /// table is empty. Returns whether seed rows were written.
    ///
    /// Safe to run on every start: the seed only goes in after an emptiness
    /// probe, so existing rows are never duplicated.
    pub async fn ensure_schema_and_seed(&self) -> StorageResult<bool> {
        let mut tx = self.pool.begin().await.map_err(failed("begin_init"))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_items (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                price_cents INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(failed("create_table"))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&mut *tx)
            .await
            .map_err(failed("count"))?;

        let seeded = count == 0;
        if seeded {
            for (name, price_cents) in SEED_MENU {
                sqlx::query("INSERT INTO menu_items (name, price_cents) VALUES (?, ?)")
                    .bind(name)
                    .bind(price_cents)
                    .execute(&mut *tx)
                    .await
                    .map_err(failed("seed"))?;
            }
        }

        tx.commit().await.map_err(failed("commit_init"))?;
        if seeded {
            info!(rows = SEED_MENU.len(), "default menu items inserted");
        }
        Ok(seeded)
    }

    pub async fn count_menu_items(&self) -> StorageResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await
            .map_err(failed("count"))?;
        Ok(count)
    }

    pub async fn list_menu_items(&self) -> StorageResult<Vec<MenuItem>> {
        let rows = sqlx::query("SELECT id, name, price_cents FROM menu_items ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(failed("list"))?;
        rows.iter()
            .map(menu_item_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(failed("list"))
    }

    pub async fn get_menu_item(&self, id: MenuItemId) -> StorageResult<Option<MenuItem>> {
        let row = sqlx::query("SELECT id, name, price_cents FROM menu_items WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(failed("get"))?;
        row.as_ref()
            .map(menu_item_from_row)
            .transpose()
            .map_err(failed("get"))
    }

    /// Stores a new item. The caller is expected to have normalized `name`
    /// and `price`; only the column types are enforced here.
    pub async fn insert_menu_item(&self, name: &str, price: f64) -> StorageResult<MenuItem> {
        let price_cents = price_to_cents(price)?;
        let row = sqlx::query(
            "INSERT INTO menu_items (name, price_cents) VALUES (?, ?)
             RETURNING id, name, price_cents",
        )
        .bind(name)
        .bind(price_cents)
        .fetch_one(&self.pool)
        .await
        .map_err(failed("insert"))?;
        menu_item_from_row(&row).map_err(failed("insert"))
    }

    /// Overwrites name and price of an existing item. `None` when no row has
    /// this id.
    pub async fn update_menu_item(
        &self,
        id: MenuItemId,
        name: &str,
        price: f64,
    ) -> StorageResult<Option<MenuItem>> {
        let price_cents = price_to_cents(price)?;
        let row = sqlx::query(
            "UPDATE menu_items SET name = ?, price_cents = ? WHERE id = ?
             RETURNING id, name, price_cents",
        )
        .bind(name)
        .bind(price_cents)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(failed("update"))?;
        row.as_ref()
            .map(menu_item_from_row)
            .transpose()
            .map_err(failed("update"))
    }

    /// Removes an item and returns it as it was just before deletion.
    pub async fn delete_menu_item(&self, id: MenuItemId) -> StorageResult<Option<MenuItem>> {
        let row = sqlx::query(
            "DELETE FROM menu_items WHERE id = ?
             RETURNING id, name, price_cents",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(failed("delete"))?;
        row.as_ref()
            .map(menu_item_from_row)
            .transpose()
            .map_err(failed("delete"))
    }
}

fn failed(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |error| {
        error!(operation, %error, "menu item query failed");
        StorageError::Database(error)
    }
}

fn menu_item_from_row(row: &SqliteRow) -> std::result::Result<MenuItem, sqlx::Error> {
    Ok(MenuItem {
        id: MenuItemId(row.try_get::<i64, _>("id")?),
        name: row.try_get::<String, _>("name")?,
        price: cents_to_price(row.try_get::<i64, _>("price_cents")?),
    })
}

fn price_to_cents(price: f64) -> StorageResult<i64> {
    let cents = (price * 100.0).round();
    if !cents.is_finite() || cents >= i64::MAX as f64 || cents <= i64::MIN as f64 {
        error!(price, "price does not fit the price column");
        return Err(StorageError::PriceOutOfRange(price));
    }
    Ok(cents as i64)
}

fn cents_to_price(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
