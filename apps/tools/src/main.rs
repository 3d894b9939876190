use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{domain::MenuItem, error::ErrorCode, normalize::normalize};
use storage::{PoolSettings, Storage};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PROBE_DISH: &str = "menuctl probe";

#[derive(Parser, Debug)]
#[command(name = "menuctl", about = "Menu database administration")]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/menu.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the menu table and seed it when empty.
    Init,
    /// Print every menu item.
    List,
    /// Validate and insert a menu item.
    Add {
        dish: String,
        #[arg(allow_hyphen_values = true)]
        price: String,
    },
    /// Ping, initialize, then write and remove a probe item.
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = Storage::connect(&cli.database_url, &PoolSettings::default()).await?;
    let outcome = run(&storage, cli.command).await;
    storage.close().await;
    match outcome? {
        None => Ok(ExitCode::SUCCESS),
        Some(code) => {
            eprintln!("error: {code}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Returns the rejection code when the input failed validation.
async fn run(storage: &Storage, command: Command) -> Result<Option<ErrorCode>> {
    match command {
        Command::Init => {
            let seeded = storage.ensure_schema_and_seed().await?;
            let count = storage.count_menu_items().await?;
            info!(seeded, count, "menu table ready");
            println!("menu_items rows={count} seeded={seeded}");
        }
        Command::List => {
            storage.ensure_schema_and_seed().await?;
            print_items(&storage.list_menu_items().await?);
        }
        Command::Add { dish, price } => {
            let item = match normalize(&dish, price.as_str()) {
                Ok(item) => item,
                Err(rejection) => {
                    warn!(code = %rejection.code(), %rejection, "menu item rejected");
                    return Ok(Some(rejection.code()));
                }
            };
            storage.ensure_schema_and_seed().await?;
            let created = storage.insert_menu_item(&item.name, item.price).await?;
            println!("created {}", format_item(&created));
        }
        Command::Check => check(storage).await?,
    }
    Ok(None)
}

async fn check(storage: &Storage) -> Result<()> {
    storage.health_check().await?;
    println!("ping ok");

    storage
        .ensure_schema_and_seed()
        .await
        .context("schema initialization failed")?;
    println!("schema ok");

    let probe = storage
        .insert_menu_item(PROBE_DISH, 1.0)
        .await
        .context("probe insert failed")?;
    println!("inserted {}", format_item(&probe));

    print_items(&storage.list_menu_items().await?);

    storage
        .delete_menu_item(probe.id)
        .await?
        .with_context(|| format!("probe item {} vanished before cleanup", probe.id))?;
    println!("removed probe id={}", probe.id);
    Ok(())
}

fn print_items(items: &[MenuItem]) {
    if items.is_empty() {
        println!("(no menu items)");
    }
    for item in items {
        println!("{}", format_item(item));
    }
}

fn format_item(item: &MenuItem) -> String {
    format!("{}\t{}\t{}", item.id, item.name, item.display_price())
}
