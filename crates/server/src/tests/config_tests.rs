use super::*;

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_root(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("menu_server_{label}_{suffix}"))
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_memory_and_full_urls_untouched() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite://./menu.db?mode=rwc"),
        "sqlite://./menu.db?mode=rwc"
    );
    assert_eq!(normalize_database_url("sqlite:menu.db"), "sqlite://menu.db");
}

#[test]
fn blank_database_url_falls_back_to_default() {
    assert_eq!(
        normalize_database_url("   "),
        Settings::default().database_url
    );
}

#[test]
fn creates_parent_dir_for_relative_sqlite_url() {
    let temp_root = temp_root("parent_dir");
    let db_path = temp_root.join("data").join("test.db");

    prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare db url");
    assert!(temp_root.join("data").exists());

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/menu/server.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_bind, "127.0.0.1:8080");
}

#[test]
fn config_file_overrides_defaults() {
    let root = temp_root("file");
    fs::create_dir_all(&root).expect("root");
    let path = root.join("server.toml");
    fs::write(
        &path,
        "bind_addr = \"0.0.0.0:9000\"\ndatabase_url = \"sqlite://menu.db\"\nmax_connections = 3\nidle_timeout_secs = \"5\"\n",
    )
    .expect("write config");

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.database_url, "sqlite://menu.db");
    assert_eq!(settings.max_connections, 3);
    assert_eq!(settings.idle_timeout_secs, 5);
    assert_eq!(settings.acquire_timeout_secs, 10);

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn unreadable_config_file_is_ignored() {
    let root = temp_root("bad_file");
    fs::create_dir_all(&root).expect("root");
    let path = root.join("server.toml");
    fs::write(&path, "this is = = not toml").expect("write config");

    assert_eq!(load_settings_from(&path, no_env), Settings::default());

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn environment_overrides_file_and_prefers_app_prefix() {
    let root = temp_root("env");
    fs::create_dir_all(&root).expect("root");
    let path = root.join("server.toml");
    fs::write(&path, "bind_addr = \"0.0.0.0:9000\"\n").expect("write config");

    let vars: HashMap<&str, &str> = HashMap::from([
        ("SERVER_BIND", "127.0.0.1:7000"),
        ("APP__BIND_ADDR", "127.0.0.1:7001"),
        ("DATABASE_URL", "sqlite://legacy.db"),
        ("STATIC_DIR", "/srv/menu/static"),
        ("APP__MAX_CONNECTIONS", "not-a-number"),
        ("APP__ACQUIRE_TIMEOUT_SECS", "2"),
    ]);
    let settings = load_settings_from(&path, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_bind, "127.0.0.1:7001");
    assert_eq!(settings.database_url, "sqlite://legacy.db");
    assert_eq!(settings.static_dir, PathBuf::from("/srv/menu/static"));
    assert_eq!(settings.max_connections, 10);
    assert_eq!(settings.acquire_timeout_secs, 2);

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn pool_settings_never_drop_below_one_connection() {
    let settings = Settings {
        max_connections: 0,
        ..Settings::default()
    };
    let pool = settings.pool_settings();
    assert_eq!(pool.max_connections, 1);
    assert_eq!(pool.acquire_timeout, Duration::from_secs(10));
    assert_eq!(pool.idle_timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn prepared_database_url_creates_openable_sqlite_file() {
    let temp_root = temp_root("open");
    let db_path = temp_root.join("nested").join("server.db");

    let prepared = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare");
    let storage = storage::Storage::new(&prepared).await.expect("open sqlite");
    storage.close().await;

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );

    fs::remove_dir_all(temp_root).expect("cleanup");
}
