#![allow(clippy::unwrap_used)]

use super::*;

// ── Key/value ─────────────────────────────────────────────────

#[test]
fn test_get_missing_key() {
    let store = Storage::open_in_memory().unwrap();
    assert_eq!(store.get("nope").unwrap(), None);
}

#[test]
fn test_set_then_get() {
    let store = Storage::open_in_memory().unwrap();
    store.set("theme", "dark").unwrap();
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_set_overwrites() {
    let store = Storage::open_in_memory().unwrap();
    store.set("theme", "dark").unwrap();
    store.set("theme", "light").unwrap();
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
}

#[test]
fn test_remove() {
    let store = Storage::open_in_memory().unwrap();
    store.set("theme", "dark").unwrap();
    store.remove("theme").unwrap();
    assert_eq!(store.get("theme").unwrap(), None);
    // removing again is a no-op
    store.remove("theme").unwrap();
}

// ── Auth token ────────────────────────────────────────────────

#[test]
fn test_token_roundtrip() {
    let store = Storage::open_in_memory().unwrap();
    assert_eq!(store.token().unwrap(), None);
    store.save_token("abc.def.ghi").unwrap();
    assert_eq!(store.token().unwrap().as_deref(), Some("abc.def.ghi"));
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc.def.ghi"));
    store.clear_token().unwrap();
    assert_eq!(store.token().unwrap(), None);
}

#[test]
fn test_blank_token_is_absent() {
    let store = Storage::open_in_memory().unwrap();
    store.save_token("   ").unwrap();
    assert_eq!(store.token().unwrap(), None);
}

#[test]
fn test_token_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gastos.db");
    {
        let store = Storage::open(&path).unwrap();
        store.save_token("persisted").unwrap();
    }
    let store = Storage::open(&path).unwrap();
    assert_eq!(store.token().unwrap().as_deref(), Some("persisted"));
}

#[test]
fn test_migrate_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gastos.db");
    Storage::open(&path).unwrap();
    Storage::open(&path).unwrap();
    let store = Storage::open(&path).unwrap();
    let version: i32 = store
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_unreadable_schema_version_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gastos.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version TEXT NOT NULL);
             INSERT INTO schema_version (version) VALUES ('dos');",
        )
        .unwrap();
    }
    let err = Storage::open(&path).err().unwrap();
    assert!(format!("{err:#}").contains("Failed to read schema version"));
}
