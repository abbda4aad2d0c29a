use scripture_core::{open_db, Cache, CacheStore, Clock, ManualClock, SqliteCacheStore};
use serde_json::json;
use std::rc::Rc;
use std::time::Duration;

const START_MS: i64 = 1_700_000_000_000;
const EXPIRY: Duration = Duration::from_secs(600);

fn open_cache<'conn>(
    conn: &'conn rusqlite::Connection,
    clock: &ManualClock,
) -> Cache<'conn> {
    let clock: Rc<dyn Clock> = Rc::new(clock.clone());
    Cache::open(
        "scripture_cache.text",
        EXPIRY,
        Box::new(SqliteCacheStore::new(conn)),
        clock,
    )
}

#[test]
fn entries_survive_a_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("cache.db");
    let clock = ManualClock::new(START_MS);

    {
        let conn = open_db(&db_path).unwrap();
        let cache = open_cache(&conn, &clock);
        cache.set("chapter_text_kjv_kjv.GEN.1", &json!({"content": "cached"}));
    }

    let conn = open_db(&db_path).unwrap();
    let cache = open_cache(&conn, &clock);
    let value: serde_json::Value = cache.get("chapter_text_kjv_kjv.GEN.1").unwrap();
    assert_eq!(value["content"], "cached");
}

#[test]
fn freshness_is_measured_from_write_time() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("cache.db")).unwrap();
    let clock = ManualClock::new(START_MS);
    let expiry_ms = EXPIRY.as_millis() as i64;

    open_cache(&conn, &clock).set("k", &"v");

    clock.set(START_MS + expiry_ms / 2);
    assert_eq!(open_cache(&conn, &clock).get::<String>("k").as_deref(), Some("v"));

    clock.set(START_MS + 2 * expiry_ms);
    assert_eq!(open_cache(&conn, &clock).get::<String>("k"), None);
}

#[test]
fn corrupt_blob_starts_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("cache.db")).unwrap();
    let store = SqliteCacheStore::new(&conn);
    store.save("scripture_cache.text", "{not json").unwrap();

    let clock = ManualClock::new(START_MS);
    let cache = open_cache(&conn, &clock);
    assert!(cache.is_empty());

    cache.set("k", &1);
    let payload = store.load("scripture_cache.text").unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(parsed["k"]["data"], 1);
    assert_eq!(parsed["k"]["timestamp"], START_MS);
}

#[test]
fn separate_storage_keys_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("cache.db")).unwrap();
    let clock: Rc<dyn Clock> = Rc::new(ManualClock::new(START_MS));
    let books = Cache::open(
        "scripture_cache.books",
        EXPIRY,
        Box::new(SqliteCacheStore::new(&conn)),
        Rc::clone(&clock),
    );
    let chapters = Cache::open(
        "scripture_cache.chapters",
        EXPIRY,
        Box::new(SqliteCacheStore::new(&conn)),
        clock,
    );

    books.set("books_kjv", &vec!["GEN"]);
    chapters.set("books_kjv", &vec!["1"]);
    books.clear();

    assert_eq!(books.get::<Vec<String>>("books_kjv"), None);
    assert_eq!(
        chapters.get::<Vec<String>>("books_kjv"),
        Some(vec!["1".to_string()])
    );
}
