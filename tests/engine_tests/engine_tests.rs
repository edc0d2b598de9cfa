//! Tests for Engine
//!
//! These tests verify:
//! - Store/retrieve round trips
//! - Validation failures allocate nothing
//! - Delete semantics and cell accounting
//! - Overwrite behavior under both policies
//! - Snapshot persistence and reload
//! - Status, listing and bit search

use std::fs;

use bitkv::config::{Config, OverwritePolicy};
use bitkv::engine::Engine;
use bitkv::BitKvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

fn setup_temp_engine_with_policy(policy: OverwritePolicy) -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .overwrite_policy(policy)
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

fn reopen(temp_dir: &TempDir) -> Engine {
    Engine::open_path(temp_dir.path()).unwrap()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_engine_open_creates_directories() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("mydb");

    let config = Config::builder().data_dir(&data_dir).build();
    let engine = Engine::open(config).unwrap();

    assert!(data_dir.exists());
    assert!(data_dir.join("bit_data").is_dir());
    assert_eq!(engine.data_dir(), data_dir.as_path());
    assert_eq!(engine.config().cell_capacity, 16);
    assert_eq!(engine.config().max_value_len, 255);
    assert_eq!(engine.config().overwrite_policy, OverwritePolicy::Orphan);
    assert_eq!(engine.entry_count(), 0);
}

#[test]
fn test_engine_open_rejects_tiny_cells() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .cell_capacity(8)
        .build();

    assert!(matches!(Engine::open(config), Err(BitKvError::Config(_))));
}

// =============================================================================
// Store / Retrieve Tests
// =============================================================================

#[test]
fn test_engine_store_retrieve() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.store("hello").unwrap();

    assert_eq!(engine.retrieve('h').unwrap(), Some("hello".to_string()));
}

#[test]
fn test_engine_round_trip_various_values() {
    let (_temp, mut engine) = setup_temp_engine();
    let long = "L".repeat(255);
    let values = ["x", "Hello, World!", "0 1 0", "ümlaut", "\tindent", long.as_str()];

    for value in values {
        engine.store(value).unwrap();
        let key = value.chars().next().unwrap();
        assert_eq!(engine.retrieve(key).unwrap().as_deref(), Some(value));
    }
}

#[test]
fn test_engine_store_allocates_eight_cells_per_char() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.store("abc").unwrap();

    assert_eq!(engine.arena().len(), 24);
}

#[test]
fn test_engine_retrieve_absent_key() {
    let (_temp, engine) = setup_temp_engine();

    assert_eq!(engine.retrieve('q').unwrap(), None);
    assert_eq!(engine.bits_of('q').unwrap(), None);
}

#[test]
fn test_engine_store_rejects_invalid_without_allocating() {
    let (_temp, mut engine) = setup_temp_engine();
    let too_long = "a".repeat(256);

    for value in ["", too_long.as_str(), "price: 5€", "\nnewline first"] {
        assert!(matches!(engine.store(value), Err(BitKvError::Validation(_))));
    }

    assert_eq!(engine.arena().len(), 0);
    assert_eq!(engine.entry_count(), 0);
}

#[test]
fn test_engine_custom_max_value_len() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .max_value_len(3)
        .build();
    let mut engine = Engine::open(config).unwrap();

    engine.store("abc").unwrap();
    assert!(matches!(engine.store("abcd"), Err(BitKvError::Validation(_))));
}

// =============================================================================
// Overwrite Tests
// =============================================================================

#[test]
fn test_engine_overwrite_orphans_previous_chain() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.store("abc").unwrap();
    engine.store("axy").unwrap();

    assert_eq!(engine.retrieve('a').unwrap(), Some("axy".to_string()));
    assert_eq!(engine.entry_count(), 1);
    // Both chains still allocated; only one reachable
    assert_eq!(engine.arena().len(), 48);
    assert_eq!(engine.status().unwrap().on_disk.files, 24);
}

#[test]
fn test_engine_overwrite_reclaim_frees_previous_chain() {
    let (_temp, mut engine) = setup_temp_engine_with_policy(OverwritePolicy::Reclaim);

    engine.store("abc").unwrap();
    engine.store("axy").unwrap();

    assert_eq!(engine.retrieve('a').unwrap(), Some("axy".to_string()));
    assert_eq!(engine.arena().len(), 24);
}

#[test]
fn test_engine_orphans_do_not_survive_reload() {
    let (temp, mut engine) = setup_temp_engine();
    engine.store("abc").unwrap();
    engine.store("axy").unwrap();
    drop(engine);

    let engine = reopen(&temp);

    assert_eq!(engine.arena().len(), 24);
    assert_eq!(engine.retrieve('a').unwrap(), Some("axy".to_string()));
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_engine_delete() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.store("keep").unwrap();
    engine.store("drop me").unwrap();
    let before = engine.arena().len();

    assert!(engine.delete('d').unwrap());

    assert_eq!(engine.retrieve('d').unwrap(), None);
    assert_eq!(engine.arena().len(), before - 8 * "drop me".len());
    assert_eq!(engine.retrieve('k').unwrap(), Some("keep".to_string()));
}

#[test]
fn test_engine_delete_absent_key_is_noop() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.store("value").unwrap();
    let before = engine.status().unwrap();

    assert!(!engine.delete('z').unwrap());

    assert_eq!(engine.status().unwrap(), before);
    assert_eq!(engine.list_entries(), vec!['v']);
}

#[test]
fn test_engine_delete_twice() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.store("once").unwrap();

    assert!(engine.delete('o').unwrap());
    assert!(!engine.delete('o').unwrap());
}

#[test]
fn test_engine_delete_rewrites_snapshot() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.store("hi").unwrap();
    engine.store("yo").unwrap();

    engine.delete('h').unwrap();

    assert_eq!(engine.status().unwrap().on_disk.files, 16);
    let index = fs::read_to_string(engine.index_path()).unwrap();
    assert!(index.starts_with("y:"));
    assert_eq!(index.lines().count(), 1);
}

// =============================================================================
// Status / Listing Tests
// =============================================================================

#[test]
fn test_engine_status_after_sync() {
    let (_temp, mut engine) = setup_temp_engine();

    engine.store("hi").unwrap();
    engine.sync().unwrap();

    let status = engine.status().unwrap();
    assert_eq!(status.entries, 1);
    assert_eq!(status.in_memory.allocated_blocks, 16);
    assert_eq!(status.in_memory.total_bytes, 16 * 16);
    assert_eq!(status.on_disk.files, 16);
}

#[test]
fn test_engine_list_entries() {
    let (_temp, mut engine) = setup_temp_engine();

    for value in ["cherry", "apple", "banana"] {
        engine.store(value).unwrap();
    }

    let mut keys = engine.list_entries();
    keys.sort();
    assert_eq!(keys, vec!['a', 'b', 'c']);
}

#[test]
fn test_engine_bits_of() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.store("hi").unwrap();

    assert_eq!(
        engine.bits_of('h').unwrap(),
        Some("0110100001101001".to_string())
    );
}

#[test]
fn test_engine_search_bits() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.store("hi").unwrap(); // 01101000 01101001
    engine.store("A").unwrap(); // 01000001

    let matches = engine.search_bits("1101").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].key, 'h');
    assert_eq!(matches[0].value, "hi");
    assert_eq!(matches[0].offsets, vec![1, 9]);

    let matches = engine.search_bits("01").unwrap();
    assert_eq!(matches.len(), 2);

    assert!(engine.search_bits("111111111").unwrap().is_empty());
    assert!(matches!(engine.search_bits("12"), Err(BitKvError::Validation(_))));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_engine_reload_reproduces_entries() {
    let (temp, mut engine) = setup_temp_engine();
    let values = ["alpha", "bravo", "charlie", ":colon", " space"];
    for value in values {
        engine.store(value).unwrap();
    }
    engine.delete('b').unwrap();
    engine.close().unwrap();

    let engine = reopen(&temp);

    assert_eq!(engine.entry_count(), 4);
    for value in ["alpha", "charlie", ":colon", " space"] {
        let key = value.chars().next().unwrap();
        assert_eq!(engine.retrieve(key).unwrap().as_deref(), Some(value));
    }
    assert_eq!(engine.retrieve('b').unwrap(), None);
    assert_eq!(engine.arena().len(), 8 * (5 + 7 + 6 + 6));
}

#[test]
fn test_engine_store_persists_without_sync() {
    let (temp, mut engine) = setup_temp_engine();
    engine.store("durable").unwrap();
    drop(engine);

    let engine = reopen(&temp);

    assert_eq!(engine.retrieve('d').unwrap(), Some("durable".to_string()));
}

#[test]
fn test_engine_reloaded_engine_keeps_working() {
    let (temp, mut engine) = setup_temp_engine();
    engine.store("first").unwrap();
    drop(engine);

    let mut engine = reopen(&temp);
    engine.store("second").unwrap();
    assert!(engine.delete('f').unwrap());
    drop(engine);

    let engine = reopen(&temp);
    assert_eq!(engine.list_entries(), vec!['s']);
    assert_eq!(engine.retrieve('s').unwrap(), Some("second".to_string()));
    assert_eq!(engine.arena().len(), 8 * 6);
}

#[test]
fn test_engine_reload_with_damaged_cell_file() {
    let (temp, mut engine) = setup_temp_engine();
    engine.store("ok").unwrap();
    let cells_dir = engine.cells_dir().to_path_buf();
    drop(engine);

    // Remove the tail cell ('k' loses its last bit)
    let tail = fs::read_dir(&cells_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| fs::read_to_string(p).unwrap().lines().count() == 1)
        .unwrap();
    fs::remove_file(tail).unwrap();

    let engine = reopen(&temp);

    assert_eq!(engine.arena().len(), 15);
    assert_eq!(engine.retrieve('o').unwrap(), Some("o".to_string()));
}
