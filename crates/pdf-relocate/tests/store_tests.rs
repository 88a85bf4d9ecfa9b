#![cfg(feature = "serde")]

use pdf_relocate::*;
use tempfile::TempDir;

#[test]
fn test_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = CoordinateStore::open(dir.path().join("coords.json")).unwrap();
    assert!(store.values().is_empty());
    assert_eq!(store.source(), None);
    assert_eq!(store.values().to_options(), None);
}

#[test]
fn test_source_survives_reload_rounded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("coords.json");

    let mut store = CoordinateStore::open(&path).unwrap();
    store
        .set_source(Some(RectMm::new(12.34, 56.78, 40.04, 15.96)))
        .unwrap();

    let reloaded = CoordinateStore::open(&path).unwrap();
    assert_eq!(
        reloaded.source(),
        Some(RectMm::new(12.3, 56.8, 40.0, 16.0))
    );
    assert_eq!(reloaded.destination(), None);
}

#[test]
fn test_all_roles_and_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coords.json");

    let mut store = CoordinateStore::open(&path).unwrap();
    store
        .set_source(Some(RectMm::new(10.0, 10.0, 40.0, 15.0)))
        .unwrap();
    store
        .set_destination(Some(PointMm::new(10.04, 150.06)))
        .unwrap();
    store
        .set_cover(Some(RectMm::new(100.0, 20.0, 30.0, 5.0)))
        .unwrap();

    let reloaded = CoordinateStore::open(&path).unwrap();
    let options = reloaded.values().to_options().unwrap();
    assert_eq!(options.source, RectMm::new(10.0, 10.0, 40.0, 15.0));
    assert_eq!(options.destination, PointMm::new(10.0, 150.1));
    assert_eq!(options.cover, Some(RectMm::new(100.0, 20.0, 30.0, 5.0)));
    assert_eq!(options.page_number, 1);
}

#[test]
fn test_clear_single_role() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coords.json");

    let mut store = CoordinateStore::open(&path).unwrap();
    store
        .set_source(Some(RectMm::new(1.0, 2.0, 3.0, 4.0)))
        .unwrap();
    store
        .set_cover(Some(RectMm::new(5.0, 6.0, 7.0, 8.0)))
        .unwrap();
    store.clear(CoordinateRole::Cover).unwrap();

    let reloaded = CoordinateStore::open(&path).unwrap();
    assert!(reloaded.source().is_some());
    assert_eq!(reloaded.cover(), None);

    // Unset roles are omitted from the file
    let json = std::fs::read_to_string(&path).unwrap();
    assert!(!json.contains("cover"));
    assert!(!json.contains("destination"));
}

#[test]
fn test_reset_removes_everything() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coords.json");

    let mut store = CoordinateStore::open(&path).unwrap();
    store
        .set_destination(Some(PointMm::new(1.0, 1.0)))
        .unwrap();
    assert!(path.exists());

    store.reset().unwrap();
    assert!(!path.exists());
    assert!(store.values().is_empty());

    // Resetting twice is fine
    store.reset().unwrap();
}

#[test]
fn test_corrupt_file_is_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coords.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = CoordinateStore::open(&path).unwrap();
    assert!(store.values().is_empty());
}

#[test]
fn test_reads_hand_written_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coords.json");
    std::fs::write(
        &path,
        r#"{ "destination": { "x": 20.5, "y": 180.0 } }"#,
    )
    .unwrap();

    let store = CoordinateStore::open(&path).unwrap();
    assert_eq!(store.destination(), Some(PointMm::new(20.5, 180.0)));
    assert_eq!(store.source(), None);
}
