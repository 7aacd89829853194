//! Tests for input discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use relink_ingest::{
    IngestError, collection_name_for, discover_collections, list_csv_files, load_collections,
};

fn touch(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn collection_name_is_text_before_separator() {
    assert_eq!(collection_name_for(Path::new("Stations-Grid view.csv")), "Stations");
    assert_eq!(collection_name_for(Path::new("in/Watersheds.csv")), "Watersheds");
    assert_eq!(
        collection_name_for(Path::new("Is it clean_ - Sites.csv")),
        "Is it clean_"
    );
    assert_eq!(collection_name_for(Path::new("-orphan.csv")), "");
}

#[test]
fn lists_only_csv_files_sorted() {
    let dir = tempfile::tempdir().expect("tempdir");
    touch(dir.path(), "b.csv", "A\n");
    touch(dir.path(), "a.CSV", "A\n");
    touch(dir.path(), "notes.txt", "x");
    fs::create_dir(dir.path().join("nested.csv")).expect("mkdir");

    let files = list_csv_files(dir.path()).expect("list");
    let names: Vec<_> = files
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["a.CSV", "b.csv"]);
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = list_csv_files(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
}

#[test]
fn groups_files_by_collection() {
    let files = vec![
        PathBuf::from("Stations-part1.csv"),
        PathBuf::from("Stations-part2.csv"),
        PathBuf::from("Organizations-export.csv"),
        PathBuf::from("-unnamed.csv"),
    ];
    let discovered = discover_collections(&files);
    assert_eq!(discovered.len(), 2);
    assert_eq!(discovered["Stations"].len(), 2);
    assert_eq!(discovered["Organizations"].len(), 1);
}

#[test]
fn loads_and_concatenates_collections() {
    let dir = tempfile::tempdir().expect("tempdir");
    touch(dir.path(), "Stations-a.csv", "SiteID,Waterbody\nBC-01,Bear Creek\n");
    touch(dir.path(), "Stations-b.csv", "SiteID ,Waterbody\nBC-02,Lost Lake\n");
    touch(dir.path(), "Waterbodies.csv", "Name\nBear Creek\nLost Lake\n");

    let collections = load_collections(dir.path()).expect("load");
    assert_eq!(collections.len(), 2);

    let stations = &collections[0];
    assert_eq!(stations.name, "Stations");
    assert_eq!(stations.len(), 2);
    assert_eq!(stations.records[1].value("SiteID"), "BC-02");

    assert_eq!(collections[1].name, "Waterbodies");
    assert_eq!(collections[1].len(), 2);
}
