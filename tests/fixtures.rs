mod common;

use alchemist::{GradientStore, NodeStore, ParseError, Walls};
use common::data_path;
use std::path::Path;
use walkdir::WalkDir;

fn parse(path: &Path) -> Option<Result<usize, ParseError>> {
    let parsed = match path.extension()?.to_str()? {
        "gra" => GradientStore::from_path(path).map(|store| store.len()),
        "nod" => NodeStore::from_path(path).map(|store| store.len()),
        "wal" => Walls::from_path(path).map(|walls| walls.len()),
        _ => return None,
    };
    Some(parsed)
}

#[test]
fn every_fixture_parses_as_expected() {
    let mut seen = 0;

    for entry in WalkDir::new(data_path("")) {
        let entry = entry.unwrap();
        if !entry.path().is_file() {
            continue;
        }

        let invalid = entry.path().components().any(|c| c.as_os_str() == "invalid");
        let result = match parse(entry.path()) {
            Some(result) => result,
            None => continue,
        };
        seen += 1;

        match result {
            Ok(len) => {
                assert!(!invalid, "{} should not parse", entry.path().display());
                assert!(len > 0, "{} is empty", entry.path().display());
            }
            Err(err) => {
                assert!(invalid, "{}: {}", entry.path().display(), err);
                assert!(err.line().is_some(), "{}: {}", entry.path().display(), err);
            }
        }
    }

    assert_eq!(seen, 7);
}

#[test]
fn frame_count_matches_line_count() {
    let path = data_path("field.gra");
    let lines = std::fs::read_to_string(&path).unwrap().lines().count();
    let store = GradientStore::from_path(&path).unwrap();

    assert_eq!(store.len(), lines);
    let indices: Vec<_> = store.iter().map(|frame| frame.index).collect();
    assert_eq!(indices, (1..=lines as u32).collect::<Vec<_>>());
}
