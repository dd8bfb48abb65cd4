//! Path sanitizer unit tests

use drive_mirror::output::{sanitize_destination, TRUNCATED_STEM_LEN};
use std::path::{Path, PathBuf};

#[test]
fn test_short_name_passes_through() {
    let path = Path::new("/mirror/reports/summary.csv");
    assert_eq!(sanitize_destination(path), path);
}

#[test]
fn test_300_char_stem_becomes_245_with_extension() {
    let path = PathBuf::from("/mirror").join(format!("{}.csv", "a".repeat(300)));

    let sanitized = sanitize_destination(&path);

    let stem = sanitized.file_stem().unwrap().to_string_lossy();
    assert_eq!(stem.chars().count(), TRUNCATED_STEM_LEN);
    assert!(stem.chars().all(|c| c == 'a'));
    assert_eq!(sanitized.extension().unwrap(), "csv");
    assert_eq!(sanitized.parent(), Some(Path::new("/mirror")));
}

#[test]
fn test_ten_char_stem_unchanged() {
    let path = Path::new("/mirror/shortstem1.txt");
    assert_eq!(sanitize_destination(path), path);
}

#[test]
fn test_sanitizer_is_deterministic() {
    let path = PathBuf::from(format!("{}.pdf", "z".repeat(400)));
    assert_eq!(sanitize_destination(&path), sanitize_destination(&path));
}
