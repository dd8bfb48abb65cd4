//! Filesystem-safe destination paths
//!
//! Remote display names are not bounded, but most filesystems cap a path
//! component at 255 bytes. [`sanitize_destination`] trims overlong
//! filename stems while preserving the extension, leaving headroom for
//! the `.temp` suffix the download protocol appends.

use std::path::{Path, PathBuf};

/// Longest filename stem accepted unchanged, in characters.
pub const MAX_STEM_LEN: usize = 250;

/// Stem length after truncation. Five characters below [`MAX_STEM_LEN`]
/// so the in-progress `.temp` suffix still fits a 255-character component.
pub const TRUNCATED_STEM_LEN: usize = 245;

/// Map a desired destination path to a filesystem-safe one.
///
/// Pure function: never consults the filesystem. If the filename stem is
/// within [`MAX_STEM_LEN`] characters the path is returned unchanged;
/// otherwise the stem is cut to [`TRUNCATED_STEM_LEN`] characters and the
/// original extension is reattached.
pub fn sanitize_destination(path: &Path) -> PathBuf {
    let stem = match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => return path.to_path_buf(),
    };

    if stem.chars().count() <= MAX_STEM_LEN {
        return path.to_path_buf();
    }

    let truncated: String = stem.chars().take(TRUNCATED_STEM_LEN).collect();
    let file_name = match path.extension() {
        Some(ext) => format!("{truncated}.{}", ext.to_string_lossy()),
        None => truncated,
    };
    path.with_file_name(file_name)
}
