//! Destination path handling

/// Destination path sanitization
pub mod path;

pub use path::{sanitize_destination, MAX_STEM_LEN, TRUNCATED_STEM_LEN};
