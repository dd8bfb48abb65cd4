//! Mirror configuration constants

/// Default worker pool capacity for concurrent file downloads.
/// Five workers keeps throughput reasonable without tripping Drive API
/// per-user quotas on large trees.
pub const DEFAULT_WORKER_CAPACITY: usize = 5;

/// Maximum allowed worker capacity to prevent self-inflicted quota exhaustion.
pub const MAX_WORKER_CAPACITY: usize = 64;

/// Page size requested from the listing API.
pub const LIST_PAGE_SIZE: usize = 100;

/// Suffix for in-progress download artifacts. Files are written here and
/// renamed onto the final path only once fully fetched.
pub const TEMP_SUFFIX: &str = ".temp";

/// Export target for Google-native documents.
pub const PDF_EXPORT_MIME: &str = "application/pdf";

/// Default append-only record of folders whose listing failed.
pub const DEFAULT_FAILED_FOLDERS_LOG: &str = "failed_folders.txt";

/// Default append-only record of files whose download failed.
pub const DEFAULT_FAILED_DOWNLOADS_LOG: &str = "failed_downloads.txt";
