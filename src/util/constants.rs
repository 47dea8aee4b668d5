// TextureCatalog - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "TextureCatalog";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "TextureCatalog";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Storage
// =============================================================================

/// Default name of the persisted record collection (inside the data directory).
pub const DATA_FILE_NAME: &str = "products.json";

/// Schema version written into every saved collection.
///
/// Version 1 is the untagged legacy format: a bare JSON array of records
/// keyed by the original field names. Files at version 1 are migrated on load.
pub const SCHEMA_VERSION: u32 = 2;

/// Version assigned to untagged (bare array) collections.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Extension appended to the data file name for the atomic-write temp file.
pub const TEMP_FILE_SUFFIX: &str = "tmp";

/// Indentation used when serialising the collection.
pub const JSON_INDENT: &[u8] = b"    ";

// =============================================================================
// Export
// =============================================================================

/// Maximum number of records that can be exported in a single table.
pub const MAX_EXPORT_RECORDS: usize = 100_000;

/// Separator used when flattening list-valued fields into one cell or line.
pub const LIST_JOIN_SEPARATOR: &str = ", ";

/// Default number of lines per page in a document export.
pub const DEFAULT_PAGE_LINES: usize = 50;

/// Minimum configurable page length. Leaves room for the page header.
pub const MIN_PAGE_LINES: usize = 10;

/// Maximum configurable page length.
pub const MAX_PAGE_LINES: usize = 500;

/// Default wrap width (characters) for document export lines.
pub const DEFAULT_LINE_WIDTH: usize = 90;

/// Minimum configurable wrap width.
pub const MIN_LINE_WIDTH: usize = 40;

/// Maximum configurable wrap width.
pub const MAX_LINE_WIDTH: usize = 200;

/// Page separator in document exports (ASCII form feed).
pub const PAGE_BREAK: char = '\u{000C}';

/// Default file name for a filtered table export.
pub const TABLE_FILE_NAME: &str = "filtered_products.csv";

/// Suffix of a single-record document export file name.
pub const DOCUMENT_FILE_SUFFIX: &str = "_sheet.txt";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
