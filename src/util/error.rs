// TextureCatalog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// There is no "not found" error: identifier lookups return `Option`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all TextureCatalog operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CatalogError {
    /// Loading or saving the record collection failed.
    Storage(StorageError),

    /// A record could not be built or violates a catalog constraint.
    Validation(ValidationError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {e}"),
            Self::Validation(e) => write!(f, "Validation error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors related to the persisted record collection.
#[derive(Debug)]
pub enum StorageError {
    /// The data file exists but could not be read or written.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// The data file is not well-formed JSON or does not match the schema.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The data file was written by a newer schema than this build understands.
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    /// A legacy record could not be converted to the canonical schema.
    Migration {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    /// The collection could not be serialised.
    Serialize { source: serde_json::Error },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "cannot {operation} data file '{}': {source}",
                path.display()
            ),
            Self::Malformed { path, source } => {
                write!(f, "data file '{}' is malformed: {source}", path.display())
            }
            Self::UnsupportedVersion {
                path,
                found,
                supported,
            } => write!(
                f,
                "data file '{}' has schema version {found}, \
                 this build supports up to {supported}",
                path.display()
            ),
            Self::Migration {
                path,
                index,
                reason,
            } => write!(
                f,
                "cannot migrate record #{index} in '{}': {reason}",
                path.display()
            ),
            Self::Serialize { source } => {
                write!(f, "failed to serialise records: {source}")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Serialize { source } => Some(source),
            _ => None,
        }
    }
}

impl From<StorageError> for CatalogError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Errors raised while building a record or enforcing catalog constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The texture code is empty after trimming.
    MissingCode,

    /// An enum field received a value outside its option set.
    UnknownOption {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// Another record already uses this code.
    DuplicateCode { code: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCode => write!(f, "texture code must not be empty"),
            Self::UnknownOption {
                field,
                value,
                expected,
            } => write!(
                f,
                "'{value}' is not a valid {field}. Expected one of: {expected}"
            ),
            Self::DuplicateCode { code } => {
                write!(f, "a product with code '{code}' already exists")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for CatalogError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Errors parsing numeric text stored in records.
///
/// Only ever produced locally by the filter engine, which treats it as
/// "record does not match". Never wrapped into `CatalogError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A percentage field does not contain an integer.
    InvalidPercentage { raw: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPercentage { raw } => {
                write!(f, "'{raw}' is not a whole percentage")
            }
        }
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error flushing the export buffer.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },

    /// Export would exceed maximum record count.
    TooManyRecords { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "export I/O error: {source}"),
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
            Self::TooManyRecords { count, max } => write!(
                f,
                "Export of {count} records exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for CatalogError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for CatalogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for TextureCatalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_storage_error_keeps_source_chain() {
        let err: CatalogError = StorageError::Io {
            path: PathBuf::from("products.json"),
            operation: "read",
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();

        assert!(err.to_string().starts_with("Storage error: cannot read"));
        let storage = err.source().expect("storage layer");
        assert!(storage.source().is_some(), "io cause must be preserved");
    }

    #[test]
    fn test_validation_error_message_lists_options() {
        let err = ValidationError::UnknownOption {
            field: "finish",
            value: "Glossy".to_string(),
            expected: "Matte, Luminous".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'Glossy' is not a valid finish. Expected one of: Matte, Luminous"
        );
    }
}
