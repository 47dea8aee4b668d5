// TextureCatalog - app/store.rs
//
// Record store: load and save the whole collection as one JSON file.
//
// Design principles:
// - The collection is saved atomically (write temp, rename final) so a crash
//   during save never corrupts the previous good file.
// - A missing file is a normal first run and yields an empty collection.
//   Every other read problem is surfaced to the caller; catalog data is
//   never silently discarded.
// - The file carries a schema version. Legacy bare arrays are migrated on
//   load and rewritten in the current envelope on the next save.

use crate::core::migrate;
use crate::core::model::Record;
use crate::platform::fs::write_atomic;
use crate::util::constants::{JSON_INDENT, LEGACY_SCHEMA_VERSION, SCHEMA_VERSION};
use crate::util::error::StorageError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// =============================================================================
// On-disk data structures
// =============================================================================

/// Current on-disk envelope, borrowed for writing.
#[derive(Debug, Serialize)]
struct PersistedCollectionRef<'a> {
    /// Schema version; always `SCHEMA_VERSION` when written by this build.
    version: u32,
    records: &'a [Record],
}

/// Current on-disk envelope, owned for reading. The version has already
/// been checked through `VersionTag`.
#[derive(Debug, Deserialize)]
struct PersistedCollection {
    #[serde(default)]
    records: Vec<Record>,
}

/// Only the version tag, read before committing to a schema.
#[derive(Debug, Deserialize)]
struct VersionTag {
    version: u32,
}

/// Envelope of an older schema whose records still need migration.
#[derive(Debug, Deserialize)]
struct LegacyEnvelope {
    #[serde(default)]
    records: Vec<Value>,
}

/// Result of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedRecords {
    /// Records in file order.
    pub records: Vec<Record>,
    /// Schema version found on disk (`SCHEMA_VERSION` when no file exists).
    pub version: u32,
    /// Non-fatal problems found while loading (lossy migrations, duplicate codes).
    pub warnings: Vec<String>,
}

impl LoadedRecords {
    /// Whether the file on disk is older than the current schema.
    pub fn needs_migration(&self) -> bool {
        self.version < SCHEMA_VERSION
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle on the persisted record collection.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection.
    ///
    /// A missing file yields an empty collection. A legacy bare array is
    /// migrated record by record; the first record that cannot be migrated
    /// fails the whole load with `StorageError::Migration`. Records without a
    /// code are kept and reported in the warnings.
    pub fn load(&self) -> Result<LoadedRecords, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No data file yet, starting empty");
                return Ok(LoadedRecords {
                    version: SCHEMA_VERSION,
                    ..Default::default()
                });
            }
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    operation: "read",
                    source: e,
                })
            }
        };

        let value: Value = serde_json::from_str(&content).map_err(|e| self.malformed(e))?;

        let mut loaded = match value {
            Value::Array(items) => self.migrate_legacy(items, LEGACY_SCHEMA_VERSION)?,
            other => {
                let tag = VersionTag::deserialize(&other).map_err(|e| self.malformed(e))?;
                if tag.version > SCHEMA_VERSION {
                    return Err(StorageError::UnsupportedVersion {
                        path: self.path.clone(),
                        found: tag.version,
                        supported: SCHEMA_VERSION,
                    });
                }
                if tag.version < SCHEMA_VERSION {
                    let legacy: LegacyEnvelope =
                        serde_json::from_value(other).map_err(|e| self.malformed(e))?;
                    self.migrate_legacy(legacy.records, tag.version)?
                } else {
                    let current: PersistedCollection =
                        serde_json::from_value(other).map_err(|e| self.malformed(e))?;
                    LoadedRecords {
                        records: current.records,
                        version: SCHEMA_VERSION,
                        warnings: Vec::new(),
                    }
                }
            }
        };

        loaded.warnings.extend(duplicate_code_warnings(&loaded.records));
        for warning in &loaded.warnings {
            tracing::warn!(path = %self.path.display(), "{warning}");
        }

        tracing::info!(
            path = %self.path.display(),
            records = loaded.records.len(),
            version = loaded.version,
            "Data file loaded"
        );
        Ok(loaded)
    }

    /// Persist the full collection, replacing the previous file atomically.
    pub fn save(&self, records: &[Record]) -> Result<(), StorageError> {
        let bytes = encode(records)?;
        write_atomic(&self.path, &bytes).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            operation: "write",
            source: e,
        })?;

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            "Data file saved"
        );
        Ok(())
    }

    fn migrate_legacy(
        &self,
        items: Vec<Value>,
        version: u32,
    ) -> Result<LoadedRecords, StorageError> {
        tracing::info!(
            path = %self.path.display(),
            records = items.len(),
            version,
            "Migrating legacy data file"
        );

        let mut records = Vec::with_capacity(items.len());
        let mut warnings = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let migrated =
                migrate::migrate_record(item).map_err(|reason| StorageError::Migration {
                    path: self.path.clone(),
                    index,
                    reason,
                })?;
            let code = if migrated.record.code.is_empty() {
                "no code"
            } else {
                migrated.record.code.as_str()
            };
            warnings.extend(
                migrated
                    .warnings
                    .iter()
                    .map(|w| format!("record #{index} ({code}): {w}")),
            );
            records.push(migrated.record);
        }

        Ok(LoadedRecords {
            records,
            version,
            warnings,
        })
    }

    fn malformed(&self, source: serde_json::Error) -> StorageError {
        StorageError::Malformed {
            path: self.path.clone(),
            source,
        }
    }
}

/// Serialise the envelope: 4-space indent, non-ASCII unescaped, trailing newline.
fn encode(records: &[Record]) -> Result<Vec<u8>, StorageError> {
    let envelope = PersistedCollectionRef {
        version: SCHEMA_VERSION,
        records,
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    envelope
        .serialize(&mut serializer)
        .map_err(|e| StorageError::Serialize { source: e })?;
    buf.push(b'\n');
    Ok(buf)
}

fn duplicate_code_warnings(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| !r.code.is_empty() && !seen.insert(r.code.as_str()))
        .map(|r| format!("duplicate code '{}'; lookups return the first occurrence", r.code))
        .collect()
}

// =============================================================================
// Unit tests
// =============================================================================
