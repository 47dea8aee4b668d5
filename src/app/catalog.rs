// TextureCatalog - app/catalog.rs
//
// Catalog session: owns the in-memory collection for one run and
// coordinates the builder, the query engine, and the store.
// Holds no UI state; the CLI passes it around explicitly.

use crate::app::store::{LoadedRecords, RecordStore};
use crate::core::builder::{self, RawFields};
use crate::core::filter::{self, FilterCriteria};
use crate::core::model::Record;
use crate::core::query;
use crate::util::constants::SCHEMA_VERSION;
use crate::util::error::{Result, StorageError, ValidationError};

/// The loaded collection plus the store it came from.
#[derive(Debug)]
pub struct Catalog {
    store: RecordStore,
    records: Vec<Record>,
    /// Schema version of the file as it was loaded.
    loaded_version: u32,
    /// Non-fatal warnings from the last load.
    warnings: Vec<String>,
}

impl Catalog {
    /// Load the collection from `store`.
    pub fn open(store: RecordStore) -> Result<Self> {
        let LoadedRecords {
            records,
            version,
            warnings,
        } = store.load()?;

        Ok(Self {
            store,
            records,
            loaded_version: version,
            warnings,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Warnings raised while loading (lossy migrations, duplicate codes).
    pub fn load_warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Whether the file on disk predates the current schema.
    pub fn needs_migration(&self) -> bool {
        self.loaded_version < SCHEMA_VERSION
    }

    /// Look up a record by code or color code.
    pub fn find(&self, identifier: &str) -> Option<&Record> {
        query::find_by_identifier(identifier, &self.records)
    }

    /// Partial, case-insensitive match on codes and colors.
    pub fn search(&self, term: &str) -> Vec<&Record> {
        query::search(term, &self.records)
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Record> {
        filter::filter(&self.records, criteria)
    }

    /// Build a new record, append it, and persist the collection.
    ///
    /// Rejects a code that is already taken. If the save fails the record is
    /// removed again so memory and disk stay in step.
    pub fn add(&mut self, raw: &RawFields) -> Result<&Record> {
        let record = builder::build(raw)?;
        if self.code_taken(&record.code, None) {
            return Err(ValidationError::DuplicateCode { code: record.code }.into());
        }

        let code = record.code.clone();
        self.records.push(record);
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e.into());
        }

        tracing::info!(code = %code, total = self.records.len(), "Record added");
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Merge `raw` into the record matching `identifier` and persist.
    ///
    /// Returns `Ok(None)` when no record matches. Fields absent from `raw`
    /// keep their current values. A changed code must not collide with
    /// another record. On save failure the previous record is restored.
    pub fn update(&mut self, identifier: &str, raw: &RawFields) -> Result<Option<&Record>> {
        let Some(index) = query::position_by_identifier(identifier, &self.records) else {
            tracing::debug!(identifier, "Update target not found");
            return Ok(None);
        };

        let updated = builder::apply_patch(&self.records[index], raw)?;
        if self.code_taken(&updated.code, Some(index)) {
            return Err(ValidationError::DuplicateCode { code: updated.code }.into());
        }

        let previous = std::mem::replace(&mut self.records[index], updated);
        if let Err(e) = self.persist() {
            self.records[index] = previous;
            return Err(e.into());
        }

        tracing::info!(
            identifier,
            code = %self.records[index].code,
            "Record updated"
        );
        Ok(Some(&self.records[index]))
    }

    /// Write the collection back in the current schema.
    pub fn save(&mut self) -> Result<()> {
        Ok(self.persist()?)
    }

    fn persist(&mut self) -> std::result::Result<(), StorageError> {
        self.store.save(&self.records)?;
        self.loaded_version = SCHEMA_VERSION;
        Ok(())
    }

    /// Blank codes (legacy records awaiting one) never collide.
    fn code_taken(&self, code: &str, except: Option<usize>) -> bool {
        !code.is_empty()
            && self
                .records
                .iter()
                .enumerate()
                .any(|(i, r)| Some(i) != except && r.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterValue;
    use crate::core::model::{CleanStandard, Field, Finish};
    use crate::util::error::CatalogError;
    use tempfile::TempDir;

    fn raw(code: &str, colors: &str) -> RawFields {
        RawFields {
            code: Some(code.to_string()),
            colors: Some(colors.to_string()),
            ..Default::default()
        }
    }

    fn open_empty(dir: &TempDir) -> Catalog {
        Catalog::open(RecordStore::new(dir.path().join("products.json"))).unwrap()
    }

    #[test]
    fn test_add_persists_and_normalises() {
        let dir = TempDir::new().unwrap();
        let mut catalog = open_empty(&dir);

        let added = catalog.add(&raw(" abc12 ", " rd01 , RD02,,  ")).unwrap();
        assert_eq!(added.code, "ABC12");
        assert_eq!(added.colors, vec!["RD01", "RD02"]);

        let reopened = Catalog::open(catalog.store().clone()).unwrap();
        assert_eq!(reopened.records(), catalog.records());
        assert!(reopened.find("RD02").is_some());
    }

    #[test]
    fn test_add_rejects_duplicate_code() {
        let dir = TempDir::new().unwrap();
        let mut catalog = open_empty(&dir);
        catalog.add(&raw("T01", "RD01")).unwrap();

        let err = catalog.add(&raw("t01", "BL01")).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::DuplicateCode { .. })
        ));
        assert_eq!(catalog.records().len(), 1);
    }

    #[test]
    fn test_add_rejects_missing_code() {
        let dir = TempDir::new().unwrap();
        let mut catalog = open_empty(&dir);
        let err = catalog.add(&raw("   ", "RD01")).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::MissingCode)
        ));
        assert!(catalog.records().is_empty());
    }

    #[test]
    fn test_update_merges_provided_fields() {
        let dir = TempDir::new().unwrap();
        let mut catalog = open_empty(&dir);
        catalog
            .add(&RawFields {
                name: Some("Velvet".to_string()),
                vegan: Some(true),
                ..raw("T01", "RD01")
            })
            .unwrap();

        let patch = RawFields {
            finish: Some("matte".to_string()),
            clean_standards: Some(vec!["CLEAN CREDO".to_string()]),
            ..Default::default()
        };
        let updated = catalog.update("RD01", &patch).unwrap().unwrap();

        assert_eq!(updated.name, "Velvet");
        assert!(updated.vegan);
        assert_eq!(updated.finish, Some(Finish::Matte));
        assert_eq!(updated.clean_standards, vec![CleanStandard::Credo]);

        let reopened = Catalog::open(catalog.store().clone()).unwrap();
        assert_eq!(reopened.find("T01").unwrap().finish, Some(Finish::Matte));
    }

    #[test]
    fn test_update_unknown_identifier() {
        let dir = TempDir::new().unwrap();
        let mut catalog = open_empty(&dir);
        catalog.add(&raw("T01", "RD01")).unwrap();
        assert!(catalog.update("ZZ99", &raw("T09", "")).unwrap().is_none());
    }

    #[test]
    fn test_update_rejects_code_collision() {
        let dir = TempDir::new().unwrap();
        let mut catalog = open_empty(&dir);
        catalog.add(&raw("T01", "RD01")).unwrap();
        catalog.add(&raw("T02", "BL01")).unwrap();

        let patch = RawFields {
            code: Some("T02".to_string()),
            ..Default::default()
        };
        assert!(catalog.update("T01", &patch).is_err());
        assert_eq!(catalog.find("T01").unwrap().colors, vec!["RD01"]);

        // Re-saving a record under its own code is fine.
        let same = RawFields {
            code: Some("t01".to_string()),
            ..Default::default()
        };
        assert!(catalog.update("T01", &same).unwrap().is_some());
    }

    #[test]
    fn test_blank_codes_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[{"code": "", "colori": ["RD08"]}, {"code": "", "colori": ["RD09"]}]"#,
        )
        .unwrap();
        let mut catalog = Catalog::open(RecordStore::new(&path)).unwrap();

        let patch = RawFields {
            name: Some("draft".to_string()),
            ..Default::default()
        };
        let updated = catalog.update("RD09", &patch).unwrap().unwrap();
        assert_eq!(updated.code, "");
        assert_eq!(updated.name, "draft");
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let dir = TempDir::new().unwrap();
        let mut catalog = open_empty(&dir);
        catalog.add(&raw("T01", "RD01")).unwrap();

        let tmp = crate::platform::fs::temp_path(catalog.store().path());
        std::fs::create_dir(&tmp).unwrap();
        std::fs::write(tmp.join("block"), b"x").unwrap();

        assert!(catalog.add(&raw("T02", "BL01")).is_err());
        assert_eq!(catalog.records().len(), 1);

        let patch = RawFields {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(catalog.update("T01", &patch).is_err());
        assert_eq!(catalog.find("T01").unwrap().name, "");
    }

    #[test]
    fn test_filter_and_search() {
        let dir = TempDir::new().unwrap();
        let mut catalog = open_empty(&dir);
        catalog
            .add(&RawFields {
                vegan: Some(true),
                ..raw("T01", "RD01, RD02")
            })
            .unwrap();
        catalog.add(&raw("T02", "BL07")).unwrap();

        let criteria = FilterCriteria::new().with(Field::Vegan, FilterValue::Flag(true));
        let hits = catalog.filter(&criteria);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "T01");

        let found: Vec<&str> = catalog.search("rd0").iter().map(|r| r.code.as_str()).collect();
        assert_eq!(found, vec!["T01"]);
    }
}
