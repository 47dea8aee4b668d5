// TextureCatalog - tests/e2e_catalog.rs
//
// End-to-end tests for the catalog pipeline.
//
// These tests exercise the real filesystem, the real store, and the real
// legacy migration: a legacy data file on disk is loaded, queried,
// edited, saved in the current schema, and exported.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use texture_catalog::app::catalog::Catalog;
use texture_catalog::app::store::RecordStore;
use texture_catalog::core::builder::RawFields;
use texture_catalog::core::export::{self, DocumentLayout};
use texture_catalog::core::filter::{FilterCriteria, FilterValue};
use texture_catalog::core::model::{CleanStandard, Coverage, Family, Field, Record, SampleRoom};
use texture_catalog::util::constants::{PAGE_BREAK, SCHEMA_VERSION};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to an on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy the legacy fixture into `dir` and return the data file path.
fn legacy_data_file(dir: &Path) -> PathBuf {
    let path = dir.join("products.json");
    fs::copy(fixture("legacy_prodotti.json"), &path).unwrap();
    path
}

fn codes<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    records.into_iter().map(|r| r.code.clone()).collect()
}

// =============================================================================
// Legacy load
// =============================================================================

#[test]
fn e2e_legacy_file_is_migrated_on_load() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::open(RecordStore::new(legacy_data_file(dir.path()))).unwrap();

    assert!(catalog.needs_migration());
    assert_eq!(codes(catalog.records()), vec!["T01", "T02", "T03"]);

    let t01 = catalog.find("T01").unwrap();
    assert_eq!(t01.name, "Rossetto Crème Vellutato");
    assert_eq!(t01.colors, vec!["RD01", "RD02"]);
    assert_eq!(t01.naturalness, "87%");
    assert_eq!(t01.ph, "6.5");
    assert!(t01.talc_free && t01.microplastic_free && t01.paraben_free);
    assert_eq!(t01.family, Some(Family::Anhydrous));
    assert_eq!(t01.coverage, Some(Coverage::High));
    assert_eq!(t01.present_in_sample_room, Some(SampleRoom::Yes));
    assert_eq!(t01.tests_performed, vec!["stabilità", "compatibilità"]);
    assert_eq!(t01.packaging_materials, "PP, alluminio");

    let t02 = catalog.find("BL07").unwrap();
    assert_eq!(t02.code, "T02");
    assert_eq!(t02.clean_standards, vec![CleanStandard::NoClean]);
    assert!(!t02.talc_free);

    // `clean: true` names no standard and is reported.
    let t03 = catalog.find("T03").unwrap();
    assert!(t03.clean_standards.is_empty());
    assert!(t03.colors.is_empty());
    assert_eq!(catalog.load_warnings().len(), 1);
    assert!(catalog.load_warnings()[0].contains("T03"));
}

#[test]
fn e2e_migrate_rewrites_current_schema() {
    let dir = TempDir::new().unwrap();
    let path = legacy_data_file(dir.path());
    let mut catalog = Catalog::open(RecordStore::new(&path)).unwrap();
    let before = catalog.records().to_vec();

    catalog.save().unwrap();
    assert!(!catalog.needs_migration());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n    \"version\": 2,"));
    assert!(text.contains("Rossetto Crème Vellutato"));
    assert!(text.contains("\"finish\": \"\""), "unset option written as empty text");

    let reopened = Catalog::open(RecordStore::new(&path)).unwrap();
    assert!(!reopened.needs_migration());
    assert_eq!(reopened.records(), before.as_slice());

    let loaded = RecordStore::new(&path).load().unwrap();
    assert_eq!(loaded.version, SCHEMA_VERSION);
}

#[test]
fn e2e_blank_legacy_code_can_be_repaired() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prodotti.json");
    fs::write(
        &path,
        r#"[
            {"codice_texture": "T01", "colori": ["RD01"]},
            {"codice_texture": "", "nome_prodotto": "bozza", "colori": ["RD09"]},
            {"codice_texture": " ", "nome_prodotto": "seconda bozza"}
        ]"#,
    )
    .unwrap();

    let mut catalog = Catalog::open(RecordStore::new(&path)).unwrap();
    assert_eq!(catalog.records().len(), 3);
    assert_eq!(catalog.load_warnings().len(), 2);
    assert!(catalog.find("").is_none());

    let repaired = catalog
        .update(
            "RD09",
            &RawFields {
                code: Some("t09".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(repaired.name, "bozza");

    let reopened = Catalog::open(RecordStore::new(&path)).unwrap();
    assert!(!reopened.needs_migration());
    assert_eq!(codes(reopened.records()), vec!["T01", "T09", ""]);
    assert!(reopened.load_warnings().is_empty());
}

// =============================================================================
// Query
// =============================================================================

#[test]
fn e2e_lookup_and_clean_filter() {
    let dir = TempDir::new().unwrap();
    let mut catalog = Catalog::open(RecordStore::new(dir.path().join("products.json"))).unwrap();
    catalog
        .add(&RawFields {
            code: Some("T01".to_string()),
            colors: Some("RD01".to_string()),
            clean_standards: Some(vec!["CLEAN SEPHORA".to_string()]),
            ..Default::default()
        })
        .unwrap();
    catalog
        .add(&RawFields {
            code: Some("T02".to_string()),
            colors: Some("RD02".to_string()),
            ..Default::default()
        })
        .unwrap();

    let criteria = FilterCriteria::new().with(
        Field::CleanStandards,
        FilterValue::any_of(["CLEAN SEPHORA"]),
    );
    assert_eq!(codes(catalog.filter(&criteria)), vec!["T01"]);
    assert_eq!(catalog.find("RD02").unwrap().code, "T02");
    assert!(catalog.find("ZZ").is_none());
}

#[test]
fn e2e_naturalness_thresholds() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::open(RecordStore::new(legacy_data_file(dir.path()))).unwrap();

    let at_least = |n| {
        let criteria = FilterCriteria::new().with(Field::Naturalness, FilterValue::AtLeast(n));
        codes(catalog.filter(&criteria))
    };

    assert_eq!(at_least(80), vec!["T01", "T02"]);
    assert_eq!(at_least(87), vec!["T01"]);
    assert!(at_least(88).is_empty());
    // "n/a" never satisfies a threshold, not even zero.
    assert_eq!(at_least(0), vec!["T01", "T02"]);
}

// =============================================================================
// Edit
// =============================================================================

#[test]
fn e2e_add_and_update_survive_reload() {
    let dir = TempDir::new().unwrap();
    let path = legacy_data_file(dir.path());
    let mut catalog = Catalog::open(RecordStore::new(&path)).unwrap();

    catalog
        .add(&RawFields {
            code: Some(" t04 ".to_string()),
            name: Some("Terra Cotta".to_string()),
            colors: Some(" br01 , ,br02".to_string()),
            family: Some("cotto".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert!(catalog
        .add(&RawFields {
            code: Some("T04".to_string()),
            ..Default::default()
        })
        .is_err());

    let updated = catalog
        .update(
            "BL07",
            &RawFields {
                vegan: Some(true),
                markets: Some("UE, UK".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Fondotinta Luminoso");

    // Saving through add/update also upgrades the legacy file.
    let reopened = Catalog::open(RecordStore::new(&path)).unwrap();
    assert!(!reopened.needs_migration());
    assert_eq!(codes(reopened.records()), vec!["T01", "T02", "T03", "T04"]);

    let t04 = reopened.find("BR02").unwrap();
    assert_eq!(t04.code, "T04");
    assert_eq!(t04.colors, vec!["BR01", "BR02"]);
    assert_eq!(t04.family, Some(Family::Baked));

    let t02 = reopened.find("T02").unwrap();
    assert!(t02.vegan);
    assert_eq!(t02.markets, vec!["UE", "UK"]);
    assert!(!dir.path().join("products.json.tmp").exists());
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_exports_filtered_selection() {
    let dir = TempDir::new().unwrap();
    let catalog = Catalog::open(RecordStore::new(legacy_data_file(dir.path()))).unwrap();

    let criteria = FilterCriteria::new().with(Field::Vegan, FilterValue::Flag(false));
    let selected: Vec<_> = catalog.filter(&criteria).into_iter().cloned().collect();
    assert_eq!(codes(&selected), vec!["T02", "T03"]);

    let table = String::from_utf8(export::export_table_csv(&selected).unwrap()).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("T02,Fondotinta Luminoso,BL07,80%,UE,,NO CLEAN,emulsion,"));

    let json = String::from_utf8(export::export_json(&selected).unwrap()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);

    let t01 = catalog.find("RD01").unwrap();
    let layout = DocumentLayout {
        page_lines: 15,
        line_width: 40,
    };
    let sheet = String::from_utf8(export::export_document(t01, &layout).unwrap()).unwrap();
    let pages: Vec<&str> = sheet.split(PAGE_BREAK).collect();
    assert!(pages.len() >= 2);
    assert!(pages[0].starts_with("Product sheet T01 (page 1/"));
    assert!(sheet.contains("Name: Rossetto Crème Vellutato"));
    assert!(sheet.lines().all(|l| l.chars().count() <= 40));
    assert_eq!(export::document_file_name(t01), "T01_sheet.txt");
}
