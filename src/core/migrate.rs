// TextureCatalog - core/migrate.rs
//
// One-time conversion of legacy records into the canonical schema.
// Core layer: operates on already-parsed JSON values, never touches disk.
//
// Legacy collections are bare JSON arrays of loosely-typed mappings written
// by earlier revisions of the data-entry tool. Field names drifted between
// revisions (Italian and English keys, `clean` as a boolean or a list,
// inverted-polarity "contains_*" flags). Each record is mapped onto
// `RawFields` and run through the builder's patch rules, so migrated
// records are normalised like newly entered ones. List fields stored as
// JSON arrays keep their entries whole; only legacy comma strings are split.
// A blank code is kept and reported rather than rejected.

use crate::core::builder::{self, RawFields};
use crate::core::model::{CleanStandard, OptionSet, Record};
use serde_json::{Map, Value};

/// Outcome of migrating one legacy record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migrated {
    pub record: Record,
    /// Lossy or ambiguous conversions worth reporting to the user.
    pub warnings: Vec<String>,
}

/// Legacy key aliases for each canonical field, canonical name first.
const CODE_KEYS: &[&str] = &["code", "codice_texture", "codice"];
const NAME_KEYS: &[&str] = &["name", "nome_prodotto", "nome"];
const COLOR_KEYS: &[&str] = &["colors", "colori"];
const NATURALNESS_KEYS: &[&str] = &["naturalness", "naturalita", "naturalità"];
const MARKET_KEYS: &[&str] = &["markets", "mercati"];
const FLAG_KEYS: &[&str] = &["flags_reported", "segnalazioni"];
const CLEAN_KEYS: &[&str] = &["clean_standards", "clean"];
const FAMILY_KEYS: &[&str] = &["family", "famiglia"];
const SPF_KEYS: &[&str] = &["spf"];
const PLUMPING_KEYS: &[&str] = &["plumping"];
const PH_KEYS: &[&str] = &["ph"];
const RSPO_KEYS: &[&str] = &["rspo"];
const SAMPLABLE_KEYS: &[&str] = &["samplable", "campionabile"];
const SAMPLE_ROOM_KEYS: &[&str] = &["present_in_sample_room", "presente_in_sala"];
const PACKAGING_MATERIAL_KEYS: &[&str] = &["packaging_materials", "materiali_packaging"];
const PACKAGING_KEYS: &[&str] = &["packaging"];
const TEST_KEYS: &[&str] = &["tests_performed", "test"];
const FINISH_KEYS: &[&str] = &["finish"];
const COVERAGE_KEYS: &[&str] = &["coverage", "coprenza"];
const NOTES_KEYS: &[&str] = &["raw_material_notes", "note_materie_prime"];
const COST_KEYS: &[&str] = &["cost_per_kg", "costo_al_kg"];

const TALC_FREE_KEYS: &[&str] = &["talc_free"];
const TALC_CONTAINS_KEYS: &[&str] = &["contains_talc", "talco"];
const MICROPLASTIC_FREE_KEYS: &[&str] = &["microplastic_free"];
const MICROPLASTIC_CONTAINS_KEYS: &[&str] = &["contains_microplastics", "microplastiche"];
const PARABEN_FREE_KEYS: &[&str] = &["paraben_free"];
const VEGAN_KEYS: &[&str] = &["vegan"];

/// Convert one legacy mapping into a canonical record.
///
/// Fails with a human-readable reason when a value has the wrong JSON type
/// or an option field holds an unknown label. Callers report the failing
/// index. A record without a code still migrates, with a warning.
pub fn migrate_record(value: &Value) -> Result<Migrated, String> {
    let map = value
        .as_object()
        .ok_or_else(|| format!("expected an object, found {}", type_name(value)))?;

    let mut warnings = Vec::new();

    let colors = list(map, COLOR_KEYS)?;
    let markets = list(map, MARKET_KEYS)?;
    let flags_reported = list(map, FLAG_KEYS)?;
    let tests_performed = list(map, TEST_KEYS)?;

    let raw = RawFields {
        code: text(map, CODE_KEYS)?,
        name: text(map, NAME_KEYS)?,
        colors: None,
        naturalness: percentage(map, NATURALNESS_KEYS)?,
        markets: None,
        flags_reported: None,
        clean_standards: clean_standards(map, &mut warnings)?,
        family: text(map, FAMILY_KEYS)?,
        spf: text(map, SPF_KEYS)?,
        plumping: text(map, PLUMPING_KEYS)?,
        ph: text(map, PH_KEYS)?,
        talc_free: free_flag(map, TALC_FREE_KEYS, TALC_CONTAINS_KEYS)?,
        microplastic_free: free_flag(
            map,
            MICROPLASTIC_FREE_KEYS,
            MICROPLASTIC_CONTAINS_KEYS,
        )?,
        paraben_free: flag(map, PARABEN_FREE_KEYS)?,
        vegan: flag(map, VEGAN_KEYS)?,
        rspo: text(map, RSPO_KEYS)?,
        samplable: text(map, SAMPLABLE_KEYS)?,
        present_in_sample_room: text(map, SAMPLE_ROOM_KEYS)?,
        packaging_materials: text(map, PACKAGING_MATERIAL_KEYS)?,
        packaging: text(map, PACKAGING_KEYS)?,
        tests_performed: None,
        finish: text(map, FINISH_KEYS)?,
        coverage: text(map, COVERAGE_KEYS)?,
        raw_material_notes: text(map, NOTES_KEYS)?,
        cost_per_kg: text(map, COST_KEYS)?,
    };

    let mut record = builder::apply_patch(&Record::default(), &raw).map_err(|e| e.to_string())?;
    if let Some(colors) = colors {
        record.colors = colors.into_iter().map(|c| c.to_uppercase()).collect();
    }
    if let Some(markets) = markets {
        record.markets = markets;
    }
    if let Some(flags_reported) = flags_reported {
        record.flags_reported = flags_reported;
    }
    if let Some(tests_performed) = tests_performed {
        record.tests_performed = tests_performed;
    }

    if record.code.is_empty() {
        warnings.push(
            "no texture code; the record is reachable by color only until a code is set"
                .to_string(),
        );
    }

    Ok(Migrated { record, warnings })
}

/// First key present (and not null) among `keys`.
fn lookup<'a>(
    map: &'a Map<String, Value>,
    keys: &[&'static str],
) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|k| map.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Scalar text field. Numbers are accepted (pH and SPF were sometimes
/// typed as numbers) and rendered as written.
fn text(map: &Map<String, Value>, keys: &[&'static str]) -> Result<Option<String>, String> {
    match lookup(map, keys) {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.clone())),
        Some((_, Value::Number(n))) => Ok(Some(n.to_string())),
        Some((key, other)) => Err(format!("'{key}' should be text, found {}", type_name(other))),
    }
}

/// Percentage text; a bare number gains a trailing '%'.
fn percentage(map: &Map<String, Value>, keys: &[&'static str]) -> Result<Option<String>, String> {
    match lookup(map, keys) {
        Some((_, Value::Number(n))) => Ok(Some(format!("{n}%"))),
        _ => text(map, keys),
    }
}

/// List field. A JSON array keeps one entry per element (trimmed, blanks
/// dropped); an unsplit legacy string is split on commas.
fn list(map: &Map<String, Value>, keys: &[&'static str]) -> Result<Option<Vec<String>>, String> {
    match lookup(map, keys) {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(builder::split_list(s))),
        Some((key, Value::Array(items))) => {
            let mut entries = Vec::with_capacity(items.len());
            for item in items {
                let entry = match item {
                    Value::String(s) => s.trim().to_string(),
                    Value::Number(n) => n.to_string(),
                    other => {
                        return Err(format!(
                            "'{key}' entries should be text, found {}",
                            type_name(other)
                        ))
                    }
                };
                if !entry.is_empty() {
                    entries.push(entry);
                }
            }
            Ok(Some(entries))
        }
        Some((key, other)) => Err(format!(
            "'{key}' should be a list, found {}",
            type_name(other)
        )),
    }
}

fn flag(map: &Map<String, Value>, keys: &[&'static str]) -> Result<Option<bool>, String> {
    match lookup(map, keys) {
        None => Ok(None),
        Some((_, Value::Bool(b))) => Ok(Some(*b)),
        Some((key, other)) => Err(format!(
            "'{key}' should be a boolean, found {}",
            type_name(other)
        )),
    }
}

/// "Free of X" flag, read from the positive key or inverted from the legacy
/// "contains X" key. The positive key wins when both are present.
fn free_flag(
    map: &Map<String, Value>,
    free_keys: &[&'static str],
    contains_keys: &[&'static str],
) -> Result<Option<bool>, String> {
    match flag(map, free_keys)? {
        Some(free) => Ok(Some(free)),
        None => Ok(flag(map, contains_keys)?.map(|contains| !contains)),
    }
}

/// Clean standards in any of their historical shapes:
/// a list of labels, a single label, or a boolean "is clean".
fn clean_standards(
    map: &Map<String, Value>,
    warnings: &mut Vec<String>,
) -> Result<Option<Vec<String>>, String> {
    match lookup(map, CLEAN_KEYS) {
        None => Ok(None),
        Some((_, Value::Array(items))) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!(
                    "clean standard entries should be text, found {}",
                    type_name(other)
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some((_, Value::String(s))) => Ok(Some(vec![s.clone()])),
        Some((_, Value::Bool(false))) => Ok(Some(vec![CleanStandard::NoClean.label().to_string()])),
        Some((_, Value::Bool(true))) => {
            warnings.push(
                "boolean 'clean = true' does not name a standard; clean standards left empty"
                    .to_string(),
            );
            Ok(Some(Vec::new()))
        }
        Some((key, other)) => Err(format!("'{key}' should be a list, found {}", type_name(other))),
    }
}
