// TextureCatalog - core/builder.rs
//
// Normalises raw user-entered fields into canonical records.
// Core layer: accepts already-collected input, never persists.
//
// Normalisation rules:
//   - code: trimmed, uppercased, must not be empty
//   - comma lists: split on ',', pieces trimmed, empties dropped, order kept,
//     duplicates kept; colors are also uppercased
//   - free text: trimmed, "" means unset
//   - flags: false unless set
//   - option sets: parsed against their fixed labels; "" means unset

use crate::core::model::{
    CleanStandard, Coverage, Family, Finish, OptionSet, Record, SampleRoom, Samplability,
};
use crate::util::error::ValidationError;

/// Raw field values as collected from a form or command line.
///
/// `None` means "not provided". `build` treats it as empty/false;
/// `apply_patch` leaves the existing value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub code: Option<String>,
    pub name: Option<String>,
    /// Comma-separated color codes.
    pub colors: Option<String>,
    pub naturalness: Option<String>,
    /// Comma-separated market tags.
    pub markets: Option<String>,
    /// Comma-separated free-form notes.
    pub flags_reported: Option<String>,
    /// One entry per selected standard.
    pub clean_standards: Option<Vec<String>>,
    pub family: Option<String>,
    pub spf: Option<String>,
    pub plumping: Option<String>,
    pub ph: Option<String>,
    pub talc_free: Option<bool>,
    pub microplastic_free: Option<bool>,
    pub paraben_free: Option<bool>,
    pub vegan: Option<bool>,
    pub rspo: Option<String>,
    pub samplable: Option<String>,
    pub present_in_sample_room: Option<String>,
    pub packaging_materials: Option<String>,
    pub packaging: Option<String>,
    /// Comma-separated test names.
    pub tests_performed: Option<String>,
    pub finish: Option<String>,
    pub coverage: Option<String>,
    pub raw_material_notes: Option<String>,
    pub cost_per_kg: Option<String>,
}

impl RawFields {
    /// Returns true if no field was provided.
    pub fn is_empty(&self) -> bool {
        *self == RawFields::default()
    }
}

/// Build a new record from raw input.
pub fn build(raw: &RawFields) -> Result<Record, ValidationError> {
    let base = Record::default();
    let record = apply_patch(&base, raw)?;
    if record.code.is_empty() {
        return Err(ValidationError::MissingCode);
    }
    Ok(record)
}

/// Merge the provided fields of `raw` into a copy of `record`.
///
/// Each provided field is normalised with the same rules as `build` and
/// replaces the existing value; fields left as `None` are kept. Nothing is
/// changed if any provided value is invalid.
pub fn apply_patch(record: &Record, raw: &RawFields) -> Result<Record, ValidationError> {
    let mut out = record.clone();

    if let Some(code) = &raw.code {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(ValidationError::MissingCode);
        }
        out.code = code;
    }
    set_text(&mut out.name, &raw.name);
    if let Some(colors) = &raw.colors {
        out.colors = split_list(colors)
            .into_iter()
            .map(|c| c.to_uppercase())
            .collect();
    }
    set_text(&mut out.naturalness, &raw.naturalness);
    set_list(&mut out.markets, &raw.markets);
    set_list(&mut out.flags_reported, &raw.flags_reported);
    if let Some(selected) = &raw.clean_standards {
        out.clean_standards = parse_selections::<CleanStandard>(selected)?;
    }
    set_choice::<Family>(&mut out.family, &raw.family)?;
    set_text(&mut out.spf, &raw.spf);
    set_text(&mut out.plumping, &raw.plumping);
    set_text(&mut out.ph, &raw.ph);
    set_flag(&mut out.talc_free, raw.talc_free);
    set_flag(&mut out.microplastic_free, raw.microplastic_free);
    set_flag(&mut out.paraben_free, raw.paraben_free);
    set_flag(&mut out.vegan, raw.vegan);
    set_text(&mut out.rspo, &raw.rspo);
    set_choice::<Samplability>(&mut out.samplable, &raw.samplable)?;
    set_choice::<SampleRoom>(&mut out.present_in_sample_room, &raw.present_in_sample_room)?;
    set_text(&mut out.packaging_materials, &raw.packaging_materials);
    set_text(&mut out.packaging, &raw.packaging);
    set_list(&mut out.tests_performed, &raw.tests_performed);
    set_choice::<Finish>(&mut out.finish, &raw.finish)?;
    set_choice::<Coverage>(&mut out.coverage, &raw.coverage)?;
    set_text(&mut out.raw_material_notes, &raw.raw_material_notes);
    set_text(&mut out.cost_per_kg, &raw.cost_per_kg);

    Ok(out)
}

/// Canonical code form: trimmed and uppercased.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Split comma-separated text into trimmed, non-empty pieces.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

fn set_text(slot: &mut String, raw: &Option<String>) {
    if let Some(value) = raw {
        *slot = value.trim().to_string();
    }
}

fn set_list(slot: &mut Vec<String>, raw: &Option<String>) {
    if let Some(value) = raw {
        *slot = split_list(value);
    }
}

fn set_flag(slot: &mut bool, raw: Option<bool>) {
    if let Some(value) = raw {
        *slot = value;
    }
}

fn set_choice<T: OptionSet>(
    slot: &mut Option<T>,
    raw: &Option<String>,
) -> Result<(), ValidationError> {
    if let Some(value) = raw {
        *slot = parse_choice(value)?;
    }
    Ok(())
}

/// Parse an optional option-set value; blank input means unset.
pub fn parse_choice<T: OptionSet>(raw: &str) -> Result<Option<T>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        T::parse(trimmed).map(Some)
    }
}

/// Parse a multi-select, skipping blank entries.
pub fn parse_selections<T: OptionSet>(raw: &[String]) -> Result<Vec<T>, ValidationError> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(T::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_code(code: &str) -> RawFields {
        RawFields {
            code: Some(code.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_code_trimmed_and_uppercased() {
        let record = build(&raw_with_code(" abc12 ")).unwrap();
        assert_eq!(record.code, "ABC12");
    }

    #[test]
    fn test_colors_split_trimmed_uppercased() {
        let raw = RawFields {
            colors: Some(" rd01 , RD02,,  ".to_string()),
            ..raw_with_code("T01")
        };
        let record = build(&raw).unwrap();
        assert_eq!(record.colors, vec!["RD01", "RD02"]);
    }

    #[test]
    fn test_lists_keep_order_and_duplicates() {
        let raw = RawFields {
            markets: Some("USA, UE ,USA".to_string()),
            tests_performed: Some("stability,, patch test ".to_string()),
            ..raw_with_code("T01")
        };
        let record = build(&raw).unwrap();
        assert_eq!(record.markets, vec!["USA", "UE", "USA"]);
        assert_eq!(record.tests_performed, vec!["stability", "patch test"]);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let record = build(&raw_with_code("T01")).unwrap();
        assert!(!record.talc_free && !record.microplastic_free);
        assert!(!record.paraben_free && !record.vegan);
        assert_eq!(record.packaging, "");
        assert!(record.colors.is_empty());
        assert_eq!(record.family, None);
    }

    #[test]
    fn test_free_text_trimmed() {
        let raw = RawFields {
            packaging: Some("  jar 50ml ".to_string()),
            cost_per_kg: Some("   ".to_string()),
            ..raw_with_code("T01")
        };
        let record = build(&raw).unwrap();
        assert_eq!(record.packaging, "jar 50ml");
        assert_eq!(record.cost_per_kg, "");
    }

    #[test]
    fn test_empty_code_rejected() {
        assert_eq!(build(&raw_with_code("   ")), Err(ValidationError::MissingCode));
        assert_eq!(build(&RawFields::default()), Err(ValidationError::MissingCode));
    }

    #[test]
    fn test_options_parsed_and_blank_is_unset() {
        let raw = RawFields {
            family: Some("emulsione".to_string()),
            finish: Some("".to_string()),
            present_in_sample_room: Some("sì".to_string()),
            clean_standards: Some(vec!["CLEAN CREDO".to_string(), " ".to_string()]),
            ..raw_with_code("T01")
        };
        let record = build(&raw).unwrap();
        assert_eq!(record.family, Some(Family::Emulsion));
        assert_eq!(record.finish, None);
        assert_eq!(record.present_in_sample_room, Some(SampleRoom::Yes));
        assert_eq!(record.clean_standards, vec![CleanStandard::Credo]);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let raw = RawFields {
            coverage: Some("total".to_string()),
            ..raw_with_code("T01")
        };
        assert!(matches!(
            build(&raw),
            Err(ValidationError::UnknownOption { field: "coverage", .. })
        ));
    }

    #[test]
    fn test_patch_merges_only_provided_fields() {
        let original = build(&RawFields {
            name: Some("Velvet Lip".to_string()),
            colors: Some("RD01".to_string()),
            vegan: Some(true),
            ..raw_with_code("T01")
        })
        .unwrap();

        let patch = RawFields {
            colors: Some("rd01, rd05".to_string()),
            vegan: Some(false),
            ..Default::default()
        };
        let updated = apply_patch(&original, &patch).unwrap();

        assert_eq!(updated.code, "T01");
        assert_eq!(updated.name, "Velvet Lip");
        assert_eq!(updated.colors, vec!["RD01", "RD05"]);
        assert!(!updated.vegan);
    }

    #[test]
    fn test_patch_can_clear_option() {
        let original = build(&RawFields {
            finish: Some("Matte".to_string()),
            ..raw_with_code("T01")
        })
        .unwrap();
        let patch = RawFields {
            finish: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(apply_patch(&original, &patch).unwrap().finish, None);
    }

    #[test]
    fn test_invalid_patch_leaves_nothing_half_applied() {
        let original = build(&raw_with_code("T01")).unwrap();
        let patch = RawFields {
            name: Some("renamed".to_string()),
            family: Some("liquid".to_string()),
            ..Default::default()
        };
        assert!(apply_patch(&original, &patch).is_err());
        assert_eq!(original.name, "");
    }
}
