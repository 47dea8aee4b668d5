// TextureCatalog - core/query.rs
//
// Identifier lookup over an in-memory record collection.
// Core layer: pure functions, no I/O.
//
// A record is addressable by its code or by any of its color codes.
// Lookups are exact and case-sensitive against the canonical (uppercased)
// values; `search` is the forgiving partial-match variant used for
// interactive browsing.

use crate::core::model::Record;

/// Returns true if `identifier` is the record's code or one of its colors.
/// An empty identifier matches nothing, so records without a code stay
/// unaddressable by code.
pub fn matches_identifier(record: &Record, identifier: &str) -> bool {
    !identifier.is_empty()
        && (record.code == identifier || record.colors.iter().any(|c| c == identifier))
}

/// Find the first record whose code or colors contain `identifier` exactly.
///
/// Collection order decides between duplicates. `None` is an ordinary
/// outcome, not a failure.
pub fn find_by_identifier<'a>(identifier: &str, records: &'a [Record]) -> Option<&'a Record> {
    records.iter().find(|r| matches_identifier(r, identifier))
}

/// Index of the record `find_by_identifier` would return.
pub fn position_by_identifier(identifier: &str, records: &[Record]) -> Option<usize> {
    records.iter().position(|r| matches_identifier(r, identifier))
}

/// Partial lookup: every record whose code or any color contains `term`.
///
/// The term is trimmed and uppercased first, so `" rd0"` finds `RD01`.
/// An empty term matches nothing. Results keep collection order.
pub fn search<'a>(term: &str, records: &'a [Record]) -> Vec<&'a Record> {
    let needle = term.trim().to_uppercase();
    if needle.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| r.code.contains(&needle) || r.colors.iter().any(|c| c.contains(&needle)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(code: &str, colors: &[&str]) -> Record {
        Record {
            code: code.to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            make_record("T01", &["RD01"]),
            make_record("T02", &["RD02", "BR10"]),
            make_record("T10", &[]),
        ]
    }

    #[test]
    fn test_find_by_code() {
        let records = sample();
        assert_eq!(find_by_identifier("T02", &records).unwrap().code, "T02");
    }

    #[test]
    fn test_find_by_color() {
        let records = sample();
        assert_eq!(find_by_identifier("BR10", &records).unwrap().code, "T02");
        assert_eq!(position_by_identifier("RD01", &records), Some(0));
    }

    #[test]
    fn test_find_is_case_sensitive() {
        let records = sample();
        assert!(find_by_identifier("t01", &records).is_none());
        assert!(find_by_identifier("ZZ", &records).is_none());
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut records = sample();
        let mut dup = make_record("T01", &["XX"]);
        dup.name = "second".to_string();
        records.push(dup);
        let found = find_by_identifier("T01", &records).unwrap();
        assert!(found.name.is_empty());
    }

    #[test]
    fn test_color_match_wins_by_collection_order() {
        // "T10" is listed as a color of an earlier record.
        let records = vec![make_record("A1", &["T10"]), make_record("T10", &[])];
        assert_eq!(find_by_identifier("T10", &records).unwrap().code, "A1");
    }

    #[test]
    fn test_search_partial_and_case_folded() {
        let records = sample();
        let codes: Vec<&str> = search(" t1", &records).iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["T10"]);

        let codes: Vec<&str> = search("rd0", &records).iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["T01", "T02"]);
    }

    #[test]
    fn test_empty_identifier_matches_nothing() {
        let records = vec![make_record("", &["RD09"]), make_record("T01", &[])];
        assert!(find_by_identifier("", &records).is_none());
        assert_eq!(position_by_identifier("RD09", &records), Some(0));
    }

    #[test]
    fn test_search_empty_term_matches_nothing() {
        assert!(search("   ", &sample()).is_empty());
    }
}
