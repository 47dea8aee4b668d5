// TextureCatalog - core/filter.rs
//
// Composable filter engine for catalog records.
// All active criteria are AND-combined.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Field, FieldValue, Record};
use crate::util::error::ParseError;
use std::collections::BTreeMap;

/// A single constraint on one record field.
///
/// The variant decides the matching rule, not the field: any criterion can
/// be placed on any field, and a type mismatch simply fails to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Field must be a boolean equal to this value.
    Flag(bool),

    /// Field text must equal this value exactly (list fields: contain it).
    /// Empty = no constraint.
    Equals(String),

    /// Field values must overlap these values (scalar fields count as a
    /// one-element list). Empty = no constraint.
    AnyOf(Vec<String>),

    /// Field is a percentage that must be at least this value.
    /// Unparseable percentages never match.
    AtLeast(u32),
}

impl FilterValue {
    /// Convenience constructor for list-intersection criteria.
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Returns true if this criterion constrains nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Equals(s) => s.is_empty(),
            FilterValue::AnyOf(v) => v.is_empty(),
            FilterValue::Flag(_) | FilterValue::AtLeast(_) => false,
        }
    }

    /// Check one field value against this criterion.
    pub fn matches(&self, value: &FieldValue<'_>) -> bool {
        match (self, value) {
            (FilterValue::Flag(want), FieldValue::Flag(have)) => want == have,
            (FilterValue::Flag(_), _) => false,

            (FilterValue::Equals(want), FieldValue::Text(have)) => want == have,
            (FilterValue::Equals(want), FieldValue::List(items)) => {
                items.iter().any(|item| item == want)
            }
            (FilterValue::Equals(_), FieldValue::Flag(_)) => false,

            (FilterValue::AnyOf(wanted), FieldValue::List(items)) => {
                items.iter().any(|item| wanted.iter().any(|w| w == item))
            }
            (FilterValue::AnyOf(wanted), FieldValue::Text(have)) => {
                wanted.iter().any(|w| w == have)
            }
            (FilterValue::AnyOf(_), FieldValue::Flag(_)) => false,

            (FilterValue::AtLeast(min), FieldValue::Text(raw)) => match parse_percentage(raw) {
                Ok(pct) => pct >= *min,
                Err(e) => {
                    tracing::trace!(error = %e, "Percentage threshold skipped record");
                    false
                }
            },
            (FilterValue::AtLeast(_), _) => false,
        }
    }
}

/// Complete filter state: at most one criterion per field.
///
/// Keys are independent, so evaluation order never changes the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    criteria: BTreeMap<Field, FilterValue>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: Field, value: FilterValue) -> Self {
        self.insert(field, value);
        self
    }

    /// Set the criterion for `field`, replacing any previous one.
    pub fn insert(&mut self, field: Field, value: FilterValue) {
        self.criteria.insert(field, value);
    }

    /// Set the criterion only when one is given.
    pub fn insert_opt(&mut self, field: Field, value: Option<FilterValue>) {
        if let Some(value) = value {
            self.insert(field, value);
        }
    }

    /// Combine two criteria sets. On a shared key, `other` wins.
    pub fn merge(mut self, other: FilterCriteria) -> Self {
        self.criteria.extend(other.criteria);
        self
    }

    /// Returns true if no criterion constrains anything.
    pub fn is_empty(&self) -> bool {
        self.criteria.values().all(FilterValue::is_empty)
    }

    /// Number of criteria that actually constrain.
    pub fn active_count(&self) -> usize {
        self.criteria.values().filter(|v| !v.is_empty()).count()
    }

    /// Iterate the active criteria in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FilterValue)> {
        self.criteria
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(f, v)| (*f, v))
    }

    /// Check if a single record matches all active criteria.
    pub fn matches(&self, record: &Record) -> bool {
        self.iter()
            .all(|(field, value)| value.matches(&record.field(field)))
    }
}

/// Apply filters to a slice of records, returning indices of matching records.
///
/// Indices refer to the original slice and are in ascending order.
pub fn apply_filters(records: &[Record], criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_empty() {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(idx, _)| idx)
        .collect()
}

/// Apply filters and borrow the matching records, in input order.
pub fn filter<'a>(records: &'a [Record], criteria: &FilterCriteria) -> Vec<&'a Record> {
    apply_filters(records, criteria)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

/// Parse percentage text such as `"87%"` or `" 87 "` into an integer.
pub fn parse_percentage(raw: &str) -> Result<u32, ParseError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    digits.parse().map_err(|_| ParseError::InvalidPercentage {
        raw: raw.to_string(),
    })
}
