// TextureCatalog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::LIST_JOIN_SEPARATOR;
use crate::util::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Option sets (constrained string fields)
// =============================================================================

/// A field whose value is drawn from a small fixed set of labels.
///
/// Parsing is case-insensitive and also accepts the labels used by the
/// original Italian data entry forms, so legacy records and hand-typed
/// input resolve to the same variant.
pub trait OptionSet: Sized + Copy + 'static {
    /// Field name used in validation messages.
    const FIELD: &'static str;

    /// Every variant in display order.
    fn all() -> &'static [Self];

    /// Canonical label, as written to disk and shown to the user.
    fn label(&self) -> &'static str;

    /// Alternative spellings accepted on input.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Resolve a raw label to a variant.
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let wanted = raw.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|v| {
                v.label().to_lowercase() == wanted
                    || v.aliases().iter().any(|a| a.to_lowercase() == wanted)
            })
            .ok_or_else(|| ValidationError::UnknownOption {
                field: Self::FIELD,
                value: raw.trim().to_string(),
                expected: Self::expected(),
            })
    }

    /// Comma-separated canonical labels, for error messages and help text.
    fn expected() -> String {
        Self::all()
            .iter()
            .map(|v| v.label())
            .collect::<Vec<_>>()
            .join(LIST_JOIN_SEPARATOR)
    }
}

/// Implements Display and the String conversions serde uses to read and
/// write an option set by its label.
macro_rules! label_conversions {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as OptionSet>::parse(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ValidationError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                <$ty as OptionSet>::parse(&s)
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> Self {
                v.label().to_string()
            }
        }
    };
}

/// Clean-beauty standards a texture is certified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CleanStandard {
    NoClean,
    Sephora,
    Credo,
    PharmaCos,
}

impl OptionSet for CleanStandard {
    const FIELD: &'static str = "clean standard";

    fn all() -> &'static [Self] {
        &[Self::NoClean, Self::Sephora, Self::Credo, Self::PharmaCos]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::NoClean => "NO CLEAN",
            Self::Sephora => "CLEAN SEPHORA",
            Self::Credo => "CLEAN CREDO",
            Self::PharmaCos => "CLEAN PHARMA COS",
        }
    }
}

label_conversions!(CleanStandard);

/// Product family (base formulation type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Family {
    Anhydrous,
    Emulsion,
    Powder,
    Baked,
    Hybrid,
}

impl OptionSet for Family {
    const FIELD: &'static str = "family";

    fn all() -> &'static [Self] {
        &[
            Self::Anhydrous,
            Self::Emulsion,
            Self::Powder,
            Self::Baked,
            Self::Hybrid,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Anhydrous => "anhydrous",
            Self::Emulsion => "emulsion",
            Self::Powder => "powder",
            Self::Baked => "baked",
            Self::Hybrid => "hybrid",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Anhydrous => &["anidro"],
            Self::Emulsion => &["emulsione"],
            Self::Powder => &["polvere"],
            Self::Baked => &["cotto"],
            Self::Hybrid => &["ibrido"],
        }
    }
}

label_conversions!(Family);

/// Whether physical samples of the texture can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Samplability {
    Samplable,
    NotSamplable,
}

impl OptionSet for Samplability {
    const FIELD: &'static str = "samplable status";

    fn all() -> &'static [Self] {
        &[Self::Samplable, Self::NotSamplable]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Samplable => "samplable",
            Self::NotSamplable => "not samplable",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Samplable => &["campionabile"],
            Self::NotSamplable => &["non campionabile"],
        }
    }
}

label_conversions!(Samplability);

/// Whether a sample is physically present in the sample room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SampleRoom {
    Yes,
    No,
}

impl OptionSet for SampleRoom {
    const FIELD: &'static str = "sample room presence";

    fn all() -> &'static [Self] {
        &[Self::Yes, Self::No]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Yes => &["sì", "si"],
            Self::No => &[],
        }
    }
}

label_conversions!(SampleRoom);

/// Visual finish of the applied texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Finish {
    Matte,
    Luminous,
    Satin,
    Velvet,
}

impl OptionSet for Finish {
    const FIELD: &'static str = "finish";

    fn all() -> &'static [Self] {
        &[Self::Matte, Self::Luminous, Self::Satin, Self::Velvet]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Matte => "Matte",
            Self::Luminous => "Luminous",
            Self::Satin => "Satin",
            Self::Velvet => "Velvet",
        }
    }
}

label_conversions!(Finish);

/// Coverage level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Coverage {
    Light,
    Medium,
    High,
}

impl OptionSet for Coverage {
    const FIELD: &'static str = "coverage";

    fn all() -> &'static [Self] {
        &[Self::Light, Self::Medium, Self::High]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Light => &["leggera"],
            Self::Medium => &["media"],
            Self::High => &["alta"],
        }
    }
}

label_conversions!(Coverage);

/// Serde adapter for optional option-set fields: `None` is written as the
/// empty string, and both `""` and `null` read back as `None`.
mod blank_option {
    use super::OptionSet;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: OptionSet,
        S: Serializer,
    {
        serializer.serialize_str(value.as_ref().map(|v| v.label()).unwrap_or(""))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: OptionSet,
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(label) => T::parse(label).map(Some).map_err(de::Error::custom),
        }
    }
}

// =============================================================================
// Record
// =============================================================================

/// One catalog entry describing a product texture and its attributes.
///
/// Field declaration order is the serialised order. Free-text fields use the
/// empty string for "not applicable"; list fields hold trimmed, non-empty
/// entries. Records are normally produced by `core::builder`, which upholds
/// those invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Unique texture code (trimmed, uppercased).
    pub code: String,
    pub name: String,
    /// Color codes; each one is also a lookup key for the record.
    pub colors: Vec<String>,
    /// Percentage text, e.g. "98%".
    pub naturalness: String,
    pub markets: Vec<String>,
    pub flags_reported: Vec<String>,
    pub clean_standards: Vec<CleanStandard>,
    #[serde(with = "blank_option")]
    pub family: Option<Family>,
    pub spf: String,
    pub plumping: String,
    pub ph: String,
    pub talc_free: bool,
    pub microplastic_free: bool,
    pub paraben_free: bool,
    pub vegan: bool,
    pub rspo: String,
    #[serde(with = "blank_option")]
    pub samplable: Option<Samplability>,
    #[serde(with = "blank_option")]
    pub present_in_sample_room: Option<SampleRoom>,
    pub packaging_materials: String,
    pub packaging: String,
    pub tests_performed: Vec<String>,
    #[serde(with = "blank_option")]
    pub finish: Option<Finish>,
    #[serde(with = "blank_option")]
    pub coverage: Option<Coverage>,
    pub raw_material_notes: String,
    pub cost_per_kg: String,
}

impl Record {
    /// Borrowed view of a single field, for generic filtering and export.
    pub fn field(&self, field: Field) -> FieldValue<'_> {
        fn list(items: &[String]) -> FieldValue<'_> {
            FieldValue::List(items.iter().map(String::as_str).collect())
        }
        fn choice<T: OptionSet>(value: Option<T>) -> FieldValue<'static> {
            FieldValue::Text(value.map(|v| v.label()).unwrap_or(""))
        }

        match field {
            Field::Code => FieldValue::Text(&self.code),
            Field::Name => FieldValue::Text(&self.name),
            Field::Colors => list(&self.colors),
            Field::Naturalness => FieldValue::Text(&self.naturalness),
            Field::Markets => list(&self.markets),
            Field::FlagsReported => list(&self.flags_reported),
            Field::CleanStandards => {
                FieldValue::List(self.clean_standards.iter().map(|c| c.label()).collect())
            }
            Field::Family => choice(self.family),
            Field::Spf => FieldValue::Text(&self.spf),
            Field::Plumping => FieldValue::Text(&self.plumping),
            Field::Ph => FieldValue::Text(&self.ph),
            Field::TalcFree => FieldValue::Flag(self.talc_free),
            Field::MicroplasticFree => FieldValue::Flag(self.microplastic_free),
            Field::ParabenFree => FieldValue::Flag(self.paraben_free),
            Field::Vegan => FieldValue::Flag(self.vegan),
            Field::Rspo => FieldValue::Text(&self.rspo),
            Field::Samplable => choice(self.samplable),
            Field::PresentInSampleRoom => choice(self.present_in_sample_room),
            Field::PackagingMaterials => FieldValue::Text(&self.packaging_materials),
            Field::Packaging => FieldValue::Text(&self.packaging),
            Field::TestsPerformed => list(&self.tests_performed),
            Field::Finish => choice(self.finish),
            Field::Coverage => choice(self.coverage),
            Field::RawMaterialNotes => FieldValue::Text(&self.raw_material_notes),
            Field::CostPerKg => FieldValue::Text(&self.cost_per_kg),
        }
    }

    /// One-line listing header: `CODE – name`.
    pub fn summary_line(&self) -> String {
        format!("{} – {}", self.code, self.name)
    }

    /// Short attribute line shown under the header in result listings.
    pub fn summary_details(&self) -> String {
        format!(
            "Colors: {} | Family: {} | Clean: {}",
            self.colors.join(LIST_JOIN_SEPARATOR),
            self.family.map(|f| f.label()).unwrap_or(""),
            self.field(Field::CleanStandards).render(),
        )
    }
}

// =============================================================================
// Field names and values
// =============================================================================

/// Names every record field. Declaration order matches `Record`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Code,
    Name,
    Colors,
    Naturalness,
    Markets,
    FlagsReported,
    CleanStandards,
    Family,
    Spf,
    Plumping,
    Ph,
    TalcFree,
    MicroplasticFree,
    ParabenFree,
    Vegan,
    Rspo,
    Samplable,
    PresentInSampleRoom,
    PackagingMaterials,
    Packaging,
    TestsPerformed,
    Finish,
    Coverage,
    RawMaterialNotes,
    CostPerKg,
}

impl Field {
    /// Returns all fields in record order.
    pub fn all() -> &'static [Field] {
        &[
            Field::Code,
            Field::Name,
            Field::Colors,
            Field::Naturalness,
            Field::Markets,
            Field::FlagsReported,
            Field::CleanStandards,
            Field::Family,
            Field::Spf,
            Field::Plumping,
            Field::Ph,
            Field::TalcFree,
            Field::MicroplasticFree,
            Field::ParabenFree,
            Field::Vegan,
            Field::Rspo,
            Field::Samplable,
            Field::PresentInSampleRoom,
            Field::PackagingMaterials,
            Field::Packaging,
            Field::TestsPerformed,
            Field::Finish,
            Field::Coverage,
            Field::RawMaterialNotes,
            Field::CostPerKg,
        ]
    }

    /// Serialised field name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::Name => "name",
            Field::Colors => "colors",
            Field::Naturalness => "naturalness",
            Field::Markets => "markets",
            Field::FlagsReported => "flags_reported",
            Field::CleanStandards => "clean_standards",
            Field::Family => "family",
            Field::Spf => "spf",
            Field::Plumping => "plumping",
            Field::Ph => "ph",
            Field::TalcFree => "talc_free",
            Field::MicroplasticFree => "microplastic_free",
            Field::ParabenFree => "paraben_free",
            Field::Vegan => "vegan",
            Field::Rspo => "rspo",
            Field::Samplable => "samplable",
            Field::PresentInSampleRoom => "present_in_sample_room",
            Field::PackagingMaterials => "packaging_materials",
            Field::Packaging => "packaging",
            Field::TestsPerformed => "tests_performed",
            Field::Finish => "finish",
            Field::Coverage => "coverage",
            Field::RawMaterialNotes => "raw_material_notes",
            Field::CostPerKg => "cost_per_kg",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> String {
        humanize(self.name())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::all()
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown field '{s}'"))
    }
}

/// Turns a snake_case key into a label: underscores become spaces and the
/// first letter is capitalised (`flags_reported` -> `Flags reported`).
pub fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Borrowed value of one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(Vec<&'a str>),
    Flag(bool),
}

impl FieldValue<'_> {
    /// Flattened display form: lists comma-joined, flags as `true`/`false`.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => (*s).to_string(),
            FieldValue::List(items) => items.join(LIST_JOIN_SEPARATOR),
            FieldValue::Flag(b) => b.to_string(),
        }
    }
}
