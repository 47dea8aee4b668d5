// TextureCatalog - cli.rs
//
// Command-line front end: argument definitions and command dispatch.
// Collects raw input, hands it to the catalog, and prints results.
// Carries no business rules of its own.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use texture_catalog::app::catalog::Catalog;
use texture_catalog::core::builder::{self, RawFields};
use texture_catalog::core::export::{self, DocumentLayout};
use texture_catalog::core::filter::{FilterCriteria, FilterValue};
use texture_catalog::core::model::{
    CleanStandard, Coverage, Family, Field, Finish, OptionSet, Record, SampleRoom, Samplability,
};
use texture_catalog::platform::fs::write_atomic;
use texture_catalog::util::constants::TABLE_FILE_NAME;
use texture_catalog::util::error::{CatalogError, Result, ValidationError};

/// texcat - catalog of cosmetic product textures.
///
/// Look up products by code or color code, filter by attributes, add and
/// update records, and export product sheets or filtered tables.
#[derive(Parser, Debug)]
#[command(name = "texcat", version, about)]
pub struct Cli {
    /// Record collection file (overrides config and the platform default).
    #[arg(long = "data-file", global = true)]
    pub data_file: Option<PathBuf>,

    /// Directory containing config.toml.
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show every field of one product, looked up by code or color code.
    Show {
        identifier: String,

        /// Also write a product sheet to this file (or directory).
        #[arg(long)]
        sheet: Option<PathBuf>,
    },

    /// List products whose code or colors contain TERM.
    Search { term: String },

    /// List products matching all given attributes.
    Filter(FilterArgs),

    /// Add a new product.
    Add(RecordArgs),

    /// Change fields of an existing product; omitted fields are kept.
    Update {
        /// Code or color code of the product to change.
        identifier: String,

        #[command(flatten)]
        fields: RecordArgs,
    },

    /// Rewrite the data file in the current schema.
    Migrate,
}

/// Record fields accepted by `add` and `update`.
#[derive(Args, Debug, Default)]
pub struct RecordArgs {
    /// Texture code (stored uppercased).
    #[arg(long)]
    pub code: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Comma-separated color codes.
    #[arg(long)]
    pub colors: Option<String>,

    /// Naturalness percentage, e.g. "98%".
    #[arg(long)]
    pub naturalness: Option<String>,

    /// Comma-separated markets.
    #[arg(long)]
    pub markets: Option<String>,

    /// Comma-separated reported flags.
    #[arg(long)]
    pub flags_reported: Option<String>,

    /// Clean standard; repeat for several, pass "" to clear.
    #[arg(long = "clean")]
    pub clean: Option<Vec<String>>,

    #[arg(long)]
    pub family: Option<String>,

    #[arg(long)]
    pub spf: Option<String>,

    #[arg(long)]
    pub plumping: Option<String>,

    #[arg(long)]
    pub ph: Option<String>,

    #[arg(long, value_name = "BOOL")]
    pub talc_free: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub microplastic_free: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub paraben_free: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub vegan: Option<bool>,

    #[arg(long)]
    pub rspo: Option<String>,

    #[arg(long)]
    pub samplable: Option<String>,

    #[arg(long = "sample-room")]
    pub sample_room: Option<String>,

    #[arg(long)]
    pub packaging_materials: Option<String>,

    #[arg(long)]
    pub packaging: Option<String>,

    /// Comma-separated tests performed.
    #[arg(long = "tests")]
    pub tests_performed: Option<String>,

    #[arg(long)]
    pub finish: Option<String>,

    #[arg(long)]
    pub coverage: Option<String>,

    #[arg(long = "notes")]
    pub raw_material_notes: Option<String>,

    #[arg(long = "cost")]
    pub cost_per_kg: Option<String>,
}

impl RecordArgs {
    pub fn into_raw(self) -> RawFields {
        RawFields {
            code: self.code,
            name: self.name,
            colors: self.colors,
            naturalness: self.naturalness,
            markets: self.markets,
            flags_reported: self.flags_reported,
            clean_standards: self.clean,
            family: self.family,
            spf: self.spf,
            plumping: self.plumping,
            ph: self.ph,
            talc_free: self.talc_free,
            microplastic_free: self.microplastic_free,
            paraben_free: self.paraben_free,
            vegan: self.vegan,
            rspo: self.rspo,
            samplable: self.samplable,
            present_in_sample_room: self.sample_room,
            packaging_materials: self.packaging_materials,
            packaging: self.packaging,
            tests_performed: self.tests_performed,
            finish: self.finish,
            coverage: self.coverage,
            raw_material_notes: self.raw_material_notes,
            cost_per_kg: self.cost_per_kg,
        }
    }
}

/// Filter criteria and export targets for `filter`.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Products carrying this color code.
    #[arg(long)]
    pub color: Option<String>,

    /// Products sold in any of these markets (repeatable).
    #[arg(long = "market")]
    pub markets: Vec<String>,

    /// Products certified against any of these standards (repeatable).
    #[arg(long = "clean")]
    pub clean: Vec<String>,

    #[arg(long)]
    pub family: Option<String>,

    #[arg(long)]
    pub finish: Option<String>,

    #[arg(long)]
    pub coverage: Option<String>,

    #[arg(long)]
    pub samplable: Option<String>,

    #[arg(long = "sample-room")]
    pub sample_room: Option<String>,

    /// Minimum naturalness percentage.
    #[arg(long, value_name = "PERCENT")]
    pub min_naturalness: Option<u32>,

    #[arg(long, value_name = "BOOL")]
    pub talc_free: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub microplastic_free: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub paraben_free: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub vegan: Option<bool>,

    /// Write the matching products as a CSV table to this file (or directory).
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the matching products as JSON to this file.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

impl FilterArgs {
    /// Translate flags into criteria. Option-set values are resolved to their
    /// canonical labels so aliases and any letter case match stored records.
    pub fn criteria(&self) -> std::result::Result<FilterCriteria, ValidationError> {
        let mut criteria = FilterCriteria::new();

        criteria.insert_opt(
            Field::Colors,
            self.color
                .as_deref()
                .map(|c| FilterValue::Equals(builder::normalize_code(c))),
        );
        criteria.insert(
            Field::Markets,
            FilterValue::any_of(self.markets.iter().map(|m| m.trim().to_string())),
        );
        let clean = builder::parse_selections::<CleanStandard>(&self.clean)?;
        criteria.insert(
            Field::CleanStandards,
            FilterValue::any_of(clean.iter().map(|c| c.label())),
        );

        criteria.insert_opt(Field::Family, choice::<Family>(&self.family)?);
        criteria.insert_opt(Field::Finish, choice::<Finish>(&self.finish)?);
        criteria.insert_opt(Field::Coverage, choice::<Coverage>(&self.coverage)?);
        criteria.insert_opt(Field::Samplable, choice::<Samplability>(&self.samplable)?);
        criteria.insert_opt(
            Field::PresentInSampleRoom,
            choice::<SampleRoom>(&self.sample_room)?,
        );
        criteria.insert_opt(
            Field::Naturalness,
            self.min_naturalness.map(FilterValue::AtLeast),
        );

        for (field, flag) in [
            (Field::TalcFree, self.talc_free),
            (Field::MicroplasticFree, self.microplastic_free),
            (Field::ParabenFree, self.paraben_free),
            (Field::Vegan, self.vegan),
        ] {
            criteria.insert_opt(field, flag.map(FilterValue::Flag));
        }

        Ok(criteria)
    }
}

fn choice<T: OptionSet>(
    raw: &Option<String>,
) -> std::result::Result<Option<FilterValue>, ValidationError> {
    match raw {
        Some(value) => Ok(builder::parse_choice::<T>(value)?
            .map(|v| FilterValue::Equals(v.label().to_string()))),
        None => Ok(None),
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run one command against an open catalog.
pub fn run(command: Command, catalog: &mut Catalog, layout: &DocumentLayout) -> Result<()> {
    match command {
        Command::Show { identifier, sheet } => {
            let Some(record) = catalog.find(&identifier) else {
                println!("No product found for '{identifier}'.");
                return Ok(());
            };
            print_record(record);

            if let Some(target) = sheet {
                let path = output_path(&target, &export::document_file_name(record));
                write_export(&path, &export::export_document(record, layout)?)?;
                println!("\nSheet written to {}", path.display());
            }
        }

        Command::Search { term } => {
            let hits = catalog.search(&term);
            if hits.is_empty() {
                println!("No products match '{}'.", term.trim());
            }
            print_listing(&hits);
        }

        Command::Filter(args) => {
            let criteria = args.criteria()?;
            tracing::debug!(active = criteria.active_count(), "Filtering catalog");

            let hits = catalog.filter(&criteria);
            println!(
                "{} of {} products match.",
                hits.len(),
                catalog.records().len()
            );
            print_listing(&hits);

            if args.csv.is_some() || args.json.is_some() {
                let selected: Vec<Record> = hits.into_iter().cloned().collect();
                if let Some(target) = args.csv {
                    let path = output_path(&target, TABLE_FILE_NAME);
                    write_export(&path, &export::export_table_csv(&selected)?)?;
                    println!("Table written to {}", path.display());
                }
                if let Some(path) = args.json {
                    write_export(&path, &export::export_json(&selected)?)?;
                    println!("JSON written to {}", path.display());
                }
            }
        }

        Command::Add(fields) => {
            let record = catalog.add(&fields.into_raw())?;
            println!("Added {}", record.summary_line());
        }

        Command::Update { identifier, fields } => {
            let raw = fields.into_raw();
            if raw.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            match catalog.update(&identifier, &raw)? {
                Some(record) => println!("Updated {}", record.summary_line()),
                None => println!("No product found for '{identifier}'."),
            }
        }

        Command::Migrate => {
            for warning in catalog.load_warnings() {
                println!("warning: {warning}");
            }
            if catalog.needs_migration() {
                catalog.save()?;
                println!(
                    "Migrated {} products in {}",
                    catalog.records().len(),
                    catalog.store().path().display()
                );
            } else {
                println!("Data file is already in the current format.");
            }
        }
    }

    Ok(())
}

fn print_record(record: &Record) {
    println!("{}", record.summary_line());
    for field in Field::all() {
        println!("  {}: {}", field.label(), record.field(*field).render());
    }
}

fn print_listing(records: &[&Record]) {
    for record in records {
        println!("{}", record.summary_line());
        println!("    {}", record.summary_details());
    }
}

/// A directory target gets the default file name appended.
fn output_path(target: &Path, default_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(default_name)
    } else {
        target.to_path_buf()
    }
}

fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic(path, bytes).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        operation: "write export",
        source: e,
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");
    Ok(())
}
