// TextureCatalog - core/export.rs
//
// Table (CSV), document (paginated text), and JSON export of records.
// Core layer: builds the output in memory and hands back bytes; writing
// them anywhere is the caller's job.

use crate::core::model::{Field, Record};
use crate::util::constants::{
    DEFAULT_LINE_WIDTH, DEFAULT_PAGE_LINES, DOCUMENT_FILE_SUFFIX, LIST_JOIN_SEPARATOR,
    MAX_EXPORT_RECORDS, PAGE_BREAK,
};
use crate::util::error::ExportError;
use serde_json::{Map, Value};

// =============================================================================
// Table export
// =============================================================================

/// Export records as a CSV table.
///
/// Columns are the union of every field seen, in first-seen order; one row
/// per record. An empty selection still yields the full header row. See
/// `export_rows_csv` for cell formatting.
pub fn export_table_csv(records: &[Record]) -> Result<Vec<u8>, ExportError> {
    check_limit(records.len())?;

    let rows = records
        .iter()
        .map(|r| match serde_json::to_value(r) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(Map::new()),
            Err(e) => Err(ExportError::Json { source: e }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        let header = Field::all().iter().map(|f| f.name());
        let mut csv_writer = csv::Writer::from_writer(Vec::new());
        csv_writer
            .write_record(header)
            .map_err(|e| ExportError::Csv { source: e })?;
        return csv_writer
            .into_inner()
            .map_err(|e| ExportError::Io { source: e.into_error() });
    }

    export_rows_csv(&rows)
}

/// Export arbitrary mappings as a rectangular CSV table.
///
/// Rows may have different key sets: the header is the union of all keys in
/// first-seen order and missing cells are left blank. Arrays are joined with
/// ", ", booleans and numbers are written as text, null is blank.
pub fn export_rows_csv(rows: &[Map<String, Value>]) -> Result<Vec<u8>, ExportError> {
    check_limit(rows.len())?;

    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut csv_writer = csv::Writer::from_writer(Vec::new());

    csv_writer
        .write_record(&columns)
        .map_err(|e| ExportError::Csv { source: e })?;

    for row in rows {
        let cells = columns
            .iter()
            .map(|col| row.get(*col).map(cell_text).unwrap_or_default());
        csv_writer
            .write_record(cells)
            .map_err(|e| ExportError::Csv { source: e })?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io { source: e })?;

    csv_writer
        .into_inner()
        .map_err(|e| ExportError::Io { source: e.into_error() })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(cell_text)
            .collect::<Vec<_>>()
            .join(LIST_JOIN_SEPARATOR),
        other => other.to_string(),
    }
}

fn check_limit(count: usize) -> Result<(), ExportError> {
    if count > MAX_EXPORT_RECORDS {
        return Err(ExportError::TooManyRecords {
            count,
            max: MAX_EXPORT_RECORDS,
        });
    }
    Ok(())
}

// =============================================================================
// Document export
// =============================================================================

/// Page geometry for document exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLayout {
    /// Lines per page, including the page header and the blank line below it.
    pub page_lines: usize,
    /// Maximum characters per line before wrapping.
    pub line_width: usize,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            page_lines: DEFAULT_PAGE_LINES,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Export a single record as a flat paginated text document.
///
/// Every field is listed as `Label: value` in record order, lists
/// comma-joined. Long lines are word-wrapped with a two-space hanging
/// indent. Pages are separated by a form feed and each starts with a
/// `Product sheet <CODE> (page i/n)` header.
pub fn export_document(record: &Record, layout: &DocumentLayout) -> Result<Vec<u8>, ExportError> {
    let width = layout.line_width.max(1);
    // Header line plus one blank separator line.
    let body_lines = layout.page_lines.saturating_sub(2).max(1);

    let mut lines = Vec::new();
    for field in Field::all() {
        let text = format!("{}: {}", field.label(), record.field(*field).render());
        lines.extend(wrap(&text, width));
    }

    let pages: Vec<&[String]> = lines.chunks(body_lines).collect();
    let total = pages.len();

    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push(PAGE_BREAK);
        }
        out.push_str(&format!(
            "Product sheet {} (page {}/{})\n\n",
            record.code,
            i + 1,
            total
        ));
        for line in page.iter() {
            out.push_str(line);
            out.push('\n');
        }
    }

    Ok(out.into_bytes())
}

/// Suggested file name for a record's document export.
pub fn document_file_name(record: &Record) -> String {
    format!("{}{}", record.code, DOCUMENT_FILE_SUFFIX)
}

/// Greedy word wrap at `width` columns. Words longer than a line are
/// split; continuation lines get a two-space indent.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let options = textwrap::Options::new(width)
        .subsequent_indent("  ")
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .collect()
}

// =============================================================================
// JSON export
// =============================================================================

/// Export records as a pretty-printed JSON array.
pub fn export_json(records: &[Record]) -> Result<Vec<u8>, ExportError> {
    check_limit(records.len())?;
    serde_json::to_vec_pretty(records).map_err(|e| ExportError::Json { source: e })
}
