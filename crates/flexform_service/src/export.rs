use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Value};

use flexform_core::is_exportable_column;

// ---------------------------------------------------------------------------
// Export renderer: an in-memory record set becomes CSV, XLSX or PDF bytes.
// Protected columns (anything encrypted/hashed, plus the audit trail) never
// reach an export, whatever the format.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(anyhow!("Unknown export format '{other}' (csv|excel|pdf)")),
        }
    }
}

/// A row ready for export: one flat JSON object per record, as returned by
/// the store or produced by flattening a `SubmissionRecord`.
pub type ExportRow = Map<String, Value>;

pub fn export_records(rows: &[ExportRow], format: ExportFormat, user: &str) -> Result<Vec<u8>> {
    let columns = visible_columns(rows);
    match format {
        ExportFormat::Csv => render_csv(&columns, rows),
        ExportFormat::Excel => render_xlsx(&columns, rows, user),
        ExportFormat::Pdf => render_pdf(&columns, rows),
    }
}

/// Columns in first-seen order across the record set, minus anything
/// protected. No reordering beyond that.
fn visible_columns(rows: &[ExportRow]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if is_exportable_column(key) && !columns.iter().any(|seen| seen == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Flat cell text. Date-like timestamp strings in `*_at`/date columns are
/// prettified; everything else passes through untouched.
fn cell_text(column: &str, value: Option<&Value>) -> String {
    let raw = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| cell_text(column, Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => String::new(),
    };

    if looks_like_date_column(column) {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
            return timestamp
                .with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M")
                .to_string();
        }
    }
    raw
}

fn looks_like_date_column(column: &str) -> bool {
    column.ends_with("_at") || column.contains("date")
}

fn render_csv(columns: &[String], rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| cell_text(column, row.get(column)))
            .collect();
        writer.write_record(&cells)?;
    }
    writer
        .into_inner()
        .map_err(|err| anyhow!("Failed to finish CSV: {err}"))
}

fn render_xlsx(columns: &[String], rows: &[ExportRow], user: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Submissions")?;
    for (col, column) in columns.iter().enumerate() {
        sheet.write(0, col as u16, column.as_str())?;
    }
    for (row_index, row) in rows.iter().enumerate() {
        for (col, column) in columns.iter().enumerate() {
            sheet.write(
                row_index as u32 + 1,
                col as u16,
                cell_text(column, row.get(column)),
            )?;
        }
    }

    let meta = workbook.add_worksheet();
    meta.set_name("Export Info")?;
    meta.write(0, 0, "Exported at")?;
    meta.write(0, 1, Utc::now().to_rfc3339())?;
    meta.write(1, 0, "Record count")?;
    meta.write(1, 1, rows.len() as u32)?;
    meta.write(2, 0, "Exported by")?;
    meta.write(2, 1, user)?;

    workbook.save_to_buffer().context("Failed to build XLSX buffer")
}

// A4 geometry for the key/value dump.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_TOP: f32 = 60.0;
const MARGIN_BOTTOM: f32 = 60.0;
const LINE_HEIGHT: f32 = 14.0;
const FONT_SIZE: i64 = 10;

fn render_pdf(columns: &[String], rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    // Build text lines first, then cut them into pages whenever the running
    // vertical offset passes the page bound.
    let mut lines: Vec<String> = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        lines.push(format!("Record {}", index + 1));
        for column in columns {
            lines.push(format!("  {}: {}", column, cell_text(column, row.get(column))));
        }
        lines.push(String::new());
    }
    if lines.is_empty() {
        lines.push("No records".to_string());
    }

    let mut page_ids = Vec::new();
    let mut operations: Vec<Operation> = Vec::new();
    let mut cursor = PAGE_HEIGHT as f32 - MARGIN_TOP;

    for line in &lines {
        if cursor < MARGIN_BOTTOM {
            page_ids.push(finish_page(&mut doc, pages_id, std::mem::take(&mut operations))?);
            cursor = PAGE_HEIGHT as f32 - MARGIN_TOP;
        }
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
        operations.push(Operation::new("Td", vec![40.into(), (cursor as i64).into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
        cursor -= LINE_HEIGHT;
    }
    page_ids.push(finish_page(&mut doc, pages_id, operations)?);

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => page_ids.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|err| anyhow!("Failed to serialize PDF: {err}"))?;
    Ok(buffer)
}

fn finish_page(
    doc: &mut Document,
    pages_id: lopdf::ObjectId,
    operations: Vec<Operation>,
) -> Result<lopdf::ObjectId> {
    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|err| anyhow!("Failed to encode page content: {err}"))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}
