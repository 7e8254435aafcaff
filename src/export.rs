// 📤 Exporter - CSV and PDF reports from the transaction list
//
// CSV: header + one row per transaction, description always quoted.
// PDF: fixed single-report layout (title, date, summary, 20 recent rows).
//
// Also reads the exported CSV back in, so a file can move between machines.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use log::info;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::aggregator::{format_currency, totals};
use crate::entities::{Transaction, TransactionDraft, TransactionKind};
use crate::pdf::PdfDocument;
use crate::query::recent;

pub const CSV_HEADERS: [&str; 5] = ["Date", "Type", "Category", "Description", "Amount"];
pub const REPORT_FILE_NAME: &str = "finance-report.pdf";

/// Rows listed in the PDF report
pub const REPORT_RECENT_LIMIT: usize = 20;

// Report layout in millimetres from the top-left corner
const MARGIN_X: f64 = 20.0;
const AMOUNT_X: f64 = 160.0;
const FIRST_ROW_Y: f64 = 95.0;
const ROW_HEIGHT: f64 = 7.0;
const PAGE_BOTTOM_Y: f64 = 270.0;
const PAGE_TOP_Y: f64 = 20.0;

// ============================================================================
// CSV EXPORT
// ============================================================================

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// `yyyy-MM-dd,kind,category,"description",amount` rows joined by `\n`
pub fn transactions_to_csv(transactions: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(transactions.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for tx in transactions {
        lines.push(
            [
                tx.date.format("%Y-%m-%d").to_string(),
                tx.kind.to_string(),
                tx.category.clone(),
                quote(&tx.description),
                tx.amount.normalize().to_string(),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("transactions-{}.csv", date.format("%Y-%m-%d"))
}

/// Write `transactions-<date>.csv` into `dir`, returning the file path
pub fn export_csv(dir: &Path, transactions: &[Transaction], date: NaiveDate) -> Result<PathBuf> {
    let path = dir.join(csv_file_name(date));
    fs::write(&path, transactions_to_csv(transactions))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Exported {} transactions to {}", transactions.len(), path.display());
    Ok(path)
}

// ============================================================================
// CSV IMPORT
// ============================================================================

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,

    #[serde(rename = "Type")]
    kind: String,

    #[serde(rename = "Category")]
    category: String,

    #[serde(rename = "Description")]
    description: String,

    #[serde(rename = "Amount")]
    amount: String,
}

/// Parse an exported CSV into drafts (ids and timestamps are assigned on add)
pub fn import_csv<R: Read>(reader: R) -> Result<Vec<TransactionDraft>> {
    // Field values are kept verbatim so descriptions survive the round trip
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let mut drafts = Vec::new();

    for (index, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = result.with_context(|| format!("Failed to read CSV line {}", line))?;

        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' on line {}", row.date, line))?;
        let kind: TransactionKind = row
            .kind
            .parse()
            .with_context(|| format!("Invalid type on line {}", line))?;
        let amount: Decimal = row
            .amount
            .trim()
            .parse()
            .with_context(|| format!("Invalid amount '{}' on line {}", row.amount, line))?;

        drafts.push(TransactionDraft {
            kind,
            amount,
            category: row.category,
            description: row.description,
            date,
        });
    }

    Ok(drafts)
}

pub fn import_csv_file(path: &Path) -> Result<Vec<TransactionDraft>> {
    let file = fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    import_csv(file)
}

// ============================================================================
// PDF REPORT
// ============================================================================

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Long date such as "October 19th, 2026"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// Lay out the report with the standard 20 recent rows
pub fn build_report(transactions: &[Transaction], generated_on: NaiveDate) -> PdfDocument {
    build_report_with_limit(transactions, generated_on, REPORT_RECENT_LIMIT)
}

/// Pages are added as rows run past the bottom margin
pub fn build_report_with_limit(
    transactions: &[Transaction],
    generated_on: NaiveDate,
    row_limit: usize,
) -> PdfDocument {
    let mut doc = PdfDocument::new();
    let summary = totals(transactions);

    doc.set_font_size(20.0);
    doc.text("Finance Report", MARGIN_X, 20.0);

    doc.set_font_size(10.0);
    doc.text(&format!("Generated on: {}", long_date(generated_on)), MARGIN_X, 30.0);

    doc.set_font_size(14.0);
    doc.text("Financial Summary", MARGIN_X, 45.0);
    doc.set_font_size(10.0);
    doc.text(&format!("Total Income: {}", format_currency(summary.income)), MARGIN_X, 55.0);
    doc.text(&format!("Total Expenses: {}", format_currency(summary.expenses)), MARGIN_X, 62.0);
    doc.text(&format!("Net Balance: {}", format_currency(summary.net)), MARGIN_X, 69.0);

    doc.set_font_size(14.0);
    doc.text("Recent Transactions", MARGIN_X, 85.0);

    let mut y = FIRST_ROW_Y;
    for tx in recent(transactions, row_limit) {
        if y > PAGE_BOTTOM_Y {
            doc.add_page();
            y = PAGE_TOP_Y;
        }

        doc.set_font_size(9.0);
        doc.text(
            &format!("{} | {} | {}", tx.date.format("%m/%d/%Y"), tx.category, tx.description),
            MARGIN_X,
            y,
        );
        doc.text(
            &format!("{}{}", tx.kind.sign(), format_currency(tx.amount)),
            AMOUNT_X,
            y,
        );
        y += ROW_HEIGHT;
    }

    doc
}

pub fn finance_report_pdf(transactions: &[Transaction], generated_on: NaiveDate) -> Vec<u8> {
    build_report(transactions, generated_on).to_bytes()
}

/// Write `finance-report.pdf` into `dir`, returning the file path
pub fn export_pdf(dir: &Path, transactions: &[Transaction], generated_on: NaiveDate) -> Result<PathBuf> {
    let path = dir.join(REPORT_FILE_NAME);
    fs::write(&path, finance_report_pdf(transactions, generated_on))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote report to {}", path.display());
    Ok(path)
}
