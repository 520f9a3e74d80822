//! The delimited text format used to back up and restore sales.
//!
//! Each row holds `timestamp,brand,model,variant,unit_price,quantity,segment`.
//! The total value is never written since it is derived from the price and
//! quantity, and the segment column is informational only: both are recomputed
//! by [SaleRecord::create] when a backup is imported.

use serde::Serialize;
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{
    Error,
    sale::{NewSale, SaleRecord},
};

const FIELD_COUNT: usize = 7;

const TIMESTAMP_COLUMN: usize = 0;
const BRAND_COLUMN: usize = 1;
const MODEL_COLUMN: usize = 2;
const VARIANT_COLUMN: usize = 3;
const PRICE_COLUMN: usize = 4;
const QUANTITY_COLUMN: usize = 5;

/// The human-readable date form accepted in the timestamp column, in local time.
const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[derive(Serialize)]
struct BackupRow<'a> {
    timestamp: i64,
    brand: &'a str,
    model: &'a str,
    variant: &'a str,
    unit_price: f64,
    quantity: i64,
    segment: &'static str,
}

/// A row that was left out of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// The one-based line number in the backup text.
    pub line: u64,
    pub reason: String,
}

/// The outcome of importing a backup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    /// The imported sales in file order, not yet assigned IDs.
    pub records: Vec<SaleRecord>,
    pub skipped: Vec<SkippedRow>,
    /// Line numbers of rows whose date could not be read and were given the
    /// import time instead. These rows are still included in `records`.
    pub low_confidence: Vec<u64>,
}

impl ImportSummary {
    /// The number of sales successfully imported.
    pub fn imported(&self) -> usize {
        self.records.len()
    }
}

/// Write `sales` as backup text, including a header row.
///
/// # Errors
/// Returns [Error::InvalidCsv] if the text could not be written.
pub fn export(sales: &[SaleRecord]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for sale in sales {
        writer.serialize(BackupRow {
            timestamp: sale.timestamp(),
            brand: sale.brand(),
            model: sale.model(),
            variant: sale.variant(),
            unit_price: sale.unit_price(),
            quantity: sale.quantity(),
            segment: sale.segment().label(),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::InvalidCsv(error.to_string()))
}

/// Read sales from backup text.
///
/// The first line is treated as a header. A row with the wrong number of
/// fields, a non-numeric price or quantity, or values the sale factory
/// rejects is skipped and the rest of the file is still imported.
///
/// The timestamp column may hold a local date and time such as
/// `2024-03-05 14:30`, or milliseconds since the Unix epoch. Rows where
/// neither form can be read are given the time `now` and reported as low
/// confidence.
///
/// Dates are assumed to be in local time, `local_timezone` is used to convert
/// them to timestamps.
pub fn import(text: &str, now: OffsetDateTime, local_timezone: UtcOffset) -> ImportSummary {
    // Brand, model and variant are free text, so only the numeric columns are
    // trimmed.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let now_millis = (now.unix_timestamp_nanos() / 1_000_000) as i64;

    let mut summary = ImportSummary {
        records: Vec::new(),
        skipped: Vec::new(),
        low_confidence: Vec::new(),
    };

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(error) => {
                let line = error.position().map_or(0, |position| position.line());
                skip_row(&mut summary, line, error.to_string());
                continue;
            }
        };

        let line = row.position().map_or(0, |position| position.line());

        if row.len() != FIELD_COUNT {
            skip_row(
                &mut summary,
                line,
                format!("expected {FIELD_COUNT} fields, got {}", row.len()),
            );
            continue;
        }

        let Ok(unit_price) = row[PRICE_COLUMN].trim().parse::<f64>() else {
            skip_row(
                &mut summary,
                line,
                format!("could not parse price \"{}\"", &row[PRICE_COLUMN]),
            );
            continue;
        };

        let Some(quantity) = parse_quantity(row[QUANTITY_COLUMN].trim()) else {
            skip_row(
                &mut summary,
                line,
                format!("could not parse quantity \"{}\"", &row[QUANTITY_COLUMN]),
            );
            continue;
        };

        let timestamp = match parse_timestamp(row[TIMESTAMP_COLUMN].trim(), local_timezone) {
            Some(timestamp) => timestamp,
            None => {
                tracing::warn!(
                    "Could not parse date \"{}\" on line {line}, using the import time",
                    &row[TIMESTAMP_COLUMN]
                );
                summary.low_confidence.push(line);
                now_millis
            }
        };

        let sale = NewSale::new(
            timestamp,
            &row[BRAND_COLUMN],
            &row[MODEL_COLUMN],
            &row[VARIANT_COLUMN],
            unit_price,
            quantity,
        );

        match SaleRecord::create(sale) {
            Ok(record) => summary.records.push(record),
            Err(error) => skip_row(&mut summary, line, error.to_string()),
        }
    }

    tracing::debug!(
        "Imported {} sales, skipped {} rows",
        summary.imported(),
        summary.skipped.len()
    );

    summary
}

fn skip_row(summary: &mut ImportSummary, line: u64, reason: String) {
    tracing::warn!("Skipping backup row on line {line}: {reason}");
    summary.skipped.push(SkippedRow { line, reason });
}

/// Spreadsheet tools often write whole numbers as "2.0", so those are
/// accepted too.
fn parse_quantity(text: &str) -> Option<i64> {
    text.parse::<i64>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && value.fract() == 0.0)
            .map(|value| value as i64)
    })
}

fn parse_timestamp(text: &str, local_timezone: UtcOffset) -> Option<i64> {
    if let Ok(date_time) = PrimitiveDateTime::parse(text, DATE_FORMAT) {
        let nanos = date_time.assume_offset(local_timezone).unix_timestamp_nanos();
        return Some((nanos / 1_000_000) as i64);
    }

    let millis = text.parse::<i64>().ok()?;

    // Reject numbers too large to be a date.
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .ok()
        .map(|_| millis)
}
