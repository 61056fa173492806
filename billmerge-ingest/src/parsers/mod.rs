//! Provider export parsers.
//!
//! Every provider goes through the same steps and differs only in its
//! [`ProviderFormat`]: decode, split off preamble/footer, project columns by
//! position, normalize cells, check headers, coerce types, drop
//! not-applicable and zero-amount rows.

pub mod alipay;
pub mod wechat;

use std::path::Path;

use billmerge_core::Transaction;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::normalize::normalize;
use crate::types::{ProviderFormat, RawTable};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse an export timestamp; date-only values map to midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Decode an export and split it into its header row and data rows.
///
/// Blank lines are ignored and do not count towards the header offset.
pub fn read_table(bytes: &[u8], format: &ProviderFormat) -> Result<RawTable> {
    let (text, _, had_errors) = format.encoding.encoding().decode(bytes);
    if had_errors {
        return Err(IngestError::Decoding(format.encoding.name()));
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect());
    }

    if records.len() <= format.header_offset {
        return Err(IngestError::MissingHeader {
            offset: format.header_offset,
            found: records.len(),
        });
    }

    let mut rows = records.split_off(format.header_offset + 1);
    rows.truncate(rows.len().saturating_sub(format.footer_rows));
    let headers = records.pop().unwrap_or_default();

    Ok(RawTable { headers, rows })
}

/// Select the provider's columns, by position, into canonical order.
fn project(table: &RawTable, format: &ProviderFormat) -> Result<RawTable> {
    let width = format.min_width();
    if table.headers.len() < width {
        return Err(IngestError::ColumnCount {
            expected: width,
            found: table.headers.len(),
        });
    }

    let pick = |row: &[String]| -> Vec<String> {
        format.columns.iter().map(|&i| row[i].clone()).collect()
    };

    let mut rows = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        if row.len() < width {
            return Err(IngestError::ShortRow {
                row: i + 1,
                expected: width,
                found: row.len(),
            });
        }
        rows.push(pick(row));
    }

    Ok(RawTable {
        headers: pick(&table.headers),
        rows,
    })
}

/// Fail fast when the export layout moved under the positional projection.
fn check_headers(table: &RawTable, format: &ProviderFormat) -> Result<()> {
    for (k, found) in table.headers.iter().enumerate() {
        let expected = format.expected_headers[k];
        if found != expected {
            return Err(IngestError::HeaderMismatch {
                position: format.columns[k],
                expected,
                found: found.clone(),
            });
        }
    }
    Ok(())
}

/// Coerce every projected row; any bad timestamp or amount fails the file.
fn coerce(table: &RawTable, format: &ProviderFormat) -> Result<Vec<Transaction>> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let timestamp = parse_timestamp(&row[0]).ok_or_else(|| IngestError::InvalidTimestamp {
                row: i + 1,
                value: row[0].clone(),
            })?;
            let amount: f64 = row[6].parse().map_err(|_| IngestError::InvalidAmount {
                row: i + 1,
                value: row[6].clone(),
            })?;

            Ok(Transaction::new(
                timestamp,
                format.account,
                &row[1],
                &row[2],
                &row[3],
                &row[4],
                &row[5],
                amount,
            ))
        })
        .collect()
}

/// Parse an in-memory export into canonical transactions.
pub fn parse_export_bytes(bytes: &[u8], format: &ProviderFormat) -> Result<Vec<Transaction>> {
    let raw = read_table(bytes, format)?;
    let table = normalize(project(&raw, format)?);
    check_headers(&table, format)?;

    let mut txns = coerce(&table, format)?;
    let parsed = txns.len();
    txns.retain(|t| t.kind != format.not_applicable);
    txns.retain(|t| t.amount != 0.0);

    debug!(
        account = format.account.label(),
        parsed,
        kept = txns.len(),
        "parsed export"
    );
    Ok(txns)
}

/// Read and parse one export file.
pub fn parse_export(path: impl AsRef<Path>, format: &ProviderFormat) -> Result<Vec<Transaction>> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_export_bytes(&bytes, format)
}
