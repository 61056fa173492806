//! Write one `.xlsx` workbook per month bucket.
//!
//! Files are named `<start>~<end>.xlsx` and hold the canonical columns with a
//! header row and no index column. The workbook creation time is pinned to
//! the bucket start so identical input yields identical bytes.

use anyhow::{Context, Result};
use billmerge_core::{COLUMNS, MonthBucket, MonthSlice, Transaction};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where one month ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthReport {
    pub bucket: MonthBucket,
    pub rows: usize,
    pub path: PathBuf,
}

pub fn file_name(bucket: &MonthBucket) -> String {
    format!("{}.xlsx", bucket.label())
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime, XlsxError> {
    ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)
}

fn write_row(
    sheet: &mut Worksheet,
    row: u32,
    txn: &Transaction,
    date_format: &Format,
) -> Result<(), XlsxError> {
    sheet.write_with_format(row, 0, &excel_date(txn.date())?, date_format)?;
    sheet.write_string(row, 1, txn.account.label())?;
    sheet.write_string(row, 2, txn.kind.as_str())?;
    sheet.write_string(row, 3, txn.status.as_str())?;
    sheet.write_string(row, 4, txn.subtype.as_str())?;
    sheet.write_string(row, 5, txn.counterparty.as_str())?;
    sheet.write_string(row, 6, txn.item.as_str())?;
    sheet.write_number(row, 7, txn.amount)?;
    sheet.write_string(row, 8, txn.category.as_str())?;
    Ok(())
}

fn build_workbook(slice: &MonthSlice) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let properties = DocProperties::new().set_creation_datetime(&excel_date(slice.bucket.start)?);
    workbook.set_properties(&properties);

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = workbook.add_worksheet();
    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }
    sheet.set_column_width(0, 12)?;

    for (i, txn) in slice.rows.iter().enumerate() {
        write_row(sheet, i as u32 + 1, txn, &date_format)?;
    }

    Ok(workbook)
}

/// Write one month's rows into `dir`, returning the report for it.
pub fn write_month(slice: &MonthSlice, dir: &Path) -> Result<MonthReport> {
    let path = dir.join(file_name(&slice.bucket));
    let mut workbook = build_workbook(slice)
        .with_context(|| format!("build workbook for {}", slice.bucket.label()))?;
    workbook
        .save(&path)
        .with_context(|| format!("write {}", path.display()))?;

    info!(
        month = %slice.bucket.label(),
        rows = slice.rows.len(),
        path = %path.display(),
        "exported month"
    );

    Ok(MonthReport {
        bucket: slice.bucket,
        rows: slice.rows.len(),
        path,
    })
}

/// Write every slice into `dir`, creating the directory if needed.
pub fn export_months(slices: &[MonthSlice], dir: &Path) -> Result<Vec<MonthReport>> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    slices.iter().map(|slice| write_month(slice, dir)).collect()
}
