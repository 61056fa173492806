//! Calendar-month buckets covering a ledger's date span.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::{Ledger, Transaction};

/// Closed interval from the first to the last day of one calendar month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthBucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Rows of one month, in ledger order
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSlice {
    pub bucket: MonthBucket,
    pub rows: Vec<Transaction>,
}

fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

impl MonthBucket {
    /// Bucket for `month` (1-12) of `year`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
        Some(Self { start, end })
    }

    /// Bucket for the month `date` falls in
    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `YYYY-MM-DD~YYYY-MM-DD`, used as the output file stem
    pub fn label(&self) -> String {
        format!("{}~{}", self.start, self.end)
    }
}

/// Number of calendar months from `first` to `last`, both inclusive.
///
/// Zero when `last` falls in an earlier month than `first`.
pub fn months_spanned(first: NaiveDate, last: NaiveDate) -> usize {
    let span = month_index(last) - month_index(first) + 1;
    span.max(0) as usize
}

/// Consecutive month buckets from the month of `first` through the month of `last`.
pub fn month_buckets(first: NaiveDate, last: NaiveDate) -> Vec<MonthBucket> {
    let base = month_index(first);
    (0..months_spanned(first, last) as i64)
        .filter_map(|offset| {
            let idx = base + offset;
            MonthBucket::new(idx.div_euclid(12) as i32, idx.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

/// Split a ledger into one slice per month of its date span.
///
/// Months in the span without transactions still get an (empty) slice.
pub fn partition(ledger: Ledger) -> Vec<MonthSlice> {
    let Some((first, last)) = ledger.date_range() else {
        return Vec::new();
    };

    let mut slices: Vec<MonthSlice> = month_buckets(first, last)
        .into_iter()
        .map(|bucket| MonthSlice {
            bucket,
            rows: Vec::new(),
        })
        .collect();

    let base = month_index(first);
    for txn in ledger {
        let offset = (month_index(txn.date()) - base) as usize;
        if let Some(slice) = slices.get_mut(offset) {
            slice.rows.push(txn);
        }
    }

    slices
}
