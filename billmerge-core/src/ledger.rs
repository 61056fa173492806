//! Canonical transaction rows and the merged ledger they live in.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Category given to rows that no rule claims ("other").
pub const DEFAULT_CATEGORY: &str = "其他";

/// Output column headers, in workbook order.
pub const COLUMNS: [&str; 9] = [
    "时间",
    "账户1",
    "类型",
    "支付状态",
    "交易类型",
    "交易对方",
    "备注",
    "金额",
    "分类",
];

/// Payment provider a row was exported from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Account {
    #[serde(rename = "wechat")]
    WeChat,
    #[serde(rename = "alipay")]
    Alipay,
}

impl Account {
    /// Value written into the account column
    pub fn label(&self) -> &'static str {
        match self {
            Account::WeChat => "微信",
            Account::Alipay => "支付宝",
        }
    }
}

/// One normalized transaction, identical in shape for every provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub account: Account,
    /// Direction column (收/支): usually "收入" or "支出"
    pub kind: String,
    /// Payment status as reported by the provider
    pub status: String,
    /// Provider transaction type (交易类型)
    pub subtype: String,
    pub counterparty: String,
    /// Item / goods description
    pub item: String,
    pub amount: f64,
    pub category: String,
}

/// Borrowed view used for exact, field-by-field row equality.
///
/// Amounts compare by bit pattern, with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey<'a> {
    timestamp: NaiveDateTime,
    account: Account,
    kind: &'a str,
    status: &'a str,
    subtype: &'a str,
    counterparty: &'a str,
    item: &'a str,
    amount_bits: u64,
    category: &'a str,
}

impl Transaction {
    pub fn new(
        timestamp: NaiveDateTime,
        account: Account,
        kind: impl Into<String>,
        status: impl Into<String>,
        subtype: impl Into<String>,
        counterparty: impl Into<String>,
        item: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            timestamp,
            account,
            kind: kind.into(),
            status: status.into(),
            subtype: subtype.into(),
            counterparty: counterparty.into(),
            item: item.into(),
            amount,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Calendar date of the transaction
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn key(&self) -> RowKey<'_> {
        let amount = if self.amount == 0.0 { 0.0 } else { self.amount };
        RowKey {
            timestamp: self.timestamp,
            account: self.account,
            kind: &self.kind,
            status: &self.status,
            subtype: &self.subtype,
            counterparty: &self.counterparty,
            item: &self.item,
            amount_bits: amount.to_bits(),
            category: &self.category,
        }
    }
}

/// Ordered collection of transactions from every provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    rows: Vec<Transaction>,
}

impl Ledger {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Transaction> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.rows.iter()
    }

    /// Earliest and latest transaction dates, or `None` for an empty ledger
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(Transaction::date).min()?;
        let max = self.rows.iter().map(Transaction::date).max()?;
        Some((min, max))
    }
}

impl FromIterator<Transaction> for Ledger {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Ledger {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
