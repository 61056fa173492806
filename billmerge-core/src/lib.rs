//! billmerge-core: canonical transaction rows, the merged ledger, and month buckets

pub mod ledger;
pub mod months;

pub use ledger::{Account, Ledger, RowKey, Transaction, COLUMNS, DEFAULT_CATEGORY};
pub use months::{month_buckets, months_spanned, partition, MonthBucket, MonthSlice};
