//! billmerge-finance: ledger merging, category rules, monthly export, and the run pipeline

pub mod category_rules;
pub mod export;
pub mod merge;
pub mod pipeline;

pub use category_rules::{CategoryRule, Categorizer, KeywordRule, RuleTable};
pub use export::{MonthReport, export_months, write_month};
pub use merge::{DedupReport, concat, dedup, merge};
pub use pipeline::{FileReport, Ingested, PipelineOptions, RunSummary, discover_csv, ingest, run};
