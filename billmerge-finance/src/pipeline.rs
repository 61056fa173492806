//! End-to-end run: discover exports, parse, merge, categorize, split by month, export.

use anyhow::{Context, Result};
use billmerge_core::{Account, Ledger, partition};
use billmerge_ingest::{ALIPAY, ProviderFormat, WECHAT, parse_export};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::category_rules::{Categorizer, RuleTable};
use crate::export::{MonthReport, export_months};
use crate::merge::{DedupReport, merge};

/// Input and output locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub wechat_dir: PathBuf,
    pub alipay_dir: PathBuf,
    pub rules: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            wechat_dir: PathBuf::from("data/wechat"),
            alipay_dir: PathBuf::from("data/alipay"),
            rules: PathBuf::from("category.yaml"),
            output_dir: PathBuf::from("data/result"),
        }
    }
}

/// Rows kept from one export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub account: Account,
    pub rows: usize,
}

/// Merged ledger before categorization
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub files: Vec<FileReport>,
    pub ledger: Ledger,
    pub dedup: DedupReport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    pub dedup: DedupReport,
    pub months: Vec<MonthReport>,
}

/// `*.csv` files directly inside `dir`, sorted by name.
pub fn discover_csv(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.with_context(|| format!("read {}", dir.display()))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            paths.push(path);
        }
    }
    paths.sort();

    debug!(dir = %dir.display(), files = paths.len(), "discovered exports");
    Ok(paths)
}

/// Parse every export from both providers, then merge and deduplicate.
pub fn ingest(opts: &PipelineOptions) -> Result<Ingested> {
    let sources: [(&ProviderFormat, &Path); 2] = [
        (&WECHAT, opts.wechat_dir.as_path()),
        (&ALIPAY, opts.alipay_dir.as_path()),
    ];

    let mut files = Vec::new();
    let mut tables = Vec::new();
    for (format, dir) in sources {
        for path in discover_csv(dir)? {
            let txns = parse_export(&path, format).with_context(|| {
                format!("parse {} export {}", format.account.label(), path.display())
            })?;
            info!(
                account = format.account.label(),
                rows = txns.len(),
                path = %path.display(),
                "read export"
            );
            files.push(FileReport {
                path,
                account: format.account,
                rows: txns.len(),
            });
            tables.push(txns);
        }
    }

    let (ledger, dedup) = merge(tables);
    Ok(Ingested {
        files,
        ledger,
        dedup,
    })
}

/// Run the whole pipeline. The first error aborts the run.
pub fn run(opts: &PipelineOptions) -> Result<RunSummary> {
    let Ingested {
        files,
        ledger,
        dedup,
    } = ingest(opts)?;

    let rules = RuleTable::load(&opts.rules)?;
    let ledger = Categorizer::new(rules).categorize(ledger);

    let slices = partition(ledger);
    let months = export_months(&slices, &opts.output_dir)?;

    Ok(RunSummary {
        files,
        dedup,
        months,
    })
}
