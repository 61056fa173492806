//! billmerge: merge WeChat Pay and Alipay bill exports into monthly workbooks
//!
//! Usage:
//!   billmerge                       Use ./billmerge.toml if present, else the default layout
//!   billmerge --config FILE         Read paths from FILE
//!   billmerge --output-dir DIR      Override a single path

mod config;

use anyhow::Result;
use billmerge_finance::{PipelineOptions, run};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "billmerge",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BILLMERGE_BUILD_SHA"), ")"),
    about = "Merge WeChat Pay and Alipay exports into categorized monthly workbooks"
)]
struct Cli {
    /// TOML config file (default: ./billmerge.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of WeChat Pay CSV exports
    #[arg(long)]
    wechat_dir: Option<PathBuf>,

    /// Directory of Alipay CSV exports
    #[arg(long)]
    alipay_dir: Option<PathBuf>,

    /// Category rule file (YAML)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Where monthly workbooks are written
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags win over the config file
    fn apply(&self, opts: &mut PipelineOptions) {
        if let Some(p) = &self.wechat_dir {
            opts.wechat_dir = p.clone();
        }
        if let Some(p) = &self.alipay_dir {
            opts.alipay_dir = p.clone();
        }
        if let Some(p) = &self.rules {
            opts.rules = p.clone();
        }
        if let Some(p) = &self.output_dir {
            opts.output_dir = p.clone();
        }
    }
}

fn init_logging(verbose: bool) {
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut opts = config::load_config(cli.config.as_deref())?.pipeline_options();
    cli.apply(&mut opts);

    let summary = run(&opts)?;
    info!(
        files = summary.files.len(),
        rows = summary.dedup.after,
        removed = summary.dedup.removed(),
        months = summary.months.len(),
        output = %opts.output_dir.display(),
        "done"
    );

    Ok(())
}
