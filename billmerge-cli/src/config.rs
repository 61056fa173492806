use anyhow::{Context, Result};
use billmerge_finance::PipelineOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "billmerge.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub wechat_dir: PathBuf,
    pub alipay_dir: PathBuf,
    pub rules: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        let opts = PipelineOptions::default();
        Self {
            wechat_dir: opts.wechat_dir,
            alipay_dir: opts.alipay_dir,
            rules: opts.rules,
            output_dir: opts.output_dir,
        }
    }
}

impl Config {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            wechat_dir: self.paths.wechat_dir.clone(),
            alipay_dir: self.paths.alipay_dir.clone(),
            rules: self.paths.rules.clone(),
            output_dir: self.paths.output_dir.clone(),
        }
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config")
}

/// Load an explicit config file, or `billmerge.toml` if present, else defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("load {}", p.display()))
}
