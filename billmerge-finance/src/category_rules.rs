//! User-editable category rules and the categorization pass.
//!
//! Rules live in a YAML file keyed by the row's 收/支 value, then by
//! category name in evaluation order:
//!
//! ```yaml
//! 支出:
//!   餐饮:
//!     备注: [外卖, 餐厅]
//!     交易对方: [美团, 饿了么]
//!     交易类型: [商户消费]   # optional
//! ```
//!
//! Every category in a row's table is tried and the last one that matches
//! wins. Keywords match by plain substring containment.

use anyhow::{Context, Result, anyhow};
use billmerge_core::{DEFAULT_CATEGORY, Ledger, Transaction};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Keyword lists for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeywordRule {
    /// Matched against the item description
    #[serde(rename = "备注")]
    pub item: Vec<String>,
    /// Matched against the counterparty
    #[serde(rename = "交易对方")]
    pub counterparty: Vec<String>,
    /// Matched against the provider transaction type
    #[serde(rename = "交易类型", default)]
    pub subtype: Vec<String>,
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

impl KeywordRule {
    pub fn matches(&self, txn: &Transaction) -> bool {
        contains_any(&txn.item, &self.item)
            || contains_any(&txn.counterparty, &self.counterparty)
            || contains_any(&txn.subtype, &self.subtype)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: KeywordRule,
}

/// Category rules per row type, with categories kept in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    by_kind: HashMap<String, Vec<CategoryRule>>,
}

impl RuleTable {
    pub fn new(by_kind: HashMap<String, Vec<CategoryRule>>) -> Self {
        Self { by_kind }
    }

    /// Parse a rule table from YAML text.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let raw: HashMap<String, Option<serde_yaml::Mapping>> =
            serde_yaml::from_str(s).context("parse category rules")?;

        let mut by_kind = HashMap::with_capacity(raw.len());
        for (kind, categories) in raw {
            let mut rules = Vec::new();
            // Mapping iterates in document order
            for (name, value) in categories.unwrap_or_default() {
                let name = name
                    .as_str()
                    .ok_or_else(|| anyhow!("{kind}: category name {name:?} is not a string"))?
                    .to_string();
                let keywords: KeywordRule = serde_yaml::from_value(value)
                    .with_context(|| format!("{kind} / {name}: invalid keyword lists"))?;
                rules.push(CategoryRule { name, keywords });
            }
            by_kind.insert(kind, rules);
        }

        Ok(Self { by_kind })
    }

    /// Read and parse a rule file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Self::from_yaml_str(&s).with_context(|| format!("load {}", path.display()))
    }

    pub fn rules_for(&self, kind: &str) -> Option<&[CategoryRule]> {
        self.by_kind.get(kind).map(Vec::as_slice)
    }

    /// Category for one row: the last matching rule of its type, else "其他".
    pub fn category_for(&self, txn: &Transaction) -> &str {
        self.rules_for(&txn.kind)
            .into_iter()
            .flatten()
            .filter(|rule| rule.keywords.matches(txn))
            .last()
            .map_or(DEFAULT_CATEGORY, |rule| rule.name.as_str())
    }
}

/// Assigns categories to a ledger using a fixed rule table
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: RuleTable,
}

impl Categorizer {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Return the ledger with every row's category set from the rules.
    pub fn categorize(&self, ledger: Ledger) -> Ledger {
        let categorized: Ledger = ledger
            .into_iter()
            .map(|mut txn| {
                txn.category = self.rules.category_for(&txn).to_string();
                txn
            })
            .collect();

        let other = categorized
            .iter()
            .filter(|t| t.category == DEFAULT_CATEGORY)
            .count();
        info!(rows = categorized.len(), other, "categorized ledger");
        categorized
    }
}
