use billmerge_core::Account;
use encoding_rs::Encoding;

/// Number of columns every provider projects into the canonical layout:
/// timestamp, type, payment status, subtype, counterparty, item, amount.
pub const CANONICAL_WIDTH: usize = 7;

/// A delimited export after decoding, before any type coercion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Native text encoding of an export file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Gbk,
}

impl TextEncoding {
    pub fn encoding(&self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 => encoding_rs::UTF_8,
            TextEncoding::Gbk => encoding_rs::GBK,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Gbk => "GBK",
        }
    }
}

/// Fixed layout of one provider's export file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderFormat {
    pub account: Account,
    /// Non-blank rows before the header row
    pub header_offset: usize,
    /// Summary rows after the last transaction
    pub footer_rows: usize,
    pub encoding: TextEncoding,
    /// Source column positions, in canonical order
    pub columns: [usize; CANONICAL_WIDTH],
    /// Header names expected at `columns`, in the same order
    pub expected_headers: [&'static str; CANONICAL_WIDTH],
    /// Type value marking rows that are not real transactions
    pub not_applicable: &'static str,
}

impl ProviderFormat {
    /// Minimum number of columns a header or data row must have
    pub fn min_width(&self) -> usize {
        self.columns.iter().copied().max().map_or(0, |max| max + 1)
    }
}
