//! billmerge-ingest: provider export formats, cell normalization, and the WeChat/Alipay parsers.

pub mod error;
pub mod normalize;
pub mod parsers;
pub mod types;

pub use error::{IngestError, Result};
pub use normalize::{normalize, normalize_cell, CURRENCY_MARKER};
pub use parsers::alipay::{parse_alipay_bytes, parse_alipay_csv, ALIPAY};
pub use parsers::wechat::{parse_wechat_bytes, parse_wechat_csv, WECHAT};
pub use parsers::{parse_export, parse_export_bytes, parse_timestamp};
pub use types::{ProviderFormat, RawTable, TextEncoding, CANONICAL_WIDTH};
