//! WeChat Pay bill export parser (微信支付账单明细)
//!
//! UTF-8 CSV, 16 preamble rows (nickname, date range, totals, notes), then:
//!   交易时间,交易类型,交易对方,商品,收/支,金额(元),支付方式,当前状态,交易单号,商户单号,备注
//!   2021-01-05 12:30:00,商户消费,美团,外卖订单,支出,¥32.50,零钱,支付成功,4200...,1000...,/
//!
//! Neutral rows (top-ups, withdrawals, transfers to savings) carry `/` in 收/支.

use std::path::Path;

use billmerge_core::{Account, Transaction};

use crate::error::Result;
use crate::parsers::{parse_export, parse_export_bytes};
use crate::types::{ProviderFormat, TextEncoding};

pub const WECHAT: ProviderFormat = ProviderFormat {
    account: Account::WeChat,
    header_offset: 16,
    footer_rows: 0,
    encoding: TextEncoding::Utf8,
    columns: [0, 4, 7, 1, 2, 3, 5],
    expected_headers: [
        "交易时间",
        "收/支",
        "当前状态",
        "交易类型",
        "交易对方",
        "商品",
        "金额(元)",
    ],
    not_applicable: "/",
};

/// Parse a WeChat Pay CSV export file.
pub fn parse_wechat_csv(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    parse_export(path, &WECHAT)
}

/// Parse WeChat Pay CSV export bytes.
pub fn parse_wechat_bytes(bytes: &[u8]) -> Result<Vec<Transaction>> {
    parse_export_bytes(bytes, &WECHAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use billmerge_core::DEFAULT_CATEGORY;
    use chrono::NaiveDate;

    const PREAMBLE: [&str; 16] = [
        "微信支付账单明细,,,,,,,,",
        "微信昵称：[测试用户],,,,,,,,",
        "起始时间：[2021-01-01 00:00:00] 终止时间：[2021-01-31 23:59:59],,,,,,,,",
        "导出类型：[全部],,,,,,,,",
        "导出时间：[2021-02-01 10:00:00],,,,,,,,",
        ",,,,,,,,",
        "共4笔记录,,,,,,,,",
        "收入：1笔 200.00元,,,,,,,,",
        "支出：2笔 32.50元,,,,,,,,",
        "中性交易：1笔 100.00元,,,,,,,,",
        "注：,,,,,,,,",
        "1. 充值/提现/理财通购买/零钱通存取/信用卡还款等交易，将计入中性交易,,,,,,,,",
        "2. 本明细仅展示当前账单中的交易，不包括已删除的记录,,,,,,,,",
        "3. 本明细仅供个人对账使用,,,,,,,,",
        ",,,,,,,,",
        "----------------------微信支付账单明细列表--------------------,,,,,,,,",
    ];

    const HEADER: &str = "交易时间,交易类型,交易对方,商品,收/支,金额(元),支付方式,当前状态,交易单号,商户单号,备注";

    fn export(header: &str, rows: &[&str]) -> String {
        let mut lines: Vec<&str> = PREAMBLE.to_vec();
        lines.push(header);
        lines.extend_from_slice(rows);
        lines.join("\n") + "\n"
    }

    const PURCHASE: &str =
        "2021-01-05 12:30:00,商户消费,美团,外卖订单,支出,¥32.50,零钱,支付成功,4200000001\t,10001\t,/";
    const RED_PACKET: &str =
        "2021-01-08 20:00:00,微信红包,张三,/,收入,¥200.00,/,已存入零钱,1000039901\t,/,/";
    const TOP_UP: &str =
        "2021-01-09 08:00:00,零钱充值,招商银行(1234),/,/,¥100.00,招商银行(1234),充值完成,1000050001\t,/,/";
    const ZERO: &str =
        "2021-01-10 09:00:00,商户消费,某商户,免单活动,支出,¥0.00,零钱,支付成功,4200000002\t,10002\t,/";

    #[test]
    fn test_parse_wechat_basic_rows() {
        let text = export(HEADER, &[PURCHASE, RED_PACKET, TOP_UP, ZERO]);
        let txns = parse_wechat_bytes(text.as_bytes()).unwrap();

        // Neutral top-up and zero-amount row are dropped
        assert_eq!(txns.len(), 2);

        let first = &txns[0];
        assert_eq!(
            first.timestamp,
            NaiveDate::from_ymd_opt(2021, 1, 5)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap()
        );
        assert_eq!(first.account, Account::WeChat);
        assert_eq!(first.kind, "支出");
        assert_eq!(first.status, "支付成功");
        assert_eq!(first.subtype, "商户消费");
        assert_eq!(first.counterparty, "美团");
        assert_eq!(first.item, "外卖订单");
        assert_eq!(first.amount, 32.5);
        assert_eq!(first.category, DEFAULT_CATEGORY);

        assert_eq!(txns[1].kind, "收入");
        assert_eq!(txns[1].amount, 200.0);
    }

    #[test]
    fn test_parse_wechat_tolerates_bom_and_blank_lines() {
        let text = format!("\u{feff}\n{}", export(HEADER, &[PURCHASE, "", RED_PACKET]));
        let txns = parse_wechat_bytes(text.as_bytes()).unwrap();
        assert_eq!(txns.len(), 2);
    }

    #[test]
    fn test_parse_wechat_header_only() {
        let text = export(HEADER, &[]);
        assert!(parse_wechat_bytes(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_bad_amount_fails_whole_file() {
        let bad = "2021-01-06 12:30:00,商户消费,美团,外卖订单,支出,¥abc,零钱,支付成功,1\t,2\t,/";
        let text = export(HEADER, &[PURCHASE, bad]);
        match parse_wechat_bytes(text.as_bytes()) {
            Err(IngestError::InvalidAmount { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidAmount, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_timestamp_fails_whole_file() {
        let bad = "2021-13-06 12:30:00,商户消费,美团,外卖订单,支出,¥1.00,零钱,支付成功,1\t,2\t,/";
        let text = export(HEADER, &[bad]);
        assert!(matches!(
            parse_wechat_bytes(text.as_bytes()),
            Err(IngestError::InvalidTimestamp { row: 1, .. })
        ));
    }

    #[test]
    fn test_moved_column_is_rejected() {
        let swapped = "交易时间,交易类型,交易对方,商品,金额(元),收/支,支付方式,当前状态,交易单号,商户单号,备注";
        let text = export(swapped, &[PURCHASE]);
        match parse_wechat_bytes(text.as_bytes()) {
            Err(IngestError::HeaderMismatch {
                position,
                expected,
                found,
            }) => {
                assert_eq!(position, 4);
                assert_eq!(expected, "收/支");
                assert_eq!(found, "金额(元)");
            }
            other => panic!("expected HeaderMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        let text = export("交易时间,交易类型,交易对方,商品,收/支", &[]);
        assert!(matches!(
            parse_wechat_bytes(text.as_bytes()),
            Err(IngestError::ColumnCount { expected: 8, found: 5 })
        ));
    }

    #[test]
    fn test_short_data_row_is_rejected() {
        let text = export(HEADER, &[PURCHASE, "2021-01-05 12:30:00,商户消费,美团"]);
        assert!(matches!(
            parse_wechat_bytes(text.as_bytes()),
            Err(IngestError::ShortRow { row: 2, .. })
        ));
    }

    #[test]
    fn test_missing_preamble_is_rejected() {
        let text = format!("{HEADER}\n{PURCHASE}\n");
        assert!(matches!(
            parse_wechat_bytes(text.as_bytes()),
            Err(IngestError::MissingHeader { offset: 16, found: 2 })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut bytes = export(HEADER, &[PURCHASE]).into_bytes();
        bytes.extend_from_slice(b"\xc3\x28\n");
        assert!(matches!(
            parse_wechat_bytes(&bytes),
            Err(IngestError::Decoding("UTF-8"))
        ));
    }
}
