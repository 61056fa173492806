//! Alipay transaction record export parser (支付宝交易记录明细)
//!
//! GBK-encoded CSV with 4 preamble rows, then:
//!   交易号,商家订单号,交易创建时间,付款时间,最近修改时间,交易来源地,类型,交易对方,
//!   商品名称,金额（元）,收/支,交易状态,服务费（元）,成功退款（元）,备注,资金状态,
//! followed by 7 summary rows (totals, export time, user).
//!
//! Every cell is padded with trailing spaces. Internal fund moves leave 收/支 empty.

use std::path::Path;

use billmerge_core::{Account, Transaction};

use crate::error::Result;
use crate::parsers::{parse_export, parse_export_bytes};
use crate::types::{ProviderFormat, TextEncoding};

pub const ALIPAY: ProviderFormat = ProviderFormat {
    account: Account::Alipay,
    header_offset: 4,
    footer_rows: 7,
    encoding: TextEncoding::Gbk,
    columns: [2, 10, 11, 6, 7, 8, 9],
    expected_headers: [
        "交易创建时间",
        "收/支",
        "交易状态",
        "类型",
        "交易对方",
        "商品名称",
        "金额（元）",
    ],
    not_applicable: "",
};

/// Parse an Alipay CSV export file.
pub fn parse_alipay_csv(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    parse_export(path, &ALIPAY)
}

/// Parse Alipay CSV export bytes (GBK).
pub fn parse_alipay_bytes(bytes: &[u8]) -> Result<Vec<Transaction>> {
    parse_export_bytes(bytes, &ALIPAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;

    const PREAMBLE: &str = "支付宝交易记录明细查询
账号:[test@example.com]
起始日期:[2021-01-01 00:00:00]    终止日期:[2021-02-01 00:00:00]
---------------------------------交易记录明细列表------------------------------------
交易号                  ,商家订单号               ,交易创建时间              ,付款时间                ,最近修改时间              ,交易来源地     ,类型              ,交易对方            ,商品名称                ,金额（元）   ,收/支     ,交易状态    ,服务费（元）   ,成功退款（元）  ,备注                  ,资金状态     ,
";

    const FOOTER: &str = "------------------------------------------------------------------------------------
共4笔记录
已收入:1笔,8.00元
待收入:0笔,0.00元
已支出:1笔,45.80元
待支出:0笔,0.00元
导出时间:[2021-02-01 10:00:00]    用户:测试用户
";

    const GROCERIES: &str = "2021012022001 ,T200P1 ,2021-01-20 09:15:02 ,2021-01-20 09:15:03 ,2021-01-20 09:15:03 ,其他（包括阿里巴巴和外部商家）,即时到账交易 ,盒马鲜生 ,盒马鲜生消费 ,45.80 ,支出 ,交易成功 ,0.00 ,0.00 , ,已支出 ,";
    const REFUND: &str = "2021012322002 ,T200P2 ,2021-01-23 14:00:00 ,2021-01-23 14:00:01 ,2021-01-23 14:00:01 ,支付宝网站 ,即时到账交易 ,淘宝卖家 ,退款-数据线 ,8.00 ,收入 ,交易成功 ,0.00 ,0.00 , ,已收入 ,";
    const FUND_MOVE: &str = "2021012522003 , ,2021-01-25 10:00:00 ,2021-01-25 10:00:00 ,2021-01-25 10:00:00 ,支付宝网站 ,即时到账交易 ,余额宝 ,余额宝-转入 ,100.00 , ,交易成功 ,0.00 ,0.00 , ,资金转移 ,";
    const ZERO: &str = "2021012622004 ,T200P4 ,2021-01-26 10:00:00 ,2021-01-26 10:00:00 ,2021-01-26 10:00:00 ,支付宝网站 ,即时到账交易 ,某商户 ,优惠抵扣 ,0.00 ,支出 ,交易成功 ,0.00 ,0.00 , ,已支出 ,";

    fn gbk(rows: &[&str]) -> Vec<u8> {
        let mut text = PREAMBLE.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text.push_str(FOOTER);
        let (bytes, _, unmappable) = encoding_rs::GBK.encode(&text);
        assert!(!unmappable);
        bytes.into_owned()
    }

    #[test]
    fn test_parse_alipay_basic_rows() {
        let txns = parse_alipay_bytes(&gbk(&[GROCERIES, REFUND, FUND_MOVE, ZERO])).unwrap();

        // Fund move (empty 收/支) and zero-amount row are dropped; footer is not data
        assert_eq!(txns.len(), 2);

        let first = &txns[0];
        assert_eq!(first.account, Account::Alipay);
        assert_eq!(first.timestamp.to_string(), "2021-01-20 09:15:02");
        assert_eq!(first.kind, "支出");
        assert_eq!(first.status, "交易成功");
        assert_eq!(first.subtype, "即时到账交易");
        assert_eq!(first.counterparty, "盒马鲜生");
        assert_eq!(first.item, "盒马鲜生消费");
        assert_eq!(first.amount, 45.8);

        assert_eq!(txns[1].kind, "收入");
        assert_eq!(txns[1].item, "退款-数据线");
    }

    #[test]
    fn test_parse_alipay_without_rows() {
        assert!(parse_alipay_bytes(&gbk(&[])).unwrap().is_empty());
    }

    #[test]
    fn test_utf8_export_fails_header_check() {
        // A UTF-8 file read as GBK decodes to mojibake headers
        let mut text = PREAMBLE.to_string();
        text.push_str(GROCERIES);
        text.push('\n');
        text.push_str(FOOTER);
        assert!(parse_alipay_bytes(text.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_amount_fails_whole_file() {
        let bad = GROCERIES.replace("45.80", "4x.80");
        let err = parse_alipay_bytes(&gbk(&[REFUND, &bad])).unwrap_err();
        assert!(matches!(err, IngestError::InvalidAmount { row: 2, .. }));
    }
}
