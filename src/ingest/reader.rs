use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;

use super::headers::{CanonicalField, HeaderMapping, HeaderResolution};
use super::number::{parse_date, parse_decimal};
use crate::error::{ComparisonError, Result};
use crate::models::{Item, Quote};

/// 导入过程中的单行问题
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestIssue {
    pub line: u64,
    pub message: String,
}

/// 单个供应商报价表的导入结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub vendor_name: String,
    pub quotes: Vec<Quote>,
    pub issues: Vec<IngestIssue>,
    pub resolution: HeaderResolution,
}

/// 读取供应商报价 CSV，表头只解析一次，输出强类型报价
///
/// 总价按 单价 x 需求数量 计算；物料编码不在需求中或单价无法解析的行记入 issues。
pub fn read_vendor_quotes<R: Read>(
    reader: R,
    vendor_name: &str,
    items: &[Item],
    mapping: &HeaderMapping,
    default_currency: &str,
) -> Result<IngestReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let resolution = mapping.resolve(&headers);
    if !resolution.is_complete() {
        return Err(ComparisonError::MissingColumns {
            fields: resolution
                .missing_required
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
        });
    }

    let item_index: HashMap<&str, &Item> = items.iter().map(|i| (i.item_code.as_str(), i)).collect();
    let mut quotes = Vec::new();
    let mut issues = Vec::new();

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let cell = |field: CanonicalField| -> Option<&str> {
            resolution
                .column(field)
                .and_then(|idx| record.get(idx))
                .filter(|v| !v.is_empty())
        };

        // 空行 / 合计行没有物料编码
        let Some(item_code) = cell(CanonicalField::ItemCode) else {
            continue;
        };

        let Some(item) = item_index.get(item_code) else {
            issues.push(IngestIssue {
                line,
                message: format!("item '{}' is not part of the request", item_code),
            });
            continue;
        };

        let raw_price = cell(CanonicalField::UnitPrice).unwrap_or_default();
        let Some(unit_price) = parse_decimal(raw_price) else {
            issues.push(IngestIssue {
                line,
                message: format!("unit price '{}' is not a number", raw_price),
            });
            continue;
        };

        let currency = cell(CanonicalField::Currency)
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| default_currency.to_string());

        let mut quote = Quote::priced(item_code, vendor_name, unit_price, currency, &item.quantity);
        quote.lead_time = cell(CanonicalField::LeadTime).map(str::to_string);
        quote.payment_terms = cell(CanonicalField::PaymentTerms).map(str::to_string);
        quote.delivery_method = cell(CanonicalField::DeliveryMethod).map(str::to_string);
        quote.notes = cell(CanonicalField::Notes).map(str::to_string);

        if let Some(raw) = cell(CanonicalField::VatRate) {
            quote.vat_rate = parse_decimal(raw.trim_start_matches('%'));
            if quote.vat_rate.is_none() {
                issues.push(IngestIssue {
                    line,
                    message: format!("VAT rate '{}' ignored", raw),
                });
            }
        }

        if let Some(raw) = cell(CanonicalField::QuoteDate) {
            quote.quote_date = parse_date(raw);
            if quote.quote_date.is_none() {
                issues.push(IngestIssue {
                    line,
                    message: format!("quote date '{}' ignored", raw),
                });
            }
        }

        quotes.push(quote);
    }

    tracing::info!(
        "Imported {} quotes for vendor {} ({} issues)",
        quotes.len(),
        vendor_name,
        issues.len()
    );

    Ok(IngestReport {
        vendor_name: vendor_name.to_string(),
        quotes,
        issues,
        resolution,
    })
}
