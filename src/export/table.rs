use bigdecimal::BigDecimal;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{ComparisonResult, Quote};

const FIXED_HEADERS: [&str; 7] = [
    "NO",
    "ITEM CODE",
    "ITEM NAME",
    "QUANTITY",
    "UNIT",
    "BEST VENDOR",
    "BEST TOTAL",
];

/// 扁平表格投影 (每物料一行，每供应商一组列)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// 只依赖 ComparisonResult 生成表格；未报价为空字符串，不是 0
pub fn flat_table(result: &ComparisonResult) -> FlatTable {
    let base = &result.policy.base_currency;
    let mut headers: Vec<String> = FIXED_HEADERS.iter().map(|h| h.to_string()).collect();
    for vendor in &result.vendors {
        let name = &vendor.name;
        headers.push(format!("{} UNIT PRICE", name));
        headers.push(format!("{} CURRENCY", name));
        headers.push(format!("{} TOTAL", name));
        headers.push(format!("{} TOTAL ({})", name, base));
        headers.push(format!("{} PAYMENT TERMS", name));
        headers.push(format!("{} LEAD TIME", name));
        headers.push(format!("{} DELIVERY", name));
        headers.push(format!("{} NOTES", name));
    }

    let rows = result
        .rows
        .iter()
        .map(|row| {
            let mut record = vec![
                row.sequence_no.to_string(),
                row.item_code.clone(),
                row.name.clone(),
                row.quantity.to_string(),
                row.unit.clone(),
                row.best_vendor.clone().unwrap_or_default(),
                option_to_csv(&row.best_total_base_currency),
            ];
            for vendor in &result.vendors {
                match row.offer(&vendor.name) {
                    Some(quote) => record.extend(offer_cells(quote)),
                    None => record.extend(std::iter::repeat(String::new()).take(8)),
                }
            }
            record
        })
        .collect();

    FlatTable { headers, rows }
}

/// 写出 CSV (表头 + 数据行)
pub fn write_csv<W: Write>(result: &ComparisonResult, writer: W) -> Result<()> {
    let table = flat_table(result);
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(&table.headers)?;
    for record in &table.rows {
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出比价结果到 CSV 文件
pub fn export_to_csv(result: &ComparisonResult, output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_csv(result, file)?;
    tracing::info!("Comparison exported to {}", output_path.display());
    Ok(())
}

fn offer_cells(quote: &Quote) -> [String; 8] {
    [
        quote.unit_price.to_string(),
        quote.currency.clone(),
        quote.total.to_string(),
        quote.total_in_base_currency.to_string(),
        quote.payment_terms.clone().unwrap_or_default(),
        quote.lead_time.clone().unwrap_or_default(),
        quote.delivery_method.clone().unwrap_or_default(),
        quote.notes.clone().unwrap_or_default(),
    ]
}

fn option_to_csv(val: &Option<BigDecimal>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregateOptions, Item, TierPolicy, Vendor};
    use crate::service::aggregate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn result() -> ComparisonResult {
        let items = vec![
            Item::new("ITEM001", "Laptop", dec("2"), "adet"),
            Item::new("ITEM002", "Printer", dec("3"), "adet"),
        ];
        let quotes = vec![
            Quote::priced("ITEM001", "A", dec("100"), "TL", &dec("2"))
                .with_terms("Peşin", "5 gün", "Kargo"),
            Quote::priced("ITEM002", "B", dec("2"), "USD", &dec("3")),
        ];
        let vendors = vec![Vendor::new("A", "V1"), Vendor::new("B", "V2")];
        aggregate(
            &items,
            &quotes,
            &vendors,
            &TierPolicy::default(),
            &AggregateOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn headers_cover_every_selected_vendor() {
        let table = flat_table(&result());
        assert_eq!(table.headers.len(), 7 + 2 * 8);
        assert_eq!(table.headers[7], "A UNIT PRICE");
        assert_eq!(table.headers[10], "A TOTAL (TL)");
        assert_eq!(table.headers[15], "B UNIT PRICE");
    }

    #[test]
    fn absent_offers_are_blank_cells() {
        let table = flat_table(&result());
        let first = &table.rows[0];
        assert_eq!(first[0], "1");
        assert_eq!(first[5], "A");
        assert_eq!(first[7], "100");
        assert_eq!(first[11], "Peşin");
        assert!(first[15..23].iter().all(|c| c.is_empty()));

        let second = &table.rows[1];
        assert!(second[7..15].iter().all(|c| c.is_empty()));
        assert_eq!(second[16], "USD");
        assert_eq!(dec(&second[18]), dec("207"));
        assert_eq!(second[5], "B");
    }

    #[test]
    fn csv_output_has_header_and_one_line_per_item() {
        let mut buffer = Vec::new();
        write_csv(&result(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NO,ITEM CODE,ITEM NAME"));
        assert!(lines[1].starts_with("1,ITEM001,Laptop,2,adet,A,200,"));
    }

    #[test]
    fn export_writes_file() {
        let path = std::env::temp_dir().join(format!("comparison-{}.csv", std::process::id()));
        export_to_csv(&result(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(text.lines().count(), 3);
    }
}
