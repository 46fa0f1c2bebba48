use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;

use crate::models::{ComparisonRow, Quote, Vendor};

/// 单个物料的最低价供应商
///
/// 按 vendor_offers 的迭代顺序扫描，严格小于才替换，
/// 所以并列时顺序靠前的供应商胜出。两个渲染器都依赖这条规则。
pub fn select_best(offers: &IndexMap<String, Quote>) -> Option<(String, BigDecimal)> {
    first_minimum(
        offers
            .iter()
            .map(|(vendor, quote)| (vendor, &quote.total_in_base_currency)),
    )
}

/// 填充每行的 best_vendor / best_total_base_currency
pub fn apply_best_offers(rows: &mut [ComparisonRow]) {
    for row in rows.iter_mut() {
        match select_best(&row.vendor_offers) {
            Some((vendor, total)) => {
                row.best_vendor = Some(vendor);
                row.best_total_base_currency = Some(total);
            }
            None => {
                row.best_vendor = None;
                row.best_total_base_currency = None;
            }
        }
    }
}

/// 各供应商在全部物料上的本位币合计
///
/// 顺序取入选供应商顺序；一项都没报的供应商不计入。
pub fn vendor_totals(rows: &[ComparisonRow], vendor_order: &[Vendor]) -> IndexMap<String, BigDecimal> {
    let mut totals = IndexMap::new();

    for vendor in vendor_order {
        let mut quoted = false;
        let mut sum = BigDecimal::zero();
        for row in rows {
            if let Some(quote) = row.vendor_offers.get(&vendor.name) {
                quoted = true;
                sum += &quote.total_in_base_currency;
            }
        }
        if quoted {
            totals.insert(vendor.name.clone(), sum);
        }
    }

    totals
}

/// 总价最低的供应商，并列规则同 select_best
pub fn select_overall(totals: &IndexMap<String, BigDecimal>) -> Option<(String, BigDecimal)> {
    first_minimum(totals.iter())
}

fn first_minimum<'a>(
    candidates: impl Iterator<Item = (&'a String, &'a BigDecimal)>,
) -> Option<(String, BigDecimal)> {
    let mut best: Option<(&String, &BigDecimal)> = None;

    for (vendor, total) in candidates {
        let is_better = match best {
            None => true,
            Some((_, best_total)) => total < best_total,
        };
        if is_better {
            best = Some((vendor, total));
        }
    }

    best.map(|(vendor, total)| (vendor.clone(), total.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn offer(vendor: &str, base_total: &str) -> (String, Quote) {
        let mut quote = Quote::priced("ITEM001", vendor, dec(base_total), "TL", &dec("1"));
        quote.total_in_base_currency = dec(base_total);
        (vendor.to_string(), quote)
    }

    #[test]
    fn picks_minimum_total() {
        let offers: IndexMap<_, _> = vec![offer("A", "200"), offer("B", "180"), offer("C", "190")]
            .into_iter()
            .collect();
        assert_eq!(select_best(&offers), Some(("B".to_string(), dec("180"))));
    }

    #[test]
    fn tie_goes_to_first_vendor_in_order() {
        let offers: IndexMap<_, _> = vec![offer("B", "150.00"), offer("A", "150")]
            .into_iter()
            .collect();
        assert_eq!(select_best(&offers).map(|(v, _)| v), Some("B".to_string()));
    }

    #[test]
    fn empty_offers_have_no_best() {
        assert_eq!(select_best(&IndexMap::new()), None);

        let mut rows = vec![ComparisonRow::from_item(1, &Item::new("X", "X", dec("1"), "adet"))];
        rows[0].best_vendor = Some("stale".to_string());
        apply_best_offers(&mut rows);
        assert_eq!(rows[0].best_vendor, None);
        assert_eq!(rows[0].best_total_base_currency, None);
    }

    #[test]
    fn totals_follow_vendor_order_and_skip_silent_vendors() {
        let item = Item::new("ITEM001", "Laptop", dec("1"), "adet");
        let mut first = ComparisonRow::from_item(1, &item);
        first.vendor_offers.extend(vec![offer("A", "100"), offer("B", "50")]);
        let mut second = ComparisonRow::from_item(2, &item);
        second.vendor_offers.extend(vec![offer("A", "10")]);

        let vendors = vec![
            Vendor::new("B", "V2"),
            Vendor::new("Silent", "V3"),
            Vendor::new("A", "V1"),
        ];
        let totals = vendor_totals(&[first, second], &vendors);

        assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(totals["A"], dec("110"));
        assert_eq!(select_overall(&totals), Some(("B".to_string(), dec("50"))));
        assert_eq!(select_overall(&IndexMap::new()), None);
    }
}
