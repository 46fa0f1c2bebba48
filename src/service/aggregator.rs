use rayon::prelude::*;

use crate::error::{ComparisonError, Result};
use crate::models::{
    AggregateOptions, ComparisonInput, ComparisonResult, Item, MembershipTier, Quote, TierPolicy,
    Vendor,
};
use crate::service::{currency, matcher, selector};

/// 比价汇总: 匹配 -> 单项最优 -> 总体最优 -> 打包统计
///
/// 纯函数，无共享状态；相同输入重复调用得到完全相同的结果。
pub fn aggregate(
    items: &[Item],
    quotes: &[Quote],
    vendors: &[Vendor],
    policy: &TierPolicy,
    options: &AggregateOptions,
) -> Result<ComparisonResult> {
    validate_policy(policy)?;
    currency::validate_rate_table(policy)?;

    if items.is_empty() && options.require_items {
        return Err(ComparisonError::EmptyItemSet);
    }

    let outcome = matcher::match_quotes(items, quotes, vendors, policy, options)?;
    let mut rows = outcome.rows;
    selector::apply_best_offers(&mut rows);

    let selected = matcher::select_vendors(vendors, policy).to_vec();
    let vendor_totals = selector::vendor_totals(&rows, &selected);
    let (overall_best_vendor, overall_best_total) = match selector::select_overall(&vendor_totals) {
        Some((vendor, total)) => (Some(vendor), Some(total)),
        None => (None, None),
    };

    tracing::info!(
        "Comparison complete: items={}, vendors={}/{}, excluded={}, overall_best={:?}",
        items.len(),
        selected.len(),
        vendors.len(),
        outcome.diagnostics.len(),
        overall_best_vendor
    );

    Ok(ComparisonResult {
        total_items: rows.len(),
        rows,
        total_vendors_considered: selected.len(),
        overall_best_vendor,
        overall_best_total,
        vendors: selected,
        vendor_totals,
        policy: policy.clone(),
        diagnostics: outcome.diagnostics,
    })
}

/// 批量比价: 每个输入独立汇总，rayon 并行，输出顺序与输入一致
pub fn aggregate_batch(inputs: &[ComparisonInput]) -> Vec<Result<ComparisonResult>> {
    tracing::debug!("开始批量比价, {} 个请求", inputs.len());
    inputs
        .par_iter()
        .map(|input| {
            aggregate(
                &input.items,
                &input.quotes,
                &input.vendors,
                &input.policy,
                &input.options,
            )
        })
        .collect()
}

fn validate_policy(policy: &TierPolicy) -> Result<()> {
    match policy.membership_tier {
        MembershipTier::Standard if policy.max_vendors_standard == 0 => Err(
            ComparisonError::InvalidPolicy("max_vendors_standard must be at least 1".to_string()),
        ),
        MembershipTier::Premium if policy.max_vendors_per_group == 0 => Err(
            ComparisonError::InvalidPolicy("max_vendors_per_group must be at least 1".to_string()),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiagnosticKind, RateTable};
    use assert_matches::assert_matches;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn scenario() -> (Vec<Item>, Vec<Quote>, Vec<Vendor>, TierPolicy) {
        let items = vec![
            Item::new("ITEM001", "Laptop", dec("2"), "adet"),
            Item::new("ITEM002", "Printer", dec("3"), "adet"),
        ];
        let quotes = vec![
            Quote::priced("ITEM001", "A", dec("100"), "TL", &dec("2")),
            Quote::priced("ITEM001", "B", dec("90"), "TL", &dec("2")),
            Quote::priced("ITEM002", "A", dec("50"), "TL", &dec("3")),
            Quote::priced("ITEM002", "C", dec("45"), "TL", &dec("3")),
        ];
        let vendors = vec![
            Vendor::new("A", "VENDOR001"),
            Vendor::new("B", "VENDOR002"),
            Vendor::new("C", "VENDOR003"),
        ];
        let mut rates = RateTable::new();
        rates.insert("TL".to_string(), dec("1.0"));
        rates.insert("USD".to_string(), dec("34.5"));
        let policy = TierPolicy::standard(3).with_rates("TL", rates);
        (items, quotes, vendors, policy)
    }

    #[test]
    fn two_item_scenario_selects_expected_winners() {
        let (items, quotes, vendors, policy) = scenario();
        let result = aggregate(&items, &quotes, &vendors, &policy, &AggregateOptions::default()).unwrap();

        assert_eq!(result.total_items, 2);
        assert_eq!(result.total_vendors_considered, 3);
        assert_eq!(result.rows[0].best_vendor.as_deref(), Some("B"));
        assert_eq!(result.rows[0].best_total_base_currency, Some(dec("180")));
        assert_eq!(result.rows[1].best_vendor.as_deref(), Some("C"));
        assert_eq!(result.rows[1].best_total_base_currency, Some(dec("135")));

        assert_eq!(result.vendor_totals["A"], dec("350"));
        assert_eq!(result.vendor_totals["B"], dec("180"));
        assert_eq!(result.vendor_totals["C"], dec("135"));
        assert_eq!(result.overall_best_vendor.as_deref(), Some("C"));
        assert_eq!(result.overall_best_total, Some(dec("135.0")));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let (items, quotes, vendors, policy) = scenario();
        let options = AggregateOptions::default();
        let first = aggregate(&items, &quotes, &vendors, &policy, &options).unwrap();
        let second = aggregate(
            &items.clone(),
            &quotes.clone(),
            &vendors.clone(),
            &policy.clone(),
            &options,
        )
        .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let policy = TierPolicy::default();
        let result = aggregate(&[], &[], &[], &policy, &AggregateOptions::default()).unwrap();
        assert_eq!(result.total_items, 0);
        assert!(result.rows.is_empty());
        assert_eq!(result.overall_best_vendor, None);
        assert_eq!(result.overall_best_total, None);

        let required = AggregateOptions { strict: false, require_items: true };
        assert_matches!(
            aggregate(&[], &[], &[], &policy, &required),
            Err(ComparisonError::EmptyItemSet)
        );
    }

    #[test]
    fn foreign_currency_quotes_compare_in_base_currency() {
        let (items, mut quotes, vendors, policy) = scenario();
        // 3 USD * 2 = 6 USD = 207 TL, 比 B 的 180 TL 贵
        quotes[1] = Quote::priced("ITEM001", "B", dec("3"), "USD", &dec("2"));
        let result = aggregate(&items, &quotes, &vendors, &policy, &AggregateOptions::default()).unwrap();

        let b = result.rows[0].offer("B").unwrap();
        assert_eq!(b.total, dec("6"));
        assert_eq!(b.total_in_base_currency, dec("207"));
        assert_eq!(result.rows[0].best_vendor.as_deref(), Some("A"));
    }

    #[test]
    fn zero_price_quote_is_excluded_with_diagnostic() {
        let (items, mut quotes, vendors, policy) = scenario();
        quotes[1] = Quote::priced("ITEM001", "B", dec("0"), "TL", &dec("2"));
        let result = aggregate(&items, &quotes, &vendors, &policy, &AggregateOptions::default()).unwrap();

        assert!(!result.rows[0].vendor_offers.contains_key("B"));
        assert_eq!(result.rows[0].best_vendor.as_deref(), Some("A"));
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::Validation);
        assert_eq!(result.diagnostics[0].vendor_name, "B");
        assert!(!result.vendor_totals.contains_key("B"));
    }

    #[test]
    fn tie_break_prefers_first_selected_vendor() {
        let items = vec![Item::new("ITEM001", "Laptop", dec("1"), "adet")];
        let quotes = vec![
            Quote::priced("ITEM001", "A", dec("100"), "TL", &dec("1")),
            Quote::priced("ITEM001", "B", dec("100.00"), "TL", &dec("1")),
        ];
        let vendors = vec![Vendor::new("B", "V2"), Vendor::new("A", "V1")];
        let result = aggregate(
            &items,
            &quotes,
            &vendors,
            &TierPolicy::default(),
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(result.rows[0].best_vendor.as_deref(), Some("B"));
        assert_eq!(result.overall_best_vendor.as_deref(), Some("B"));
    }

    #[test]
    fn zero_caps_are_rejected() {
        let (items, quotes, vendors, _) = scenario();
        let options = AggregateOptions::default();
        assert_matches!(
            aggregate(&items, &quotes, &vendors, &TierPolicy::standard(0), &options),
            Err(ComparisonError::InvalidPolicy(_))
        );
        assert_matches!(
            aggregate(&items, &quotes, &vendors, &TierPolicy::premium(0), &options),
            Err(ComparisonError::InvalidPolicy(_))
        );
    }

    #[test]
    fn batch_keeps_input_order_and_isolates_failures() {
        let (items, quotes, vendors, policy) = scenario();
        let good = ComparisonInput {
            items: items.clone(),
            quotes: quotes.clone(),
            vendors: vendors.clone(),
            policy: policy.clone(),
            options: AggregateOptions::default(),
        };
        let mut duplicated = good.clone();
        duplicated.quotes.push(quotes[0].clone());
        let empty = ComparisonInput {
            items: vec![],
            quotes: vec![],
            vendors: vec![],
            policy,
            options: AggregateOptions::default(),
        };

        let results = aggregate_batch(&[good, duplicated, empty]);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap().overall_best_vendor.as_deref(),
            Some("C")
        );
        assert_matches!(results[1], Err(ComparisonError::DuplicateQuote { .. }));
        assert_eq!(results[2].as_ref().unwrap().total_items, 0);
    }
}
