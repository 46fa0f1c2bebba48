use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{ComparisonResult, MembershipTier};

/// 比价摘要统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_items: usize,
    pub total_vendors: usize,
    pub priced_items: usize,
    pub unpriced_items: usize,
    pub best_overall_vendor: Option<String>,
    pub best_overall_total: Option<BigDecimal>,
    /// 供应商 -> 中标物料数，按供应商顺序
    pub vendor_wins: IndexMap<String, usize>,
    pub most_wins_vendor: Option<String>,
    pub membership_tier: MembershipTier,
    pub excluded_quotes: usize,
}

/// 从比价结果推导摘要，不重新计算最优供应商
pub fn summarize(result: &ComparisonResult) -> ComparisonSummary {
    let mut vendor_wins: IndexMap<String, usize> = IndexMap::new();
    for vendor in &result.vendors {
        let wins = result.rows.iter().filter(|r| r.is_best(&vendor.name)).count();
        if wins > 0 {
            vendor_wins.insert(vendor.name.clone(), wins);
        }
    }

    // 并列取顺序靠前者
    let mut most_wins_vendor: Option<(&String, usize)> = None;
    for (vendor, &wins) in &vendor_wins {
        if most_wins_vendor.map_or(true, |(_, best)| wins > best) {
            most_wins_vendor = Some((vendor, wins));
        }
    }

    let priced_items = result.rows.iter().filter(|r| r.best_vendor.is_some()).count();
    let excluded_quotes = {
        let mut keys: Vec<(&str, &str)> = result
            .diagnostics
            .iter()
            .filter(|d| !d.vendor_name.is_empty())
            .map(|d| (d.item_code.as_str(), d.vendor_name.as_str()))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys.len()
    };

    ComparisonSummary {
        total_items: result.total_items,
        total_vendors: result.total_vendors_considered,
        priced_items,
        unpriced_items: result.rows.len() - priced_items,
        best_overall_vendor: result.overall_best_vendor.clone(),
        best_overall_total: result.overall_best_total.clone(),
        most_wins_vendor: most_wins_vendor.map(|(v, _)| v.clone()),
        vendor_wins,
        membership_tier: result.policy.membership_tier,
        excluded_quotes,
    }
}
