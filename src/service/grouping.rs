use crate::models::{ComparisonResult, GroupingBasis, MembershipTier, TierPolicy, Vendor};
use crate::service::matcher::select_vendors;

/// 供应商分组 (多 sheet / 多页渲染)
///
/// 标准会员: 恰好一组，即截断后的供应商；
/// 高级会员: 按 max_vendors_per_group 顺序分块，最后一块可以不满。
pub fn group_vendors(vendors: &[Vendor], policy: &TierPolicy) -> Vec<Vec<Vendor>> {
    match policy.membership_tier {
        MembershipTier::Standard => vec![select_vendors(vendors, policy).to_vec()],
        MembershipTier::Premium => vendors
            .chunks(policy.max_vendors_per_group.max(1))
            .map(|chunk| chunk.to_vec())
            .collect(),
    }
}

/// 按结果携带的策略和分组依据分组
pub(crate) fn group_result_vendors(result: &ComparisonResult) -> Vec<Vec<Vendor>> {
    match result.policy.grouping_basis {
        GroupingBasis::Registered => group_vendors(&result.vendors, &result.policy),
        GroupingBasis::Quoted => {
            let quoted: Vec<Vendor> = result
                .vendors
                .iter()
                .filter(|v| result.vendor_totals.contains_key(&v.name))
                .cloned()
                .collect();
            group_vendors(&quoted, &result.policy)
        }
    }
}
