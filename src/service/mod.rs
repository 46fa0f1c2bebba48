pub mod aggregator;
pub mod currency;
pub mod grouping;
pub mod matcher;
pub mod selector;
pub mod summary;
pub mod validator;

use crate::config::ComparisonConfig;
use crate::error::Result;
use crate::models::{
    AggregateOptions, ComparisonInput, ComparisonResult, Item, OptionsOverride, PolicyOverride,
    Quote, TierPolicy, Vendor,
};

pub use aggregator::{aggregate, aggregate_batch};
pub use grouping::group_vendors;
pub use summary::{summarize, ComparisonSummary};

/// 比价服务: 持有服务端默认策略，单次请求可以覆盖
#[derive(Debug, Clone)]
pub struct ComparisonService {
    policy: TierPolicy,
    options: AggregateOptions,
}

impl ComparisonService {
    pub fn new(config: &ComparisonConfig) -> Self {
        Self {
            policy: config.policy.clone(),
            options: config.options,
        }
    }

    pub fn default_policy(&self) -> &TierPolicy {
        &self.policy
    }

    /// 请求覆盖叠加在配置策略上，未给出的字段沿用配置
    pub fn resolve_policy(&self, policy: Option<&PolicyOverride>) -> TierPolicy {
        match policy {
            Some(patch) => patch.apply_to(&self.policy),
            None => self.policy.clone(),
        }
    }

    pub fn resolve_options(&self, options: Option<&OptionsOverride>) -> AggregateOptions {
        match options {
            Some(patch) => patch.apply_to(&self.options),
            None => self.options,
        }
    }

    pub fn compare(
        &self,
        items: &[Item],
        quotes: &[Quote],
        vendors: &[Vendor],
        policy: Option<&PolicyOverride>,
        options: Option<&OptionsOverride>,
    ) -> Result<ComparisonResult> {
        aggregate(
            items,
            quotes,
            vendors,
            &self.resolve_policy(policy),
            &self.resolve_options(options),
        )
    }

    /// 补全未指定的策略/选项后组成完整输入
    pub fn resolve_input(
        &self,
        items: Vec<Item>,
        quotes: Vec<Quote>,
        vendors: Vec<Vendor>,
        policy: Option<PolicyOverride>,
        options: Option<OptionsOverride>,
    ) -> ComparisonInput {
        ComparisonInput {
            items,
            quotes,
            vendors,
            policy: self.resolve_policy(policy.as_ref()),
            options: self.resolve_options(options.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MembershipTier;
    use bigdecimal::BigDecimal;

    fn service() -> ComparisonService {
        ComparisonService::new(&ComparisonConfig {
            policy: TierPolicy::standard(1),
            options: AggregateOptions::default(),
        })
    }

    #[test]
    fn request_policy_overrides_configured_default() {
        let service = service();
        assert_eq!(service.default_policy().max_vendors_standard, 1);

        let items = vec![Item::new("ITEM001", "Laptop", BigDecimal::from(1), "adet")];
        let vendors = vec![Vendor::new("A", "V1"), Vendor::new("B", "V2")];
        let quotes = vec![
            Quote::priced("ITEM001", "A", BigDecimal::from(10), "TL", &BigDecimal::from(1)),
            Quote::priced("ITEM001", "B", BigDecimal::from(5), "TL", &BigDecimal::from(1)),
        ];

        let configured = service.compare(&items, &quotes, &vendors, None, None).unwrap();
        assert_eq!(configured.overall_best_vendor.as_deref(), Some("A"));

        let wider = PolicyOverride {
            max_vendors_standard: Some(2),
            ..PolicyOverride::default()
        };
        let overridden = service
            .compare(&items, &quotes, &vendors, Some(&wider), None)
            .unwrap();
        assert_eq!(overridden.policy.base_currency, "TL");
        assert_eq!(overridden.overall_best_vendor.as_deref(), Some("B"));
    }

    #[test]
    fn resolve_input_fills_missing_policy() {
        let input = service().resolve_input(vec![], vec![], vec![], None, None);
        assert_eq!(input.policy.max_vendors_standard, 1);

        let premium = PolicyOverride {
            membership_tier: Some(MembershipTier::Premium),
            ..PolicyOverride::default()
        };
        let input = service().resolve_input(vec![], vec![], vec![], Some(premium), None);
        assert_eq!(input.policy.membership_tier, MembershipTier::Premium);
        assert_eq!(input.policy.max_vendors_standard, 1);
    }

    #[test]
    fn partial_policy_override_keeps_configured_rates() {
        let mut policy = TierPolicy::standard(3);
        policy.exchange_rates.insert("USD".to_string(), BigDecimal::from(40));
        let service = ComparisonService::new(&ComparisonConfig {
            policy,
            options: AggregateOptions::default(),
        });

        let items = vec![Item::new("ITEM001", "Laptop", BigDecimal::from(1), "adet")];
        let vendors = vec![Vendor::new("A", "V1")];
        let quotes = vec![Quote::priced("ITEM001", "A", BigDecimal::from(1), "USD", &BigDecimal::from(1))];
        let patch: PolicyOverride = serde_json::from_str(r#"{"membership_tier":"premium"}"#).unwrap();

        let result = service
            .compare(&items, &quotes, &vendors, Some(&patch), None)
            .unwrap();
        assert!(result.policy.is_premium());
        assert_eq!(
            result.rows[0].offer("A").unwrap().total_in_base_currency,
            BigDecimal::from(40)
        );
    }
}
