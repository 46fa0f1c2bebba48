use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 币种 -> 对本位币汇率 (本位币自身为 1)
pub type RateTable = IndexMap<String, BigDecimal>;

/// 会员等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    #[default]
    Standard,
    Premium,
}

impl MembershipTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipTier::Standard => "standard",
            MembershipTier::Premium => "premium",
        }
    }
}

/// 高级会员分组依据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingBasis {
    /// 按登记顺序对全部入选供应商分块
    #[default]
    Registered,
    /// 只对本次至少有一条有效报价的供应商分块
    Quoted,
}

/// 会员等级策略: 供应商数量上限、分组大小、本位币与汇率表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPolicy {
    pub membership_tier: MembershipTier,
    pub max_vendors_standard: usize,
    pub max_vendors_per_group: usize,
    pub base_currency: String,
    pub exchange_rates: RateTable,
    pub grouping_basis: GroupingBasis,
}

impl Default for TierPolicy {
    fn default() -> Self {
        let mut exchange_rates = RateTable::new();
        exchange_rates.insert("TL".to_string(), BigDecimal::from(1));
        exchange_rates.insert("USD".to_string(), decimal_ratio(3450, 100));
        exchange_rates.insert("EUR".to_string(), decimal_ratio(3720, 100));

        Self {
            membership_tier: MembershipTier::Standard,
            max_vendors_standard: 3,
            max_vendors_per_group: 5,
            base_currency: "TL".to_string(),
            exchange_rates,
            grouping_basis: GroupingBasis::Registered,
        }
    }
}

impl TierPolicy {
    pub fn standard(max_vendors: usize) -> Self {
        Self {
            membership_tier: MembershipTier::Standard,
            max_vendors_standard: max_vendors,
            ..Self::default()
        }
    }

    pub fn premium(group_size: usize) -> Self {
        Self {
            membership_tier: MembershipTier::Premium,
            max_vendors_per_group: group_size,
            ..Self::default()
        }
    }

    pub fn with_rates(mut self, base_currency: impl Into<String>, rates: RateTable) -> Self {
        self.base_currency = base_currency.into();
        self.exchange_rates = rates;
        self
    }

    pub fn rate(&self, currency: &str) -> Option<&BigDecimal> {
        self.exchange_rates.get(currency)
    }

    pub fn is_premium(&self) -> bool {
        self.membership_tier == MembershipTier::Premium
    }

    /// 币种代码统一大写 (配置文件的键会被小写化)
    pub fn normalize_currency_codes(&mut self) {
        self.base_currency = self.base_currency.trim().to_uppercase();
        self.exchange_rates = self
            .exchange_rates
            .drain(..)
            .map(|(code, rate)| (code.trim().to_uppercase(), rate))
            .collect();
    }
}

/// 汇总选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// 严格模式: 任何校验/币种问题都中止整次汇总
    pub strict: bool,
    /// 要求至少一条需求明细
    pub require_items: bool,
}

/// 单次请求的策略覆盖: 只替换给出的字段，其余沿用服务端配置
///
/// 汇率表给出时整表替换，不与配置中的汇率合并。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyOverride {
    pub membership_tier: Option<MembershipTier>,
    pub max_vendors_standard: Option<usize>,
    pub max_vendors_per_group: Option<usize>,
    pub base_currency: Option<String>,
    pub exchange_rates: Option<RateTable>,
    pub grouping_basis: Option<GroupingBasis>,
}

impl PolicyOverride {
    pub fn apply_to(&self, base: &TierPolicy) -> TierPolicy {
        let mut policy = base.clone();
        if let Some(tier) = self.membership_tier {
            policy.membership_tier = tier;
        }
        if let Some(max) = self.max_vendors_standard {
            policy.max_vendors_standard = max;
        }
        if let Some(size) = self.max_vendors_per_group {
            policy.max_vendors_per_group = size;
        }
        if let Some(currency) = &self.base_currency {
            policy.base_currency = currency.clone();
        }
        if let Some(rates) = &self.exchange_rates {
            policy.exchange_rates = rates.clone();
        }
        if let Some(basis) = self.grouping_basis {
            policy.grouping_basis = basis;
        }
        policy.normalize_currency_codes();
        policy
    }
}

/// 单次请求的选项覆盖
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsOverride {
    pub strict: Option<bool>,
    pub require_items: Option<bool>,
}

impl OptionsOverride {
    pub fn apply_to(&self, base: &AggregateOptions) -> AggregateOptions {
        AggregateOptions {
            strict: self.strict.unwrap_or(base.strict),
            require_items: self.require_items.unwrap_or(base.require_items),
        }
    }
}

fn decimal_ratio(numerator: i64, denominator: i64) -> BigDecimal {
    BigDecimal::from(numerator) / BigDecimal::from(denominator)
}
