use bigdecimal::{BigDecimal, Zero};

use crate::error::{ComparisonError, Result};
use crate::models::{RateTable, TierPolicy};

/// 币种换算: 先换成本位币，再换成目标币种
///
/// 同币种直接返回原值 (不经过乘除，避免精度漂移)；任一币种缺少汇率时报错，
/// 不再原样透传金额。
pub fn convert(amount: &BigDecimal, from: &str, to: &str, rates: &RateTable) -> Result<BigDecimal> {
    if from == to {
        return Ok(amount.clone());
    }

    let from_rate = rates
        .get(from)
        .ok_or_else(|| ComparisonError::unknown_currency(from))?;
    let to_rate = rates
        .get(to)
        .ok_or_else(|| ComparisonError::unknown_currency(to))?;

    if to_rate <= &BigDecimal::zero() {
        return Err(ComparisonError::InvalidRate {
            currency: to.to_string(),
            rate: to_rate.clone(),
        });
    }

    let amount_in_base = amount * from_rate;
    Ok(amount_in_base / to_rate)
}

/// 换算成策略的本位币
pub fn to_base(amount: &BigDecimal, currency: &str, policy: &TierPolicy) -> Result<BigDecimal> {
    convert(amount, currency, &policy.base_currency, &policy.exchange_rates)
}

/// 汇率表检查: 汇率必须为正，本位币必须存在且为 1
pub fn validate_rate_table(policy: &TierPolicy) -> Result<()> {
    for (currency, rate) in &policy.exchange_rates {
        if rate <= &BigDecimal::zero() {
            return Err(ComparisonError::InvalidRate {
                currency: currency.clone(),
                rate: rate.clone(),
            });
        }
    }

    match policy.rate(&policy.base_currency) {
        None => Err(ComparisonError::unknown_currency(policy.base_currency.as_str())),
        Some(rate) if *rate != BigDecimal::from(1) => Err(ComparisonError::InvalidRate {
            currency: policy.base_currency.clone(),
            rate: rate.clone(),
        }),
        Some(_) => Ok(()),
    }
}

/// 含税金额: amount * (1 + vat_rate / 100)
pub fn total_with_vat(amount: &BigDecimal, vat_rate_percent: &BigDecimal) -> BigDecimal {
    let factor = BigDecimal::from(1) + vat_rate_percent / BigDecimal::from(100);
    amount * factor
}
