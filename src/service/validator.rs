use bigdecimal::{BigDecimal, Zero};

use crate::error::ValidationError;
use crate::models::{Item, Quote, RateTable};

/// 报价结构校验，返回全部问题 (空表示通过)
///
/// 数量取自关联的需求明细。是否剔除报价或中止汇总由调用方决定。
pub fn validate(quote: &Quote, item: &Item, rates: &RateTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if quote.unit_price <= BigDecimal::zero() {
        errors.push(ValidationError::NonPositivePrice(quote.unit_price.clone()));
    }

    if item.quantity <= BigDecimal::zero() {
        errors.push(ValidationError::NonPositiveQuantity(item.quantity.clone()));
    }

    if !rates.contains_key(&quote.currency) {
        errors.push(ValidationError::UnknownCurrency(quote.currency.clone()));
    }

    let expected = &quote.unit_price * &item.quantity;
    if !within_tolerance(&quote.total, &expected) {
        errors.push(ValidationError::TotalMismatch {
            expected,
            actual: quote.total.clone(),
        });
    }

    errors
}

/// 相对误差 1e-6 (期望值小于 1 时按绝对误差)
fn within_tolerance(actual: &BigDecimal, expected: &BigDecimal) -> bool {
    let one = BigDecimal::from(1);
    let magnitude = expected.abs();
    let scale = if magnitude > one { magnitude } else { one };
    let tolerance = scale / BigDecimal::from(1_000_000);
    (actual - expected).abs() <= tolerance
}
