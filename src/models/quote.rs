use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 报价 (某供应商对某物料的一条报价)
///
/// `total_in_base_currency` 由引擎在每次汇总时按当前汇率重新计算，
/// 输入中的旧值不被信任。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub item_code: String,
    pub vendor_name: String,
    pub unit_price: BigDecimal,
    pub currency: String,
    pub total: BigDecimal,  // unit_price * quantity, 报价币种
    #[serde(default = "BigDecimal::zero")]
    pub total_in_base_currency: BigDecimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<BigDecimal>,
}

impl Quote {
    /// 按单价和数量构建报价，total = unit_price * quantity
    pub fn priced(
        item_code: impl Into<String>,
        vendor_name: impl Into<String>,
        unit_price: BigDecimal,
        currency: impl Into<String>,
        quantity: &BigDecimal,
    ) -> Self {
        let total = &unit_price * quantity;
        Self {
            item_code: item_code.into(),
            vendor_name: vendor_name.into(),
            unit_price,
            currency: currency.into(),
            total,
            total_in_base_currency: BigDecimal::zero(),
            payment_terms: None,
            lead_time: None,
            delivery_method: None,
            notes: None,
            quote_date: None,
            vat_rate: None,
        }
    }

    pub fn with_terms(
        mut self,
        payment_terms: impl Into<String>,
        lead_time: impl Into<String>,
        delivery_method: impl Into<String>,
    ) -> Self {
        self.payment_terms = Some(payment_terms.into());
        self.lead_time = Some(lead_time.into());
        self.delivery_method = Some(delivery_method.into());
        self
    }
}
