use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 需求明细 (采购申请中的一行物料/服务)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_code: String,  // 物料编码 (唯一键)
    pub name: String,
    pub quantity: BigDecimal,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Item {
    pub fn new(
        item_code: impl Into<String>,
        name: impl Into<String>,
        quantity: BigDecimal,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            description: None,
            category: None,
        }
    }
}

/// 报价方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,  // 单次比价内的关联键，必须唯一
    pub vendor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Vendor {
    pub fn new(name: impl Into<String>, vendor_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vendor_id: vendor_id.into(),
            contact_person: None,
            phone: None,
            email: None,
        }
    }

    /// 表头显示: "名称 (电话)"
    pub fn display_label(&self) -> String {
        match &self.phone {
            Some(phone) if !phone.trim().is_empty() => format!("{} ({})", self.name, phone.trim()),
            _ => self.name.clone(),
        }
    }
}
