use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{AggregateOptions, Item, Quote, TierPolicy, Vendor};
use crate::service::grouping;

/// 单个物料的横向比价行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub sequence_no: usize,
    pub item_code: String,
    pub name: String,
    pub quantity: BigDecimal,
    pub unit: String,
    /// 供应商名 -> 报价；未报价的供应商不出现 (不是 0)
    pub vendor_offers: IndexMap<String, Quote>,
    pub best_vendor: Option<String>,
    pub best_total_base_currency: Option<BigDecimal>,
}

impl ComparisonRow {
    pub fn from_item(sequence_no: usize, item: &Item) -> Self {
        Self {
            sequence_no,
            item_code: item.item_code.clone(),
            name: item.name.clone(),
            quantity: item.quantity.clone(),
            unit: item.unit.clone(),
            vendor_offers: IndexMap::new(),
            best_vendor: None,
            best_total_base_currency: None,
        }
    }

    pub fn offer(&self, vendor_name: &str) -> Option<&Quote> {
        self.vendor_offers.get(vendor_name)
    }

    pub fn is_best(&self, vendor_name: &str) -> bool {
        self.best_vendor.as_deref() == Some(vendor_name)
    }
}

/// 诊断类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Validation,
    UnknownCurrency,
    UnmatchedItem,
    UnknownVendor,
}

/// 被剔除报价的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub item_code: String,
    pub vendor_name: String,  // 物料级问题 (如数量非正) 为空
    pub message: String,
}

/// 一次汇总的完整输出 (纯值，生成后不再修改)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub rows: Vec<ComparisonRow>,
    pub total_items: usize,
    pub total_vendors_considered: usize,
    pub overall_best_vendor: Option<String>,
    pub overall_best_total: Option<BigDecimal>,
    /// 入选供应商，按调用方给定的顺序
    pub vendors: Vec<Vendor>,
    /// 供应商 -> 本位币总额，只含至少报过一项的供应商
    pub vendor_totals: IndexMap<String, BigDecimal>,
    pub policy: TierPolicy,
    pub diagnostics: Vec<Diagnostic>,
}

impl ComparisonResult {
    /// 按结果自带的策略对供应商分组 (多 sheet 渲染)
    pub fn vendor_groups(&self) -> Vec<Vec<Vendor>> {
        grouping::group_result_vendors(self)
    }

    pub fn is_overall_best(&self, vendor_name: &str) -> bool {
        self.overall_best_vendor.as_deref() == Some(vendor_name)
    }
}

/// 一次比价的完整输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub policy: TierPolicy,
    #[serde(default)]
    pub options: AggregateOptions,
}
