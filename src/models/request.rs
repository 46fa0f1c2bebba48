use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Item, Quote, Vendor};

/// 采购申请状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Draft,
    Created,
    Sent,
    Completed,
}

/// 采购申请 (调用方层的存储单元，比价引擎不读写它)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub request_no: String,  // 为空时由存储生成
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub requester: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl PurchaseRequest {
    pub fn new(site: impl Into<String>, requester: impl Into<String>) -> Self {
        Self {
            request_no: String::new(),
            site: site.into(),
            requester: requester.into(),
            notes: String::new(),
            items: Vec::new(),
            vendors: Vec::new(),
            quotes: Vec::new(),
            status: RequestStatus::Draft,
            created_at: Utc::now(),
        }
    }
}
