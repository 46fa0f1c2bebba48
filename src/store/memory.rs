use chrono::Local;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::RequestStore;
use crate::error::Result;
use crate::models::{PurchaseRequest, RequestStatus};

/// 进程内存储: DashMap 分片加锁，并发请求互不阻塞
///
/// 编号序列属于存储实例本身，没有进程级全局状态。
#[derive(Debug, Default)]
pub struct InMemoryRequestStore {
    requests: DashMap<String, PurchaseRequest>,
    sequence: AtomicU64,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// PR-YYYYMMDD-HHMMSS-NNNN，序号超过 9999 时位数自然加宽，不回绕
    fn next_request_no(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("PR-{}-{:04}", Local::now().format("%Y%m%d-%H%M%S"), seq)
    }
}

impl RequestStore for InMemoryRequestStore {
    fn save(&self, mut request: PurchaseRequest) -> Result<String> {
        if request.request_no.trim().is_empty() {
            request.request_no = self.next_request_no();
        }
        let id = request.request_no.clone();
        debug!("保存采购申请 {}: {} 个物料, {} 个供应商", id, request.items.len(), request.vendors.len());
        self.requests.insert(id.clone(), request);
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Option<PurchaseRequest>> {
        Ok(self.requests.get(id).map(|entry| entry.value().clone()))
    }

    fn update_status(&self, id: &str, status: RequestStatus) -> Result<bool> {
        match self.requests.get_mut(id) {
            Some(mut entry) => {
                entry.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list(&self) -> Result<Vec<PurchaseRequest>> {
        let mut all: Vec<PurchaseRequest> =
            self.requests.iter().map(|entry| entry.value().clone()).collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.request_no.cmp(&b.request_no))
        });
        Ok(all)
    }
}
