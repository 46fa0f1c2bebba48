pub mod memory;

use crate::error::Result;
use crate::models::{PurchaseRequest, RequestStatus};

pub use memory::InMemoryRequestStore;

/// 采购申请存储，由调用方层注入；比价引擎从不访问
pub trait RequestStore: Send + Sync {
    /// 保存申请，返回申请编号 (request_no 为空时由存储生成)
    fn save(&self, request: PurchaseRequest) -> Result<String>;

    fn get(&self, id: &str) -> Result<Option<PurchaseRequest>>;

    /// 更新状态，申请不存在时返回 false
    fn update_status(&self, id: &str, status: RequestStatus) -> Result<bool>;

    /// 按创建时间排序
    fn list(&self) -> Result<Vec<PurchaseRequest>>;
}
