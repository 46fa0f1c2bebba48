pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::service::ComparisonService;
use crate::store::{InMemoryRequestStore, RequestStore};

pub use handlers::*;

/// 共享状态: 比价服务 + 采购申请存储
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ComparisonService>,
    pub store: Arc<dyn RequestStore>,
}

impl AppState {
    pub fn new(service: ComparisonService, store: Arc<dyn RequestStore>) -> Self {
        Self {
            service: Arc::new(service),
            store,
        }
    }

    /// 默认装配: 配置中的策略 + 进程内存储
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ComparisonService::new(&config.comparison),
            Arc::new(InMemoryRequestStore::new()),
        )
    }
}

pub fn router(state: AppState) -> Router {
    let compare_routes = Router::new()
        .route("/api/compare", post(handlers::compare))
        .route("/api/compare/batch", post(handlers::compare_batch))
        .route("/api/compare/export", post(handlers::export_csv));

    let request_routes = Router::new()
        .route("/api/requests", post(handlers::save_request))
        .route("/api/requests/:id", get(handlers::get_request))
        .route("/api/requests/:id/compare", post(handlers::compare_stored));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(compare_routes)
        .merge(request_routes)
        .layer(ServiceBuilder::new())
        .with_state(state)
}
