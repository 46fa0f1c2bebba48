use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use crate::error::ComparisonError;
use crate::export::write_csv;
use crate::models::{
    ComparisonResult, Item, OptionsOverride, PolicyOverride, PurchaseRequest, Quote, RequestStatus,
    Vendor,
};
use crate::service::{aggregate_batch, summarize, ComparisonSummary};

/// 请求体: 一次比价的完整输入，策略/选项只覆盖给出的字段，其余用服务端配置
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    pub policy: Option<PolicyOverride>,
    pub options: Option<OptionsOverride>,
}

#[derive(Debug, Deserialize)]
pub struct BatchCompareRequest {
    pub requests: Vec<CompareRequest>,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    pub message: String,
    pub result: Option<ComparisonResult>,
    pub summary: Option<ComparisonSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct BatchCompareResponse {
    pub success: bool,
    pub message: String,
    pub outcomes: Vec<CompareResponse>,
}

#[derive(Debug, Serialize)]
pub struct SaveRequestResponse {
    pub success: bool,
    pub message: String,
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_kind: &'static str,
}

impl CompareResponse {
    fn from_outcome(outcome: Result<ComparisonResult, ComparisonError>) -> Self {
        match outcome {
            Ok(result) => {
                let summary = summarize(&result);
                Self {
                    success: true,
                    message: format!(
                        "Compared {} items across {} vendors",
                        result.total_items, result.total_vendors_considered
                    ),
                    result: Some(result),
                    summary: Some(summary),
                    error_kind: None,
                }
            }
            Err(e) => Self {
                success: false,
                message: format!("Error: {}", e),
                result: None,
                summary: None,
                error_kind: Some(e.kind()),
            },
        }
    }
}

fn status_for(err: &ComparisonError) -> StatusCode {
    match err {
        ComparisonError::NotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_input_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ComparisonError) -> Response {
    warn!("Request failed: {}", err);
    let response = ErrorResponse {
        success: false,
        message: format!("Error: {}", err),
        error_kind: err.kind(),
    };
    (status_for(&err), Json(response)).into_response()
}

fn compare_response(outcome: Result<ComparisonResult, ComparisonError>) -> Response {
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e),
    };
    (status, Json(CompareResponse::from_outcome(outcome))).into_response()
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 单次比价
pub async fn compare(State(state): State<AppState>, Json(req): Json<CompareRequest>) -> Response {
    let outcome = state.service.compare(
        &req.items,
        &req.quotes,
        &req.vendors,
        req.policy.as_ref(),
        req.options.as_ref(),
    );
    compare_response(outcome)
}

/// 批量比价: 每个请求独立汇总，rayon 并行，放到阻塞线程池执行
pub async fn compare_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchCompareRequest>,
) -> Response {
    let inputs: Vec<_> = req
        .requests
        .into_iter()
        .map(|r| {
            state
                .service
                .resolve_input(r.items, r.quotes, r.vendors, r.policy, r.options)
        })
        .collect();
    let count = inputs.len();

    let results = match tokio::task::spawn_blocking(move || aggregate_batch(&inputs)).await {
        Ok(results) => results,
        Err(e) => {
            let response = BatchCompareResponse {
                success: false,
                message: format!("Error: batch worker failed: {}", e),
                outcomes: Vec::new(),
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response();
        }
    };

    let outcomes: Vec<CompareResponse> = results.into_iter().map(CompareResponse::from_outcome).collect();
    let succeeded = outcomes.iter().filter(|o| o.success).count();
    info!("Batch comparison: {}/{} succeeded", succeeded, count);

    let response = BatchCompareResponse {
        success: succeeded == count,
        message: format!("{} of {} comparisons succeeded", succeeded, count),
        outcomes,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// 比价结果导出为 CSV
pub async fn export_csv(State(state): State<AppState>, Json(req): Json<CompareRequest>) -> Response {
    let result = match state.service.compare(
        &req.items,
        &req.quotes,
        &req.vendors,
        req.policy.as_ref(),
        req.options.as_ref(),
    ) {
        Ok(result) => result,
        Err(e) => return error_response(e),
    };

    let mut body = Vec::new();
    if let Err(e) = write_csv(&result, &mut body) {
        return error_response(e);
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response()
}

/// 保存采购申请
pub async fn save_request(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> Response {
    match state.store.save(request) {
        Ok(id) => {
            let response = SaveRequestResponse {
                success: true,
                message: format!("Saved request {}", id),
                id: Some(id),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// 查询采购申请
pub async fn get_request(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.get(&id) {
        Ok(Some(request)) => (StatusCode::OK, Json(request)).into_response(),
        Ok(None) => error_response(ComparisonError::NotFound(format!("request {}", id))),
        Err(e) => error_response(e),
    }
}

/// 用服务端默认策略对已保存的申请比价，成功后标记为 completed
pub async fn compare_stored(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let request = match state.store.get(&id) {
        Ok(Some(request)) => request,
        Ok(None) => return error_response(ComparisonError::NotFound(format!("request {}", id))),
        Err(e) => return error_response(e),
    };

    let outcome = state
        .service
        .compare(&request.items, &request.quotes, &request.vendors, None, None);
    if outcome.is_ok() {
        if let Err(e) = state.store.update_status(&id, RequestStatus::Completed) {
            return error_response(e);
        }
    }
    compare_response(outcome)
}
