use crate::error::PipelineError;
use crate::models::{AgingReference, FilterOptions, FilterSelection};
use crate::service::pipeline::{DashboardReport, ViewResult};
use crate::service::DashboardService;
use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 侧边栏筛选值 + 可选的 Aging 参考日期
#[derive(Debug, Default, Deserialize)]
pub struct ViewRequest {
    #[serde(flatten)]
    pub selection: FilterSelection,
    #[serde(default)]
    pub aging_reference: Option<AgingReference>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptionsQuery {
    #[serde(default)]
    pub aging_reference: Option<AgingReference>,
}

/// 通用响应体
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub success: bool,
    pub options: FilterOptions,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub success: bool,
    #[serde(flatten)]
    pub view: ViewResult,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: DashboardReport,
}

fn error_response(e: PipelineError) -> Response {
    let status = match &e {
        PipelineError::MissingColumns(_)
        | PipelineError::InvalidFilter { .. }
        | PipelineError::MalformedDate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!("Request failed ({}): {}", status, e);
    let response = MessageResponse {
        success: false,
        message: format!("Error: {}", e),
    };
    (status, Json(response)).into_response()
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 侧边栏选项
pub async fn filter_options(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<OptionsQuery>,
) -> Response {
    match service.options(query.aging_reference).await {
        Ok(options) => (StatusCode::OK, Json(OptionsResponse { success: true, options })).into_response(),
        Err(e) => error_response(e),
    }
}

/// 筛选后的记录 + 汇总
pub async fn filtered_view(
    State(service): State<Arc<DashboardService>>,
    Json(req): Json<ViewRequest>,
) -> Response {
    match service.view(req.selection, req.aging_reference).await {
        Ok(view) => (StatusCode::OK, Json(ViewResponse { success: true, view })).into_response(),
        Err(e) => error_response(e),
    }
}

/// 各页签数据
pub async fn dashboard_report(
    State(service): State<Arc<DashboardService>>,
    Json(req): Json<ViewRequest>,
) -> Response {
    match service.report(req.selection, req.aging_reference).await {
        Ok(report) => (StatusCode::OK, Json(ReportResponse { success: true, report })).into_response(),
        Err(e) => error_response(e),
    }
}

/// 导出 CSV
pub async fn export_csv(
    State(service): State<Arc<DashboardService>>,
    Json(req): Json<ViewRequest>,
) -> Response {
    match service.export(req.selection, req.aging_reference).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// 手动让原始表缓存失效
pub async fn invalidate_cache(State(service): State<Arc<DashboardService>>) -> Response {
    service.invalidate().await;
    let response = MessageResponse {
        success: true,
        message: "Dataset cache invalidated".to_string(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
