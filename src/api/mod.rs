pub mod handlers;

pub use handlers::*;

use crate::service::DashboardService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建路由
pub fn router(service: Arc<DashboardService>) -> Router {
    let dashboard_routes = Router::new()
        .route("/api/options", get(filter_options))
        .route("/api/view", post(filtered_view))
        .route("/api/report", post(dashboard_report))
        .route("/api/export", post(export_csv))
        .route("/api/cache/invalidate", post(invalidate_cache))
        .with_state(service);

    Router::new()
        .route("/health", get(health_check))
        .merge(dashboard_routes)
}
