pub mod handlers;

pub use handlers::*;

use crate::service::ReconcileService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建路由
pub fn router(service: Arc<ReconcileService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/invocations", post(invoke))
        .route("/api/reconcile", post(reconcile))
        .route("/api/reconcile/export", post(export_csv))
        .with_state(service)
}
