use crate::error::AppError;
use crate::models::{InvocationPayload, ReconcileRequest, ReconciliationResponse};
use crate::service::{export, ReconcileService};
use axum::{
    extract::{Json, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 运行时调用入口：按 operation 分发
pub async fn invoke(
    State(service): State<Arc<ReconcileService>>,
    Json(payload): Json<InvocationPayload>,
) -> Result<Json<ReconciliationResponse>, AppError> {
    tracing::info!("Processing {} request", payload.operation);

    match payload.operation.clone().as_str() {
        "reconcile" => run(service, payload.into_request()).await.map(Json),
        other => Err(AppError::UnknownOperation(other.to_string())),
    }
}

/// 对账接口
pub async fn reconcile(
    State(service): State<Arc<ReconcileService>>,
    Json(req): Json<ReconcileRequest>,
) -> Result<Json<ReconciliationResponse>, AppError> {
    run(service, req).await.map(Json)
}

/// 对账并以 CSV 返回结果
pub async fn export_csv(
    State(service): State<Arc<ReconcileService>>,
    Json(req): Json<ReconcileRequest>,
) -> Result<Response, AppError> {
    let response = run(service.clone(), req).await?;
    let body = export::to_csv_string(
        &response.reconciliation_results,
        &service.config().thresholds,
    )?;

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
}

/// 评分为 CPU 密集计算，放到阻塞线程池执行
async fn run(
    service: Arc<ReconcileService>,
    req: ReconcileRequest,
) -> Result<ReconciliationResponse, AppError> {
    tokio::task::spawn_blocking(move || service.reconcile(&req))
        .await
        .map_err(|e| AppError::Internal(format!("reconciliation task failed: {}", e)))
}
