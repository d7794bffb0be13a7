use crate::config::MatchingConfig;
use crate::models::{
    ReconcileRequest, ReconciliationResponse, Side, DEFAULT_LEFT_FILE_NAME,
    DEFAULT_RIGHT_FILE_NAME,
};
use crate::service::aggregator::{self, EnvelopeContext};
use crate::service::normalizer::normalize_all;
use crate::service::selector::MatchSelector;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 对账服务：规范化 -> 评分 -> 挑选 -> 汇总
///
/// 纯内存计算，无 I/O；配置只读共享，可被多个请求并发调用。
pub struct ReconcileService {
    config: Arc<MatchingConfig>,
}

impl ReconcileService {
    pub fn new(config: Arc<MatchingConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn reconcile(&self, request: &ReconcileRequest) -> ReconciliationResponse {
        self.reconcile_at(request, Utc::now())
    }

    /// 以给定时间戳执行对账
    pub fn reconcile_at(
        &self,
        request: &ReconcileRequest,
        timestamp: DateTime<Utc>,
    ) -> ReconciliationResponse {
        let left_count = request.left_document.len();
        let right_count = request.right_document.len();
        tracing::info!(
            "Starting reconciliation: {} left, {} right records",
            left_count, right_count
        );

        let ctx = EnvelopeContext {
            left_records: left_count,
            right_records: right_count,
            left_file_name: request
                .left_file_name
                .clone()
                .unwrap_or_else(|| DEFAULT_LEFT_FILE_NAME.to_string()),
            right_file_name: request
                .right_file_name
                .clone()
                .unwrap_or_else(|| DEFAULT_RIGHT_FILE_NAME.to_string()),
            profile_context: request.profile_context.clone(),
            timestamp,
        };

        if left_count == 0 && right_count == 0 {
            tracing::warn!("No data received - returning empty results");
            return aggregator::empty_response(ctx);
        }

        let left = normalize_all(&request.left_document, Side::Left);
        let right = normalize_all(&request.right_document, Side::Right);

        let results = MatchSelector::new(&self.config).select(&left, &right);
        let response = aggregator::build_response(results, ctx);

        tracing::info!(
            "Reconciliation finished: {} results, reconciled: {}, unreconciled: {}, average confidence: {:.1}",
            response.summary.total_transactions,
            response.summary.reconciled_count,
            response.summary.unreconciled_count,
            response.summary.confidence_score
        );
        response
    }
}

impl Default for ReconcileService {
    fn default() -> Self {
        Self::new(Arc::new(MatchingConfig::default()))
    }
}
