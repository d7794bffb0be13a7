use crate::models::{
    ReconciliationResponse, ReconciliationResult, ResponseMetadata, Summary,
};
use chrono::{DateTime, Utc};
use serde_json::Value;

pub const EMPTY_ANALYSIS: &str = "No data received for reconciliation";

/// 汇总时需要的调用上下文
#[derive(Debug, Clone)]
pub struct EnvelopeContext {
    pub left_records: usize,
    pub right_records: usize,
    pub left_file_name: String,
    pub right_file_name: String,
    pub profile_context: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// 计算汇总统计；无结果时平均置信度为 0
pub fn summarize(results: &[ReconciliationResult], ctx: &EnvelopeContext) -> Summary {
    let total = results.len();
    let reconciled = results.iter().filter(|r| r.is_reconciled).count();
    let confidence_score = if total == 0 {
        0.0
    } else {
        results.iter().map(|r| r.confidence).sum::<f64>() / total as f64
    };

    Summary {
        total_transactions: total,
        reconciled_count: reconciled,
        unreconciled_count: total - reconciled,
        confidence_score,
        reconciliation_type: "Side-by-Side with Confidence Scoring".to_string(),
        left_file_records: ctx.left_records,
        right_file_records: ctx.right_records,
        left_file_name: ctx.left_file_name.clone(),
        right_file_name: ctx.right_file_name.clone(),
    }
}

/// 组装响应信封
pub fn build_response(
    results: Vec<ReconciliationResult>,
    ctx: EnvelopeContext,
) -> ReconciliationResponse {
    let summary = summarize(&results, &ctx);
    let analysis = render_analysis(&summary);

    ReconciliationResponse {
        analysis,
        reconciliation_results: results,
        summary,
        metadata: ResponseMetadata {
            processed_by: "Confidence Scoring Engine".to_string(),
            timestamp: ctx.timestamp,
            profile_context: ctx.profile_context,
            processing_method: "Greedy Best-Candidate Matching".to_string(),
        },
    }
}

/// 两侧均无数据时的终止响应
pub fn empty_response(ctx: EnvelopeContext) -> ReconciliationResponse {
    ReconciliationResponse {
        analysis: EMPTY_ANALYSIS.to_string(),
        reconciliation_results: Vec::new(),
        summary: Summary {
            total_transactions: 0,
            reconciled_count: 0,
            unreconciled_count: 0,
            confidence_score: 0.0,
            reconciliation_type: "Empty Data".to_string(),
            left_file_records: 0,
            right_file_records: 0,
            left_file_name: ctx.left_file_name,
            right_file_name: ctx.right_file_name,
        },
        metadata: ResponseMetadata {
            processed_by: "Empty Data Handler".to_string(),
            timestamp: ctx.timestamp,
            profile_context: ctx.profile_context,
            processing_method: "No Data Processing".to_string(),
        },
    }
}

fn render_analysis(summary: &Summary) -> String {
    format!(
        "# Financial Reconciliation Analysis\n\
         \n\
         ## Data Overview\n\
         - {}: {} records\n\
         - {}: {} records\n\
         \n\
         ## Analysis Results\n\
         {} results produced ({} reconciled, {} unreconciled), average confidence {:.1}.\n\
         Every {} record is listed once more for review, so totals include both sides.\n\
         \n\
         ## Recommendations\n\
         - Review unmatched transactions for potential data entry errors\n\
         - Check for timing differences in transaction posting dates\n\
         - Verify reference IDs and amounts for discrepancies\n",
        summary.left_file_name,
        summary.left_file_records,
        summary.right_file_name,
        summary.right_file_records,
        summary.total_transactions,
        summary.reconciled_count,
        summary.unreconciled_count,
        summary.confidence_score,
        summary.right_file_name,
    )
}
