use super::record::RawRecord;
use super::result::ReconciliationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LEFT_FILE_NAME: &str = "Left Document";
pub const DEFAULT_RIGHT_FILE_NAME: &str = "Right Document";

/// 对账请求：两组原始记录 + 调用方上下文
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    #[serde(default)]
    pub left_document: Vec<RawRecord>,
    #[serde(default)]
    pub right_document: Vec<RawRecord>,
    /// 原样透传到响应 metadata
    #[serde(default)]
    pub profile_context: Option<Value>,
    #[serde(default)]
    pub left_file_name: Option<String>,
    #[serde(default)]
    pub right_file_name: Option<String>,
}

/// 运行时调用入口的请求体
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationPayload {
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(flatten)]
    pub request: ReconcileRequest,
}

fn default_operation() -> String {
    "reconcile".to_string()
}

impl InvocationPayload {
    /// 取出对账请求；未提供 profileContext 时以空对象透传
    pub fn into_request(self) -> ReconcileRequest {
        let mut request = self.request;
        if request.profile_context.is_none() {
            request.profile_context = Some(Value::Object(serde_json::Map::new()));
        }
        request
    }
}

/// 汇总统计
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_transactions: usize,
    pub reconciled_count: usize,
    pub unreconciled_count: usize,
    pub confidence_score: f64,
    pub reconciliation_type: String,
    pub left_file_records: usize,
    pub right_file_records: usize,
    pub left_file_name: String,
    pub right_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub processed_by: String,
    pub timestamp: DateTime<Utc>,
    pub profile_context: Option<Value>,
    pub processing_method: String,
}

/// 响应信封
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    pub analysis: String,
    pub reconciliation_results: Vec<ReconciliationResult>,
    pub summary: Summary,
    pub metadata: ResponseMetadata,
}
