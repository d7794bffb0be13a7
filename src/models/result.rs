use super::record::NormalizedRecord;
use serde::Serialize;

/// 候选匹配：一次两两评分的结果，仅在挑选最优候选期间存在
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub right_index: usize,
    pub score: f64,
    pub factors: Vec<String>,
    pub discrepancies: Vec<String>,
}

impl MatchCandidate {
    pub fn new(right_index: usize) -> Self {
        Self {
            right_index,
            score: 0.0,
            factors: Vec::new(),
            discrepancies: Vec::new(),
        }
    }

    pub fn add(&mut self, points: f64, factor: String) {
        self.score += points;
        self.factors.push(factor);
    }

    pub fn note(&mut self, discrepancy: String) {
        self.discrepancies.push(discrepancy);
    }
}

/// 置信度分档
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    Perfect,
    High,
    Moderate,
    Low,
    NoMatch,
}

impl ConfidenceTier {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::Perfect => "perfect match",
            ConfidenceTier::High => "high confidence",
            ConfidenceTier::Moderate => "moderate confidence",
            ConfidenceTier::Low => "low confidence",
            ConfidenceTier::NoMatch => "no match",
        }
    }
}

/// 单条对账结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub left_transaction: Option<NormalizedRecord>,
    pub right_transaction: Option<NormalizedRecord>,
    pub is_reconciled: bool,
    pub matched_fields: Vec<String>,
    pub confidence: f64,
    pub rationale: String,
    pub discrepancies: Vec<String>,
}
