use crate::config::Thresholds;
use crate::models::{ConfidenceTier, MatchCandidate, NormalizedRecord};

/// 按分数划分置信度档位，>= perfect_min 一律视为完全匹配
pub fn classify(score: f64, thresholds: &Thresholds) -> ConfidenceTier {
    if score >= thresholds.perfect_min {
        ConfidenceTier::Perfect
    } else if score >= thresholds.high_min {
        ConfidenceTier::High
    } else if score >= thresholds.reconciled_min {
        ConfidenceTier::Moderate
    } else if score > 0.0 {
        ConfidenceTier::Low
    } else {
        ConfidenceTier::NoMatch
    }
}

/// 匹配成功时的说明文字
pub fn render_match(
    tier: ConfidenceTier,
    left: &NormalizedRecord,
    right: &NormalizedRecord,
    candidate: &MatchCandidate,
) -> String {
    let factors = candidate.factors.join(", ");
    let discrepancies = candidate.discrepancies.join(", ");
    let (l, r, score) = (left.ordinal(), right.ordinal(), candidate.score);

    match tier {
        ConfidenceTier::Perfect => format!(
            "PERFECT MATCH ({score:.0}%): Sales record {l} matched with payment record {r}. \
             Exact amount and Rest ID agree: {factors}. \
             This is a confirmed transaction pair."
        ),
        ConfidenceTier::High => format!(
            "HIGH CONFIDENCE MATCH ({score:.0}%): Sales record {l} matched with payment record {r}. \
             Strong correlation found: {factors}. \
             This appears to be a confirmed transaction pair with reliable matching indicators."
        ),
        ConfidenceTier::Moderate => format!(
            "MODERATE CONFIDENCE MATCH ({score:.0}%): Sales record {l} shows potential match with payment record {r}. \
             Matching factors: {factors}. \
             Some discrepancies noted: {discrepancies}. Recommend manual verification."
        ),
        ConfidenceTier::Low | ConfidenceTier::NoMatch => format!(
            "LOW CONFIDENCE MATCH ({score:.0}%): Sales record {l} has weak correlation with payment record {r}. \
             Limited matching factors: {factors}. \
             Significant issues: {discrepancies}. Manual investigation required."
        ),
    }
}

/// 左侧记录未找到候选
pub fn render_unmatched_left(left: &NormalizedRecord) -> String {
    format!(
        "NO MATCH FOUND (0%): Sales record {} (${:.2}, {}) could not be matched with any payment records. \
         This transaction may be missing from the bank statement, processed in a different period, \
         or require manual investigation to locate the corresponding payment.",
        left.ordinal(),
        left.amount,
        left.period
    )
}

/// 右侧记录的逐条复核说明（每条右侧记录都会输出一次）
pub fn render_unmatched_right(right: &NormalizedRecord) -> String {
    format!(
        "UNMATCHED PAYMENT (0%): Payment record {} (${:.2}) could not be matched with any sales records. \
         Description: '{}'. This payment may correspond to sales from a different period, \
         different restaurant, or require manual investigation to locate the corresponding sales transaction.",
        right.ordinal(),
        right.amount,
        right.description
    )
}
