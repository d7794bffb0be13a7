use crate::config::MatchingConfig;
use crate::models::{MatchCandidate, NormalizedRecord, ReconciliationResult};
use crate::service::rationale;
use crate::service::scorer::PairwiseScorer;
use rayon::prelude::*;

/// 最优候选挑选（贪心，非全局最优分配）
///
/// 每条左侧记录独立扫描全部右侧记录，取分数严格最高者（同分保留下标较小者）。
/// 右侧记录不做占用标记，可被多条左侧记录同时选中（多对多）。
/// 之后每条右侧记录无条件再输出一条"右侧未匹配"结果，即使它已被某条左侧记录选中，
/// 因此结果总数恒为 左侧条数 + 右侧条数。
pub struct MatchSelector<'a> {
    config: &'a MatchingConfig,
}

impl<'a> MatchSelector<'a> {
    pub fn new(config: &'a MatchingConfig) -> Self {
        Self { config }
    }

    pub fn select(
        &self,
        left: &[NormalizedRecord],
        right: &[NormalizedRecord],
    ) -> Vec<ReconciliationResult> {
        let scorer = PairwiseScorer::new(self.config);

        // 左侧记录并行评分；collect 保持原顺序
        let mut results: Vec<ReconciliationResult> = left
            .par_iter()
            .map(|l| self.resolve_left(&scorer, l, right))
            .collect();

        results.extend(right.iter().map(review_right));
        results
    }

    /// 扫描全部右侧记录，返回分数严格最高的候选及对应记录
    pub fn best_candidate<'r>(
        scorer: &PairwiseScorer<'_>,
        left: &NormalizedRecord,
        right: &'r [NormalizedRecord],
    ) -> Option<(&'r NormalizedRecord, MatchCandidate)> {
        let mut best: Option<(&'r NormalizedRecord, MatchCandidate)> = None;
        for r in right {
            let candidate = scorer.score(left, r);
            let is_better = match &best {
                None => candidate.score > 0.0,
                Some((_, incumbent)) => candidate.score > incumbent.score,
            };
            if is_better {
                best = Some((r, candidate));
            }
        }
        best
    }

    fn resolve_left(
        &self,
        scorer: &PairwiseScorer<'_>,
        left: &NormalizedRecord,
        right: &[NormalizedRecord],
    ) -> ReconciliationResult {
        let thresholds = &self.config.thresholds;
        let best = Self::best_candidate(scorer, left, right)
            .filter(|(_, c)| c.score >= thresholds.match_min);

        let Some((matched, candidate)) = best else {
            tracing::debug!("{}: no candidate above {}", left.id, thresholds.match_min);
            return ReconciliationResult {
                left_transaction: Some(left.clone()),
                right_transaction: None,
                is_reconciled: false,
                matched_fields: Vec::new(),
                confidence: 0.0,
                rationale: rationale::render_unmatched_left(left),
                discrepancies: vec!["No matching payment record found".to_string()],
            };
        };

        let tier = rationale::classify(candidate.score, thresholds);
        tracing::debug!(
            "{} -> {}: {:.1} ({})",
            left.id,
            matched.id,
            candidate.score,
            tier.label()
        );

        ReconciliationResult {
            left_transaction: Some(left.clone()),
            right_transaction: Some(matched.clone()),
            is_reconciled: candidate.score >= thresholds.reconciled_min,
            rationale: rationale::render_match(tier, left, matched, &candidate),
            confidence: candidate.score,
            matched_fields: candidate.factors,
            discrepancies: candidate.discrepancies,
        }
    }
}

fn review_right(right: &NormalizedRecord) -> ReconciliationResult {
    ReconciliationResult {
        left_transaction: None,
        right_transaction: Some(right.clone()),
        is_reconciled: false,
        matched_fields: Vec::new(),
        confidence: 0.0,
        rationale: rationale::render_unmatched_right(right),
        discrepancies: vec!["No matching sales record found".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawRecord, Side};
    use crate::service::normalizer::normalize_all;
    use serde_json::{json, Value};

    fn side(records: Value, side: Side) -> Vec<NormalizedRecord> {
        let raw: Vec<RawRecord> = serde_json::from_value(records).unwrap();
        normalize_all(&raw, side)
    }

    #[test]
    fn ties_keep_the_first_right_record() {
        let config = MatchingConfig::default();
        let left = side(json!([{"Amount": 50}]), Side::Left);
        let right = side(json!([{"Amount": 10}, {"Amount": 50}, {"Amount": 50}]), Side::Right);

        let scorer = PairwiseScorer::new(&config);
        let (record, best) = MatchSelector::best_candidate(&scorer, &left[0], &right).unwrap();
        assert_eq!(record.id, "right-1");
        assert_eq!(best.right_index, 1);
        assert_eq!(best.score, 70.0);
    }

    #[test]
    fn selects_from_a_sub_slice_of_right_records() {
        let config = MatchingConfig::default();
        let left = side(json!([{"Amount": 50}]), Side::Left);
        let right = side(json!([{"Amount": 1}, {"Amount": 50}]), Side::Right);

        let results = MatchSelector::new(&config).select(&left, &right[1..]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].confidence, 70.0);
        assert_eq!(
            results[0].right_transaction.as_ref().map(|t| t.id.as_str()),
            Some("right-1")
        );
        assert_eq!(
            results[1].right_transaction.as_ref().map(|t| t.id.as_str()),
            Some("right-1")
        );
    }

    #[test]
    fn right_records_can_be_chosen_twice() {
        let config = MatchingConfig::default();
        let left = side(
            json!([{"Amount": 20, "Rest ID": "9"}, {"Amount": 20, "Rest ID": "9"}]),
            Side::Left,
        );
        let right = side(json!([{"Amount": 20, "Rest ID": "9"}]), Side::Right);

        let results = MatchSelector::new(&config).select(&left, &right);
        assert_eq!(results.len(), 3);
        for r in &results[..2] {
            assert!(r.is_reconciled);
            assert_eq!(r.right_transaction.as_ref().map(|t| t.id.as_str()), Some("right-0"));
        }
        // 已被选中的右侧记录仍输出一条复核结果
        assert!(results[2].left_transaction.is_none());
        assert_eq!(results[2].confidence, 0.0);
    }

    #[test]
    fn candidates_below_floor_are_unmatched() {
        let config = MatchingConfig::default();
        let left = side(json!([{"Amount": 100, "Month": "May"}]), Side::Left);
        // 仅月份命中 +20，低于 30
        let right = side(json!([{"Amount": 1, "Date": "May 2"}]), Side::Right);

        let results = MatchSelector::new(&config).select(&left, &right);
        assert!(results[0].right_transaction.is_none());
        assert_eq!(results[0].confidence, 0.0);
        assert_eq!(results[0].discrepancies, vec!["No matching payment record found".to_string()]);
    }

    #[test]
    fn low_tier_match_is_kept_but_not_reconciled() {
        let config = MatchingConfig::default();
        let left = side(json!([{"Amount": 100, "Rest ID": "31"}]), Side::Left);
        let right = side(json!([{"Amount": 60, "Description": "Store #31"}]), Side::Right);

        let results = MatchSelector::new(&config).select(&left, &right);
        assert_eq!(results[0].confidence, 35.0);
        assert!(!results[0].is_reconciled);
        assert!(results[0].rationale.starts_with("LOW CONFIDENCE MATCH (35%)"));
        assert!(results[0].rationale.contains("Significant issues"));
    }

    #[test]
    fn output_order_is_left_then_right() {
        let config = MatchingConfig::default();
        let left = side(
            json!((0..20).map(|i| json!({"Amount": i + 1})).collect::<Vec<_>>()),
            Side::Left,
        );
        let right = side(json!([{"Amount": 3}, {"Amount": 7}]), Side::Right);

        let results = MatchSelector::new(&config).select(&left, &right);
        assert_eq!(results.len(), 22);
        for (i, r) in results.iter().take(20).enumerate() {
            assert_eq!(r.left_transaction.as_ref().unwrap().index, i);
        }
        assert_eq!(results[20].right_transaction.as_ref().unwrap().index, 0);
        assert_eq!(results[21].right_transaction.as_ref().unwrap().index, 1);
    }
}
