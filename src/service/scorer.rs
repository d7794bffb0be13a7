use crate::config::MatchingConfig;
use crate::models::{MatchCandidate, NormalizedRecord};
use once_cell::sync::Lazy;
use regex::Regex;

/// 描述中的门店编号，如 `Order #77`
static STORE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#(\d+)").expect("store number pattern is valid"));

/// 左侧编号在右侧描述中的命中方式
#[derive(Debug, Clone, PartialEq, Eq)]
enum EmbeddedIdentifier {
    /// `#<数字>` 且数字等于左侧编号
    StoreNumber(String),
    /// 左侧编号直接出现在描述中
    Substring,
}

/// 两两评分器
///
/// 规则按优先级依次判断：编号+金额完全一致 > 编号一致 > 金额一致 > 叠加式启发规则。
/// 日期、关键词、交易类型加分对所有分支生效，分数不设上限。
pub struct PairwiseScorer<'a> {
    config: &'a MatchingConfig,
}

impl<'a> PairwiseScorer<'a> {
    pub fn new(config: &'a MatchingConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, left: &NormalizedRecord, right: &NormalizedRecord) -> MatchCandidate {
        let t = &self.config.thresholds;
        let w = &self.config.weights;
        let mut candidate = MatchCandidate::new(right.index);

        let both_amounts = left.has_amount() && right.has_amount();
        let amount_diff = (left.amount - right.amount).abs();
        let amount_ratio = if both_amounts {
            amount_diff / left.amount.max(right.amount)
        } else {
            0.0
        };
        let amount_exact = both_amounts && amount_diff <= t.amount_tolerance;
        let identifier_exact = !left.identifier.is_empty()
            && !right.identifier.is_empty()
            && left.identifier == right.identifier;

        if amount_exact && identifier_exact {
            candidate.add(
                w.perfect,
                format!(
                    "PERFECT MATCH: Exact amount {} + Rest ID {} = {}",
                    money(left.amount),
                    left.identifier,
                    right.identifier
                ),
            );
            tracing::debug!(
                "perfect match: {} with {} (amount {}, Rest ID {})",
                left.id, right.id, money(left.amount), left.identifier
            );
        } else if identifier_exact && both_amounts {
            if amount_ratio <= t.close_ratio {
                candidate.add(
                    w.identifier_close_amount,
                    format!(
                        "HIGH CONFIDENCE: Rest ID {} = {} + close amount {} ≈ {}",
                        left.identifier,
                        right.identifier,
                        money(left.amount),
                        money(right.amount)
                    ),
                );
            } else {
                candidate.add(
                    w.identifier_differing_amount,
                    format!(
                        "GOOD MATCH: Rest ID {} = {} + different amount {} vs {}",
                        left.identifier,
                        right.identifier,
                        money(left.amount),
                        money(right.amount)
                    ),
                );
                candidate.note(format!(
                    "Amount difference: {} ({})",
                    money(amount_diff),
                    percent(amount_ratio)
                ));
            }
        } else if amount_exact {
            candidate.add(
                w.exact_amount,
                format!("GOOD MATCH: Exact amount {}", money(left.amount)),
            );
        } else {
            self.score_heuristics(left, right, both_amounts, amount_diff, amount_ratio, &mut candidate);
        }

        self.apply_context_bonuses(left, right, &mut candidate);

        tracing::debug!(
            "scored {} vs {}: {:.1} ({} factors, {} discrepancies)",
            left.id,
            right.id,
            candidate.score,
            candidate.factors.len(),
            candidate.discrepancies.len()
        );
        candidate
    }

    /// 叠加式启发规则：金额接近度 + 描述中的编号
    fn score_heuristics(
        &self,
        left: &NormalizedRecord,
        right: &NormalizedRecord,
        both_amounts: bool,
        amount_diff: f64,
        amount_ratio: f64,
        candidate: &mut MatchCandidate,
    ) {
        let t = &self.config.thresholds;
        let w = &self.config.weights;

        if both_amounts {
            if amount_ratio <= t.close_ratio {
                candidate.add(
                    w.close_amount,
                    format!(
                        "Close amount match: {} ≈ {}",
                        money(left.amount),
                        money(right.amount)
                    ),
                );
            } else if amount_ratio <= t.similar_ratio {
                candidate.add(
                    w.similar_amount,
                    format!(
                        "Similar amounts: {} vs {}",
                        money(left.amount),
                        money(right.amount)
                    ),
                );
                candidate.note(format!("Amount difference: {}", money(amount_diff)));
            } else {
                candidate.note(format!(
                    "Significant amount difference: {}",
                    money(amount_diff)
                ));
            }
        }

        let Some(hit) = embedded_identifier(left, right) else {
            return;
        };
        tracing::debug!(
            "Rest ID {} found in description of {}: {:?}",
            left.identifier, right.id, hit
        );

        let id = &left.identifier;
        if !both_amounts {
            candidate.add(
                w.embedded_id_far,
                format!("Rest ID {} found in payment description", id),
            );
            return;
        }

        if amount_ratio <= t.similar_ratio {
            let factor = match &hit {
                EmbeddedIdentifier::StoreNumber(n) => {
                    format!("STRONG MATCH: Rest ID {} = Store #{} + similar amount", id, n)
                }
                EmbeddedIdentifier::Substring => {
                    format!("STRONG MATCH: Rest ID {} found + similar amount", id)
                }
            };
            candidate.add(w.embedded_id_close, factor);
        } else if amount_ratio <= t.loose_ratio {
            let factor = match &hit {
                EmbeddedIdentifier::StoreNumber(n) => {
                    format!("Rest ID {} matches Store #{} (unique identifier)", id, n)
                }
                EmbeddedIdentifier::Substring => {
                    format!("Rest ID {} found (unique identifier)", id)
                }
            };
            candidate.add(w.embedded_id_loose, factor);
            candidate.note(format!(
                "Amount difference: {} ({})",
                money(amount_diff),
                percent(amount_ratio)
            ));
        } else {
            let factor = match &hit {
                EmbeddedIdentifier::StoreNumber(n) => {
                    format!("Rest ID {} matches Store #{}", id, n)
                }
                EmbeddedIdentifier::Substring => {
                    format!("Rest ID {} found in payment description", id)
                }
            };
            candidate.add(w.embedded_id_far, factor);
            candidate.note(format!(
                "Large amount difference: {} ({})",
                money(amount_diff),
                percent(amount_ratio)
            ));
        }
    }

    /// 日期、描述关键词、交易类型加分
    fn apply_context_bonuses(
        &self,
        left: &NormalizedRecord,
        right: &NormalizedRecord,
        candidate: &mut MatchCandidate,
    ) {
        let w = &self.config.weights;
        let keywords = &self.config.keywords;

        if !left.period.is_empty() && !right.date.is_empty() {
            if right
                .date
                .to_lowercase()
                .contains(&left.period.to_lowercase())
            {
                candidate.add(
                    w.month,
                    format!("Month match: {} found in {}", left.period, right.date),
                );
            } else {
                candidate.note(format!("Date mismatch: {} vs {}", left.period, right.date));
            }
        }

        if !right.description.is_empty() {
            let description = right.description.to_lowercase();
            if contains_any(&description, &keywords.delivery) {
                candidate.add(w.delivery_keyword, "Delivery transaction identified".to_string());
            }
            if contains_any(&description, &keywords.merchant) {
                candidate.add(w.merchant_keyword, "Restaurant transaction identified".to_string());
            }
        }

        let label = keywords.delivery_type_label.to_lowercase();
        if !label.is_empty() && right.type_tag.to_lowercase() == label {
            candidate.add(
                w.delivery_type,
                format!("{} type match", keywords.delivery_type_label),
            );
        }
    }
}

/// 右侧无编号字段时，在描述中查找左侧编号：优先取第一个 `#<数字>`，没有时按子串查找
fn embedded_identifier(
    left: &NormalizedRecord,
    right: &NormalizedRecord,
) -> Option<EmbeddedIdentifier> {
    if left.identifier.is_empty() || !right.identifier.is_empty() || right.description.is_empty() {
        return None;
    }

    match STORE_NUMBER.captures(&right.description) {
        Some(caps) => {
            let number = &caps[1];
            (number == left.identifier).then(|| EmbeddedIdentifier::StoreNumber(number.to_string()))
        }
        None => right
            .description
            .contains(left.identifier.as_str())
            .then_some(EmbeddedIdentifier::Substring),
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| haystack.contains(k.to_lowercase().as_str()))
}

fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
