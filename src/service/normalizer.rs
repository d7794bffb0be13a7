use crate::models::{NormalizedRecord, RawRecord, Side};
use serde_json::Value;

/// 规范化单条原始记录，缺失或格式错误的字段取默认值，从不失败
pub fn normalize(raw: &RawRecord, side: Side, index: usize) -> NormalizedRecord {
    NormalizedRecord {
        side,
        index,
        id: format!("{}-{}", side.as_str(), index),
        amount: parse_amount(raw.amount.as_ref()),
        identifier: text_of(raw.identifier.as_ref()).trim().to_string(),
        period: text_of(raw.period.as_ref()),
        date: text_of(raw.date.as_ref()),
        description: text_of(raw.description.as_ref()),
        type_tag: text_of(raw.type_tag.as_ref()),
        raw: raw.clone(),
    }
}

/// 规范化整组记录，保持原顺序
pub fn normalize_all(records: &[RawRecord], side: Side) -> Vec<NormalizedRecord> {
    records
        .iter()
        .enumerate()
        .map(|(idx, raw)| normalize(raw, side, idx))
        .collect()
}

/// 金额解析：支持数字与数字字符串（允许 `$` 前缀和千分位），其余情况为 0
pub fn parse_amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            let cleaned = cleaned.strip_prefix('$').unwrap_or(&cleaned);
            cleaned.trim().parse::<f64>().ok()
        }
        _ => None,
    };

    match parsed {
        Some(amount) if amount.is_finite() => amount,
        _ => 0.0,
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reads_recognized_fields() {
        let record = normalize(
            &raw(json!({
                "Amount": 42.5,
                "Rest ID": "  77 ",
                "Month": "March",
                "Date": "2024-03-02",
                "Description": "Order #77",
                "Type": "3rd Party Delivery"
            })),
            Side::Left,
            2,
        );

        assert_eq!(record.id, "left-2");
        assert_eq!(record.amount, 42.5);
        assert_eq!(record.identifier, "77");
        assert_eq!(record.period, "March");
        assert_eq!(record.date, "2024-03-02");
        assert_eq!(record.description, "Order #77");
        assert_eq!(record.type_tag, "3rd Party Delivery");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record = normalize(&RawRecord::default(), Side::Right, 0);
        assert_eq!(record.id, "right-0");
        assert_eq!(record.amount, 0.0);
        assert!(record.identifier.is_empty());
        assert!(record.period.is_empty());
        assert!(record.description.is_empty());
        assert!(record.type_tag.is_empty());
    }

    #[test]
    fn amount_parsing_is_lenient() {
        assert_eq!(parse_amount(Some(&json!("1,250.75"))), 1250.75);
        assert_eq!(parse_amount(Some(&json!(" $99.10 "))), 99.10);
        assert_eq!(parse_amount(Some(&json!("n/a"))), 0.0);
        assert_eq!(parse_amount(Some(&json!(true))), 0.0);
        assert_eq!(parse_amount(Some(&json!(null))), 0.0);
        assert_eq!(parse_amount(Some(&json!("inf"))), 0.0);
        assert_eq!(parse_amount(None), 0.0);
    }

    #[test]
    fn numeric_identifier_becomes_text() {
        let record = normalize(&raw(json!({"Rest ID": 5})), Side::Left, 0);
        assert_eq!(record.identifier, "5");

        let record = normalize(&raw(json!({"Rest ID": null})), Side::Left, 0);
        assert!(record.identifier.is_empty());
    }
}
