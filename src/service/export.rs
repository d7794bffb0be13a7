use crate::config::Thresholds;
use crate::models::{ConfidenceTier, NormalizedRecord, ReconciliationResult};
use crate::service::rationale;
use std::io::Write;

const HEADER: [&str; 11] = [
    "row",
    "left_id",
    "right_id",
    "left_amount",
    "right_amount",
    "tier",
    "confidence",
    "is_reconciled",
    "matched_fields",
    "discrepancies",
    "rationale",
];

/// 导出对账结果为 CSV（每条结果一行，顺序与结果一致）
pub fn write_csv<W: Write>(
    results: &[ReconciliationResult],
    thresholds: &Thresholds,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for (idx, r) in results.iter().enumerate() {
        let tier = match (&r.left_transaction, &r.right_transaction) {
            (Some(_), Some(_)) => rationale::classify(r.confidence, thresholds),
            _ => ConfidenceTier::NoMatch,
        };
        let id = |t: &Option<NormalizedRecord>| {
            t.as_ref().map(|t| t.id.clone()).unwrap_or_default()
        };
        let amount = |t: &Option<NormalizedRecord>| {
            t.as_ref()
                .map(|t| format!("{:.2}", t.amount))
                .unwrap_or_default()
        };

        wtr.write_record([
            (idx + 1).to_string(),
            id(&r.left_transaction),
            id(&r.right_transaction),
            amount(&r.left_transaction),
            amount(&r.right_transaction),
            tier.label().to_string(),
            format!("{:.2}", r.confidence),
            r.is_reconciled.to_string(),
            r.matched_fields.join("; "),
            r.discrepancies.join("; "),
            r.rationale.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(
    results: &[ReconciliationResult],
    thresholds: &Thresholds,
) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(results, thresholds, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReconcileRequest;
    use crate::service::ReconcileService;
    use serde_json::json;

    #[test]
    fn one_row_per_result() {
        let request: ReconcileRequest = serde_json::from_value(json!({
            "leftDocument": [{"Amount": 100, "Rest ID": "5"}],
            "rightDocument": [{"Amount": 100, "Rest ID": "5", "Description": "a, b"}]
        }))
        .unwrap();
        let service = ReconcileService::default();
        let response = service.reconcile(&request);

        let csv = to_csv_string(&response.reconciliation_results, &service.config().thresholds)
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("row,left_id,right_id"));
        assert!(lines[1].starts_with("1,left-0,right-0,100.00,100.00,perfect match,100.00,true,"));
        assert!(lines[2].starts_with("2,,right-0,,100.00,no match,0.00,false,"));
    }
}
