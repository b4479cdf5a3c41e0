//! Loading batches and order lines from JSON.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, bail};

use stockline_allocation::{Batch, OrderLine};

use crate::dto::BatchRecord;

pub fn parse_batches(json: &str) -> anyhow::Result<Vec<Batch>> {
    let records: Vec<BatchRecord> =
        serde_json::from_str(json).context("failed to parse batches")?;

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.reference.clone()) {
            bail!("duplicate batch reference '{}'", record.reference);
        }
    }

    Ok(records.into_iter().map(Batch::from).collect())
}

pub fn parse_lines(json: &str) -> anyhow::Result<Vec<OrderLine>> {
    serde_json::from_str(json).context("failed to parse order lines")
}

pub fn load_batches(path: &Path) -> anyhow::Result<Vec<Batch>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read batches from {}", path.display()))?;
    let batches = parse_batches(&json).with_context(|| path.display().to_string())?;
    tracing::debug!("loaded {} batch(es) from {}", batches.len(), path.display());
    Ok(batches)
}

pub fn load_lines(path: &Path) -> anyhow::Result<Vec<OrderLine>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read order lines from {}", path.display()))?;
    let lines = parse_lines(&json).with_context(|| path.display().to_string())?;
    tracing::debug!("loaded {} order line(s) from {}", lines.len(), path.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batches_with_and_without_eta() {
        let batches = parse_batches(
            r#"[
                {"reference": "batch-001", "sku": "RED-CHAIR", "purchased_quantity": 20, "eta": null},
                {"reference": "batch-002", "sku": "RED-CHAIR", "purchased_quantity": 5, "eta": "2026-11-02"},
                {"reference": "batch-003", "sku": "BLUE-LAMP", "purchased_quantity": 1}
            ]"#,
        )
        .unwrap();

        assert_eq!(batches.len(), 3);
        assert!(!batches[0].is_in_transit());
        assert_eq!(
            batches[1].eta(),
            chrono::NaiveDate::from_ymd_opt(2026, 11, 2)
        );
        assert!(batches[2].eta().is_none());
    }

    #[test]
    fn rejects_duplicate_references() {
        let err = parse_batches(
            r#"[
                {"reference": "batch-001", "sku": "RED-CHAIR", "purchased_quantity": 20},
                {"reference": "batch-001", "sku": "BLUE-LAMP", "purchased_quantity": 5}
            ]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate batch reference 'batch-001'"));
    }

    #[test]
    fn rejects_blank_references() {
        let err = parse_batches(r#"[{"reference": "", "sku": "X", "purchased_quantity": 1}]"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("cannot be blank"));
    }

    #[test]
    fn rejects_zero_quantity_lines() {
        let err = parse_lines(r#"[{"order_id": "o1", "sku": "RED-CHAIR", "quantity": 0}]"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("quantity must be positive"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_lines(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
