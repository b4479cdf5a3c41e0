//! Wire shapes for CLI input and output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockline_allocation::{AllocationError, Batch, OrderLine};
use stockline_core::{BatchReference, OrderId, Sku};

/// One entry of the batches input file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRecord {
    pub reference: BatchReference,
    pub sku: Sku,
    pub purchased_quantity: u32,
    #[serde(default)]
    pub eta: Option<NaiveDate>,
}

impl From<BatchRecord> for Batch {
    fn from(record: BatchRecord) -> Self {
        Batch::from_parts(
            record.reference,
            record.sku,
            record.purchased_quantity,
            record.eta,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    pub outcomes: Vec<LineOutcome>,
    pub batches: Vec<BatchSummary>,
}

/// Result of allocating (or trying to allocate) one line.
#[derive(Debug, Clone, Serialize)]
pub struct LineOutcome {
    pub order_id: OrderId,
    pub sku: Sku,
    pub quantity: u32,
    pub batch: Option<BatchReference>,
    pub error: Option<String>,
}

impl LineOutcome {
    pub fn new(line: &OrderLine, result: Result<BatchReference, AllocationError>) -> Self {
        let (batch, error) = match result {
            Ok(reference) => (Some(reference), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            order_id: line.order_id().clone(),
            sku: line.sku().clone(),
            quantity: line.quantity(),
            batch,
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub reference: BatchReference,
    pub sku: Sku,
    pub eta: Option<NaiveDate>,
    pub purchased_quantity: u32,
    pub allocated_quantity: u32,
    pub available_quantity: u32,
}

impl From<&Batch> for BatchSummary {
    fn from(batch: &Batch) -> Self {
        Self {
            reference: batch.reference().clone(),
            sku: batch.sku().clone(),
            eta: batch.eta(),
            purchased_quantity: batch.purchased_quantity(),
            allocated_quantity: batch.allocated_quantity(),
            available_quantity: batch.available_quantity(),
        }
    }
}
