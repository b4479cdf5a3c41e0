//! Allocation rejections.

use thiserror::Error;

use stockline_core::{BatchReference, OrderId, Sku};

/// Why an order line could not be allocated.
///
/// A rejected allocation never changes batch state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The line asks for a different product than the batch holds.
    #[error(
        "cannot allocate order line {order_id} to batch {reference}: \
         line sku {line_sku} does not match batch sku {batch_sku}"
    )]
    SkuMismatch {
        order_id: OrderId,
        reference: BatchReference,
        line_sku: Sku,
        batch_sku: Sku,
    },

    /// The batch holds the right product but not enough of it.
    #[error(
        "cannot allocate order line {order_id} to batch {reference}: \
         requested {requested}, available {available}"
    )]
    InsufficientStock {
        order_id: OrderId,
        reference: BatchReference,
        requested: u32,
        available: u32,
    },

    /// No candidate batch can take the line.
    #[error("out of stock for sku {sku}")]
    OutOfStock { sku: Sku },
}
