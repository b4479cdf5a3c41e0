//! Allocation domain module.
//!
//! This crate contains the rules for allocating order lines to stock batches,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod batch;
pub mod error;
pub mod order_line;
pub mod service;

pub use batch::{Batch, BatchCommand, BatchEvent, LineAllocated, LineDeallocated};
pub use error::AllocationError;
pub use order_line::OrderLine;
pub use service::{allocate, allocation_priority, deallocate, select_batch};
