use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockline_core::{Aggregate, AggregateRoot, BatchReference, DomainResult, Entity, Sku};
use stockline_events::Event;

use crate::error::AllocationError;
use crate::order_line::OrderLine;

/// Entity: a lot of stock for one SKU.
///
/// A batch without an ETA is warehouse stock; a batch with an ETA is in
/// transit. Allocated lines are tracked by value, so allocating the same line
/// twice records it once.
///
/// Equality and hashing go through the reference only: a batch keeps its
/// identity while its allocations change.
#[derive(Debug, Clone)]
pub struct Batch {
    reference: BatchReference,
    sku: Sku,
    purchased_quantity: u32,
    eta: Option<NaiveDate>,
    allocations: HashSet<OrderLine>,
    version: u64,
}

impl Batch {
    /// Build a batch from raw strings.
    pub fn new(
        reference: impl Into<String>,
        sku: impl Into<String>,
        purchased_quantity: u32,
        eta: Option<NaiveDate>,
    ) -> DomainResult<Self> {
        Ok(Self::from_parts(
            BatchReference::new(reference)?,
            Sku::new(sku)?,
            purchased_quantity,
            eta,
        ))
    }

    /// Build a batch from already-validated identifiers. Starts with no allocations.
    pub fn from_parts(
        reference: BatchReference,
        sku: Sku,
        purchased_quantity: u32,
        eta: Option<NaiveDate>,
    ) -> Self {
        Self {
            reference,
            sku,
            purchased_quantity,
            eta,
            allocations: HashSet::new(),
            version: 0,
        }
    }

    pub fn reference(&self) -> &BatchReference {
        &self.reference
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn purchased_quantity(&self) -> u32 {
        self.purchased_quantity
    }

    pub fn eta(&self) -> Option<NaiveDate> {
        self.eta
    }

    pub fn is_in_transit(&self) -> bool {
        self.eta.is_some()
    }

    pub fn allocations(&self) -> impl Iterator<Item = &OrderLine> {
        self.allocations.iter()
    }

    pub fn contains(&self, line: &OrderLine) -> bool {
        self.allocations.contains(line)
    }

    pub fn allocated_quantity(&self) -> u32 {
        self.allocations.iter().map(OrderLine::quantity).sum()
    }

    pub fn available_quantity(&self) -> u32 {
        // Allocation never exceeds the purchased quantity, so this cannot underflow.
        self.purchased_quantity.saturating_sub(self.allocated_quantity())
    }

    /// True when the line is for this batch's SKU and fits in the available stock.
    pub fn can_allocate(&self, line: &OrderLine) -> bool {
        line.sku() == &self.sku && self.available_quantity() >= line.quantity()
    }

    /// Record `line` against this batch.
    ///
    /// Allocating a line that is already held succeeds without changing
    /// anything. A SKU mismatch or a shortfall is reported as an error and
    /// leaves the batch untouched.
    pub fn allocate(&mut self, line: OrderLine) -> Result<(), AllocationError> {
        self.execute(&BatchCommand::Allocate(line)).map(|_| ())
    }

    /// Release `line` from this batch. Returns whether the line was held.
    pub fn deallocate(&mut self, line: &OrderLine) -> bool {
        let events = self.deallocation_events(line);
        for event in &events {
            self.apply(event);
        }
        !events.is_empty()
    }
}

impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for Batch {}

impl core::hash::Hash for Batch {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

impl Entity for Batch {
    type Id = BatchReference;

    fn id(&self) -> &Self::Id {
        &self.reference
    }
}

impl AggregateRoot for Batch {
    type Id = BatchReference;

    fn id(&self) -> &Self::Id {
        &self.reference
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchCommand {
    Allocate(OrderLine),
    Deallocate(OrderLine),
}

/// Event: LineAllocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAllocated {
    pub reference: BatchReference,
    pub line: OrderLine,
}

/// Event: LineDeallocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDeallocated {
    pub reference: BatchReference,
    pub line: OrderLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchEvent {
    LineAllocated(LineAllocated),
    LineDeallocated(LineDeallocated),
}

impl Event for BatchEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BatchEvent::LineAllocated(_) => "allocation.batch.line_allocated",
            BatchEvent::LineDeallocated(_) => "allocation.batch.line_deallocated",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}

impl Aggregate for Batch {
    type Command = BatchCommand;
    type Event = BatchEvent;
    type Error = AllocationError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            BatchEvent::LineAllocated(e) => {
                self.allocations.insert(e.line.clone());
            }
            BatchEvent::LineDeallocated(e) => {
                self.allocations.remove(&e.line);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            BatchCommand::Allocate(line) => self.handle_allocate(line),
            BatchCommand::Deallocate(line) => Ok(self.deallocation_events(line)),
        }
    }
}

impl Batch {
    fn handle_allocate(&self, line: &OrderLine) -> Result<Vec<BatchEvent>, AllocationError> {
        if self.allocations.contains(line) {
            return Ok(Vec::new());
        }

        if line.sku() != &self.sku {
            return Err(AllocationError::SkuMismatch {
                order_id: line.order_id().clone(),
                reference: self.reference.clone(),
                line_sku: line.sku().clone(),
                batch_sku: self.sku.clone(),
            });
        }

        let available = self.available_quantity();
        if available < line.quantity() {
            return Err(AllocationError::InsufficientStock {
                order_id: line.order_id().clone(),
                reference: self.reference.clone(),
                requested: line.quantity(),
                available,
            });
        }

        Ok(vec![BatchEvent::LineAllocated(LineAllocated {
            reference: self.reference.clone(),
            line: line.clone(),
        })])
    }

    fn deallocation_events(&self, line: &OrderLine) -> Vec<BatchEvent> {
        if !self.allocations.contains(line) {
            return Vec::new();
        }
        vec![BatchEvent::LineDeallocated(LineDeallocated {
            reference: self.reference.clone(),
            line: line.clone(),
        })]
    }
}
