use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, DomainResult, OrderId, Sku, ValueObject};

/// A request for a quantity of one SKU, part of a customer order.
///
/// Immutable: fields are private and there are no setters. Equality and
/// hashing are structural, so two lines with the same values are
/// interchangeable (and collapse to one entry in a batch's allocation set).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OrderLineRecord")]
pub struct OrderLine {
    order_id: OrderId,
    sku: Sku,
    quantity: u32,
}

impl OrderLine {
    /// Build an order line from raw strings.
    pub fn new(
        order_id: impl Into<String>,
        sku: impl Into<String>,
        quantity: u32,
    ) -> DomainResult<Self> {
        Self::from_parts(OrderId::new(order_id)?, Sku::new(sku)?, quantity)
    }

    /// Build an order line from already-validated identifiers.
    pub fn from_parts(order_id: OrderId, sku: Sku, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(Self {
            order_id,
            sku,
            quantity,
        })
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl ValueObject for OrderLine {}

/// Wire shape of an order line; converted through [`OrderLine::from_parts`].
#[derive(Deserialize)]
struct OrderLineRecord {
    order_id: OrderId,
    sku: Sku,
    quantity: u32,
}

impl TryFrom<OrderLineRecord> for OrderLine {
    type Error = DomainError;

    fn try_from(record: OrderLineRecord) -> Result<Self, Self::Error> {
        Self::from_parts(record.order_id, record.sku, record.quantity)
    }
}
