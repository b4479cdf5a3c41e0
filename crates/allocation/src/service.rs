//! Cross-batch allocation.
//!
//! Picks the batch an order line should come from when several could serve it:
//! warehouse stock first, then in-transit stock by earliest ETA.

use chrono::NaiveDate;

use stockline_core::BatchReference;

use crate::batch::Batch;
use crate::error::AllocationError;
use crate::order_line::OrderLine;

/// Sort key for batch selection. Lower sorts first.
///
/// `(false, None)` is warehouse stock; in-transit batches follow, ordered by ETA.
pub fn allocation_priority(batch: &Batch) -> (bool, Option<NaiveDate>) {
    (batch.is_in_transit(), batch.eta())
}

/// Choose the batch `line` would be allocated to, without changing anything.
///
/// A batch already holding the line wins outright, since a line lives in at
/// most one batch. Otherwise the first batch in priority order that can take
/// the line is returned; ties keep the order of `batches`.
pub fn select_batch<'a>(
    line: &OrderLine,
    batches: &'a [Batch],
) -> Result<&'a Batch, AllocationError> {
    select_index(line, batches).map(|index| &batches[index])
}

/// Allocate `line` to the preferred batch and return that batch's reference.
pub fn allocate(
    line: &OrderLine,
    batches: &mut [Batch],
) -> Result<BatchReference, AllocationError> {
    let index = match select_index(line, batches) {
        Ok(index) => index,
        Err(err) => {
            tracing::warn!(
                order_id = %line.order_id(),
                sku = %line.sku(),
                quantity = line.quantity(),
                "no batch can take order line: {err}"
            );
            return Err(err);
        }
    };

    let batch = &mut batches[index];
    batch.allocate(line.clone())?;

    tracing::info!(
        order_id = %line.order_id(),
        sku = %line.sku(),
        quantity = line.quantity(),
        batch = %batch.reference(),
        available = batch.available_quantity(),
        "order line allocated"
    );
    Ok(batch.reference().clone())
}

/// Release `line` from whichever batch holds it.
///
/// Returns the reference of the batch it was released from, or `None` when no
/// batch held it.
pub fn deallocate(line: &OrderLine, batches: &mut [Batch]) -> Option<BatchReference> {
    let batch = batches.iter_mut().find(|batch| batch.contains(line))?;
    batch.deallocate(line);

    tracing::info!(
        order_id = %line.order_id(),
        batch = %batch.reference(),
        "order line deallocated"
    );
    Some(batch.reference().clone())
}

fn select_index(line: &OrderLine, batches: &[Batch]) -> Result<usize, AllocationError> {
    if let Some(index) = batches.iter().position(|batch| batch.contains(line)) {
        tracing::debug!(
            order_id = %line.order_id(),
            batch = %batches[index].reference(),
            "order line already allocated"
        );
        return Ok(index);
    }

    let mut candidates: Vec<usize> = (0..batches.len()).collect();
    candidates.sort_by_key(|&index| allocation_priority(&batches[index]));

    candidates
        .into_iter()
        .find(|&index| batches[index].can_allocate(line))
        .ok_or_else(|| AllocationError::OutOfStock {
            sku: line.sku().clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 10, d)
    }

    fn batch(reference: &str, sku: &str, qty: u32, eta: Option<NaiveDate>) -> Batch {
        Batch::new(reference, sku, qty, eta).unwrap()
    }

    fn line(order_id: &str, sku: &str, qty: u32) -> OrderLine {
        OrderLine::new(order_id, sku, qty).unwrap()
    }

    #[test]
    fn prefers_warehouse_batches_to_shipments() {
        let mut batches = vec![
            batch("shipment-batch", "RETRO-CLOCK", 100, day(20)),
            batch("in-stock-batch", "RETRO-CLOCK", 100, None),
        ];

        let reference = allocate(&line("oref", "RETRO-CLOCK", 10), &mut batches).unwrap();

        assert_eq!(reference.as_str(), "in-stock-batch");
        assert_eq!(batches[1].available_quantity(), 90);
        assert_eq!(batches[0].available_quantity(), 100);
    }

    #[test]
    fn prefers_earlier_batches() {
        let mut batches = vec![
            batch("slow", "MINIMALIST-SPOON", 100, day(30)),
            batch("medium", "MINIMALIST-SPOON", 100, day(25)),
            batch("speedy", "MINIMALIST-SPOON", 100, day(18)),
        ];

        let reference = allocate(&line("order1", "MINIMALIST-SPOON", 10), &mut batches).unwrap();

        assert_eq!(reference.as_str(), "speedy");
        assert_eq!(batches[2].available_quantity(), 90);
        assert_eq!(batches[1].available_quantity(), 100);
        assert_eq!(batches[0].available_quantity(), 100);
    }

    #[test]
    fn falls_back_when_preferred_batch_is_too_small() {
        let mut batches = vec![
            batch("in-stock-batch", "HIGHBROW-POSTER", 5, None),
            batch("shipment-batch", "HIGHBROW-POSTER", 100, day(19)),
        ];

        let reference = allocate(&line("oref", "HIGHBROW-POSTER", 10), &mut batches).unwrap();

        assert_eq!(reference.as_str(), "shipment-batch");
        assert_eq!(batches[0].available_quantity(), 5);
        assert_eq!(batches[1].available_quantity(), 90);
    }

    #[test]
    fn skips_batches_for_other_skus() {
        let mut batches = vec![
            batch("chairs", "RED-CHAIR", 100, None),
            batch("lamps", "BLUE-LAMP", 100, day(21)),
        ];

        let reference = allocate(&line("oref", "BLUE-LAMP", 1), &mut batches).unwrap();
        assert_eq!(reference.as_str(), "lamps");
    }

    #[test]
    fn out_of_stock_when_nothing_fits() {
        let mut batches = vec![batch("batch1", "SMALL-FORK", 10, day(20))];
        allocate(&line("order1", "SMALL-FORK", 10), &mut batches).unwrap();

        let err = allocate(&line("order2", "SMALL-FORK", 1), &mut batches).unwrap_err();
        assert_eq!(
            err,
            AllocationError::OutOfStock {
                sku: "SMALL-FORK".parse().unwrap()
            }
        );
        assert_eq!(err.to_string(), "out of stock for sku SMALL-FORK");
    }

    #[test]
    fn out_of_stock_with_no_batches() {
        let mut batches: Vec<Batch> = Vec::new();
        let err = allocate(&line("order1", "SMALL-FORK", 1), &mut batches).unwrap_err();
        assert!(matches!(err, AllocationError::OutOfStock { .. }));
    }

    #[test]
    fn reallocating_a_line_returns_the_batch_that_holds_it() {
        let mut batches = vec![
            batch("shipment", "RETRO-CLOCK", 100, day(20)),
            batch("in-stock", "RETRO-CLOCK", 10, None),
        ];
        let order = line("oref", "RETRO-CLOCK", 10);

        let first = allocate(&order, &mut batches).unwrap();
        let second = allocate(&order, &mut batches).unwrap();

        assert_eq!(first.as_str(), "in-stock");
        assert_eq!(first, second);
        assert_eq!(batches[0].available_quantity(), 100);
        assert_eq!(batches[1].available_quantity(), 0);
    }

    #[test]
    fn ties_keep_caller_order() {
        let batches = vec![
            batch("first", "LAMP", 10, None),
            batch("second", "LAMP", 10, None),
        ];
        let chosen = select_batch(&line("o", "LAMP", 1), &batches).unwrap();
        assert_eq!(chosen.reference().as_str(), "first");
    }

    #[test]
    fn select_batch_does_not_mutate() {
        let batches = vec![batch("b1", "LAMP", 10, None)];
        let order = line("o", "LAMP", 4);

        let chosen = select_batch(&order, &batches).unwrap();
        assert_eq!(chosen.reference().as_str(), "b1");
        assert_eq!(batches[0].available_quantity(), 10);
        assert!(!batches[0].contains(&order));
    }

    #[test]
    fn deallocate_finds_the_holding_batch() {
        let mut batches = vec![
            batch("b1", "LAMP", 10, None),
            batch("b2", "LAMP", 10, day(20)),
        ];
        let order = line("o", "LAMP", 10);
        allocate(&order, &mut batches).unwrap();
        let spill = line("o2", "LAMP", 3);
        allocate(&spill, &mut batches).unwrap();

        assert_eq!(deallocate(&spill, &mut batches).unwrap().as_str(), "b2");
        assert_eq!(batches[1].available_quantity(), 10);
        assert_eq!(deallocate(&spill, &mut batches), None);
        assert_eq!(batches[0].available_quantity(), 0);
    }

    #[test]
    fn priority_orders_warehouse_before_transit() {
        let warehouse = batch("w", "LAMP", 1, None);
        let early = batch("e", "LAMP", 1, day(1));
        let late = batch("l", "LAMP", 1, day(2));

        assert!(allocation_priority(&warehouse) < allocation_priority(&early));
        assert!(allocation_priority(&early) < allocation_priority(&late));
    }
}
