//! Price history tracking for incoming movements.

use crate::domain::{Movement, PricePoint};

/// Record a unit-price change from one movement.
///
/// Appends `{date, price}` when the movement is incoming, carries a
/// positive unit price, and that price differs from the last recorded one
/// (or the history is empty). Everything else is a no-op, so the history
/// stays append-only and in movement processing order.
pub fn record_price(history: &mut Vec<PricePoint>, movement: &Movement) {
    if !movement.kind.is_incoming() || !movement.unit_price.is_positive() {
        return;
    }

    let changed = match history.last() {
        Some(last) => last.price != movement.unit_price,
        None => true,
    };

    if changed {
        history.push(PricePoint {
            date: movement.occurred_at,
            price: movement.unit_price,
        });
    }
}
