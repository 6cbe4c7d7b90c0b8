//! Kardex generation: one annotated ledger row per movement.

use std::collections::HashMap;

use crate::domain::{
    sort_movements_chronological, Direction, Movement, Product, ProductId, User, UserId,
};

use super::accumulator::Balance;
use super::LedgerEntry;

/// Name substituted when a movement's author is not in the directory.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Replay all movements in normalized chronological order and emit one
/// ledger row per movement, carrying the balance *after* that movement.
///
/// Runs the same accumulator as the full recompute, so the last row for
/// any product agrees with the recomputed product snapshot. Rows for
/// outgoing movements carry the realized exit cost as their total value
/// (the stored value on the record is only a placeholder); incoming rows
/// keep the stored value. Movements referencing an unknown product are
/// excluded; an unknown author only falls back to a placeholder name.
pub fn build_ledger(
    products: &[Product],
    movements: &[Movement],
    users: &[User],
) -> Vec<LedgerEntry> {
    let descriptions: HashMap<ProductId, &str> = products
        .iter()
        .map(|product| (product.id, product.description.as_str()))
        .collect();
    let author_names: HashMap<UserId, &str> = users
        .iter()
        .map(|user| (user.id, user.name.as_str()))
        .collect();

    let mut ordered = movements.to_vec();
    sort_movements_chronological(&mut ordered);

    let mut balances: HashMap<ProductId, Balance> = HashMap::new();
    let mut entries = Vec::with_capacity(ordered.len());

    for movement in ordered {
        let product_description = match descriptions.get(&movement.product_id) {
            Some(description) => (*description).to_string(),
            None => continue,
        };
        let author_name = author_names
            .get(&movement.author_id)
            .map(|name| (*name).to_string())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let balance = balances.entry(movement.product_id).or_default();
        let applied = balance.apply(&movement);

        let total_value = match movement.kind.direction() {
            Direction::Incoming => movement.total_value,
            Direction::Outgoing => applied.moved_value,
        };

        entries.push(LedgerEntry {
            movement_id: movement.id,
            product_id: movement.product_id,
            occurred_at: movement.occurred_at,
            kind: movement.kind,
            quantity: movement.quantity,
            unit_price: movement.unit_price,
            total_value,
            author_id: movement.author_id,
            note: movement.note,
            document_ref: movement.document_ref,
            product_description,
            author_name,
            balance_qty: balance.qty,
            balance_value: balance.value,
            average_cost: balance.average_cost(),
            crossed_zero: applied.crossed_zero,
        });
    }

    entries
}
