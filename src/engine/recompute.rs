//! Full recompute: rebuild product balance state from movement history.

use std::collections::{HashMap, HashSet};

use crate::domain::{sort_movements_chronological, Movement, Product, ProductId};

use super::accumulator::Balance;
use super::price_history::record_price;

/// Rebuild every product's dynamic fields by replaying the complete
/// movement set from a zeroed state.
///
/// Returns one snapshot per input product, in input order, with the
/// dynamic fields replaced (not merged) by the replay result. Products
/// without movements come back in the zero state. Movements referencing a
/// product that is not in `products` are skipped; callers that care count
/// them with [`orphaned_movement_count`]. Pure: identical inputs produce
/// identical output, regardless of the movement array's initial order.
pub fn recompute_products(products: &[Product], movements: &[Movement]) -> Vec<Product> {
    let mut snapshots: Vec<Product> = products
        .iter()
        .map(|product| {
            let mut snapshot = product.clone();
            snapshot.reset_dynamic();
            snapshot
        })
        .collect();

    let index: HashMap<ProductId, usize> = snapshots
        .iter()
        .enumerate()
        .map(|(i, product)| (product.id, i))
        .collect();

    let mut ordered = movements.to_vec();
    sort_movements_chronological(&mut ordered);

    let mut balances: HashMap<ProductId, Balance> = HashMap::new();
    for movement in &ordered {
        let i = match index.get(&movement.product_id) {
            Some(&i) => i,
            None => continue,
        };
        let balance = balances.entry(movement.product_id).or_default();
        balance.apply(movement);
        record_price(&mut snapshots[i].price_history, movement);
    }

    for snapshot in &mut snapshots {
        if let Some(balance) = balances.remove(&snapshot.id) {
            snapshot.balance_qty = balance.qty;
            snapshot.balance_value = balance.value;
            snapshot.current_zero_date = balance.current_zero_date;
            snapshot.prior_zero_date = balance.prior_zero_date;
        }
    }

    snapshots
}

/// Count movements that reference a product missing from the directory.
///
/// These are the movements a replay will skip; the store logs the count.
pub fn orphaned_movement_count(products: &[Product], movements: &[Movement]) -> usize {
    let known: HashSet<ProductId> = products.iter().map(|product| product.id).collect();
    movements
        .iter()
        .filter(|movement| !known.contains(&movement.product_id))
        .count()
}
