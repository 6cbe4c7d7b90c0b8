//! Read-only reporting queries over products, movements, and the ledger.
//!
//! Everything here is a pure fold over caller-provided slices. Dashboards
//! decide presentation; these functions only select and aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Decimal, Movement, Product};
use crate::engine::LedgerEntry;

/// Aggregate totals for a reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub movement_count: usize,
    /// Sum of stored values of incoming movements in the window.
    pub incoming_value: Decimal,
    /// Sum of realized exit costs of outgoing movements in the window.
    pub outgoing_value: Decimal,
}

/// Summarize ledger rows whose timestamp falls within `[from, to]`.
///
/// Works over annotated ledger rows rather than raw movements so that
/// outgoing totals reflect realized exit cost instead of the zero
/// placeholder stored on outgoing records.
pub fn movement_window_summary(
    ledger: &[LedgerEntry],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> WindowSummary {
    let mut summary = WindowSummary {
        movement_count: 0,
        incoming_value: Decimal::zero(),
        outgoing_value: Decimal::zero(),
    };
    for entry in ledger {
        if entry.occurred_at < from || entry.occurred_at > to {
            continue;
        }
        summary.movement_count += 1;
        if entry.kind.is_incoming() {
            summary.incoming_value = summary.incoming_value + entry.total_value;
        } else {
            summary.outgoing_value = summary.outgoing_value + entry.total_value;
        }
    }
    summary
}

/// Total value of stock on hand across all products.
///
/// Products at zero or negative balance contribute nothing.
pub fn total_stock_value(products: &[Product]) -> Decimal {
    products.iter().map(|product| product.stock_value()).sum()
}

/// Products at or below their configured minimum stock level.
///
/// Products with no minimum configured (zero) never alert.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products
        .iter()
        .filter(|product| {
            product.min_stock.is_positive() && product.balance_qty <= product.min_stock
        })
        .collect()
}

/// The `n` products holding the most stock value, highest first.
pub fn top_products_by_value(products: &[Product], n: usize) -> Vec<&Product> {
    let mut ranked: Vec<&Product> = products.iter().collect();
    ranked.sort_by(|a, b| b.stock_value().cmp(&a.stock_value()));
    ranked.truncate(n);
    ranked
}

/// A product holding stock with no movement since the cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleProduct<'a> {
    pub product: &'a Product,
    /// Timestamp of the product's latest movement, if it has any.
    pub last_movement: Option<DateTime<Utc>>,
}

/// Products with positive balance whose latest movement predates `cutoff`
/// (or that have no movements at all).
pub fn idle_products<'a>(
    products: &'a [Product],
    movements: &[Movement],
    cutoff: DateTime<Utc>,
) -> Vec<IdleProduct<'a>> {
    products
        .iter()
        .filter(|product| product.balance_qty.is_positive())
        .filter_map(|product| {
            let last_movement = movements
                .iter()
                .filter(|movement| movement.product_id == product.id)
                .map(|movement| movement.occurred_at)
                .max();
            match last_movement {
                Some(at) if at >= cutoff => None,
                _ => Some(IdleProduct {
                    product,
                    last_movement,
                }),
            }
        })
        .collect()
}
