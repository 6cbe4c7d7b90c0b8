//! Product type: static catalog attributes plus engine-owned balance state.

use crate::domain::{Decimal, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded unit-price change for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Business timestamp of the movement that introduced the price.
    pub date: DateTime<Utc>,
    /// Unit price at that point.
    pub price: Decimal,
}

/// An inventory item.
///
/// Static attributes describe the item; the dynamic fields (`balance_qty`,
/// `balance_value`, the zero dates, and `price_history`) belong to the
/// replay engine and are overwritten on every recompute. Average cost is
/// never stored; it is derived from the two balance fields on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub description: String,
    /// Unit of measure (e.g. "pc", "kg", "L").
    pub unit: String,
    pub brand: String,
    pub category: String,
    /// What the item is used on or for.
    pub application: String,
    /// Reorder threshold; zero disables the low-stock signal.
    pub min_stock: Decimal,
    pub supplier: String,
    pub location: String,

    /// Current stock quantity, signed. Negative balances are preserved.
    pub balance_qty: Decimal,
    /// Current stock value, signed.
    pub balance_value: Decimal,
    /// Timestamp of the most recent positive-to-zero-or-below crossing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_zero_date: Option<DateTime<Utc>>,
    /// Timestamp of the crossing before that one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_zero_date: Option<DateTime<Utc>>,
    /// Unit-price changes in movement processing order.
    pub price_history: Vec<PricePoint>,
}

/// Caller-supplied product fields; the store assigns the id and zeroes the
/// dynamic state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub description: String,
    pub unit: String,
    pub brand: String,
    pub category: String,
    pub application: String,
    pub min_stock: Decimal,
    pub supplier: String,
    pub location: String,
}

impl Product {
    /// Build a product record from a draft with zeroed dynamic state.
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Product {
            id,
            description: draft.description,
            unit: draft.unit,
            brand: draft.brand,
            category: draft.category,
            application: draft.application,
            min_stock: draft.min_stock,
            supplier: draft.supplier,
            location: draft.location,
            balance_qty: Decimal::zero(),
            balance_value: Decimal::zero(),
            current_zero_date: None,
            prior_zero_date: None,
            price_history: Vec::new(),
        }
    }

    /// Average cost per unit: `balance_value / balance_qty` while the
    /// balance is positive, zero otherwise.
    pub fn average_cost(&self) -> Decimal {
        if self.balance_qty.is_positive() {
            self.balance_value / self.balance_qty
        } else {
            Decimal::zero()
        }
    }

    /// Stock value at the current average cost.
    ///
    /// Zero for non-positive balances (average cost is zero there), which is
    /// what the valuation reports sum.
    pub fn stock_value(&self) -> Decimal {
        self.balance_qty * self.average_cost()
    }

    /// Reset every dynamic field to the empty state before a replay.
    pub fn reset_dynamic(&mut self) {
        self.balance_qty = Decimal::zero();
        self.balance_value = Decimal::zero();
        self.current_zero_date = None;
        self.prior_zero_date = None;
        self.price_history.clear();
    }
}
