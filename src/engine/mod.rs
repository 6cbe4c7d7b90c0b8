//! Pure computation engine for deterministic inventory valuation.
//!
//! No I/O, no clock, no logging in here; the store layer wraps these
//! functions and owns the impure edges.

use crate::domain::{Decimal, MovementId, MovementKind, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod accumulator;
pub mod ledger;
pub mod price_history;
pub mod recompute;

pub use accumulator::{AppliedMovement, Balance};
pub use ledger::build_ledger;
pub use price_history::record_price;
pub use recompute::{orphaned_movement_count, recompute_products};

/// One kardex row: a movement projected together with the running balance
/// after it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub movement_id: MovementId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
    pub kind: MovementKind,
    pub quantity: Decimal,
    /// Unit price as stored on the movement (zero for outgoing kinds).
    pub unit_price: Decimal,
    /// Incoming: stored value. Outgoing: realized exit cost at replay time.
    pub total_value: Decimal,
    pub author_id: UserId,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_ref: Option<String>,

    /// Product description resolved at build time.
    pub product_description: String,
    /// Author name resolved at build time ("unknown" when unresolvable).
    pub author_name: String,

    /// Stock quantity after this movement.
    pub balance_qty: Decimal,
    /// Stock value after this movement.
    pub balance_value: Decimal,
    /// Average cost after this movement (derived from the two balances).
    pub average_cost: Decimal,
    /// True when this movement took the balance from positive to zero or
    /// below.
    pub crossed_zero: bool,
}
