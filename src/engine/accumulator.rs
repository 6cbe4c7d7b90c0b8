use crate::domain::{Decimal, Direction, Movement};
use chrono::{DateTime, Utc};

/// Running balance state for one product during replay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Balance {
    /// Current quantity: signed, never clamped at zero.
    pub qty: Decimal,

    /// Current stock value: signed, moves with qty.
    pub value: Decimal,

    /// Timestamp of the most recent positive-to-zero-or-below crossing.
    pub current_zero_date: Option<DateTime<Utc>>,

    /// Timestamp of the crossing before that one.
    pub prior_zero_date: Option<DateTime<Utc>>,
}

/// Outcome of applying one movement to a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMovement {
    /// True when the balance went from positive to zero or below.
    pub crossed_zero: bool,

    /// Value moved by the movement: quantity x unit price for incoming
    /// kinds, the realized exit cost (quantity x pre-movement average
    /// cost) for outgoing kinds.
    pub moved_value: Decimal,
}

impl Balance {
    pub fn new() -> Self {
        Self {
            qty: Decimal::zero(),
            value: Decimal::zero(),
            current_zero_date: None,
            prior_zero_date: None,
        }
    }

    /// Average cost per unit: `value / qty` while qty is positive, zero
    /// otherwise. Always derived, never cached.
    pub fn average_cost(&self) -> Decimal {
        if self.qty.is_positive() {
            self.value / self.qty
        } else {
            Decimal::zero()
        }
    }

    /// Apply a single movement, updating the balance in place.
    ///
    /// Incoming movements add quantity and value at the movement's unit
    /// price and are the only way the average cost changes. Outgoing
    /// movements consume at the pre-movement average cost, so the average
    /// cost they leave behind is unchanged. The quantity is assumed
    /// positive; the mutation boundary rejects anything else before it
    /// gets here.
    pub fn apply(&mut self, movement: &Movement) -> AppliedMovement {
        let previous_qty = self.qty;

        let moved_value = match movement.kind.direction() {
            Direction::Incoming => {
                let added_value = movement.quantity * movement.unit_price;
                self.qty = previous_qty + movement.quantity;
                self.value = self.value + added_value;
                added_value
            }
            Direction::Outgoing => {
                // average_cost() still sees the pre-movement state here
                let exit_cost = movement.quantity * self.average_cost();
                self.qty = previous_qty - movement.quantity;
                self.value = self.value - exit_cost;
                exit_cost
            }
        };

        let crossed_zero = previous_qty.is_positive() && !self.qty.is_positive();
        if crossed_zero {
            self.prior_zero_date = self.current_zero_date;
            self.current_zero_date = Some(movement.occurred_at);
        }

        AppliedMovement {
            crossed_zero,
            moved_value,
        }
    }
}
