//! Stable movement ordering for deterministic replay.

use crate::domain::Movement;
use chrono::{DateTime, Utc};

/// Stable ordering key for movements.
///
/// Ensures deterministic ordering of movements with the same timestamp.
/// Ordering: occurred_at -> movement id (insertion sequence). Back-dated
/// movements sort by their business timestamp, not by when they were
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MovementOrderingKey {
    /// Business timestamp (primary sort).
    pub occurred_at: DateTime<Utc>,
    /// Movement id (tie-break); ids are a monotonic insertion sequence.
    pub movement_id: i64,
}

impl MovementOrderingKey {
    /// Create an ordering key from a Movement.
    pub fn from_movement(movement: &Movement) -> Self {
        MovementOrderingKey {
            occurred_at: movement.occurred_at,
            movement_id: movement.id.as_i64(),
        }
    }

    /// Compare two movements for deterministic ordering.
    ///
    /// Returns true if movement_a should come before movement_b.
    pub fn should_come_before(movement_a: &Movement, movement_b: &Movement) -> bool {
        let key_a = Self::from_movement(movement_a);
        let key_b = Self::from_movement(movement_b);
        key_a < key_b
    }
}

/// Sort movements into normalized chronological order.
pub fn sort_movements_chronological(movements: &mut [Movement]) {
    movements.sort_by(|a, b| {
        let key_a = MovementOrderingKey::from_movement(a);
        let key_b = MovementOrderingKey::from_movement(b);
        key_a.cmp(&key_b)
    });
}
