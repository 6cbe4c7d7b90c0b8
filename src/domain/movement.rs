//! Movement type representing a single stock transaction.

use crate::domain::{Decimal, Direction, MovementId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of stock movement.
///
/// The incoming/outgoing split drives all balance math: incoming kinds add
/// quantity and value at the movement's unit price, outgoing kinds remove
/// quantity and value at the pre-movement average cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementKind {
    /// Goods received (purchase or initial load).
    Entry,
    /// Goods issued to consumption.
    Exit,
    /// Goods returned back into stock.
    Return,
    /// Upward stock-count correction.
    PositiveAdjustment,
    /// Downward stock-count correction.
    NegativeAdjustment,
}

impl MovementKind {
    /// Get the balance direction for this kind.
    pub fn direction(&self) -> Direction {
        match self {
            MovementKind::Entry | MovementKind::Return | MovementKind::PositiveAdjustment => {
                Direction::Incoming
            }
            MovementKind::Exit | MovementKind::NegativeAdjustment => Direction::Outgoing,
        }
    }

    /// Returns true for kinds that add stock.
    pub fn is_incoming(&self) -> bool {
        self.direction() == Direction::Incoming
    }

    /// Returns true for kinds that remove stock.
    pub fn is_outgoing(&self) -> bool {
        self.direction() == Direction::Outgoing
    }

    /// Returns true for kinds that must carry a positive unit price.
    ///
    /// Adjustments are exempt: a positive adjustment on an empty product
    /// legitimately carries the zero average cost.
    pub fn requires_unit_price(&self) -> bool {
        matches!(self, MovementKind::Entry | MovementKind::Return)
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementKind::Entry => write!(f, "entry"),
            MovementKind::Exit => write!(f, "exit"),
            MovementKind::Return => write!(f, "return"),
            MovementKind::PositiveAdjustment => write!(f, "positive-adjustment"),
            MovementKind::NegativeAdjustment => write!(f, "negative-adjustment"),
        }
    }
}

/// A single stock movement record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Stable identifier, also the equal-timestamp tie-break key.
    pub id: MovementId,
    /// Product this movement belongs to.
    pub product_id: ProductId,
    /// Business timestamp of the movement (may be back-dated).
    pub occurred_at: DateTime<Utc>,
    /// Movement kind.
    pub kind: MovementKind,
    /// Quantity moved, always positive.
    pub quantity: Decimal,
    /// Unit price; zero for outgoing kinds.
    pub unit_price: Decimal,
    /// Stored value: quantity x unit price for incoming kinds, zero
    /// placeholder for outgoing kinds (the realized exit cost only exists
    /// at replay time).
    pub total_value: Decimal,
    /// Author who recorded the movement.
    pub author_id: UserId,
    /// Free-text note.
    pub note: String,
    /// Fiscal document reference, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_ref: Option<String>,
}

/// Caller-supplied movement fields; the store derives the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_ref: Option<String>,
}

impl Movement {
    /// Build a movement record from a draft, deriving the stored value
    /// fields for its kind.
    pub fn from_draft(id: MovementId, draft: MovementDraft, author_id: UserId) -> Self {
        let (unit_price, total_value) = match draft.kind.direction() {
            Direction::Incoming => (draft.unit_price, draft.quantity * draft.unit_price),
            Direction::Outgoing => (Decimal::zero(), Decimal::zero()),
        };
        Movement {
            id,
            product_id: draft.product_id,
            occurred_at: draft.occurred_at,
            kind: draft.kind,
            quantity: draft.quantity,
            unit_price,
            total_value,
            author_id,
            note: draft.note,
            document_ref: draft.document_ref,
        }
    }

    /// Reduce this movement back to its caller-supplied fields.
    pub fn into_draft(self) -> MovementDraft {
        MovementDraft {
            product_id: self.product_id,
            occurred_at: self.occurred_at,
            kind: self.kind,
            quantity: self.quantity,
            unit_price: self.unit_price,
            note: self.note,
            document_ref: self.document_ref,
        }
    }
}
