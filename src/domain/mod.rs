//! Domain types and determinism layer for the inventory valuation engine.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: ProductId, MovementId, UserId, Direction
//! - Product and Movement types with canonical JSON serialization
//! - Stable movement ordering key helper for deterministic replay

pub mod decimal;
pub mod movement;
pub mod ordering;
pub mod primitives;
pub mod product;
pub mod user;

pub use decimal::Decimal;
pub use movement::{Movement, MovementDraft, MovementKind};
pub use ordering::{sort_movements_chronological, MovementOrderingKey};
pub use primitives::{Direction, MovementId, ProductId, UserId};
pub use product::{PricePoint, Product, ProductDraft};
pub use user::User;
