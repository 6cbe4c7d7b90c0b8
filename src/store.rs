//! Caller-owned in-memory store and mutation boundary.
//!
//! Owns the product, movement, and user collections. Every successful
//! write runs a full replay through the engine before returning, so
//! product balance state can never lag the movement history. This is the
//! impure layer: it logs, stamps audit entries with the wall clock, and
//! holds the collections the pure engine functions run over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    Decimal, Movement, MovementDraft, MovementId, MovementKind, Product, ProductDraft, ProductId,
    User, UserId,
};
use crate::engine::ledger::UNKNOWN_AUTHOR;
use crate::engine::{build_ledger, orphaned_movement_count, recompute_products, LedgerEntry};

/// Mutation failure raised at the store boundary.
///
/// The engine itself never raises these; invalid movements are rejected
/// here before they can reach a replay.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Movement quantity must be strictly positive.
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// Entry and Return movements must carry a positive unit price.
    #[error("{kind} movements require a positive unit price")]
    MissingUnitPrice { kind: MovementKind },

    /// The referenced product does not exist.
    #[error("unknown product {0}")]
    UnknownProduct(ProductId),

    /// The referenced movement does not exist.
    #[error("unknown movement {0}")]
    UnknownMovement(MovementId),
}

/// One recorded administrative action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    /// Resolved name of the acting user ("unknown" when unresolvable).
    pub user_name: String,
    pub action: String,
    pub details: String,
    pub recorded_at: DateTime<Utc>,
}

/// In-memory inventory store.
///
/// Constructed by the caller and passed around by handle; the crate keeps
/// no process-wide state. Persistence, if any, is the caller's concern:
/// the collections serialize cleanly and can be handed back in via
/// [`InventoryStore::with_data`].
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    products: Vec<Product>,
    movements: Vec<Movement>,
    users: Vec<User>,
    audit_log: Vec<AuditEntry>,
}

impl InventoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from existing collections and bring product balance
    /// state up to date with an initial replay.
    pub fn with_data(products: Vec<Product>, movements: Vec<Movement>, users: Vec<User>) -> Self {
        let mut store = Self {
            products,
            movements,
            users,
            audit_log: Vec::new(),
        };
        store.replay();
        store
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    /// Look up a product by id.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Look up a movement by id.
    pub fn movement(&self, id: MovementId) -> Option<&Movement> {
        self.movements.iter().find(|movement| movement.id == id)
    }

    /// Build the kardex over the current collections.
    pub fn ledger(&self) -> Vec<LedgerEntry> {
        build_ledger(&self.products, &self.movements, &self.users)
    }

    /// Add a product with the next sequential id and zeroed balance state.
    pub fn add_product(&mut self, draft: ProductDraft, author_id: UserId) -> Product {
        let id = self.next_product_id();
        let product = Product::from_draft(id, draft);
        self.products.push(product.clone());
        tracing::debug!(product = %product.id, "product added");
        self.record_audit(
            author_id,
            "product added",
            format!("product: {} (id: {})", product.description, product.id),
        );
        product
    }

    /// Validate and record a movement, then replay balances.
    ///
    /// The stored record derives its value fields from the draft: incoming
    /// kinds store `quantity x unit_price`, outgoing kinds store zeros.
    pub fn add_movement(
        &mut self,
        draft: MovementDraft,
        author_id: UserId,
    ) -> Result<Movement, StoreError> {
        let description = self.validate_draft(&draft)?;
        let id = self.next_movement_id();
        let movement = Movement::from_draft(id, draft, author_id);

        tracing::debug!(
            movement = %movement.id,
            product = %movement.product_id,
            kind = %movement.kind,
            "movement recorded"
        );

        let action = format!("{} recorded", movement.kind);
        let details = format!("product: {}, qty: {}", description, movement.quantity);
        self.movements.push(movement.clone());
        self.replay();
        self.record_audit(author_id, &action, details);
        Ok(movement)
    }

    /// Replace a movement wholesale, re-deriving its value fields, then
    /// replay balances.
    ///
    /// Any historic edit can change the cost basis of every later movement
    /// of that product, so the replay is not optional.
    pub fn update_movement(&mut self, updated: Movement) -> Result<Movement, StoreError> {
        let position = self
            .movements
            .iter()
            .position(|movement| movement.id == updated.id)
            .ok_or(StoreError::UnknownMovement(updated.id))?;

        let id = updated.id;
        let author_id = updated.author_id;
        let draft = updated.into_draft();
        let description = self.validate_draft(&draft)?;
        let movement = Movement::from_draft(id, draft, author_id);

        tracing::debug!(movement = %movement.id, "movement updated");

        self.movements[position] = movement.clone();
        self.replay();
        self.record_audit(
            author_id,
            "movement updated",
            format!("id: {}, product: {}", movement.id, description),
        );
        Ok(movement)
    }

    /// Remove a movement by id, then replay balances.
    ///
    /// Only the movement itself must exist; orphaned history whose product
    /// was since removed stays deletable.
    pub fn delete_movement(&mut self, id: MovementId, author_id: UserId) -> Result<(), StoreError> {
        let position = self
            .movements
            .iter()
            .position(|movement| movement.id == id)
            .ok_or(StoreError::UnknownMovement(id))?;

        let movement = self.movements.remove(position);
        let description = self
            .product(movement.product_id)
            .map(|product| product.description.clone())
            .unwrap_or_else(|| movement.product_id.to_string());

        tracing::debug!(movement = %id, "movement deleted");

        self.replay();
        self.record_audit(
            author_id,
            "movement deleted",
            format!("id: {}, product: {}", id, description),
        );
        Ok(())
    }

    /// Administrative "rebuild everything" entrypoint.
    ///
    /// The write path already replays after every mutation; this exists
    /// for callers that loaded data out-of-band or just want the rebuild
    /// on record.
    pub fn recompute_all(&mut self, author_id: UserId) {
        tracing::info!(
            movements = self.movements.len(),
            "forced global recalculation"
        );
        self.replay();
        self.record_audit(
            author_id,
            "forced global recalculation",
            "balances and average costs of all products were recalculated".to_string(),
        );
    }

    /// Plan the adjustment movement that reconciles a physical count.
    ///
    /// Returns `None` when the count matches the system balance. The draft
    /// prices the difference at the product's current average cost and
    /// feeds the ordinary [`InventoryStore::add_movement`] path.
    pub fn plan_count_adjustment(
        &self,
        product_id: ProductId,
        counted_qty: Decimal,
        counted_at: DateTime<Utc>,
    ) -> Result<Option<MovementDraft>, StoreError> {
        let product = self
            .product(product_id)
            .ok_or(StoreError::UnknownProduct(product_id))?;

        let difference = counted_qty - product.balance_qty;
        if difference.is_zero() {
            return Ok(None);
        }

        let kind = if difference.is_positive() {
            MovementKind::PositiveAdjustment
        } else {
            MovementKind::NegativeAdjustment
        };

        Ok(Some(MovementDraft {
            product_id,
            occurred_at: counted_at,
            kind,
            quantity: difference.abs(),
            // Average cost keeps adjustments valuation-neutral per unit
            unit_price: product.average_cost(),
            note: format!("inventory count adjustment: physical count {}", counted_qty),
            document_ref: None,
        }))
    }

    /// Validate a movement draft and resolve its product description.
    fn validate_draft(&self, draft: &MovementDraft) -> Result<String, StoreError> {
        let product = self
            .product(draft.product_id)
            .ok_or(StoreError::UnknownProduct(draft.product_id))?;
        if !draft.quantity.is_positive() {
            return Err(StoreError::NonPositiveQuantity(draft.quantity));
        }
        if draft.kind.requires_unit_price() && !draft.unit_price.is_positive() {
            return Err(StoreError::MissingUnitPrice { kind: draft.kind });
        }
        Ok(product.description.clone())
    }

    /// Replay the full movement history and replace product balance state.
    fn replay(&mut self) {
        let orphaned = orphaned_movement_count(&self.products, &self.movements);
        if orphaned > 0 {
            tracing::warn!(
                orphaned,
                "movements reference unknown products and were excluded from replay"
            );
        }
        self.products = recompute_products(&self.products, &self.movements);
        tracing::debug!(
            products = self.products.len(),
            movements = self.movements.len(),
            "balances recomputed"
        );
    }

    fn record_audit(&mut self, author_id: UserId, action: &str, details: String) {
        let user_name = self.resolve_user_name(author_id);
        let id = self.audit_log.iter().map(|entry| entry.id).max().unwrap_or(0) + 1;
        self.audit_log.push(AuditEntry {
            id,
            user_name,
            action: action.to_string(),
            details,
            recorded_at: Utc::now(),
        });
    }

    fn resolve_user_name(&self, author_id: UserId) -> String {
        self.users
            .iter()
            .find(|user| user.id == author_id)
            .map(|user| user.name.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    fn next_product_id(&self) -> ProductId {
        let max = self
            .products
            .iter()
            .map(|product| product.id.as_i64())
            .max()
            .unwrap_or(0);
        ProductId::new(max + 1)
    }

    fn next_movement_id(&self) -> MovementId {
        let max = self
            .movements
            .iter()
            .map(|movement| movement.id.as_i64())
            .max()
            .unwrap_or(0);
        MovementId::new(max + 1)
    }
}
