pub mod domain;
pub mod engine;
pub mod reports;
pub mod store;

pub use domain::{
    Decimal, Direction, Movement, MovementDraft, MovementId, MovementKind, PricePoint, Product,
    ProductDraft, ProductId, User, UserId,
};
pub use engine::{build_ledger, recompute_products, Balance, LedgerEntry};
pub use reports::{
    idle_products, low_stock, movement_window_summary, top_products_by_value, total_stock_value,
    IdleProduct, WindowSummary,
};
pub use store::{AuditEntry, InventoryStore, StoreError};
