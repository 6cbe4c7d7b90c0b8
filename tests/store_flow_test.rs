//! Integration tests driving the store's mutation API end to end.
//!
//! Every write replays the full movement history, so after each mutation
//! the product snapshots must match what a from-scratch recompute yields.

use chrono::{DateTime, TimeZone, Utc};
use kardex::reports::{movement_window_summary, total_stock_value};
use kardex::{
    Decimal, InventoryStore, Movement, MovementDraft, MovementId, MovementKind, Product,
    ProductDraft, ProductId, StoreError, User, UserId,
};

const AUTHOR: UserId = UserId(1);

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

fn product_draft(description: &str) -> ProductDraft {
    ProductDraft {
        description: description.to_string(),
        unit: "pc".to_string(),
        brand: String::new(),
        category: String::new(),
        application: String::new(),
        min_stock: Decimal::zero(),
        supplier: String::new(),
        location: String::new(),
    }
}

fn draft(
    product_id: ProductId,
    day: u32,
    kind: MovementKind,
    qty: &str,
    price: &str,
) -> MovementDraft {
    MovementDraft {
        product_id,
        occurred_at: at(day),
        kind,
        quantity: d(qty),
        unit_price: d(price),
        note: String::new(),
        document_ref: None,
    }
}

fn store_with_user() -> InventoryStore {
    InventoryStore::with_data(
        Vec::new(),
        Vec::new(),
        vec![User::new(AUTHOR, "alice".to_string())],
    )
}

#[test]
fn test_mutation_flow_keeps_balances_current() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);

    store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "10", "250"), AUTHOR)
        .unwrap();
    let snapshot = store.product(product.id).unwrap();
    assert_eq!(snapshot.balance_qty, d("10"));
    assert_eq!(snapshot.balance_value, d("2500"));

    store
        .add_movement(draft(product.id, 2, MovementKind::Exit, "5", "0"), AUTHOR)
        .unwrap();
    let snapshot = store.product(product.id).unwrap();
    assert_eq!(snapshot.balance_qty, d("5"));
    assert_eq!(snapshot.balance_value, d("1250"));

    store
        .add_movement(draft(product.id, 3, MovementKind::Entry, "20", "300"), AUTHOR)
        .unwrap();
    let snapshot = store.product(product.id).unwrap();
    assert_eq!(snapshot.balance_qty, d("25"));
    assert_eq!(snapshot.balance_value, d("7250"));
    assert_eq!(snapshot.average_cost(), d("290"));
}

#[test]
fn test_stored_outgoing_movement_keeps_zero_value_fields() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);

    store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "10", "250"), AUTHOR)
        .unwrap();
    let exit = store
        .add_movement(draft(product.id, 2, MovementKind::Exit, "5", "99"), AUTHOR)
        .unwrap();

    // The stored record zeroes price fields on outgoing kinds; the
    // realized cost lives on the ledger row instead.
    assert_eq!(exit.unit_price, d("0"));
    assert_eq!(exit.total_value, d("0"));

    let ledger = store.ledger();
    assert_eq!(ledger[1].movement_id, exit.id);
    assert_eq!(ledger[1].total_value, d("1250"));
}

#[test]
fn test_update_movement_moves_stock_between_products() {
    let mut store = store_with_user();
    let first = store.add_product(product_draft("first"), AUTHOR);
    let second = store.add_product(product_draft("second"), AUTHOR);

    let movement = store
        .add_movement(draft(first.id, 1, MovementKind::Entry, "10", "50"), AUTHOR)
        .unwrap();
    assert_eq!(store.product(first.id).unwrap().balance_qty, d("10"));
    assert_eq!(store.product(second.id).unwrap().balance_qty, d("0"));

    let mut updated = movement.clone();
    updated.product_id = second.id;
    store.update_movement(updated).unwrap();

    // Both products replay: the stock follows the movement.
    assert_eq!(store.product(first.id).unwrap().balance_qty, d("0"));
    assert_eq!(store.product(first.id).unwrap().balance_value, d("0"));
    assert_eq!(store.product(second.id).unwrap().balance_qty, d("10"));
    assert_eq!(store.product(second.id).unwrap().balance_value, d("500"));
}

#[test]
fn test_update_movement_rederives_value_fields() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);
    let movement = store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "10", "50"), AUTHOR)
        .unwrap();
    assert_eq!(movement.total_value, d("500"));

    let mut updated = movement;
    updated.unit_price = d("80");
    let stored = store.update_movement(updated).unwrap();

    assert_eq!(stored.total_value, d("800"));
    assert_eq!(store.product(product.id).unwrap().balance_value, d("800"));
}

#[test]
fn test_delete_movement_restores_prior_state() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);
    store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "10", "250"), AUTHOR)
        .unwrap();

    let before = serde_json::to_vec(store.products()).unwrap();

    let exit = store
        .add_movement(draft(product.id, 2, MovementKind::Exit, "4", "0"), AUTHOR)
        .unwrap();
    assert_eq!(store.product(product.id).unwrap().balance_qty, d("6"));

    store.delete_movement(exit.id, AUTHOR).unwrap();
    let after = serde_json::to_vec(store.products()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_count_adjustment_shortfall() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);
    store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "10", "250"), AUTHOR)
        .unwrap();

    let planned = store
        .plan_count_adjustment(product.id, d("7"), at(5))
        .unwrap()
        .unwrap();
    assert_eq!(planned.kind, MovementKind::NegativeAdjustment);
    assert_eq!(planned.quantity, d("3"));
    assert_eq!(planned.unit_price, d("250"));
    assert!(planned.note.contains("physical count 7"));

    store.add_movement(planned, AUTHOR).unwrap();
    let snapshot = store.product(product.id).unwrap();
    assert_eq!(snapshot.balance_qty, d("7"));
    assert_eq!(snapshot.balance_value, d("1750"));
    assert_eq!(snapshot.average_cost(), d("250"));
}

#[test]
fn test_count_adjustment_surplus() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);
    store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "10", "250"), AUTHOR)
        .unwrap();

    let planned = store
        .plan_count_adjustment(product.id, d("12"), at(5))
        .unwrap()
        .unwrap();
    assert_eq!(planned.kind, MovementKind::PositiveAdjustment);
    assert_eq!(planned.quantity, d("2"));
    // Surplus priced at the running average keeps the average stable.
    assert_eq!(planned.unit_price, d("250"));

    store.add_movement(planned, AUTHOR).unwrap();
    let snapshot = store.product(product.id).unwrap();
    assert_eq!(snapshot.balance_qty, d("12"));
    assert_eq!(snapshot.balance_value, d("3000"));
    assert_eq!(snapshot.average_cost(), d("250"));
}

#[test]
fn test_count_adjustment_matching_balance_plans_nothing() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);
    store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "10", "250"), AUTHOR)
        .unwrap();

    assert_eq!(store.plan_count_adjustment(product.id, d("10"), at(5)).unwrap(), None);

    let err = store
        .plan_count_adjustment(ProductId::new(9), d("10"), at(5))
        .unwrap_err();
    assert_eq!(err, StoreError::UnknownProduct(ProductId::new(9)));
}

#[test]
fn test_price_history_rebuilds_through_mutations() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);

    store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "1", "250"), AUTHOR)
        .unwrap();
    store
        .add_movement(draft(product.id, 2, MovementKind::Entry, "1", "250"), AUTHOR)
        .unwrap();
    let repeat = store
        .add_movement(draft(product.id, 3, MovementKind::Entry, "1", "300"), AUTHOR)
        .unwrap();

    let history = &store.product(product.id).unwrap().price_history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].price, d("300"));

    // Deleting the only 300-priced entry shrinks the history again.
    store.delete_movement(repeat.id, AUTHOR).unwrap();
    let history = &store.product(product.id).unwrap().price_history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].price, d("250"));
}

#[test]
fn test_with_data_replays_stale_snapshots() {
    let mut stale = Product::from_draft(ProductId::new(1), product_draft("bearing"));
    stale.balance_qty = d("999");
    stale.balance_value = d("1");

    let movement = Movement::from_draft(
        MovementId::new(1),
        draft(ProductId::new(1), 1, MovementKind::Entry, "10", "250"),
        AUTHOR,
    );

    let store = InventoryStore::with_data(vec![stale], vec![movement], Vec::new());
    let snapshot = store.product(ProductId::new(1)).unwrap();
    assert_eq!(snapshot.balance_qty, d("10"));
    assert_eq!(snapshot.balance_value, d("2500"));
}

#[test]
fn test_audit_trail_grows_with_each_mutation() {
    let mut store = store_with_user();
    let product = store.add_product(product_draft("bearing"), AUTHOR);
    let movement = store
        .add_movement(draft(product.id, 1, MovementKind::Entry, "2", "10"), AUTHOR)
        .unwrap();
    let mut updated = movement.clone();
    updated.quantity = d("3");
    store.update_movement(updated).unwrap();
    store.delete_movement(movement.id, AUTHOR).unwrap();
    store.recompute_all(AUTHOR);

    let actions: Vec<&str> = store
        .audit_log()
        .iter()
        .map(|entry| entry.action.as_str())
        .collect();
    assert_eq!(
        actions,
        vec![
            "product added",
            "entry recorded",
            "movement updated",
            "movement deleted",
            "forced global recalculation",
        ]
    );
    assert!(store.audit_log().iter().all(|entry| entry.user_name == "alice"));
}

#[test]
fn test_reports_over_store_state() {
    let mut store = store_with_user();
    let bearing = store.add_product(product_draft("bearing"), AUTHOR);
    let filter = store.add_product(product_draft("filter"), AUTHOR);

    store
        .add_movement(draft(bearing.id, 1, MovementKind::Entry, "10", "250"), AUTHOR)
        .unwrap();
    store
        .add_movement(draft(bearing.id, 2, MovementKind::Exit, "4", "0"), AUTHOR)
        .unwrap();
    store
        .add_movement(draft(filter.id, 3, MovementKind::Entry, "5", "30"), AUTHOR)
        .unwrap();

    // 6 x 250 + 5 x 30
    assert_eq!(total_stock_value(store.products()), d("1650"));

    let summary = movement_window_summary(&store.ledger(), at(1), at(3));
    assert_eq!(summary.movement_count, 3);
    assert_eq!(summary.incoming_value, d("2650"));
    assert_eq!(summary.outgoing_value, d("1000"));
}
