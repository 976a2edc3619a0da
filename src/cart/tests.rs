use super::*;
use rust_decimal::Decimal;

fn dish(id: i64, cents: i64) -> NewCartItem {
    NewCartItem {
        id,
        name: format!("Dish {}", id),
        unit_price: Decimal::new(cents, 2),
        image: None,
    }
}

fn ready_store() -> CartStore {
    let mut store = CartStore::new();
    store.hydrate(None);
    store
}

// ========================================================================
// Mutation operations
// ========================================================================

#[test]
fn adding_same_id_twice_merges_into_one_line() {
    let mut store = ready_store();
    store.add_item(dish(1, 1250));
    store.add_item(dish(1, 1250));

    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].quantity, 2);
}

#[test]
fn adding_distinct_ids_appends_in_order() {
    let mut store = ready_store();
    store.add_item(dish(3, 900));
    store.add_item(dish(1, 1250));
    store.add_item(dish(2, 700));

    let ids: Vec<i64> = store.items().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert!(store.items().iter().all(|i| i.quantity == 1));
}

#[test]
fn remove_item_deletes_line_and_ignores_unknown_id() {
    let mut store = ready_store();
    store.add_item(dish(1, 1250));
    store.remove_item(1);
    assert!(store.items().is_empty());

    // no-op on absent id
    store.remove_item(42);
    assert!(store.items().is_empty());
}

#[test]
fn update_quantity_floors_at_zero_and_removes() {
    let mut store = ready_store();
    store.add_item(dish(1, 1250));
    store.update_quantity(1, 2);
    assert_eq!(store.items()[0].quantity, 3);

    store.update_quantity(1, -1);
    assert_eq!(store.items()[0].quantity, 2);

    // current + delta <= 0 → line is gone
    store.update_quantity(1, -5);
    assert!(store.items().iter().all(|i| i.id != 1));
}

#[test]
fn update_quantity_to_exactly_zero_removes() {
    let mut store = ready_store();
    store.add_item(dish(1, 1250));
    store.update_quantity(1, -1);
    assert!(store.items().is_empty());
}

#[test]
fn clear_empties_regardless_of_prior_state() {
    let mut store = ready_store();
    for id in 1..=5 {
        store.add_item(dish(id, 1000));
        store.update_quantity(id, 3);
    }
    store.clear();
    assert!(store.items().is_empty());
    assert_eq!(store.count(), 0);
    assert_eq!(store.total(), Decimal::ZERO);
}

#[test]
fn visibility_flag_has_no_business_effect() {
    let mut store = ready_store();
    store.add_item(dish(1, 1250));

    assert!(!store.is_open());
    store.toggle_open();
    assert!(store.is_open());
    store.set_open(false);
    assert!(!store.is_open());

    assert_eq!(store.items().len(), 1);
    assert_eq!(store.count(), 1);
}

// ========================================================================
// Derived queries
// ========================================================================

#[test]
fn total_and_count_match_derivation_after_any_sequence() {
    let mut store = ready_store();
    store.add_item(dish(1, 1250)); // 12.50 x1
    store.add_item(dish(2, 800)); // 8.00 x1
    store.add_item(dish(1, 1250)); // 12.50 x2
    store.update_quantity(2, 4); // 8.00 x5
    store.remove_item(99); // no-op
    store.update_quantity(1, -1); // 12.50 x1

    let expected_total: Decimal = store
        .items()
        .iter()
        .map(|i| i.unit_price * Decimal::from(i.quantity))
        .sum();
    let expected_count: u64 = store.items().iter().map(|i| u64::from(i.quantity)).sum();

    assert_eq!(store.total(), expected_total);
    assert_eq!(store.total(), Decimal::new(5250, 2));
    assert_eq!(store.count(), expected_count);
    assert_eq!(store.count(), 6);
}

// ========================================================================
// Hydration lifecycle
// ========================================================================

#[test]
fn store_starts_not_ready_and_hydrates_once() {
    let mut store = CartStore::new();
    assert!(!store.is_ready());

    store.hydrate(Some(CartSnapshot {
        items: vec![CartLineItem {
            id: 7,
            name: "Soupe".into(),
            unit_price: Decimal::new(650, 2),
            image: None,
            quantity: 2,
        }],
        is_open: true,
    }));
    assert!(store.is_ready());
    assert_eq!(store.count(), 2);
    assert!(store.is_open());

    // Second hydrate is ignored
    store.hydrate(Some(CartSnapshot::default()));
    assert_eq!(store.count(), 2);
}

// ========================================================================
// Persistence through the manager
// ========================================================================

#[test]
fn manager_persists_and_rehydrates_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("carts.redb");

    {
        let manager = CartManager::with_storage(CartStorage::open(&path).unwrap());
        manager
            .mutate("cart-a", |store| {
                store.add_item(dish(1, 1250));
                store.add_item(dish(1, 1250));
                store.set_open(true);
            })
            .unwrap();
    }

    // Fresh manager over the same file: snapshot comes back
    let manager = CartManager::with_storage(CartStorage::open(&path).unwrap());
    let snapshot = manager.view("cart-a").unwrap();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].quantity, 2);
    assert!(snapshot.is_open);

    // Unknown cart hydrates to empty defaults
    let empty = manager.view("cart-b").unwrap();
    assert!(empty.items.is_empty());
    assert!(!empty.is_open);
}

#[test]
fn manager_clear_persists_empty_sequence() {
    let manager = CartManager::with_storage(CartStorage::open_in_memory().unwrap());
    manager
        .mutate("cart-a", |store| {
            store.add_item(dish(1, 1250));
            store.add_item(dish(2, 800));
        })
        .unwrap();
    manager.mutate("cart-a", |store| store.clear()).unwrap();

    let snapshot = manager.view("cart-a").unwrap();
    assert!(snapshot.items.is_empty());
}
