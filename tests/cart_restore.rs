//! Integration tests for restoring a cart from its store

use jiff::{Timestamp, ToSpan};
use rust_decimal::Decimal;
use testresult::TestResult;

use comptoir::{
    cart::persistence::{SavedCart, SavedElement},
    prelude::*,
};

fn variation(id: u32, product: u32, price_ht: i64, volume: i64) -> VariationRecord {
    VariationRecord {
        id: VariationId(id),
        name: format!("v{id}"),
        product_id: ProductId(product),
        price_ht,
        tva: Decimal::ZERO,
        volume: Decimal::from(volume),
        available_to_order: true,
    }
}

fn catalog() -> Result<Catalog, CatalogError> {
    Catalog::try_from_records([
        ProductRecord {
            id: ProductId(1),
            name: "Cider".to_string(),
            description: "Dry, on tap".to_string(),
            stock_quantity: 6,
            variations: vec![variation(10, 1, 300, 1), variation(11, 1, 1000, 4)],
        },
        ProductRecord {
            id: ProductId(2),
            name: "Peanuts".to_string(),
            description: String::new(),
            stock_quantity: 5,
            variations: vec![variation(20, 2, 250, 1)],
        },
    ])
}

fn record(saved_at: Timestamp, elements: &[(u32, u32, u32)]) -> Result<String, PersistError> {
    PersistedCart {
        saved_at: saved_at.as_millisecond(),
        cart: SavedCart {
            elements: elements
                .iter()
                .map(|&(variation_id, product_id, quantity)| SavedElement {
                    variation_id: VariationId(variation_id),
                    product_id: ProductId(product_id),
                    quantity,
                })
                .collect(),
        },
    }
    .encode()
}

fn quantities<S: CartStore>(cart: &Cart<S>) -> Vec<u32> {
    cart.elements().iter().map(CartElement::quantity).collect()
}

#[test]
fn cart_survives_reload_through_shared_store() -> TestResult {
    let catalog = catalog()?;
    let store = MemoryCartStore::new();

    let mut cart = Cart::load(&catalog, store.clone());
    cart.set_quantity(VariationId(10), Some(2))?;
    cart.add(VariationId(20), 3)?;

    let reloaded = Cart::load(&catalog, store);

    assert_eq!(quantities(&reloaded), vec![2, 0, 3]);
    assert_eq!(reloaded.formatted_total(), cart.formatted_total());

    Ok(())
}

#[test]
fn record_just_over_an_hour_old_is_ignored() -> TestResult {
    let now = Timestamp::from_millisecond(1_700_000_000_000)?;
    let saved_at = now.checked_sub(3_601_000.milliseconds())?;
    let store = MemoryCartStore::with_record(record(saved_at, &[(10, 1, 2), (20, 2, 1)])?);

    let cart = Cart::load_at(&catalog()?, store.clone(), now);

    assert_eq!(quantities(&cart), vec![0, 0, 0]);
    assert_eq!(store.load()?.as_deref(), Some("{}"));

    Ok(())
}

#[test]
fn record_exactly_an_hour_old_is_still_used() -> TestResult {
    let now = Timestamp::from_millisecond(1_700_000_000_000)?;
    let saved_at = now.checked_sub(CART_LIFETIME_MS.milliseconds())?;
    let store = MemoryCartStore::with_record(record(saved_at, &[(20, 2, 1)])?);

    let cart = Cart::load_at(&catalog()?, store, now);

    assert_eq!(quantities(&cart), vec![0, 0, 1]);

    Ok(())
}

#[test]
fn over_ceiling_record_is_honored_in_saved_order() -> TestResult {
    let now = Timestamp::from_millisecond(1_700_000_000_000)?;

    // Cider holds 6 units: 3 glasses fit, the 4-unit pitcher after them does not.
    let store = MemoryCartStore::with_record(record(now, &[(10, 1, 3), (11, 1, 1), (20, 2, 9)])?);

    let cart = Cart::load_at(&catalog()?, store, now);

    assert_eq!(quantities(&cart), vec![3, 0, 0]);

    Ok(())
}

#[test]
fn first_misfit_closes_the_product_for_later_entries() -> TestResult {
    let now = Timestamp::from_millisecond(1_700_000_000_000)?;

    // The pitcher (4) fits, then 3 glasses do not (4 + 3 > 6), and the 1 glass after them is
    // skipped although it would fit.
    let store = MemoryCartStore::with_record(record(now, &[(11, 1, 1), (10, 1, 3), (10, 1, 1)])?);

    let cart = Cart::load_at(&catalog()?, store, now);

    assert_eq!(quantities(&cart), vec![0, 1, 0]);

    let used: Decimal = cart
        .elements()
        .iter()
        .filter(|element| element.product_id() == ProductId(1))
        .map(CartElement::consumed_stock)
        .sum();

    assert!(used <= Decimal::from(6));

    Ok(())
}

#[test]
fn discontinued_variation_is_skipped() -> TestResult {
    let now = Timestamp::from_millisecond(1_700_000_000_000)?;
    let store = MemoryCartStore::with_record(record(now, &[(99, 1, 2), (20, 2, 2)])?);

    let cart = Cart::load_at(&catalog()?, store, now);

    assert_eq!(quantities(&cart), vec![0, 0, 2]);

    Ok(())
}

#[test]
fn corrupt_record_falls_back_to_empty_cart() -> TestResult {
    for raw in ["", "null", "{\"savedAt\": \"yesterday\"}", "[1, 2, 3]"] {
        let cart = Cart::load(&catalog()?, MemoryCartStore::with_record(raw));

        assert_eq!(quantities(&cart), vec![0, 0, 0], "record {raw:?}");
    }

    Ok(())
}

#[test]
fn missing_record_leaves_every_quantity_at_zero() -> TestResult {
    let cart = Cart::load(&catalog()?, MemoryCartStore::new());

    assert_eq!(quantities(&cart), vec![0, 0, 0]);
    assert!(!cart.has_items());

    Ok(())
}
