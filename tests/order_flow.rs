//! Integration tests for the path from a cart to a served order

use jiff::Timestamp;
use rust_decimal::Decimal;
use testresult::TestResult;

use comptoir::prelude::*;

struct Backend {
    bar: BarStatus,
}

impl SubmitCart for Backend {
    async fn submit(&self, submission: &CartSubmission) -> Result<OrderId, SubmissionError> {
        if let Err(error) = self.bar.admit() {
            return Err(SubmissionError::Rejected(error.to_string()));
        }

        if submission.elements.is_empty() {
            return Err(SubmissionError::Rejected("empty order".to_string()));
        }

        Ok(OrderId(501))
    }
}

fn catalog() -> Result<Catalog, CatalogError> {
    Catalog::try_from_records([ProductRecord {
        id: ProductId(1),
        name: "Stout".to_string(),
        description: String::new(),
        stock_quantity: 12,
        variations: vec![
            VariationRecord {
                id: VariationId(1),
                name: "half".to_string(),
                product_id: ProductId(1),
                price_ht: 250,
                tva: Decimal::new(2, 1),
                volume: Decimal::new(5, 1),
                available_to_order: true,
            },
            VariationRecord {
                id: VariationId(2),
                name: "keg".to_string(),
                product_id: ProductId(1),
                price_ht: 9000,
                tva: Decimal::new(2, 1),
                volume: Decimal::from(30),
                available_to_order: false,
            },
        ],
    }])
}

#[tokio::test]
async fn successful_validate_leaves_next_cart_empty() -> TestResult {
    let catalog = catalog()?;
    let store = MemoryCartStore::new();

    let mut cart = Cart::load(&catalog, store.clone());
    cart.set_quantity(VariationId(1), Some(4))?;

    let order = cart
        .validate(&Backend {
            bar: BarStatus::open(),
        })
        .await?;

    assert_eq!(order, OrderId(501));

    let next = Cart::load(&catalog, store);

    assert!(!next.has_items());

    Ok(())
}

#[tokio::test]
async fn closed_bar_rejection_keeps_the_cart() -> TestResult {
    let catalog = catalog()?;
    let store = MemoryCartStore::new();

    let mut cart = Cart::load(&catalog, store.clone());
    cart.set_quantity(VariationId(1), Some(2))?;

    let result = cart
        .validate(&Backend {
            bar: BarStatus::closed(Some("Closed for a private event".to_string())),
        })
        .await;

    assert!(matches!(
        result,
        Err(CartError::Rejected(SubmissionError::Rejected(_)))
    ));

    let reloaded = Cart::load(&catalog, store);

    assert_eq!(
        reloaded.element(VariationId(1)).map(CartElement::quantity),
        Some(2)
    );

    Ok(())
}

#[test]
fn unavailable_variation_is_not_in_the_cart() -> TestResult {
    let cart = Cart::load(&catalog()?, MemoryCartStore::new());

    assert_eq!(cart.elements().len(), 1);
    assert!(cart.element(VariationId(2)).is_none());

    // Half pints consume half a unit each: 12 units fit 24 of them.
    assert_eq!(cart.remaining_capacity(VariationId(1))?, 24);

    Ok(())
}

#[tokio::test]
async fn order_follows_payment_then_service() -> TestResult {
    let catalog = catalog()?;
    let mut cart = Cart::load(&catalog, MemoryCartStore::new());
    cart.set_quantity(VariationId(1), Some(2))?;

    let id = cart
        .validate(&Backend {
            bar: BarStatus::open(),
        })
        .await?;

    let mut order = Order::created(id, Timestamp::now());
    order.attach_payment(PaymentInfos {
        client_secret: "pi_501_secret".to_string(),
        total_price: 600,
    });
    order.attach_email("guest@example.com");

    let pending = PaymentStatusReport {
        status: PaymentStatus::Processing,
        receipt: None,
        email: Some("guest@example.com".to_string()),
        detail: Vec::new(),
        total_price: 600,
    };

    assert_eq!(
        order.observe(pending)?,
        OrderStage::PaymentPending(PaymentStatus::Processing)
    );
    assert!(order.receipt_view().is_none());

    let paid = PaymentStatusReport {
        status: PaymentStatus::Succeeded,
        receipt: Some(Receipt::new("RCPT-501")),
        email: Some("guest@example.com".to_string()),
        detail: vec![LineItem {
            item_name: "Stout (half)".to_string(),
            quantity: 2,
            subtotal_ht: 500,
            subtotal_ttc: 600,
        }],
        total_price: 600,
    };

    assert_eq!(order.observe(paid)?, OrderStage::Succeeded);

    let view = order.receipt_view().ok_or("receipt should be available")?;

    assert_eq!(view.qr_payload(), "RCPT-501");
    assert_eq!(view.client_secret, Some("pi_501_secret"));
    assert_eq!(
        view.total().map(|total| total.to_string()),
        Some(cart.total().to_string())
    );

    assert_eq!(
        order.toggle_served(Actor::Customer),
        Err(OrderError::NotStaff)
    );
    assert!(order.toggle_served(Actor::Staff)?);
    assert_eq!(order.stage(), OrderStage::Served);

    Ok(())
}
