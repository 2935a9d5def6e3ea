use clap::Args;

use comptoir::prelude::{Cart, OrderId, OrderStage, format_price};
use comptoir_app::{
    config::StorageConfig,
    context::AppContext,
    errors::AppError,
    store::FileCartStore,
    tracker::{OrderTracker, RetrySchedule},
};

use crate::cli::cart::{load_catalog, print_cart};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Purchaser email, attached to the payment session
    #[arg(long)]
    email: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct StatusArgs {
    /// Order id printed by `checkout`
    #[arg(long)]
    order: u64,

    /// Payment session printed by `checkout`
    #[arg(long)]
    client_secret: String,

    /// Keep reading until the payment succeeds or is canceled
    #[arg(long)]
    wait: bool,
}

pub(crate) async fn checkout(
    args: CheckoutArgs,
    context: &AppContext,
    storage: &StorageConfig,
) -> Result<(), AppError> {
    let catalog = load_catalog(context).await;
    let mut cart = Cart::load(&catalog, FileCartStore::new(&storage.cart_path));

    print_cart(&cart);

    let tracker = context
        .storefront()
        .checkout(&mut cart, args.email.as_deref())
        .await?;

    let order = tracker.order();

    println!("order: {}", order.id());
    println!("client_secret: {}", order.client_secret().unwrap_or("-"));

    if let Some(total) = order.total() {
        println!("amount due: {}", format_price(total.to_minor_units()));
    }

    match context.checkout.publishable_key().await {
        Ok(key) => println!("publishable_key: {key}"),
        Err(error) => eprintln!("publishable key unavailable: {error}"),
    }

    Ok(())
}

pub(crate) async fn status(args: StatusArgs, context: &AppContext) -> Result<(), AppError> {
    let checkout = context.checkout.as_ref();
    let mut tracker = OrderTracker::resume(OrderId(args.order), args.client_secret);
    let mut schedule = RetrySchedule::default();

    let stage = loop {
        let stage = tracker.refresh(checkout).await?;

        if !args.wait || tracker.is_settled() {
            break stage;
        }

        match schedule.next() {
            Some(delay) => tokio::time::sleep(delay).await,
            None => break stage,
        }
    };

    println!("stage: {}", describe(stage));

    let Some(view) = tracker.order().receipt_view() else {
        return Ok(());
    };

    println!("receipt: {}", view.receipt);

    for item in view.line_items {
        println!(
            "{:>3} x {}  {}",
            item.quantity,
            item.item_name,
            format_price(item.subtotal_ttc)
        );
    }

    if let Some(total) = view.total {
        println!("total: {}", format_price(total));
    }

    println!("qr: {}", tracker.qr_code_url(checkout)?);

    Ok(())
}

fn describe(stage: OrderStage) -> String {
    match stage {
        OrderStage::Created => "created".to_string(),
        OrderStage::EmailAttached => "email attached".to_string(),
        OrderStage::PaymentPending(status) => format!("payment pending ({status})"),
        OrderStage::Succeeded => "paid".to_string(),
        OrderStage::Served => "served".to_string(),
    }
}
