use clap::{Args, Subcommand};

use comptoir::prelude::{Cart, CartElement, CartStore, Catalog, VariationId, format_price};
use comptoir_app::{
    config::StorageConfig, context::AppContext, errors::AppError, store::FileCartStore,
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show selected items and the total
    Show,

    /// Set the quantity of a variation, filling up to the remaining stock; omit it to reset
    Set {
        /// Variation id
        variation: u32,

        /// New quantity
        quantity: Option<u32>,
    },

    /// Add to the quantity of a variation, or remove with a negative delta
    Add {
        /// Variation id
        variation: u32,

        /// Quantity to add
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Empty the cart
    Clear,
}

pub(crate) async fn run(
    command: CartCommand,
    context: &AppContext,
    storage: &StorageConfig,
) -> Result<(), AppError> {
    let store = FileCartStore::new(&storage.cart_path);

    if matches!(command.command, CartSubcommand::Clear) {
        store.clear()?;
        println!("cart cleared");
        return Ok(());
    }

    let catalog = load_catalog(context).await;
    let mut cart = Cart::load(&catalog, store);

    match command.command {
        CartSubcommand::Show | CartSubcommand::Clear => {}
        CartSubcommand::Set {
            variation,
            quantity,
        } => {
            let set = cart.set_quantity(VariationId(variation), quantity)?;

            if quantity.is_some_and(|asked| asked > set) {
                println!("only {set} left in stock");
            }
        }
        CartSubcommand::Add { variation, delta } => add(&mut cart, VariationId(variation), delta)?,
    }

    print_cart(&cart);

    Ok(())
}

pub(crate) async fn load_catalog(context: &AppContext) -> Catalog {
    let read = context.storefront().catalog().await;

    if let Some(error) = read.error {
        eprintln!("catalog unavailable: {error}");
    }

    read.catalog
}

fn add<S: CartStore>(cart: &mut Cart<S>, variation: VariationId, delta: i64) -> Result<(), AppError> {
    if delta > 0 {
        let capacity = cart.remaining_capacity(variation)?;
        let current = cart.element(variation).map_or(0, CartElement::quantity);

        if i64::from(current).saturating_add(delta) > i64::from(capacity) {
            println!("only {capacity} fit in stock");
            return Ok(());
        }
    }

    if !cart.add(variation, delta)? {
        println!("quantity cannot go below zero");
    }

    Ok(())
}

pub(crate) fn print_cart<S: CartStore>(cart: &Cart<S>) {
    if !cart.has_items() {
        println!("cart is empty");
        return;
    }

    for (element, subtotal) in cart.elements_with_subtotal() {
        println!(
            "{:>3} x [{}] {}  {}",
            element.quantity(),
            element.variation().id(),
            element.item_name(),
            format_price(subtotal.to_minor_units()),
        );
    }

    println!("total: {}", cart.formatted_total());
}
