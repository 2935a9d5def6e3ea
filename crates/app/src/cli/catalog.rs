use comptoir::prelude::format_price;
use comptoir_app::{context::AppContext, errors::AppError};

pub(crate) async fn run(context: &AppContext) -> Result<(), AppError> {
    let storefront = context.storefront();

    if let Err(closed) = storefront.bar_status().await.admit() {
        println!("{closed}");
    }

    let read = storefront.catalog().await;

    if let Some(error) = read.error {
        eprintln!("catalog unavailable: {error}");
    }

    if read.catalog.is_empty() {
        println!("nothing to order right now");
        return Ok(());
    }

    for product in read.catalog.products() {
        println!("{} (stock {})", product.name(), product.stock_quantity());

        for variation in product.variations() {
            let availability = if variation.available_to_order() {
                ""
            } else {
                " (unavailable)"
            };

            println!(
                "  [{}] {}  {}{availability}",
                variation.id(),
                product.item_name(variation),
                format_price(variation.price_ttc_minor()),
            );
        }
    }

    Ok(())
}
