//! Cart Elements

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    catalog::{Product, ProductId, Variation, line_item_name},
    pricing::money,
};

/// One orderable variation and the quantity selected for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartElement {
    product_id: ProductId,
    product_name: String,
    stock_ceiling: i64,
    variation: Variation,
    quantity: u32,
}

impl CartElement {
    /// Creates an element with a zero quantity.
    pub fn new(product: &Product, variation: &Variation) -> Self {
        Self {
            product_id: product.id(),
            product_name: product.name().to_string(),
            stock_ceiling: product.stock_quantity(),
            variation: variation.clone(),
            quantity: 0,
        }
    }

    /// Owning product
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Owning product's display name
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Stock shared with the other variations of the product
    pub fn stock_ceiling(&self) -> i64 {
        self.stock_ceiling
    }

    /// The selected variation
    pub fn variation(&self) -> &Variation {
        &self.variation
    }

    /// Selected quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Name shown on order lines.
    pub fn item_name(&self) -> String {
        line_item_name(&self.product_name, self.variation.name())
    }

    /// Stock units this element consumes from its product.
    pub fn consumed_stock(&self) -> Decimal {
        Decimal::from(self.quantity) * self.variation.volume()
    }

    /// Tax-inclusive price times quantity, saturating at the largest representable amount.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        money(self.subtotal_minor())
    }

    pub(crate) fn subtotal_minor(&self) -> i64 {
        self.variation
            .price_ttc_minor()
            .saturating_mul(i64::from(self.quantity))
    }

    /// Sets the quantity, filling up to `remaining_capacity` rather than refusing a larger value.
    ///
    /// `None` resets the quantity to zero. `remaining_capacity` is how many units of this variation
    /// still fit in the product's stock once the other variations are accounted for.
    pub fn set_quantity(&mut self, new_quantity: Option<u32>, remaining_capacity: u32) {
        self.quantity = new_quantity.map_or(0, |quantity| quantity.min(remaining_capacity));
    }

    /// Adds `delta` to the quantity.
    ///
    /// Returns `false` and leaves the quantity unchanged if the result would be negative. The
    /// stock ceiling is not checked here.
    pub fn add(&mut self, delta: i64) -> bool {
        let updated = i64::from(self.quantity)
            .checked_add(delta)
            .and_then(|quantity| u32::try_from(quantity).ok());

        match updated {
            Some(quantity) => {
                self.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub(crate) fn restore_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }
}
