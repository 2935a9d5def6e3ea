//! Cart
//!
//! A cart holds one element per orderable variation of the catalog snapshot it was built from.
//! Every change of quantity is written through to the cart's store, and a new cart replays the
//! stored quantities against its own, newer snapshot.

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::{Catalog, VariationId},
    orders::OrderId,
    pricing::{format_price, money},
};

mod element;
pub mod persistence;
pub mod store;
pub mod submission;

pub use element::CartElement;

use persistence::PersistedCart;
use store::{CartStore, MemoryCartStore};
use submission::{CartSubmission, SubmissionError, SubmitCart, SubmittedElement};

/// Errors related to cart operations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The variation is not part of this cart.
    #[error("variation {0} is not in the cart")]
    UnknownVariation(VariationId),

    /// Nothing is selected, so there is nothing to submit.
    #[error("the cart is empty")]
    Empty,

    /// Order creation refused or failed to take the cart. The cart is left as it was.
    #[error(transparent)]
    Rejected(#[from] SubmissionError),
}

/// Cart
#[derive(Debug)]
pub struct Cart<S: CartStore = MemoryCartStore> {
    elements: Vec<CartElement>,
    store: S,
}

impl<S: CartStore> Cart<S> {
    /// Builds a cart from `catalog` and seeds it from the store's record.
    pub fn load(catalog: &Catalog, store: S) -> Self {
        Self::load_at(catalog, store, Timestamp::now())
    }

    /// Builds a cart from `catalog` and seeds it from the store's record, as of `now`.
    ///
    /// A missing, reset, expired or unreadable record leaves every quantity at zero.
    pub fn load_at(catalog: &Catalog, store: S, now: Timestamp) -> Self {
        let mut cart = Self::empty(catalog, store);

        if let Some(record) = cart.read_record() {
            if record.is_expired(now) {
                debug!(saved_at = record.saved_at, "discarding expired cart record");
                cart.reset_store();
            } else {
                record.reconcile(&mut cart.elements);
            }
        }

        cart
    }

    /// Builds a cart from `catalog` with every quantity at zero, ignoring the store's record.
    pub fn empty(catalog: &Catalog, store: S) -> Self {
        Self {
            elements: catalog
                .orderable()
                .map(|(product, variation)| CartElement::new(product, variation))
                .collect(),
            store,
        }
    }

    /// Elements, in catalog order.
    pub fn elements(&self) -> &[CartElement] {
        &self.elements
    }

    /// Looks up the element for a variation.
    pub fn element(&self, variation: VariationId) -> Option<&CartElement> {
        self.elements
            .iter()
            .find(|element| element.variation().id() == variation)
    }

    /// The cart's store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether at least one element has a non-zero quantity.
    pub fn has_items(&self) -> bool {
        self.elements.iter().any(|element| element.quantity() > 0)
    }

    /// How many more units of `variation` fit in its product's stock, given what the other
    /// variations of the same product already hold.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownVariation`] if the variation is not in the cart.
    pub fn remaining_capacity(&self, variation: VariationId) -> Result<u32, CartError> {
        let target = self
            .element(variation)
            .ok_or(CartError::UnknownVariation(variation))?;

        let committed_elsewhere: Decimal = self
            .elements
            .iter()
            .filter(|element| {
                element.product_id() == target.product_id()
                    && element.variation().id() != variation
            })
            .map(CartElement::consumed_stock)
            .sum();

        let available = Decimal::from(target.stock_ceiling()) - committed_elsewhere;
        let volume = target.variation().volume();

        if available <= Decimal::ZERO {
            return Ok(0);
        }

        if volume <= Decimal::ZERO {
            return Ok(u32::MAX);
        }

        Ok((available / volume).floor().to_u32().unwrap_or(u32::MAX))
    }

    /// Sets the quantity of `variation`, filling up to the remaining stock if more is asked for.
    ///
    /// `None` resets the quantity to zero. Returns the quantity actually set.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownVariation`] if the variation is not in the cart.
    pub fn set_quantity(
        &mut self,
        variation: VariationId,
        quantity: Option<u32>,
    ) -> Result<u32, CartError> {
        let capacity = self.remaining_capacity(variation)?;
        let element = self.element_mut(variation)?;

        element.set_quantity(quantity, capacity);
        let quantity = element.quantity();

        self.persist();

        Ok(quantity)
    }

    /// Adds `delta` to the quantity of `variation`.
    ///
    /// Returns `false` if the result would be negative, in which case nothing changes. The stock
    /// ceiling is not checked; use [`Cart::remaining_capacity`] first when increasing freely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownVariation`] if the variation is not in the cart.
    pub fn add(&mut self, variation: VariationId, delta: i64) -> Result<bool, CartError> {
        let applied = self.element_mut(variation)?.add(delta);

        if applied {
            self.persist();
        }

        Ok(applied)
    }

    /// Every element with a non-zero quantity, with its subtotal.
    ///
    /// The iterator is lazy and can be cloned to walk the selection again.
    pub fn elements_with_subtotal(
        &self,
    ) -> impl Iterator<Item = (&CartElement, Money<'static, Currency>)> + Clone + '_ {
        self.elements
            .iter()
            .filter(|element| element.quantity() != 0)
            .map(|element| (element, element.subtotal()))
    }

    /// Sum of every subtotal, saturating at the largest representable amount.
    pub fn total(&self) -> Money<'static, Currency> {
        money(self.total_minor())
    }

    /// Total formatted for display, e.g. `"15.00 €"`.
    pub fn formatted_total(&self) -> String {
        format_price(self.total_minor())
    }

    fn total_minor(&self) -> i64 {
        self.elements
            .iter()
            .map(CartElement::subtotal_minor)
            .fold(0, i64::saturating_add)
    }

    /// What would be sent to order creation, `None` when nothing is selected.
    pub fn submission(&self, email: Option<String>) -> Option<CartSubmission> {
        if !self.has_items() {
            return None;
        }

        Some(CartSubmission {
            elements: self
                .elements
                .iter()
                .filter(|element| element.quantity() > 0)
                .map(|element| SubmittedElement {
                    variation_id: element.variation().id(),
                    quantity: element.quantity(),
                })
                .collect(),
            email,
        })
    }

    /// Submits the cart to order creation.
    ///
    /// On success the stored record is reset, so the next cart built from the same store starts
    /// empty. On failure nothing changes and the cart can be adjusted and submitted again.
    ///
    /// # Errors
    ///
    /// - [`CartError::Empty`]: nothing is selected; no submission is made.
    /// - [`CartError::Rejected`]: order creation refused or failed to take the cart.
    pub async fn validate(&mut self, submitter: &impl SubmitCart) -> Result<OrderId, CartError> {
        let submission = self.submission(None).ok_or(CartError::Empty)?;

        let order = submitter.submit(&submission).await?;

        self.reset_store();

        Ok(order)
    }

    fn element_mut(&mut self, variation: VariationId) -> Result<&mut CartElement, CartError> {
        self.elements
            .iter_mut()
            .find(|element| element.variation().id() == variation)
            .ok_or(CartError::UnknownVariation(variation))
    }

    fn read_record(&self) -> Option<PersistedCart> {
        let raw = match self.store.load() {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(%error, "could not read cart record");
                return None;
            }
        };

        match PersistedCart::decode(&raw) {
            Ok(record) => record,
            Err(error) => {
                warn!(%error, "discarding unreadable cart record");
                None
            }
        }
    }

    fn persist(&self) {
        let record = PersistedCart::capture(&self.elements, Timestamp::now());

        let written = record
            .encode()
            .map_err(|error| error.to_string())
            .and_then(|raw| self.store.save(&raw).map_err(|error| error.to_string()));

        if let Err(error) = written {
            warn!(%error, "could not write cart record");
        }
    }

    fn reset_store(&self) {
        if let Err(error) = self.store.clear() {
            warn!(%error, "could not reset cart record");
        }
    }
}
