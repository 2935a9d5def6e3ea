//! Cart Persistence
//!
//! The record a cart leaves in its store, and how a saved record is replayed against a fresh
//! catalog snapshot.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartElement,
    catalog::{ProductId, VariationId},
};

/// How long a persisted cart stays valid, in milliseconds.
pub const CART_LIFETIME_MS: i64 = 60 * 60 * 1000;

/// Errors raised while decoding a persisted cart.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The slot does not hold a cart record.
    #[error("malformed cart record")]
    Malformed(#[from] serde_json::Error),
}

/// Persisted cart record: `{ savedAt, cart }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    /// Epoch milliseconds of the write
    pub saved_at: i64,

    /// Saved selections
    pub cart: SavedCart,
}

/// Saved selections, in cart order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedCart {
    /// Saved elements
    pub elements: Vec<SavedElement>,
}

/// One saved selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedElement {
    /// Selected variation
    pub variation_id: VariationId,

    /// Product the variation belonged to when saved
    pub product_id: ProductId,

    /// Selected quantity
    pub quantity: u32,
}

impl PersistedCart {
    /// Captures the current quantities of `elements`.
    pub fn capture(elements: &[CartElement], saved_at: Timestamp) -> Self {
        Self {
            saved_at: saved_at.as_millisecond(),
            cart: SavedCart {
                elements: elements
                    .iter()
                    .map(|element| SavedElement {
                        variation_id: element.variation().id(),
                        product_id: element.product_id(),
                        quantity: element.quantity(),
                    })
                    .collect(),
            },
        }
    }

    /// Decodes the raw slot contents.
    ///
    /// An empty object is the reset state and decodes to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Malformed`] if the contents are neither empty nor a cart record.
    pub fn decode(raw: &str) -> Result<Option<Self>, PersistError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;

        if value.as_object().is_some_and(serde_json::Map::is_empty) {
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(value)?))
    }

    /// Encodes the record for the slot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Malformed`] if the record cannot be serialized.
    pub fn encode(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether more than [`CART_LIFETIME_MS`] has passed since the record was written.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.as_millisecond().saturating_sub(self.saved_at) > CART_LIFETIME_MS
    }

    /// Replays the saved quantities onto `elements`.
    ///
    /// Saved entries are matched by variation and visited in saved order. An entry is accepted
    /// only while its product still has stock for it; the first entry that does not fit closes
    /// that product for the rest of the replay. Entries whose variation is no longer orderable are
    /// skipped.
    pub fn reconcile(&self, elements: &mut [CartElement]) {
        let positions: FxHashMap<VariationId, usize> = elements
            .iter()
            .enumerate()
            .map(|(position, element)| (element.variation().id(), position))
            .collect();

        let mut consumed: FxHashMap<ProductId, Decimal> = FxHashMap::default();
        let mut closed: FxHashSet<ProductId> = FxHashSet::default();

        for saved in &self.cart.elements {
            let Some(element) = positions
                .get(&saved.variation_id)
                .and_then(|&position| elements.get_mut(position))
            else {
                debug!(variation = %saved.variation_id, "skipping saved variation no longer orderable");
                continue;
            };

            let product = element.product_id();

            if closed.contains(&product) {
                continue;
            }

            let used = consumed.entry(product).or_default();
            let needed = Decimal::from(saved.quantity) * element.variation().volume();

            if Decimal::from(element.stock_ceiling()) - *used - needed >= Decimal::ZERO {
                element.restore_quantity(saved.quantity);
                *used += needed;
            } else {
                debug!(
                    %product,
                    variation = %saved.variation_id,
                    quantity = saved.quantity,
                    "saved quantity exceeds remaining stock"
                );
                closed.insert(product);
            }
        }
    }
}
