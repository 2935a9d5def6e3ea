//! Cart Submission
//!
//! What a cart sends to order creation, and the seam through which it is sent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{catalog::VariationId, orders::OrderId};

/// Reasons order creation refused or failed to take a cart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The backend refused the cart, e.g. not enough stock or the bar is closed.
    ///
    /// This verdict overrides any quantity the cart clamped locally.
    #[error("cart rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or answered with something unreadable.
    #[error("order creation unavailable: {0}")]
    Unavailable(String),
}

/// One requested line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedElement {
    /// Requested variation
    pub variation_id: VariationId,

    /// Requested quantity, never zero
    pub quantity: u32,
}

/// Body of a cart submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSubmission {
    /// Requested lines
    pub elements: Vec<SubmittedElement>,

    /// Purchaser email, when already known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Order creation.
pub trait SubmitCart {
    /// Turns a submitted cart into an order.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmissionError`] when the cart is refused or the backend is unreachable.
    async fn submit(&self, submission: &CartSubmission) -> Result<OrderId, SubmissionError>;
}
