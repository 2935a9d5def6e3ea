//! Order tracking
//!
//! An [`OrderTracker`] carries one order through payment. Every read of the payment status is an
//! explicit call; waiting between reads is left to the caller, who can pace itself with a
//! [`RetrySchedule`].

use std::time::Duration;

use jiff::Timestamp;
use tracing::debug;

use comptoir::prelude::{Order, OrderId, OrderStage, PaymentInfos};

use crate::{errors::AppError, services::CheckoutService};

/// Follows one order from creation to a settled payment.
#[derive(Debug, Clone)]
pub struct OrderTracker {
    order: Order,
}

impl OrderTracker {
    /// Tracks a freshly created order.
    pub fn new(id: OrderId, created_at: Timestamp) -> Self {
        Self {
            order: Order::created(id, created_at),
        }
    }

    /// Tracks an order whose payment session is already known.
    pub fn resume(id: OrderId, client_secret: impl Into<String>) -> Self {
        let mut order = Order::known(id);
        order.attach_session(client_secret);

        Self { order }
    }

    /// The order as last observed.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Gives up tracking and returns the order.
    pub fn into_order(self) -> Order {
        self.order
    }

    /// Records the payment session opened for the order.
    pub fn attach_payment(&mut self, infos: PaymentInfos) {
        self.order.attach_payment(infos);
    }

    fn client_secret(&self) -> Result<&str, AppError> {
        self.order
            .client_secret()
            .ok_or(AppError::NoPaymentSession(self.order.id()))
    }

    /// Attaches the purchaser's email, locally only once the backend accepted it.
    ///
    /// # Errors
    ///
    /// Returns an error if no payment session is attached or the backend refuses the email.
    pub async fn attach_email(
        &mut self,
        checkout: &dyn CheckoutService,
        email: &str,
    ) -> Result<(), AppError> {
        checkout.set_email(self.client_secret()?, email).await?;

        self.order.attach_email(email);

        Ok(())
    }

    /// Reads the payment status once and applies it.
    ///
    /// # Errors
    ///
    /// Returns an error if no payment session is attached, the read fails, or the report is
    /// inconsistent. The order is left as it was in every case.
    pub async fn refresh(&mut self, checkout: &dyn CheckoutService) -> Result<OrderStage, AppError> {
        let report = checkout.payment_status(self.client_secret()?).await?;

        debug!(order = %self.order.id(), status = %report.status, "payment status observed");

        Ok(self.order.observe(report)?)
    }

    /// Whether the payment reached a status that will not change anymore.
    pub fn is_settled(&self) -> bool {
        self.order.status().is_some_and(|status| status.is_final())
    }

    /// Location of the receipt QR image.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoReceipt`] until the payment succeeded.
    pub fn qr_code_url(&self, checkout: &dyn CheckoutService) -> Result<String, AppError> {
        if self.order.receipt_view().is_none() {
            return Err(AppError::NoReceipt(self.order.id()));
        }

        Ok(checkout.qr_code_url(self.client_secret()?)?)
    }
}

/// Capped exponential backoff between status reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySchedule {
    next: Duration,
    max: Duration,
    remaining: u32,
}

impl RetrySchedule {
    /// `attempts` delays, starting at `initial` and doubling up to `max`.
    pub fn new(initial: Duration, max: Duration, attempts: u32) -> Self {
        Self {
            next: initial.min(max),
            max,
            remaining: attempts,
        }
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(8), 12)
    }
}

impl Iterator for RetrySchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.remaining = self.remaining.checked_sub(1)?;

        let delay = self.next;

        self.next = delay.checked_mul(2).unwrap_or(self.max).min(self.max);

        Some(delay)
    }
}
