//! Backend collaborators consumed by the ordering and staff flows.

use async_trait::async_trait;
use mockall::automock;

use comptoir::prelude::{
    BarOpening, BarStatus, CartSubmission, OrderId, PaymentInfos, PaymentStatusReport,
    ProductRecord, Receipt, StaffOrderRecord,
};

use crate::api::ApiError;

/// Customer-side reads of what can be ordered.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Products with their variations, as currently stocked.
    async fn products(&self) -> Result<Vec<ProductRecord>, ApiError>;

    /// Whether the bar takes orders right now.
    async fn bar_status(&self) -> Result<BarStatus, ApiError>;
}

/// Order creation and payment.
#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Turns a cart into an order.
    async fn validate_cart(&self, submission: &CartSubmission) -> Result<OrderId, ApiError>;

    /// Opens a payment session for an order.
    async fn payment_infos(&self, order: OrderId) -> Result<PaymentInfos, ApiError>;

    /// Attaches the purchaser's email to the payment session.
    async fn set_email(&self, client_secret: &str, email: &str) -> Result<(), ApiError>;

    /// Reads the payment status of a session.
    async fn payment_status(&self, client_secret: &str) -> Result<PaymentStatusReport, ApiError>;

    /// Publishable key of the hosted payment element.
    async fn publishable_key(&self) -> Result<String, ApiError>;

    /// Location of the receipt QR image for a session. No request is made.
    fn qr_code_url(&self, client_secret: &str) -> Result<String, ApiError>;
}

/// Staff access to orders.
#[automock]
#[async_trait]
pub trait StaffService: Send + Sync {
    /// Every order.
    async fn orders(&self) -> Result<Vec<StaffOrderRecord>, ApiError>;

    /// The order a receipt was issued for.
    async fn order_by_receipt(&self, receipt: &Receipt) -> Result<StaffOrderRecord, ApiError>;

    /// Records whether an order was served.
    async fn set_served(&self, order: OrderId, served: bool) -> Result<(), ApiError>;
}

/// Staff management of the availability gate.
#[automock]
#[async_trait]
pub trait BarService: Send + Sync {
    /// Gate state including the current opening time.
    async fn status(&self) -> Result<BarStatus, ApiError>;

    /// Opens the bar.
    async fn open(&self) -> Result<(), ApiError>;

    /// Closes the bar.
    async fn close(&self) -> Result<(), ApiError>;

    /// Sets the message shown to customers while closed.
    async fn set_closing_message(&self, message: &str) -> Result<(), ApiError>;

    /// Recorded openings, oldest first.
    async fn openings(&self) -> Result<Vec<BarOpening>, ApiError>;
}
