//! Orders
//!
//! The client's view of an order. The backend and the payment provider own the order; the client
//! only records what it has observed of it, so every stage here is derived from observed fields
//! and never guessed.

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::money;

pub mod receipt;
pub mod status;

use receipt::{Receipt, ReceiptView};
use status::PaymentStatus;

/// Order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Errors related to order transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Only staff may change whether an order was served.
    #[error("only staff can change the served flag")]
    NotStaff,

    /// An order cannot be served before its payment succeeded.
    #[error("order {0} has not been paid")]
    NotPaid(OrderId),

    /// A status report carried a receipt although the payment did not succeed.
    #[error("receipt reported with payment status {0}")]
    ReceiptWithoutSuccess(PaymentStatus),
}

/// Who is acting on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The person who placed the order
    Customer,

    /// Bar staff
    Staff,
}

/// Stage of an order, as far as the client has observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    /// The order exists but no email is attached yet.
    Created,

    /// The purchaser's email is attached, no payment status observed yet.
    EmailAttached,

    /// A payment status other than success was observed.
    PaymentPending(PaymentStatus),

    /// Payment succeeded; the receipt can be shown.
    Succeeded,

    /// Staff marked the order as served.
    Served,
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product and variation name
    #[serde(alias = "name")]
    pub item_name: String,

    /// Purchased quantity
    pub quantity: u32,

    /// Pre-tax subtotal in minor units
    pub subtotal_ht: i64,

    /// Tax-inclusive subtotal in minor units
    pub subtotal_ttc: i64,
}

impl LineItem {
    /// Tax-inclusive subtotal
    pub fn subtotal(&self) -> Money<'static, Currency> {
        money(self.subtotal_ttc)
    }
}

/// Payment session details for a freshly created order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfos {
    /// Payment session reference used by the hosted payment element
    pub client_secret: String,

    /// Amount to be charged in minor units
    pub total_price: i64,
}

/// Payment status read for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusReport {
    /// Current payment status
    pub status: PaymentStatus,

    /// Receipt code, only once the payment succeeded
    #[serde(default)]
    pub receipt: Option<Receipt>,

    /// Purchaser email, if attached
    #[serde(default)]
    pub email: Option<String>,

    /// Purchased lines
    #[serde(default)]
    pub detail: Vec<LineItem>,

    /// Charged total in minor units
    pub total_price: i64,
}

/// Order as listed to staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffOrderRecord {
    /// Order identifier
    pub id: OrderId,

    /// Creation time
    #[serde(with = "crate::time")]
    pub timestamp: Timestamp,

    /// Purchaser email
    #[serde(default)]
    pub user_email: Option<String>,

    /// Receipt code
    #[serde(default)]
    pub receipt: Option<Receipt>,

    /// Payment provider reference
    pub payment_intent_id: String,

    /// Whether the order was served
    pub served: bool,
}

/// Order
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    created_at: Option<Timestamp>,
    email: Option<String>,
    client_secret: Option<String>,
    payment_intent_id: Option<String>,
    status: Option<PaymentStatus>,
    receipt: Option<Receipt>,
    served: bool,
    line_items: Vec<LineItem>,
    total: Option<i64>,
}

impl Order {
    /// An order just returned by order creation.
    pub fn created(id: OrderId, created_at: Timestamp) -> Self {
        Self {
            created_at: Some(created_at),
            ..Self::known(id)
        }
    }

    /// An order known only by its identifier, e.g. when resuming one created elsewhere.
    pub fn known(id: OrderId) -> Self {
        Self {
            id,
            created_at: None,
            email: None,
            client_secret: None,
            payment_intent_id: None,
            status: None,
            receipt: None,
            served: false,
            line_items: Vec::new(),
            total: None,
        }
    }

    /// An order as listed to staff.
    ///
    /// Receipts are only issued for succeeded payments, so a record carrying one is known to be
    /// paid.
    pub fn from_staff_record(record: StaffOrderRecord) -> Self {
        let status = record
            .receipt
            .as_ref()
            .map(|_receipt| PaymentStatus::Succeeded);

        Self {
            id: record.id,
            created_at: Some(record.timestamp),
            email: record.user_email,
            client_secret: None,
            payment_intent_id: Some(record.payment_intent_id),
            status,
            receipt: record.receipt,
            served: record.served,
            line_items: Vec::new(),
            total: None,
        }
    }

    /// Order identifier
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Creation time, when it was observed
    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    /// Purchaser email
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Payment session reference
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// Payment provider reference
    pub fn payment_intent_id(&self) -> Option<&str> {
        self.payment_intent_id.as_deref()
    }

    /// Last observed payment status
    pub fn status(&self) -> Option<PaymentStatus> {
        self.status
    }

    /// Whether the order was served
    pub fn served(&self) -> bool {
        self.served
    }

    /// Purchased lines, as last reported
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Charged total, as last reported
    pub fn total(&self) -> Option<Money<'static, Currency>> {
        self.total.map(money)
    }

    /// Current stage, derived from what has been observed.
    pub fn stage(&self) -> OrderStage {
        if self.served {
            return OrderStage::Served;
        }

        match self.status {
            Some(PaymentStatus::Succeeded) => OrderStage::Succeeded,
            Some(status) => OrderStage::PaymentPending(status),
            None if self.email.is_some() => OrderStage::EmailAttached,
            None => OrderStage::Created,
        }
    }

    /// Records the payment session opened for this order.
    pub fn attach_payment(&mut self, infos: PaymentInfos) {
        self.attach_session(infos.client_secret);
        self.total = Some(infos.total_price);
    }

    /// Records the payment session reference alone, e.g. when resuming a known session.
    pub fn attach_session(&mut self, client_secret: impl Into<String>) {
        self.client_secret = Some(client_secret.into());
    }

    /// Records the purchaser's email.
    pub fn attach_email(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
    }

    /// Applies an observed payment status report and returns the resulting stage.
    ///
    /// Applying the same report twice leaves the order as it was after the first time.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::ReceiptWithoutSuccess`] when the report carries a receipt for a
    /// payment that did not succeed; the order is left unchanged.
    pub fn observe(&mut self, report: PaymentStatusReport) -> Result<OrderStage, OrderError> {
        if report.receipt.is_some() && !report.status.is_succeeded() {
            return Err(OrderError::ReceiptWithoutSuccess(report.status));
        }

        self.status = Some(report.status);
        self.total = Some(report.total_price);
        self.line_items = report.detail;

        if let Some(email) = report.email {
            self.email = Some(email);
        }

        if let Some(receipt) = report.receipt {
            self.receipt = Some(receipt);
        }

        Ok(self.stage())
    }

    /// The receipt, available only once the payment succeeded.
    pub fn receipt_view(&self) -> Option<ReceiptView<'_>> {
        if !self.status.is_some_and(PaymentStatus::is_succeeded) {
            return None;
        }

        let receipt = self.receipt.as_ref()?;

        Some(ReceiptView {
            order: self.id,
            receipt,
            client_secret: self.client_secret.as_deref(),
            line_items: &self.line_items,
            total: self.total,
        })
    }

    /// The receipt code, available only once the payment succeeded.
    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt_view().map(|view| view.receipt)
    }

    /// Sets whether the order was served and returns whether the flag changed.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotStaff`]: the actor is not staff.
    /// - [`OrderError::NotPaid`]: marking an unpaid order as served.
    pub fn set_served(&mut self, served: bool, actor: Actor) -> Result<bool, OrderError> {
        if actor != Actor::Staff {
            return Err(OrderError::NotStaff);
        }

        if served && self.receipt().is_none() {
            return Err(OrderError::NotPaid(self.id));
        }

        let changed = self.served != served;
        self.served = served;

        Ok(changed)
    }

    /// Flips the served flag and returns its new value.
    ///
    /// # Errors
    ///
    /// See [`Order::set_served`].
    pub fn toggle_served(&mut self, actor: Actor) -> Result<bool, OrderError> {
        let served = !self.served;

        self.set_served(served, actor)?;

        Ok(served)
    }

    /// Whether two reads describe the same order, ignoring the served flag.
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Self {
            served: other.served,
            ..self.clone()
        } == *other
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn report(status: PaymentStatus, receipt: Option<&str>) -> PaymentStatusReport {
        PaymentStatusReport {
            status,
            receipt: receipt.map(Receipt::new),
            email: Some("guest@example.com".to_string()),
            detail: vec![LineItem {
                item_name: "Lager (pint)".to_string(),
                quantity: 2,
                subtotal_ht: 250,
                subtotal_ttc: 300,
            }],
            total_price: 300,
        }
    }

    fn paid_order() -> Result<Order, OrderError> {
        let mut order = Order::created(OrderId(1), Timestamp::UNIX_EPOCH);
        order.observe(report(PaymentStatus::Succeeded, Some("r-1")))?;

        Ok(order)
    }

    #[test]
    fn stages_follow_observed_fields() -> TestResult {
        let mut order = Order::created(OrderId(1), Timestamp::UNIX_EPOCH);
        assert_eq!(order.stage(), OrderStage::Created);

        order.attach_payment(PaymentInfos {
            client_secret: "pi_secret".to_string(),
            total_price: 300,
        });
        assert_eq!(order.stage(), OrderStage::Created);

        order.attach_email("guest@example.com");
        assert_eq!(order.stage(), OrderStage::EmailAttached);

        let stage = order.observe(report(PaymentStatus::Processing, None))?;
        assert_eq!(stage, OrderStage::PaymentPending(PaymentStatus::Processing));

        let stage = order.observe(report(PaymentStatus::Succeeded, Some("r-1")))?;
        assert_eq!(stage, OrderStage::Succeeded);

        Ok(())
    }

    #[test]
    fn status_without_email_is_not_reported_as_email_attached() -> TestResult {
        let mut order = Order::created(OrderId(1), Timestamp::UNIX_EPOCH);
        let mut processing = report(PaymentStatus::RequiresPaymentMethod, None);
        processing.email = None;

        let stage = order.observe(processing)?;

        assert_eq!(
            stage,
            OrderStage::PaymentPending(PaymentStatus::RequiresPaymentMethod)
        );
        assert_eq!(order.email(), None);

        Ok(())
    }

    #[test]
    fn receipt_is_hidden_until_success() -> TestResult {
        let mut order = Order::created(OrderId(1), Timestamp::UNIX_EPOCH);

        for status in [
            PaymentStatus::Canceled,
            PaymentStatus::Processing,
            PaymentStatus::RequiresAction,
            PaymentStatus::RequiresCapture,
            PaymentStatus::RequiresConfirmation,
            PaymentStatus::RequiresPaymentMethod,
        ] {
            order.observe(report(status, None))?;

            assert!(order.receipt_view().is_none(), "receipt shown for {status}");
        }

        order.observe(report(PaymentStatus::Succeeded, Some("r-1")))?;

        let view = order.receipt_view().ok_or("receipt should be visible")?;

        assert_eq!(view.qr_payload(), "r-1");
        assert_eq!(view.total(), Some(money(300)));
        assert_eq!(view.line_items.len(), 1);

        Ok(())
    }

    #[test]
    fn receipt_with_unsuccessful_status_is_refused() {
        let mut order = Order::created(OrderId(1), Timestamp::UNIX_EPOCH);
        let before = order.clone();

        let result = order.observe(report(PaymentStatus::Processing, Some("r-1")));

        assert_eq!(
            result,
            Err(OrderError::ReceiptWithoutSuccess(PaymentStatus::Processing))
        );
        assert_eq!(order, before);
    }

    #[test]
    fn observing_the_same_report_twice_is_stable() -> TestResult {
        let mut order = paid_order()?;
        let once = order.clone();

        order.observe(report(PaymentStatus::Succeeded, Some("r-1")))?;

        assert_eq!(order, once);

        Ok(())
    }

    #[test]
    fn customers_cannot_set_served() -> TestResult {
        let mut order = paid_order()?;

        assert_eq!(
            order.set_served(true, Actor::Customer),
            Err(OrderError::NotStaff)
        );
        assert!(!order.served());

        Ok(())
    }

    #[test]
    fn unpaid_order_cannot_be_served() {
        let mut order = Order::created(OrderId(4), Timestamp::UNIX_EPOCH);

        assert_eq!(
            order.set_served(true, Actor::Staff),
            Err(OrderError::NotPaid(OrderId(4)))
        );
    }

    #[test]
    fn set_served_reports_only_real_changes() -> TestResult {
        let mut order = paid_order()?;

        assert!(order.set_served(true, Actor::Staff)?);
        assert!(!order.set_served(true, Actor::Staff)?);
        assert_eq!(order.stage(), OrderStage::Served);

        Ok(())
    }

    #[test]
    fn toggling_served_twice_restores_the_flag() -> TestResult {
        let mut order = paid_order()?;
        let original = order.served();

        order.toggle_served(Actor::Staff)?;
        order.toggle_served(Actor::Staff)?;

        assert_eq!(order.served(), original);

        Ok(())
    }

    #[test]
    fn same_snapshot_ignores_served() -> TestResult {
        let first = paid_order()?;
        let mut second = first.clone();
        second.set_served(true, Actor::Staff)?;

        assert!(first.same_snapshot(&second));

        second.attach_email("other@example.com");

        assert!(!first.same_snapshot(&second));

        Ok(())
    }

    #[test]
    fn staff_record_with_receipt_is_paid() -> TestResult {
        let record: StaffOrderRecord = serde_json::from_str(
            r#"{
                "id": 9,
                "timestamp": 1700000000000,
                "user_email": "guest@example.com",
                "receipt": "r-9",
                "payment_intent_id": "pi_9",
                "served": false
            }"#,
        )?;

        let order = Order::from_staff_record(record);

        assert_eq!(order.stage(), OrderStage::Succeeded);
        assert_eq!(order.receipt().map(Receipt::as_str), Some("r-9"));
        assert_eq!(order.payment_intent_id(), Some("pi_9"));
        assert_eq!(
            order.created_at(),
            Some(Timestamp::from_millisecond(1_700_000_000_000)?)
        );

        Ok(())
    }

    #[test]
    fn payment_status_report_parses_backend_json() -> TestResult {
        let report: PaymentStatusReport = serde_json::from_str(
            r#"{
                "status": "succeeded",
                "receipt": "r-2",
                "email": null,
                "detail": [{
                    "item_name": "Stout",
                    "quantity": 1,
                    "tva": 0.2,
                    "subtotal_ht": 500,
                    "subtotal_ttc": 600
                }],
                "total_price": 600
            }"#,
        )?;

        assert_eq!(report.status, PaymentStatus::Succeeded);
        assert_eq!(report.receipt, Some(Receipt::new("r-2")));
        assert_eq!(report.detail.first().map(LineItem::subtotal), Some(money(600)));

        Ok(())
    }
}
