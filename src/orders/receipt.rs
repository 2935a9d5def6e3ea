//! Receipts

use std::fmt::{Display, Formatter, Result as FmtResult};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    orders::{LineItem, OrderId},
    pricing::money,
};

/// Receipt code, issued once payment succeeds and used by staff to find the order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Receipt(String);

impl Receipt {
    /// Wraps a receipt code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code itself, which is also what the QR code encodes.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Receipt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<String> for Receipt {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// What a customer is shown once their payment succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptView<'a> {
    /// Order the receipt belongs to
    pub order: OrderId,

    /// Receipt code
    pub receipt: &'a Receipt,

    /// Payment session reference the QR resource is derived from
    pub client_secret: Option<&'a str>,

    /// Purchased lines
    pub line_items: &'a [LineItem],

    /// Charged total in minor units
    pub total: Option<i64>,
}

impl ReceiptView<'_> {
    /// Charged total, when known.
    pub fn total(&self) -> Option<Money<'static, Currency>> {
        self.total.map(money)
    }

    /// Payload encoded in the receipt's QR code.
    pub fn qr_payload(&self) -> &str {
        self.receipt.as_str()
    }
}
