//! Payment Status

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// State of an order's payment, as reported by the payment provider.
///
/// The client never computes this value; it only reacts to what it is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentStatus {
    /// Payment was abandoned or expired.
    Canceled,

    /// The provider is still processing the payment.
    Processing,

    /// The customer must complete an extra step, e.g. authentication.
    #[serde(alias = "requires_action")]
    RequiresAction,

    /// The payment is authorised but not captured yet.
    #[serde(alias = "requires_capture")]
    RequiresCapture,

    /// The payment awaits confirmation.
    #[serde(alias = "requires_confirmation")]
    RequiresConfirmation,

    /// No usable payment method was provided yet.
    #[serde(alias = "requires_payment_method")]
    RequiresPaymentMethod,

    /// The payment went through.
    Succeeded,
}

impl PaymentStatus {
    /// Whether the payment went through.
    pub fn is_succeeded(self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Whether no further status change is expected.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Succeeded | Self::Canceled)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            Self::Canceled => "canceled",
            Self::Processing => "processing",
            Self::RequiresAction => "requiresAction",
            Self::RequiresCapture => "requiresCapture",
            Self::RequiresConfirmation => "requiresConfirmation",
            Self::RequiresPaymentMethod => "requiresPaymentMethod",
            Self::Succeeded => "succeeded",
        };

        f.write_str(label)
    }
}
