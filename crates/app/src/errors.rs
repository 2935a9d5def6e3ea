//! Application errors.

use thiserror::Error;

use comptoir::prelude::{BarError, CartError, CartStoreError, CatalogError, OrderError, OrderId};

use crate::{api::ApiError, config::ConfigError, observability::ObservabilityError};

/// Errors surfaced by the client flows and the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// A backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The catalog read was inconsistent.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The cart could not be changed or submitted.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The local cart slot could not be used.
    #[error(transparent)]
    Store(#[from] CartStoreError),

    /// An order change was refused.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The bar refused the request.
    #[error(transparent)]
    Bar(#[from] BarError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be set up.
    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    /// The order was created but its payment session or email could not be set up.
    #[error("order {order} was created but its payment could not be set up")]
    PaymentSetup {
        /// Order that was created and can be resumed
        order: OrderId,

        /// What went wrong
        #[source]
        source: Box<AppError>,
    },

    /// No payment session was opened for the order.
    #[error("order {0} has no payment session")]
    NoPaymentSession(OrderId),

    /// The receipt is not available yet.
    #[error("order {0} has no receipt yet")]
    NoReceipt(OrderId),
}
