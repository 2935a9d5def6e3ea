//! Customer ordering flow.

use std::sync::Arc;

use jiff::Timestamp;
use tracing::{info, warn};

use comptoir::prelude::{
    BarStatus, Cart, CartStore, CartSubmission, Catalog, OrderId, SubmissionError, SubmitCart,
};

use crate::{
    errors::AppError,
    services::{CatalogService, CheckoutService},
    tracker::OrderTracker,
};

/// Order creation through a [`CheckoutService`].
#[derive(Clone, Copy)]
pub struct Submitter<'a>(pub &'a dyn CheckoutService);

impl SubmitCart for Submitter<'_> {
    async fn submit(&self, submission: &CartSubmission) -> Result<OrderId, SubmissionError> {
        self.0
            .validate_cart(submission)
            .await
            .map_err(SubmissionError::from)
    }
}

/// A catalog read that degrades to an empty snapshot.
#[derive(Debug)]
pub struct CatalogRead {
    /// What can be ordered; empty when the read failed.
    pub catalog: Catalog,

    /// Why the read failed, if it did.
    pub error: Option<AppError>,
}

/// What a customer goes through: browse, fill a cart, check out.
#[derive(Clone)]
pub struct Storefront {
    catalog: Arc<dyn CatalogService>,
    checkout: Arc<dyn CheckoutService>,
}

impl Storefront {
    /// Create a new storefront.
    pub fn new(catalog: Arc<dyn CatalogService>, checkout: Arc<dyn CheckoutService>) -> Self {
        Self { catalog, checkout }
    }

    /// The checkout collaborator, for tracking orders after creation.
    pub fn checkout_service(&self) -> &dyn CheckoutService {
        self.checkout.as_ref()
    }

    /// Reads the catalog. A failed read yields an empty catalog along with the error.
    pub async fn catalog(&self) -> CatalogRead {
        match self.fetch_catalog().await {
            Ok(catalog) => CatalogRead {
                catalog,
                error: None,
            },
            Err(error) => {
                warn!(%error, "catalog unavailable, nothing is orderable");

                CatalogRead {
                    catalog: Catalog::default(),
                    error: Some(error),
                }
            }
        }
    }

    async fn fetch_catalog(&self) -> Result<Catalog, AppError> {
        let records = self.catalog.products().await?;

        Ok(Catalog::try_from_records(records)?)
    }

    /// Reads the availability gate. An unreadable gate counts as closed.
    pub async fn bar_status(&self) -> BarStatus {
        self.catalog.bar_status().await.unwrap_or_else(|error| {
            warn!(%error, "bar status unavailable, treating the bar as closed");

            BarStatus::closed(None)
        })
    }

    /// Submits `cart`, opens its payment session and attaches `email` when given.
    ///
    /// # Errors
    ///
    /// - [`AppError::Bar`]: the bar is closed; nothing is submitted.
    /// - [`AppError::Cart`]: the cart is empty or was refused; the cart is left as it was.
    /// - [`AppError::PaymentSetup`]: the order was created, and the cart slot reset, but the
    ///   payment session or the email could not be set up. The error carries the order id.
    pub async fn checkout<S: CartStore>(
        &self,
        cart: &mut Cart<S>,
        email: Option<&str>,
    ) -> Result<OrderTracker, AppError> {
        self.bar_status().await.admit()?;

        let order = cart.validate(&Submitter(self.checkout.as_ref())).await?;

        info!(%order, total = %cart.formatted_total(), "order created");

        let mut tracker = OrderTracker::new(order, Timestamp::now());

        self.open_payment(&mut tracker, email)
            .await
            .map_err(|source| AppError::PaymentSetup {
                order,
                source: Box::new(source),
            })?;

        Ok(tracker)
    }

    async fn open_payment(
        &self,
        tracker: &mut OrderTracker,
        email: Option<&str>,
    ) -> Result<(), AppError> {
        let infos = self.checkout.payment_infos(tracker.order().id()).await?;
        tracker.attach_payment(infos);

        if let Some(email) = email {
            tracker.attach_email(self.checkout.as_ref(), email).await?;
        }

        Ok(())
    }
}
