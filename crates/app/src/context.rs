//! App Context

use std::sync::Arc;

use crate::{
    api::{ApiClient, ApiError},
    config::ApiConfig,
    services::{BarService, CatalogService, CheckoutService, StaffService},
    staff::StaffDesk,
    storefront::Storefront,
};

/// The backend collaborators, shared by every flow.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub staff: Arc<dyn StaffService>,
    pub bar: Arc<dyn BarService>,
}

impl AppContext {
    /// Build application context talking to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = ApiClient::new(config)?;

        Ok(Self {
            catalog: Arc::new(client.clone()),
            checkout: Arc::new(client.clone()),
            staff: Arc::new(client.clone()),
            bar: Arc::new(client),
        })
    }

    /// Customer ordering flow.
    pub fn storefront(&self) -> Storefront {
        Storefront::new(Arc::clone(&self.catalog), Arc::clone(&self.checkout))
    }

    /// Staff fulfilment flow.
    pub fn staff_desk(&self) -> StaffDesk {
        StaffDesk::new(Arc::clone(&self.staff))
    }
}
