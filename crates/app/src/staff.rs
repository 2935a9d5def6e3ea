//! Staff fulfilment flow.

use std::sync::Arc;

use tracing::info;

use comptoir::prelude::{Actor, Order, Receipt};

use crate::{errors::AppError, services::StaffService};

/// What staff go through: find an order by its receipt, hand it over, mark it served.
#[derive(Clone)]
pub struct StaffDesk {
    staff: Arc<dyn StaffService>,
}

impl StaffDesk {
    /// Create a new desk.
    pub fn new(staff: Arc<dyn StaffService>) -> Self {
        Self { staff }
    }

    /// Every order, as listed to staff.
    ///
    /// # Errors
    ///
    /// Returns an error if the orders cannot be read.
    pub async fn orders(&self) -> Result<Vec<Order>, AppError> {
        let records = self.staff.orders().await?;

        Ok(records.into_iter().map(Order::from_staff_record).collect())
    }

    /// The order a receipt was issued for. Reading it twice gives the same order.
    ///
    /// # Errors
    ///
    /// Returns an error if no order carries the receipt or the read fails.
    pub async fn lookup(&self, receipt: &Receipt) -> Result<Order, AppError> {
        let record = self.staff.order_by_receipt(receipt).await?;

        Ok(Order::from_staff_record(record))
    }

    /// Sets whether `order` was served and returns whether anything changed.
    ///
    /// The backend is only called for an actual change, and `order` is only updated once the
    /// backend confirmed it.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not paid or the backend refuses the change.
    pub async fn set_served(&self, order: &mut Order, served: bool) -> Result<bool, AppError> {
        let mut updated = order.clone();

        if !updated.set_served(served, Actor::Staff)? {
            return Ok(false);
        }

        self.staff.set_served(order.id(), served).await?;

        info!(order = %order.id(), served, "served flag updated");

        *order = updated;

        Ok(true)
    }

    /// Flips whether `order` was served and returns the new value.
    ///
    /// # Errors
    ///
    /// See [`StaffDesk::set_served`].
    pub async fn toggle_served(&self, order: &mut Order) -> Result<bool, AppError> {
        let served = !order.served();

        self.set_served(order, served).await?;

        Ok(served)
    }
}
