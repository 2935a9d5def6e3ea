//! Staff endpoints.

use async_trait::async_trait;
use reqwest::Method;

use comptoir::prelude::{BarOpening, BarStatus, OrderId, Receipt, StaffOrderRecord};

use crate::{
    api::{ApiClient, ApiError},
    services::{BarService, StaffService},
};

#[async_trait]
impl StaffService for ApiClient {
    async fn orders(&self) -> Result<Vec<StaffOrderRecord>, ApiError> {
        Self::read(self.request(Method::GET, "/admin/orders/get_all")).await
    }

    async fn order_by_receipt(&self, receipt: &Receipt) -> Result<StaffOrderRecord, ApiError> {
        Self::read(
            self.request(Method::GET, "/admin/orders/get_by_receipt")
                .query(&[("receipt", receipt.as_str())]),
        )
        .await
    }

    async fn set_served(&self, order: OrderId, served: bool) -> Result<(), ApiError> {
        Self::send(
            self.request(Method::POST, "/admin/orders/set_served")
                .query(&[("order_id", order.to_string()), ("served", served.to_string())]),
        )
        .await?;

        Ok(())
    }
}

#[async_trait]
impl BarService for ApiClient {
    async fn status(&self) -> Result<BarStatus, ApiError> {
        Self::read(self.request(Method::GET, "/admin/bar")).await
    }

    async fn open(&self) -> Result<(), ApiError> {
        Self::send(self.request(Method::POST, "/admin/bar/open")).await?;

        Ok(())
    }

    async fn close(&self) -> Result<(), ApiError> {
        Self::send(self.request(Method::POST, "/admin/bar/close")).await?;

        Ok(())
    }

    async fn set_closing_message(&self, message: &str) -> Result<(), ApiError> {
        Self::send(
            self.request(Method::POST, "/admin/bar/set_closing_message")
                .query(&[("closing_message", message)]),
        )
        .await?;

        Ok(())
    }

    async fn openings(&self) -> Result<Vec<BarOpening>, ApiError> {
        Self::read(self.request(Method::GET, "/admin/reports/get_bar_openings")).await
    }
}
