//! Customer endpoints.

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::Deserialize;

use comptoir::prelude::{
    BarStatus, CartSubmission, OrderId, PaymentInfos, PaymentStatusReport, ProductRecord,
};

use crate::{
    api::{ApiClient, ApiError},
    services::{CatalogService, CheckoutService},
};

#[derive(Debug, Deserialize)]
struct CreatedOrder {
    order_id: OrderId,
}

#[derive(Debug, Deserialize)]
struct PublishableKey {
    publishable_key: String,
}

#[async_trait]
impl CatalogService for ApiClient {
    async fn products(&self) -> Result<Vec<ProductRecord>, ApiError> {
        Self::read(self.request(Method::GET, "/get_available_stock")).await
    }

    async fn bar_status(&self) -> Result<BarStatus, ApiError> {
        Self::read(self.request(Method::GET, "/get_bar_status")).await
    }
}

#[async_trait]
impl CheckoutService for ApiClient {
    async fn validate_cart(&self, submission: &CartSubmission) -> Result<OrderId, ApiError> {
        let created: CreatedOrder =
            Self::read(self.request(Method::POST, "/validate_cart").json(submission)).await?;

        Ok(created.order_id)
    }

    async fn payment_infos(&self, order: OrderId) -> Result<PaymentInfos, ApiError> {
        Self::read(
            self.request(Method::GET, "/get_payment_infos")
                .query(&[("order_id", order.0)]),
        )
        .await
    }

    async fn set_email(&self, client_secret: &str, email: &str) -> Result<(), ApiError> {
        Self::send(
            self.request(Method::PATCH, "/set_email")
                .query(&[("client_secret", client_secret), ("email", email)]),
        )
        .await?;

        Ok(())
    }

    async fn payment_status(&self, client_secret: &str) -> Result<PaymentStatusReport, ApiError> {
        Self::read(
            self.request(Method::GET, "/get_payment_status")
                .query(&[("client_secret", client_secret)]),
        )
        .await
    }

    async fn publishable_key(&self) -> Result<String, ApiError> {
        let key: PublishableKey =
            Self::read(self.request(Method::GET, "/get_stripe_pub_key")).await?;

        Ok(key.publishable_key)
    }

    fn qr_code_url(&self, client_secret: &str) -> Result<String, ApiError> {
        Url::parse_with_params(
            &self.endpoint("/get_qr_code"),
            &[("client_secret", client_secret)],
        )
        .map(String::from)
        .map_err(|error| ApiError::InvalidUrl(error.to_string()))
    }
}
