//! Comptoir prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bar::{BarError, BarLog, BarOpening, BarStatus},
    cart::{
        Cart, CartElement, CartError,
        persistence::{CART_LIFETIME_MS, PersistError, PersistedCart},
        store::{CartStore, CartStoreError, MemoryCartStore},
        submission::{CartSubmission, SubmissionError, SubmitCart},
    },
    catalog::{
        Catalog, CatalogError, Product, ProductId, ProductRecord, Variation, VariationId,
        VariationRecord,
    },
    orders::{
        Actor, LineItem, Order, OrderError, OrderId, OrderStage, PaymentInfos,
        PaymentStatusReport, StaffOrderRecord,
        receipt::{Receipt, ReceiptView},
        status::PaymentStatus,
    },
    pricing::{PriceError, format_price},
};
