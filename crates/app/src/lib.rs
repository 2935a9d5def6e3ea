//! Comptoir client: the REST collaborators of the ordering model, configuration and logging.

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod observability;
pub mod services;
pub mod staff;
pub mod store;
pub mod storefront;
pub mod tracker;
