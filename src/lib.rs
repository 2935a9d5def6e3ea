//! Comptoir
//!
//! Comptoir is the client-side ordering model of a bar point-of-sale: a catalog snapshot of
//! purchasable stock, a cart constrained by shared stock ceilings, a time-boxed persisted copy of
//! that cart, and the lifecycle of the order a submitted cart turns into.

pub mod bar;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod time;
