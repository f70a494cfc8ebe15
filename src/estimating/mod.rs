//! Costing and estimation engine for Ferrotek's product lines.
//!
//! Deterministic quoting: a product type plus its geometric parameters maps
//! to a ceiling-rounded bill of materials, an itemized direct cost, and a
//! margin-derived sale price. Pure computation throughout; the HTTP layer
//! and the persisted price book live outside this module.

pub mod estimators;
pub mod geometry;
pub mod models;
pub mod mortar;
pub mod quote;
pub mod requests;
pub mod responses;

// Re-export commonly used items
pub use models::{EstimateError, PriceBook, ProductParams, ProductType, Quote, StyleOptions};
pub use mortar::MixBook;
pub use quote::{generate, round_money};
