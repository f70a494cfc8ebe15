//! Request DTOs for the quoting API endpoints.

use serde::Deserialize;

use super::models::{ProductParams, StyleOptions};

/// Request to generate a quote. The product variant is selected by the
/// `product_type` tag; style options may be omitted entirely.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub product: ProductParams,
    #[serde(default)]
    pub style: StyleOptions,
}
