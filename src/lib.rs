//! Ferrotek quoting engine.
//!
//! A pure costing core for Ferrotek's ferrocement product lines (modular
//! houses, perimeter walls, fish tanks, water tanks, glamping vaults) plus a
//! thin Axum layer that exposes it as a JSON API. The core maps a product
//! type and its dimensions to a bill of materials, a direct-cost breakdown
//! and a margin-derived sale price; rendering and PDF generation live in the
//! front end, which only ever sees plain serializable quotes.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

pub mod config;
pub mod error;
pub mod estimating;
pub mod routes;

use estimating::mortar::MixBook;
use estimating::models::PriceBook;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application state.
///
/// The price book is the only mutable piece: quote requests take the read
/// half, the admin save endpoint takes the write half, so saves are
/// serialized while quoting stays concurrent.
#[derive(Clone)]
pub struct AppState {
    pub price_book: Arc<RwLock<PriceBook>>,
    pub mix_book: Arc<MixBook>,
    pub pricebook_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(price_book: PriceBook, mix_book: MixBook, pricebook_path: PathBuf) -> Self {
        Self {
            price_book: Arc::new(RwLock::new(price_book)),
            mix_book: Arc::new(mix_book),
            pricebook_path: Arc::new(pricebook_path),
        }
    }
}
