//! HTTP route handlers for the quoting API.
//!
//! Thin translation layer: deserialize the request, take the price book
//! read lock, call the estimating core, serialize the quote. The admin save
//! endpoint is the single writer to the price book.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::config;
use crate::error::{AppError, Result};
use crate::estimating::models::PriceBook;
use crate::estimating::quote;
use crate::estimating::requests::QuoteRequest;
use crate::estimating::responses::QuoteResponse;
use crate::{AppState, VERSION};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/quotes", post(create_quote))
        .route("/api/v1/pricebook", get(get_price_book).put(put_price_book))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
    })
}

/// Generate a quote for a product configuration.
async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let book = state.price_book.read().await;
    let quote = quote::generate(&request.product, &request.style, &book, &state.mix_book)?;

    if !quote.unpriced.is_empty() {
        tracing::warn!(
            product = quote.product.key(),
            skus = ?quote.unpriced,
            "quote contains unpriced materials; their cost contribution is zero"
        );
    }

    Ok(Json(QuoteResponse::from(quote)))
}

/// Current price book snapshot.
async fn get_price_book(State(state): State<AppState>) -> Json<PriceBook> {
    Json(state.price_book.read().await.clone())
}

/// Admin save: validate, persist, then swap the in-memory snapshot.
/// Quotes in flight keep the old snapshot; the next request sees the new
/// one.
async fn put_price_book(
    State(state): State<AppState>,
    Json(book): Json<PriceBook>,
) -> Result<Json<PriceBook>> {
    book.validate()?;
    config::save_price_book(&state.pricebook_path, &book)
        .map_err(|e| AppError::Persistence(e.to_string()))?;

    let mut current = state.price_book.write().await;
    *current = book.clone();
    tracing::info!("price book updated ({} SKUs)", book.prices.len());

    Ok(Json(book))
}
