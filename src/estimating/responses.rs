//! Response DTOs for the quoting API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{MaterialUnit, ProductType, Quote};

const CURRENCY: &str = "COP";

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

fn money(amount: Decimal) -> MoneyResponse {
    MoneyResponse {
        amount,
        currency: CURRENCY.to_string(),
    }
}

/// One purchasable line of the materials checklist.
#[derive(Debug, Clone, Serialize)]
pub struct MaterialLineResponse {
    pub sku: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    pub unit: MaterialUnit,
}

/// Itemized cost breakdown (admin view).
#[derive(Debug, Serialize)]
pub struct CostBreakdownResponse {
    pub materials_cost: MoneyResponse,
    pub labor_cost: MoneyResponse,
    pub extras_cost: MoneyResponse,
    pub direct_cost: MoneyResponse,
}

/// Headline geometry, rounded for display.
#[derive(Debug, Serialize)]
pub struct GeometrySummaryResponse {
    pub area_m2: f64,
    pub height_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_liters: Option<f64>,
}

/// Response for a generated quote.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub product: ProductType,
    pub name: String,
    pub description: String,
    pub geometry: GeometrySummaryResponse,
    pub materials: Vec<MaterialLineResponse>,
    pub costs: CostBreakdownResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub margin: Decimal,
    pub direct_cost: MoneyResponse,
    pub sale_price: MoneyResponse,
    pub unpriced: Vec<String>,
}

fn display_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            product: quote.product,
            name: quote.name,
            description: quote.description,
            geometry: GeometrySummaryResponse {
                area_m2: display_tenth(quote.geometry.area_m2),
                height_m: display_tenth(quote.geometry.height_m),
                volume_liters: quote.geometry.volume_liters.map(f64::round),
            },
            materials: quote
                .materials
                .into_iter()
                .map(|(sku, line)| MaterialLineResponse {
                    sku,
                    quantity: line.quantity,
                    unit: line.unit,
                })
                .collect(),
            costs: CostBreakdownResponse {
                materials_cost: money(quote.costs.materials_cost),
                labor_cost: money(quote.costs.labor_cost),
                extras_cost: money(quote.costs.extras_cost),
                direct_cost: money(quote.costs.direct_cost),
            },
            margin: quote.margin,
            direct_cost: money(quote.direct_cost),
            sale_price: money(quote.sale_price),
            unpriced: quote.unpriced,
        }
    }
}

/// Generic error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}
