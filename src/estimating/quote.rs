//! Quote assembly.
//!
//! Takes an estimator's quantity output and turns it into money: itemized
//! material costs, labor, extras, the direct-cost total and the
//! margin-derived sale price. This is the only place prices are looked up
//! and the only place presentation rounding happens.

use std::collections::BTreeSet;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::estimators;
use super::models::{
    CostBreakdown, EstimateError, PriceBook, ProductParams, Quote, StyleOptions,
};
use super::mortar::MixBook;

/// Round to specified decimal places using banker's rounding
/// (ROUND_HALF_EVEN), which avoids cumulative rounding bias across many
/// quotes.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use ferrotek_quoter::estimating::quote::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Commercial presentation rounding: nearest thousand pesos.
///
/// Applied to the two displayed totals only; intermediate figures stay
/// exact so error never compounds through the calculation.
pub fn round_to_thousand(amount: Decimal) -> Decimal {
    round_money(amount / dec!(1000), 0) * dec!(1000)
}

/// Price lookups with unpriced-SKU tracking. A missing SKU contributes zero
/// cost and is reported on the quote for the operator to resolve.
struct CostLedger<'a> {
    book: &'a PriceBook,
    unpriced: BTreeSet<String>,
}

impl<'a> CostLedger<'a> {
    fn new(book: &'a PriceBook) -> Self {
        Self {
            book,
            unpriced: BTreeSet::new(),
        }
    }

    fn unit_price(&mut self, sku: &str) -> Decimal {
        match self.book.price(sku) {
            Some(price) => price,
            None => {
                self.unpriced.insert(sku.to_string());
                Decimal::ZERO
            }
        }
    }
}

/// Generate a complete quote for a product.
///
/// Dispatches to the product's estimator, prices the resulting quantities,
/// applies the margin (`sale = direct / (1 - margin)`) and rounds the two
/// commercial figures to the nearest thousand.
pub fn generate(
    params: &ProductParams,
    style: &StyleOptions,
    book: &PriceBook,
    mixes: &MixBook,
) -> Result<Quote, EstimateError> {
    let product = params.product_type();
    let margin = book.margin_for(product);
    if margin < Decimal::ZERO || margin >= Decimal::ONE {
        return Err(EstimateError::InvalidMargin(margin));
    }

    let output = estimators::estimate(params, style, book, mixes)?;
    let mut ledger = CostLedger::new(book);

    let mut materials_cost = Decimal::ZERO;
    for (sku, line) in &output.materials {
        materials_cost += line.quantity * ledger.unit_price(sku);
    }

    let mut labor_cost = Decimal::ZERO;
    for line in &output.labor {
        let area = Decimal::from_f64(line.area_m2).unwrap_or_default();
        labor_cost += area * ledger.unit_price(&line.sku);
    }

    let mut extras_cost = Decimal::ZERO;
    for line in &output.extras {
        extras_cost += Decimal::from(line.count) * ledger.unit_price(&line.sku);
    }

    // Whole pesos on the itemized subtotals; the thousand-rounding below is
    // cosmetic and applies to the displayed figures only.
    let materials_cost = round_money(materials_cost, 0);
    let labor_cost = round_money(labor_cost, 0);
    let extras_cost = round_money(extras_cost, 0);
    let direct_cost = materials_cost + labor_cost + extras_cost;
    let sale_price = direct_cost / (Decimal::ONE - margin);

    Ok(Quote {
        product,
        name: output.name,
        description: output.description,
        geometry: output.geometry,
        materials: output.materials,
        costs: CostBreakdown {
            materials_cost,
            labor_cost,
            extras_cost,
            direct_cost,
        },
        margin,
        direct_cost: round_to_thousand(direct_cost),
        sale_price: round_to_thousand(sale_price),
        unpriced: ledger.unpriced.into_iter().collect(),
    })
}
