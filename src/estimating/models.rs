//! Domain types for the estimating core.
//!
//! Everything here is a plain value object: the price book snapshot handed
//! into every estimate, the per-product geometry parameters, and the quote
//! that comes back out. Nothing holds hidden state and nothing touches I/O.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Material SKU keys shared by the price book, the mix recipes and the
/// estimators. Prices are looked up by these names, so they are the one
/// contract between configuration and code.
pub mod sku {
    pub const CEMENT: &str = "cement";
    pub const SAND: &str = "sand";
    pub const GRAVEL: &str = "gravel";
    pub const LIME: &str = "lime";
    pub const REBAR: &str = "rebar";
    pub const MESH: &str = "mesh";
    pub const STEEL_TUBE: &str = "steel_tube";
    pub const TIE_WIRE: &str = "tie_wire";
    pub const ROOF_PANEL: &str = "roof_panel";
    pub const RIDGE_CAP: &str = "ridge_cap";
    pub const PURLIN: &str = "purlin";
    pub const PAINT: &str = "paint";
    pub const VINYL_CLADDING: &str = "vinyl_cladding";
    pub const VINYL_ADHESIVE: &str = "vinyl_adhesive";
    pub const LABOR_HOUSE_M2: &str = "labor_house_m2";
    pub const LABOR_FERRO_M2: &str = "labor_ferro_m2";
    pub const GLAZING_KIT_SMALL: &str = "glazing_kit_small";
    pub const GLAZING_KIT_MEDIUM: &str = "glazing_kit_medium";
    pub const GLAZING_KIT_LARGE: &str = "glazing_kit_large";
    pub const WATERPROOFING_KIT: &str = "waterproofing_kit";
    pub const VAULT_FACADE_KIT: &str = "vault_facade_kit";
    pub const TANK_PLUMBING_KIT: &str = "tank_plumbing_kit";
}

/// Errors raised by the estimating core.
///
/// All of these are synchronous caller/configuration errors; an unpriced
/// material is deliberately NOT here: it degrades to a zero-cost line
/// reported on the quote itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("dimension `{name}` must be greater than zero, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("unrecognized {field} `{value}`")]
    InvalidOption { field: &'static str, value: String },

    #[error("profit margin must be in [0, 1), got {0}")]
    InvalidMargin(Decimal),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Product lines Ferrotek quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    House,
    PerimeterWall,
    CircularTank,
    Vault,
    WaterTank,
}

impl ProductType {
    /// Stable key used for per-product margin overrides in the price book.
    pub fn key(self) -> &'static str {
        match self {
            ProductType::House => "house",
            ProductType::PerimeterWall => "perimeter_wall",
            ProductType::CircularTank => "circular_tank",
            ProductType::Vault => "vault",
            ProductType::WaterTank => "water_tank",
        }
    }
}

/// Geometry parameters per product line. This is the request side of the
/// core's contract: everything the estimators need, nothing more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "product_type", rename_all = "snake_case")]
pub enum ProductParams {
    House { model: String },
    PerimeterWall { length_m: f64, height_m: f64 },
    CircularTank { diameter_m: f64, wall_height_m: f64 },
    Vault { span_width_m: f64, length_m: f64, base_wall_height_m: f64 },
    WaterTank { capacity_liters: f64 },
}

impl ProductParams {
    pub fn product_type(&self) -> ProductType {
        match self {
            ProductParams::House { .. } => ProductType::House,
            ProductParams::PerimeterWall { .. } => ProductType::PerimeterWall,
            ProductParams::CircularTank { .. } => ProductType::CircularTank,
            ProductParams::Vault { .. } => ProductType::Vault,
            ProductParams::WaterTank { .. } => ProductType::WaterTank,
        }
    }
}

/// House finish alternatives. Mutually exclusive: a quote includes paint or
/// vinyl cladding, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishStyle {
    /// Painted-black exposed structure.
    Industrial,
    /// Vinyl wood-look cladding glued over the shell.
    WoodLook,
}

/// Mesh reinforcement tiers for perimeter walls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reinforcement {
    #[default]
    Single,
    /// Double-membrane option: mesh quantity doubles.
    Double,
}

/// Optional style selections accompanying the geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleOptions {
    #[serde(default)]
    pub finish: Option<FinishStyle>,
    #[serde(default)]
    pub reinforcement: Reinforcement,
    /// When false, the finish branch is skipped entirely (structure-only
    /// quote).
    #[serde(default = "default_true")]
    pub include_finishes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            finish: None,
            reinforcement: Reinforcement::default(),
            include_finishes: true,
        }
    }
}

/// A named house model from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseModelSpec {
    pub display_name: String,
    pub description: String,
    pub floor_area_m2: f64,
    pub wall_height_m: f64,
    /// Empirical perimeter-to-area ratio; `perimeter = floor_area × ratio`.
    pub perimeter_ratio: f64,
    /// Glazing package billed as a fixed extra for this model size.
    pub glazing_kit_sku: String,
}

/// Admin-tunable formula constants.
///
/// Historically these lived hard-coded in per-product forks of the
/// calculation module; lifting them here makes tuning a config change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Fraction of the sale price that is profit, in [0, 1).
    pub profit_margin: Decimal,
    /// Per-product margin overrides keyed by [`ProductType::key`].
    pub product_margins: BTreeMap<String, Decimal>,

    // Shared structural factors.
    pub post_spacing_m: f64,
    pub bar_length_m: f64,
    pub footing_section_m2: f64,
    pub wire_kg_per_mesh_m2: f64,

    // Mesh layering multipliers. Tanks take denser reinforcement than
    // plain walls; vault mesh scales with the shell envelope.
    pub wall_mesh_layers: f64,
    pub tank_wall_mesh_layers: f64,
    pub tank_floor_mesh_layers: f64,
    pub vault_mesh_layers: f64,

    // Tank factors.
    pub min_binder_bags: u32,
    pub tank_labor_factor: f64,
    pub water_tank_wall_height_m: f64,

    // Vault factors.
    pub rib_spacing_m: f64,

    // House factors.
    pub slab_thickness_m: f64,
    pub slab_rebar_per_m2: f64,
    pub column_spacing_m: f64,
    pub roof_pitch_factor: f64,
    pub roof_panel_area_m2: f64,
    pub ridge_cap_length_m: f64,
    pub purlin_spacing_m: f64,
    pub paint_coverage_m2_per_gallon: f64,
    pub vinyl_adhesive_m2_per_unit: f64,
    pub house_models: BTreeMap<String, HouseModelSpec>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            profit_margin: dec!(0.35),
            product_margins: BTreeMap::from([
                ("circular_tank".to_string(), dec!(0.30)),
                ("water_tank".to_string(), dec!(0.30)),
                ("vault".to_string(), dec!(0.45)),
            ]),
            post_spacing_m: 1.5,
            bar_length_m: 6.0,
            footing_section_m2: 0.06,
            wire_kg_per_mesh_m2: 0.15,
            wall_mesh_layers: 1.0,
            tank_wall_mesh_layers: 1.2,
            tank_floor_mesh_layers: 0.8,
            vault_mesh_layers: 1.0,
            min_binder_bags: 5,
            tank_labor_factor: 0.8,
            water_tank_wall_height_m: 1.2,
            rib_spacing_m: 0.5,
            slab_thickness_m: 0.08,
            slab_rebar_per_m2: 0.5,
            column_spacing_m: 4.0,
            roof_pitch_factor: 1.15,
            roof_panel_area_m2: 5.4,
            ridge_cap_length_m: 3.0,
            purlin_spacing_m: 0.9,
            paint_coverage_m2_per_gallon: 18.0,
            vinyl_adhesive_m2_per_unit: 10.0,
            house_models: default_house_models(),
        }
    }
}

fn default_house_models() -> BTreeMap<String, HouseModelSpec> {
    // Perimeter ratios reproduce the catalog footprints: 5×7, 5×13, 10×11.
    BTreeMap::from([
        (
            "loft".to_string(),
            HouseModelSpec {
                display_name: "Modelo 1: Loft (35m²)".to_string(),
                description: "Espacio abierto para parejas o glamping de lujo.".to_string(),
                floor_area_m2: 35.0,
                wall_height_m: 3.0,
                perimeter_ratio: 0.686,
                glazing_kit_sku: sku::GLAZING_KIT_SMALL.to_string(),
            },
        ),
        (
            "familiar".to_string(),
            HouseModelSpec {
                display_name: "Modelo 2: Familiar (65m²)".to_string(),
                description: "Dos habitaciones y zona social amplia para familias pequeñas."
                    .to_string(),
                floor_area_m2: 65.0,
                wall_height_m: 3.2,
                perimeter_ratio: 0.554,
                glazing_kit_sku: sku::GLAZING_KIT_MEDIUM.to_string(),
            },
        ),
        (
            "hacienda".to_string(),
            HouseModelSpec {
                display_name: "Modelo 3: Hacienda (110m²)".to_string(),
                description: "Tres habitaciones, techos altos, la casa principal de la finca."
                    .to_string(),
                floor_area_m2: 110.0,
                wall_height_m: 4.5,
                perimeter_ratio: 0.382,
                glazing_kit_sku: sku::GLAZING_KIT_LARGE.to_string(),
            },
        ),
    ])
}

/// Price book snapshot: unit prices by SKU plus the pricing configuration.
///
/// Loaded once per session from the persisted JSON document and passed by
/// value into every estimate; never mutated mid-calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    #[serde(default)]
    pub prices: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub config: PricingConfig,
}

impl PriceBook {
    /// Unit price for a SKU, if the book carries one.
    pub fn price(&self, sku: &str) -> Option<Decimal> {
        self.prices.get(sku).copied()
    }

    /// Margin applied to a product: per-product override, else the default.
    pub fn margin_for(&self, product: ProductType) -> Decimal {
        self.config
            .product_margins
            .get(product.key())
            .copied()
            .unwrap_or(self.config.profit_margin)
    }

    /// Validate the whole book (margins in range, prices positive). Run on
    /// load and before every admin save.
    pub fn validate(&self) -> Result<(), EstimateError> {
        validate_margin(self.config.profit_margin)?;
        for margin in self.config.product_margins.values() {
            validate_margin(*margin)?;
        }
        for (sku, price) in &self.prices {
            if *price <= Decimal::ZERO {
                return Err(EstimateError::Configuration(format!(
                    "unit price for `{sku}` must be positive, got {price}"
                )));
            }
        }
        Ok(())
    }

    /// The built-in Colombian-peso price list used when no document exists
    /// yet. Prices are per purchasable unit (bag, bar, m², kit, ...).
    pub fn builtin() -> Self {
        let prices = BTreeMap::from(
            [
                (sku::CEMENT, dec!(28000)),
                (sku::SAND, dec!(90000)),
                (sku::GRAVEL, dec!(110000)),
                (sku::LIME, dec!(15000)),
                (sku::REBAR, dec!(25000)),
                (sku::MESH, dec!(13000)),
                (sku::STEEL_TUBE, dec!(150000)),
                (sku::TIE_WIRE, dec!(8000)),
                (sku::ROOF_PANEL, dec!(95000)),
                (sku::RIDGE_CAP, dec!(35000)),
                (sku::PURLIN, dec!(75000)),
                (sku::PAINT, dec!(120000)),
                (sku::VINYL_CLADDING, dec!(60000)),
                (sku::VINYL_ADHESIVE, dec!(45000)),
                (sku::LABOR_HOUSE_M2, dec!(450000)),
                (sku::LABOR_FERRO_M2, dec!(350000)),
                (sku::GLAZING_KIT_SMALL, dec!(3500000)),
                (sku::GLAZING_KIT_MEDIUM, dec!(5000000)),
                (sku::GLAZING_KIT_LARGE, dec!(8000000)),
                (sku::WATERPROOFING_KIT, dec!(450000)),
                (sku::VAULT_FACADE_KIT, dec!(2500000)),
                (sku::TANK_PLUMBING_KIT, dec!(300000)),
            ]
            .map(|(k, v)| (k.to_string(), v)),
        );
        Self {
            prices,
            config: PricingConfig::default(),
        }
    }
}

fn validate_margin(margin: Decimal) -> Result<(), EstimateError> {
    if margin < Decimal::ZERO || margin >= Decimal::ONE {
        return Err(EstimateError::InvalidMargin(margin));
    }
    Ok(())
}

/// Purchasable unit a material is bought in. Countable units must come out
/// of an estimate as whole numbers; bulk units may stay fractional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialUnit {
    Bag,
    Bar,
    Tube,
    Panel,
    Gallon,
    Kit,
    Unit,
    SquareMeter,
    CubicMeter,
    Kilogram,
}

impl MaterialUnit {
    /// Whether the unit is indivisible at purchase time (you cannot buy a
    /// fraction of a bag).
    pub fn is_countable(self) -> bool {
        !matches!(
            self,
            MaterialUnit::SquareMeter | MaterialUnit::CubicMeter | MaterialUnit::Kilogram
        )
    }
}

/// One line of the bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    pub unit: MaterialUnit,
}

/// Bill of materials keyed by SKU. BTreeMap keeps serialization order
/// deterministic, which is what makes identical inputs produce bit-identical
/// quotes.
pub type MaterialsQuantities = BTreeMap<String, MaterialLine>;

/// Itemized direct-cost subtotals. Exact values (whole pesos); the
/// commercially rounded figures live on the quote itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub materials_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub labor_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub extras_cost: Decimal,
    /// materials + labor + extras.
    #[serde(with = "rust_decimal::serde::str")]
    pub direct_cost: Decimal,
}

/// Headline geometry figures for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometrySummary {
    pub area_m2: f64,
    pub height_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_liters: Option<f64>,
}

/// A complete quote. Created fresh on every estimate, immutable once
/// returned, no persistent identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub product: ProductType,
    pub name: String,
    pub description: String,
    pub geometry: GeometrySummary,
    pub materials: MaterialsQuantities,
    pub costs: CostBreakdown,
    /// Margin fraction applied to this quote.
    #[serde(with = "rust_decimal::serde::str")]
    pub margin: Decimal,
    /// Direct cost rounded to the nearest thousand pesos for presentation.
    #[serde(with = "rust_decimal::serde::str")]
    pub direct_cost: Decimal,
    /// Sale price rounded to the nearest thousand pesos for presentation.
    #[serde(with = "rust_decimal::serde::str")]
    pub sale_price: Decimal,
    /// SKUs the estimate needed but the price book does not carry. Their
    /// cost contribution is zero; the front end must warn the operator.
    pub unpriced: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== price book tests ====================

    #[test]
    fn test_builtin_price_book_is_valid() {
        let book = PriceBook::builtin();
        assert!(book.validate().is_ok());
        assert!(!book.prices.is_empty());
    }

    #[test]
    fn test_margin_resolution_prefers_product_override() {
        let book = PriceBook::builtin();
        assert_eq!(book.margin_for(ProductType::House), dec!(0.35));
        assert_eq!(book.margin_for(ProductType::CircularTank), dec!(0.30));
        assert_eq!(book.margin_for(ProductType::Vault), dec!(0.45));
        assert_eq!(book.margin_for(ProductType::PerimeterWall), dec!(0.35));
    }

    #[test]
    fn test_validate_rejects_margin_of_one_or_more() {
        let mut book = PriceBook::builtin();
        book.config.profit_margin = dec!(1.0);
        assert_eq!(
            book.validate(),
            Err(EstimateError::InvalidMargin(dec!(1.0)))
        );

        book.config.profit_margin = dec!(-0.1);
        assert!(matches!(
            book.validate(),
            Err(EstimateError::InvalidMargin(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nonpositive_price() {
        let mut book = PriceBook::builtin();
        book.prices.insert("cement".to_string(), Decimal::ZERO);
        assert!(matches!(
            book.validate(),
            Err(EstimateError::Configuration(_))
        ));
    }

    #[test]
    fn test_price_book_document_round_trip() {
        // The persisted document has `prices` and `config` sections; a
        // minimal document must deserialize with defaults filled in.
        let doc = r#"{ "prices": { "cement": 31000 }, "config": { "profit_margin": "0.40" } }"#;
        let book: PriceBook = serde_json::from_str(doc).unwrap();
        assert_eq!(book.price("cement"), Some(dec!(31000)));
        assert_eq!(book.config.profit_margin, dec!(0.40));
        // Defaults for everything the document omitted.
        assert_eq!(book.config.post_spacing_m, 1.5);
        assert_eq!(book.config.house_models.len(), 3);

        let json = serde_json::to_string(&book).unwrap();
        let back: PriceBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
    }

    // ==================== request params tests ====================

    #[test]
    fn test_product_params_tagged_deserialization() {
        let params: ProductParams = serde_json::from_str(
            r#"{ "product_type": "circular_tank", "diameter_m": 4.0, "wall_height_m": 1.2 }"#,
        )
        .unwrap();
        assert_eq!(
            params,
            ProductParams::CircularTank {
                diameter_m: 4.0,
                wall_height_m: 1.2
            }
        );
        assert_eq!(params.product_type(), ProductType::CircularTank);
    }

    #[test]
    fn test_style_options_defaults() {
        let style: StyleOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(style.finish, None);
        assert_eq!(style.reinforcement, Reinforcement::Single);
        assert!(style.include_finishes);
    }

    #[test]
    fn test_material_unit_countability() {
        assert!(MaterialUnit::Bag.is_countable());
        assert!(MaterialUnit::Panel.is_countable());
        assert!(MaterialUnit::Gallon.is_countable());
        assert!(!MaterialUnit::CubicMeter.is_countable());
        assert!(!MaterialUnit::SquareMeter.is_countable());
        assert!(!MaterialUnit::Kilogram.is_countable());
    }
}
