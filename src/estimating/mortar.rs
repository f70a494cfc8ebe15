//! Mortar and concrete mix calculator.
//!
//! Converts a required finished volume of a named mix into raw material
//! consumption using fixed empirical yields: volumetric ratios like 1:3
//! (structural fill) or 1:3:3 (hydrophobic finish coat with lime), each with
//! its own bags-per-m³ yield. The same model also reports in kg for crews
//! that batch by bucket weight rather than by bag.
//!
//! All outputs here are RAW continuous quantities. Ceiling to purchasable
//! units happens exactly once, in [`BomBuilder::finish`], after every layer
//! of an estimate has been accumulated. Rounding earlier compounds error.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::models::{sku, EstimateError, MaterialLine, MaterialUnit, MaterialsQuantities};

/// A volumetric mix: binder + sand + optional second filler (lime for
/// renders, gravel for concrete), with an empirical finished-volume yield
/// per binder bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixRecipe {
    pub binder_sku: String,
    pub filler1_sku: String,
    #[serde(default)]
    pub filler2_sku: Option<String>,
    #[serde(default = "default_filler2_unit")]
    pub filler2_unit: MaterialUnit,
    pub binder_parts: f64,
    pub filler1_parts: f64,
    #[serde(default)]
    pub filler2_parts: f64,
    /// Finished m³ produced per binder bag. Empirically fixed, not derived.
    pub yield_m3_per_bag: f64,
}

fn default_filler2_unit() -> MaterialUnit {
    MaterialUnit::Bag
}

/// A shell layer: which mix, applied how thick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixLayer {
    pub mix: String,
    pub thickness_m: f64,
}

/// Raw (un-rounded) consumption for a volume of one mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixQuantities {
    pub binder_bags: f64,
    pub filler1_m3: f64,
    /// Bags or m³ depending on the recipe's second filler unit; zero when
    /// the mix has no second filler.
    pub filler2: f64,
}

/// The same consumption expressed by mass, for bucket/kg reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixMass {
    pub binder_kg: f64,
    pub filler1_kg: f64,
    pub filler2_kg: f64,
}

/// Named mixes, shell layers, and the physical constants that tie ratios to
/// purchasable quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixBook {
    pub mixes: BTreeMap<String, MixRecipe>,
    pub layers: BTreeMap<String, MixLayer>,
    /// Loose volume of one binder bag (50 kg cement ≈ 33 L).
    pub binder_bag_volume_m3: f64,
    /// Loose volume of one second-filler bag (25 kg hydrated lime ≈ 42 L).
    pub filler2_bag_volume_m3: f64,
    pub binder_bag_kg: f64,
    pub filler2_bag_kg: f64,
    pub sand_density_kg_m3: f64,
}

/// Mix names referenced by the estimators.
pub const STRUCTURAL_FILL: &str = "structural_fill";
pub const FINISH_COAT: &str = "finish_coat";
pub const FOOTING_CONCRETE: &str = "footing_concrete";

// Binary float noise must never buy an extra unit: 110.000000000000001 m²
// of mesh is 110 m², not 110.1.
const NOISE_GUARD: f64 = 1e-9;

/// Ceiling with the float-noise guard, clamped at zero.
pub fn ceil_guarded(x: f64) -> f64 {
    (x - NOISE_GUARD).ceil().max(0.0)
}

impl Default for MixBook {
    fn default() -> Self {
        let mixes = BTreeMap::from([
            (
                STRUCTURAL_FILL.to_string(),
                MixRecipe {
                    binder_sku: sku::CEMENT.to_string(),
                    filler1_sku: sku::SAND.to_string(),
                    filler2_sku: None,
                    filler2_unit: MaterialUnit::Bag,
                    binder_parts: 1.0,
                    filler1_parts: 3.0,
                    filler2_parts: 0.0,
                    yield_m3_per_bag: 0.11,
                },
            ),
            (
                FINISH_COAT.to_string(),
                MixRecipe {
                    binder_sku: sku::CEMENT.to_string(),
                    filler1_sku: sku::SAND.to_string(),
                    filler2_sku: Some(sku::LIME.to_string()),
                    filler2_unit: MaterialUnit::Bag,
                    binder_parts: 1.0,
                    filler1_parts: 3.0,
                    filler2_parts: 3.0,
                    yield_m3_per_bag: 0.14,
                },
            ),
            (
                FOOTING_CONCRETE.to_string(),
                MixRecipe {
                    binder_sku: sku::CEMENT.to_string(),
                    filler1_sku: sku::SAND.to_string(),
                    filler2_sku: Some(sku::GRAVEL.to_string()),
                    filler2_unit: MaterialUnit::CubicMeter,
                    binder_parts: 1.0,
                    filler1_parts: 2.0,
                    filler2_parts: 3.0,
                    yield_m3_per_bag: 0.14,
                },
            ),
        ]);
        let layers = BTreeMap::from([
            (
                STRUCTURAL_FILL.to_string(),
                MixLayer {
                    mix: STRUCTURAL_FILL.to_string(),
                    thickness_m: 0.035,
                },
            ),
            (
                FINISH_COAT.to_string(),
                MixLayer {
                    mix: FINISH_COAT.to_string(),
                    thickness_m: 0.012,
                },
            ),
        ]);
        Self {
            mixes,
            layers,
            binder_bag_volume_m3: 0.033,
            filler2_bag_volume_m3: 0.042,
            binder_bag_kg: 50.0,
            filler2_bag_kg: 25.0,
            sand_density_kg_m3: 1600.0,
        }
    }
}

impl MixBook {
    pub fn recipe(&self, name: &str) -> Result<&MixRecipe, EstimateError> {
        self.mixes
            .get(name)
            .ok_or_else(|| EstimateError::Configuration(format!("no mix recipe named `{name}`")))
    }

    pub fn layer(&self, name: &str) -> Result<&MixLayer, EstimateError> {
        self.layers
            .get(name)
            .ok_or_else(|| EstimateError::Configuration(format!("no mix layer named `{name}`")))
    }

    /// Raw material consumption for `volume_m3` of the named mix.
    pub fn quantities_for_volume(
        &self,
        mix: &str,
        volume_m3: f64,
    ) -> Result<MixQuantities, EstimateError> {
        let recipe = self.recipe(mix)?;
        let binder_bags = volume_m3 / recipe.yield_m3_per_bag;
        let binder_loose_m3 = binder_bags * self.binder_bag_volume_m3;
        let filler1_m3 = binder_loose_m3 * recipe.filler1_parts / recipe.binder_parts;
        let filler2_loose_m3 = binder_loose_m3 * recipe.filler2_parts / recipe.binder_parts;
        let filler2 = if recipe.filler2_sku.is_none() {
            0.0
        } else if recipe.filler2_unit == MaterialUnit::Bag {
            filler2_loose_m3 / self.filler2_bag_volume_m3
        } else {
            filler2_loose_m3
        };
        Ok(MixQuantities {
            binder_bags,
            filler1_m3,
            filler2,
        })
    }

    /// The alternate reporting base: consumption by mass, derived from the
    /// same volumetric model via bag masses and sand density.
    pub fn mass_for_volume(&self, mix: &str, volume_m3: f64) -> Result<MixMass, EstimateError> {
        let quantities = self.quantities_for_volume(mix, volume_m3)?;
        let recipe = self.recipe(mix)?;
        let filler2_kg = if recipe.filler2_unit == MaterialUnit::Bag {
            quantities.filler2 * self.filler2_bag_kg
        } else {
            // Granular bulk filler: assume sand-like density.
            quantities.filler2 * self.sand_density_kg_m3
        };
        Ok(MixMass {
            binder_kg: quantities.binder_bags * self.binder_bag_kg,
            filler1_kg: quantities.filler1_m3 * self.sand_density_kg_m3,
            filler2_kg,
        })
    }
}

/// Accumulates raw continuous quantities per SKU across every layer and
/// sub-calculation of an estimate, then applies ceiling rounding ONCE.
///
/// Countable units (bags, bars, panels, ...) ceil to whole numbers; bulk
/// units (m³, m², kg) ceil up to a tenth. Either way the purchasable
/// quantity is never below the raw requirement; under-ordering material is
/// the failure mode this system exists to prevent.
#[derive(Debug, Default)]
pub struct BomBuilder {
    lines: BTreeMap<String, (f64, MaterialUnit)>,
}

impl BomBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw quantity of a SKU. Repeated adds accumulate before any
    /// rounding happens.
    pub fn add(&mut self, sku: &str, quantity: f64, unit: MaterialUnit) {
        if quantity <= 0.0 {
            return;
        }
        let entry = self.lines.entry(sku.to_string()).or_insert((0.0, unit));
        entry.0 += quantity;
    }

    /// Accumulate every material of `volume_m3` worth of the named mix.
    pub fn add_mix_volume(
        &mut self,
        book: &MixBook,
        mix: &str,
        volume_m3: f64,
    ) -> Result<(), EstimateError> {
        let recipe = book.recipe(mix)?;
        let quantities = book.quantities_for_volume(mix, volume_m3)?;
        self.add(&recipe.binder_sku, quantities.binder_bags, MaterialUnit::Bag);
        self.add(
            &recipe.filler1_sku,
            quantities.filler1_m3,
            MaterialUnit::CubicMeter,
        );
        if let Some(filler2_sku) = &recipe.filler2_sku {
            self.add(filler2_sku, quantities.filler2, recipe.filler2_unit);
        }
        Ok(())
    }

    /// Raw accumulated quantity for a SKU, before rounding. Estimators use
    /// this to apply minimum-purchase floors on the continuous value's
    /// rounded result.
    pub fn raw_quantity(&self, sku: &str) -> f64 {
        self.lines.get(sku).map(|(q, _)| *q).unwrap_or(0.0)
    }

    /// The single ceiling boundary: convert every accumulated raw quantity
    /// into its purchasable amount.
    pub fn finish(self) -> MaterialsQuantities {
        self.lines
            .into_iter()
            .map(|(sku, (raw, unit))| {
                let quantity = if unit.is_countable() {
                    Decimal::from(ceil_guarded(raw) as u64)
                } else {
                    // Bulk materials are ordered in tenths (0.1 m³ of sand,
                    // 0.1 kg of wire), still rounded up.
                    Decimal::new(ceil_guarded(raw * 10.0) as i64, 1)
                };
                (sku, MaterialLine { quantity, unit })
            })
            .collect()
    }
}
