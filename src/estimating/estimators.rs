//! Product estimators.
//!
//! One estimator per product line, all sharing the same contract: geometry
//! parameters + style options + price book + mix book in, a materials list
//! with labor/extras line items out. Estimators never touch money; they
//! produce quantities; the quote assembler prices them.
//!
//! Two invariants hold everywhere:
//! - every linear dimension is validated positive BEFORE any division;
//! - continuous quantities accumulate in a [`BomBuilder`] and hit the
//!   ceiling-rounding boundary exactly once.

use super::geometry;
use super::models::{
    sku, EstimateError, GeometrySummary, MaterialLine, MaterialUnit, MaterialsQuantities,
    PriceBook, ProductParams, Reinforcement, StyleOptions, FinishStyle,
};
use super::mortar::{ceil_guarded, BomBuilder, MixBook, FINISH_COAT, FOOTING_CONCRETE, STRUCTURAL_FILL};

/// Labor billed as worked area × a per-m² rate SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct LaborLine {
    pub sku: String,
    pub area_m2: f64,
}

/// Fixed add-on billed per kit/package.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraLine {
    pub sku: String,
    pub count: u32,
}

/// What an estimator hands to the quote assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateOutput {
    pub name: String,
    pub description: String,
    pub geometry: GeometrySummary,
    pub materials: MaterialsQuantities,
    pub labor: Vec<LaborLine>,
    pub extras: Vec<ExtraLine>,
}

/// Dispatch to the estimator for the product line.
pub fn estimate(
    params: &ProductParams,
    style: &StyleOptions,
    book: &PriceBook,
    mixes: &MixBook,
) -> Result<EstimateOutput, EstimateError> {
    match params {
        ProductParams::House { model } => estimate_house(model, style, book, mixes),
        ProductParams::PerimeterWall { length_m, height_m } => {
            estimate_perimeter_wall(*length_m, *height_m, style, book, mixes)
        }
        ProductParams::CircularTank {
            diameter_m,
            wall_height_m,
        } => estimate_circular_tank(*diameter_m, *wall_height_m, book, mixes),
        ProductParams::Vault {
            span_width_m,
            length_m,
            base_wall_height_m,
        } => estimate_vault(*span_width_m, *length_m, *base_wall_height_m, book, mixes),
        ProductParams::WaterTank { capacity_liters } => {
            estimate_water_tank(*capacity_liters, book, mixes)
        }
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<f64, EstimateError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EstimateError::InvalidDimension { name, value })
    }
}

// ==================== house ====================

fn estimate_house(
    model: &str,
    style: &StyleOptions,
    book: &PriceBook,
    mixes: &MixBook,
) -> Result<EstimateOutput, EstimateError> {
    let cfg = &book.config;
    let model_spec = cfg
        .house_models
        .get(model)
        .ok_or_else(|| EstimateError::InvalidOption {
            field: "model",
            value: model.to_string(),
        })?;

    let floor_area = require_positive("floor_area_m2", model_spec.floor_area_m2)?;
    let wall_height = require_positive("wall_height_m", model_spec.wall_height_m)?;
    let perimeter_ratio = require_positive("perimeter_ratio", model_spec.perimeter_ratio)?;

    let perimeter = floor_area * perimeter_ratio;
    let wall_area = geometry::rectangular_wall_area(perimeter, wall_height);

    let mut bom = BomBuilder::new();

    // Wall shell: structural fill only; the finish is paint or cladding.
    let fill = mixes.layer(STRUCTURAL_FILL)?;
    bom.add_mix_volume(mixes, &fill.mix, wall_area * fill.thickness_m)?;

    // Floor slab in concrete, with its distribution rebar.
    bom.add_mix_volume(mixes, FOOTING_CONCRETE, floor_area * cfg.slab_thickness_m)?;
    bom.add(
        sku::REBAR,
        floor_area * cfg.slab_rebar_per_m2,
        MaterialUnit::Bar,
    );

    // Mesh over the full wall shell, tie wire to lace it.
    let mesh_m2 = wall_area * cfg.wall_mesh_layers;
    bom.add(sku::MESH, mesh_m2, MaterialUnit::SquareMeter);
    bom.add(
        sku::TIE_WIRE,
        mesh_m2 * cfg.wire_kg_per_mesh_m2,
        MaterialUnit::Kilogram,
    );

    // Structural columns around the perimeter.
    bom.add(
        sku::STEEL_TUBE,
        perimeter / cfg.column_spacing_m,
        MaterialUnit::Tube,
    );

    // Roofing: panels by area, ridge caps along the long side, purlin rows
    // up each slope with bars along the ridge run.
    let roof_area = floor_area * cfg.roof_pitch_factor;
    bom.add(
        sku::ROOF_PANEL,
        roof_area / cfg.roof_panel_area_m2,
        MaterialUnit::Panel,
    );
    let (long_side, short_side) = geometry::rectangle_sides(perimeter, floor_area);
    bom.add(
        sku::RIDGE_CAP,
        long_side / cfg.ridge_cap_length_m,
        MaterialUnit::Unit,
    );
    let slope_length = (short_side / 2.0) * cfg.roof_pitch_factor;
    let rows_per_side = ceil_guarded(slope_length / cfg.purlin_spacing_m) + 1.0;
    let bars_per_row = ceil_guarded(long_side / cfg.bar_length_m);
    bom.add(
        sku::PURLIN,
        rows_per_side * 2.0 * bars_per_row,
        MaterialUnit::Bar,
    );

    // Finish branch: mutually exclusive alternatives, never both.
    if style.include_finishes {
        match style.finish.unwrap_or(FinishStyle::Industrial) {
            FinishStyle::Industrial => {
                bom.add(
                    sku::PAINT,
                    wall_area / cfg.paint_coverage_m2_per_gallon,
                    MaterialUnit::Gallon,
                );
            }
            FinishStyle::WoodLook => {
                bom.add(sku::VINYL_CLADDING, wall_area, MaterialUnit::SquareMeter);
                bom.add(
                    sku::VINYL_ADHESIVE,
                    wall_area / cfg.vinyl_adhesive_m2_per_unit,
                    MaterialUnit::Unit,
                );
            }
        }
    }

    Ok(EstimateOutput {
        name: model_spec.display_name.clone(),
        description: model_spec.description.clone(),
        geometry: GeometrySummary {
            area_m2: floor_area,
            height_m: wall_height,
            volume_liters: None,
        },
        materials: bom.finish(),
        labor: vec![LaborLine {
            sku: sku::LABOR_HOUSE_M2.to_string(),
            area_m2: floor_area,
        }],
        extras: vec![ExtraLine {
            sku: model_spec.glazing_kit_sku.clone(),
            count: 1,
        }],
    })
}

// ==================== perimeter wall ====================

fn estimate_perimeter_wall(
    length_m: f64,
    height_m: f64,
    style: &StyleOptions,
    book: &PriceBook,
    mixes: &MixBook,
) -> Result<EstimateOutput, EstimateError> {
    let cfg = &book.config;
    let length = require_positive("length_m", length_m)?;
    let height = require_positive("height_m", height_m)?;

    let face_area = geometry::rectangular_wall_area(length, height);

    // One post per spacing interval, plus the closing end post.
    let posts = ceil_guarded(length / cfg.post_spacing_m) + 1.0;

    let reinforcement_factor = match style.reinforcement {
        Reinforcement::Single => 1.0,
        Reinforcement::Double => 2.0,
    };
    let mesh_m2 = face_area * cfg.wall_mesh_layers * reinforcement_factor;

    let mut bom = BomBuilder::new();
    bom.add(sku::STEEL_TUBE, posts, MaterialUnit::Tube);
    bom.add(sku::MESH, mesh_m2, MaterialUnit::SquareMeter);
    bom.add(
        sku::TIE_WIRE,
        mesh_m2 * cfg.wire_kg_per_mesh_m2,
        MaterialUnit::Kilogram,
    );

    let fill = mixes.layer(STRUCTURAL_FILL)?;
    bom.add_mix_volume(mixes, &fill.mix, face_area * fill.thickness_m)?;

    // Strip footing along the run.
    bom.add_mix_volume(mixes, FOOTING_CONCRETE, length * cfg.footing_section_m2)?;

    let reinforcement_desc = match style.reinforcement {
        Reinforcement::Single => "malla sencilla",
        Reinforcement::Double => "doble membrana de malla",
    };

    Ok(EstimateOutput {
        name: format!("Muro Perimetral ({length:.0} m)"),
        description: format!(
            "Cerramiento en ferrocemento sobre postes estructurales, {reinforcement_desc}."
        ),
        geometry: GeometrySummary {
            area_m2: face_area,
            height_m: height,
            volume_liters: None,
        },
        materials: bom.finish(),
        labor: vec![LaborLine {
            sku: sku::LABOR_FERRO_M2.to_string(),
            area_m2: face_area,
        }],
        extras: vec![],
    })
}

// ==================== circular tank ====================

fn estimate_circular_tank(
    diameter_m: f64,
    wall_height_m: f64,
    book: &PriceBook,
    mixes: &MixBook,
) -> Result<EstimateOutput, EstimateError> {
    let diameter = require_positive("diameter_m", diameter_m)?;
    let height = require_positive("wall_height_m", wall_height_m)?;
    let mut output = tank_shell_estimate(diameter, height, book, mixes)?;
    output.name = format!("Estanque Circular (Ø {diameter} m)");
    output.description =
        "Tanque en ferrocemento para piscicultura intensiva, paredes lisas y acabado hidrófugo."
            .to_string();
    Ok(output)
}

/// Shared cylindrical-shell estimate used by both tank products.
fn tank_shell_estimate(
    diameter: f64,
    height: f64,
    book: &PriceBook,
    mixes: &MixBook,
) -> Result<EstimateOutput, EstimateError> {
    let cfg = &book.config;
    let shell = geometry::circular_tank_shell(diameter, height);

    let mut bom = BomBuilder::new();

    // Tanks carry both layers: rough fill plus the hydrophobic lime coat.
    let fill = mixes.layer(STRUCTURAL_FILL)?;
    bom.add_mix_volume(mixes, &fill.mix, shell.working_area_m2 * fill.thickness_m)?;
    let coat = mixes.layer(FINISH_COAT)?;
    bom.add_mix_volume(mixes, &coat.mix, shell.working_area_m2 * coat.thickness_m)?;

    // Denser mesh than a plain wall; wall and floor each with their own
    // layering multiplier.
    let mesh_m2 = shell.wall_area_m2 * cfg.tank_wall_mesh_layers
        + shell.floor_area_m2 * cfg.tank_floor_mesh_layers;
    bom.add(sku::MESH, mesh_m2, MaterialUnit::SquareMeter);
    bom.add(
        sku::TIE_WIRE,
        mesh_m2 * cfg.wire_kg_per_mesh_m2,
        MaterialUnit::Kilogram,
    );

    // Perimeter hoop bars.
    bom.add(
        sku::REBAR,
        geometry::circle_perimeter(diameter) / cfg.post_spacing_m,
        MaterialUnit::Bar,
    );

    let binder_sku = mixes.recipe(&fill.mix)?.binder_sku.clone();
    let mut materials = bom.finish();

    // Minimum purchasable floor: even the smallest tank is quoted at the
    // documented minimum of binder bags.
    let min_bags = rust_decimal::Decimal::from(cfg.min_binder_bags);
    match materials.get_mut(&binder_sku) {
        Some(line) if line.quantity < min_bags => line.quantity = min_bags,
        Some(_) => {}
        None => {
            materials.insert(
                binder_sku,
                MaterialLine {
                    quantity: min_bags,
                    unit: MaterialUnit::Bag,
                },
            );
        }
    }

    Ok(EstimateOutput {
        name: String::new(),
        description: String::new(),
        geometry: GeometrySummary {
            area_m2: shell.floor_area_m2,
            height_m: height,
            volume_liters: Some(shell.capacity_liters),
        },
        materials,
        labor: vec![LaborLine {
            sku: sku::LABOR_FERRO_M2.to_string(),
            area_m2: shell.working_area_m2 * cfg.tank_labor_factor,
        }],
        extras: vec![ExtraLine {
            sku: sku::TANK_PLUMBING_KIT.to_string(),
            count: 1,
        }],
    })
}

// ==================== vault ====================

fn estimate_vault(
    span_width_m: f64,
    length_m: f64,
    base_wall_height_m: f64,
    book: &PriceBook,
    mixes: &MixBook,
) -> Result<EstimateOutput, EstimateError> {
    let cfg = &book.config;
    let span = require_positive("span_width_m", span_width_m)?;
    let length = require_positive("length_m", length_m)?;
    let skirt = require_positive("base_wall_height_m", base_wall_height_m)?;

    let shell = geometry::vault_shell(span, length, skirt);

    let mut bom = BomBuilder::new();

    let fill = mixes.layer(STRUCTURAL_FILL)?;
    bom.add_mix_volume(mixes, &fill.mix, shell.shell_area_m2 * fill.thickness_m)?;

    // Mesh follows the whole shell envelope, not the footprint.
    let mesh_m2 = shell.shell_area_m2 * cfg.vault_mesh_layers;
    bom.add(sku::MESH, mesh_m2, MaterialUnit::SquareMeter);
    bom.add(
        sku::TIE_WIRE,
        mesh_m2 * cfg.wire_kg_per_mesh_m2,
        MaterialUnit::Kilogram,
    );

    // Structural ribs along the length; each rib is bent from standard
    // bars covering the cross-section run.
    let ribs = ceil_guarded(length / cfg.rib_spacing_m) + 1.0;
    let bars_per_rib = ceil_guarded(shell.cross_section_m / cfg.bar_length_m);
    bom.add(sku::REBAR, ribs * bars_per_rib, MaterialUnit::Bar);

    // Door frame tubes on the facade end.
    bom.add(sku::STEEL_TUBE, 2.0, MaterialUnit::Tube);

    let description = if length <= 4.0 {
        "Cápsula compacta para parejas, cama queen y visual panorámica.".to_string()
    } else {
        "Suite profunda con sala de estar y baño al fondo.".to_string()
    };

    Ok(EstimateOutput {
        name: format!("Bóveda Glamping ({length:.0} m de profundidad)"),
        description,
        geometry: GeometrySummary {
            area_m2: shell.footprint_area_m2,
            height_m: shell.ridge_height_m,
            volume_liters: None,
        },
        materials: bom.finish(),
        labor: vec![LaborLine {
            sku: sku::LABOR_FERRO_M2.to_string(),
            area_m2: shell.shell_area_m2,
        }],
        extras: vec![
            ExtraLine {
                sku: sku::WATERPROOFING_KIT.to_string(),
                count: 1,
            },
            ExtraLine {
                sku: sku::VAULT_FACADE_KIT.to_string(),
                count: 1,
            },
        ],
    })
}

// ==================== water tank ====================

fn estimate_water_tank(
    capacity_liters: f64,
    book: &PriceBook,
    mixes: &MixBook,
) -> Result<EstimateOutput, EstimateError> {
    let cfg = &book.config;
    let capacity = require_positive("capacity_liters", capacity_liters)?;
    let height = require_positive("water_tank_wall_height_m", cfg.water_tank_wall_height_m)?;

    // Solve the diameter for the requested volume at the standard wall
    // height, then estimate like any cylindrical shell.
    let radius = geometry::cylinder_radius_for_volume(capacity / 1000.0, height);
    let mut output = tank_shell_estimate(2.0 * radius, height, book, mixes)?;
    output.name = format!("Tanque de Agua ({capacity:.0} L)");
    output.description =
        "Tanque cilíndrico de almacenamiento de agua en ferrocemento, acabado hidrófugo."
            .to_string();
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn defaults() -> (PriceBook, MixBook) {
        (PriceBook::builtin(), MixBook::default())
    }

    fn style() -> StyleOptions {
        StyleOptions::default()
    }

    // ==================== dimension validation ====================

    #[test]
    fn test_zero_and_negative_dimensions_are_rejected() {
        let (book, mixes) = defaults();
        let cases = [
            ProductParams::PerimeterWall {
                length_m: 0.0,
                height_m: 2.0,
            },
            ProductParams::PerimeterWall {
                length_m: 10.0,
                height_m: -1.0,
            },
            ProductParams::CircularTank {
                diameter_m: 0.0,
                wall_height_m: 1.2,
            },
            ProductParams::Vault {
                span_width_m: 3.5,
                length_m: 0.0,
                base_wall_height_m: 0.6,
            },
            ProductParams::WaterTank {
                capacity_liters: -500.0,
            },
        ];
        for params in cases {
            let result = estimate(&params, &style(), &book, &mixes);
            assert!(
                matches!(result, Err(EstimateError::InvalidDimension { .. })),
                "expected InvalidDimension for {params:?}"
            );
        }
    }

    #[test]
    fn test_unknown_house_model_is_rejected() {
        let (book, mixes) = defaults();
        let result = estimate(
            &ProductParams::House {
                model: "castillo".to_string(),
            },
            &style(),
            &book,
            &mixes,
        );
        assert_eq!(
            result,
            Err(EstimateError::InvalidOption {
                field: "model",
                value: "castillo".to_string()
            })
        );
    }

    // ==================== perimeter wall ====================

    #[test]
    fn test_wall_reference_scenario() {
        // 50 m × 2.2 m, single mesh: 35 posts, 110 m² of mesh.
        let (book, mixes) = defaults();
        let out = estimate(
            &ProductParams::PerimeterWall {
                length_m: 50.0,
                height_m: 2.2,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        assert_eq!(out.materials[sku::STEEL_TUBE].quantity, dec!(35));
        assert_eq!(out.materials[sku::MESH].quantity, dec!(110.0));
        assert!(out.materials.contains_key(sku::GRAVEL), "strip footing");
        assert!((out.labor[0].area_m2 - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_reinforcement_doubles_mesh() {
        let (book, mixes) = defaults();
        let params = ProductParams::PerimeterWall {
            length_m: 50.0,
            height_m: 2.2,
        };
        let single = estimate(&params, &style(), &book, &mixes).unwrap();
        let double = estimate(
            &params,
            &StyleOptions {
                reinforcement: Reinforcement::Double,
                ..style()
            },
            &book,
            &mixes,
        )
        .unwrap();
        assert_eq!(
            double.materials[sku::MESH].quantity,
            single.materials[sku::MESH].quantity * dec!(2)
        );
    }

    // ==================== circular tank ====================

    #[test]
    fn test_tank_reference_scenario() {
        let (book, mixes) = defaults();
        let out = estimate(
            &ProductParams::CircularTank {
                diameter_m: 4.0,
                wall_height_m: 1.2,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();

        // Geometry: floor ≈ 12.57 m², capacity ≈ 15,080 L.
        assert!((out.geometry.area_m2 - 12.57).abs() < 0.01);
        assert!((out.geometry.volume_liters.unwrap() - 15_079.6).abs() < 1.0);

        // Binder bags = ceil of the summed shell-layer consumption.
        let working: f64 = 27.6460;
        let expected_bags =
            (working * 0.035 / 0.11 + working * 0.012 / 0.14).ceil();
        assert_eq!(
            out.materials[sku::CEMENT].quantity,
            rust_decimal::Decimal::from(expected_bags as u64)
        );
        assert!(out.materials[sku::CEMENT].quantity >= dec!(5));

        // The hydrophobic coat consumes lime; plain walls never do.
        assert!(out.materials.contains_key(sku::LIME));
        // Fixed add-ons are extras line items, not bill-of-material rows.
        assert!(!out.materials.contains_key(sku::TANK_PLUMBING_KIT));
        assert_eq!(out.extras[0].sku, sku::TANK_PLUMBING_KIT);
    }

    #[test]
    fn test_tiny_tank_hits_minimum_bag_floor() {
        let (book, mixes) = defaults();
        let out = estimate(
            &ProductParams::CircularTank {
                diameter_m: 0.4,
                wall_height_m: 1.2,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        assert_eq!(
            out.materials[sku::CEMENT].quantity,
            rust_decimal::Decimal::from(book.config.min_binder_bags)
        );
    }

    #[test]
    fn test_tank_labor_uses_discounted_working_area() {
        let (book, mixes) = defaults();
        let out = estimate(
            &ProductParams::CircularTank {
                diameter_m: 4.0,
                wall_height_m: 1.2,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        assert!((out.labor[0].area_m2 - 27.6460 * 0.8).abs() < 0.01);
    }

    // ==================== water tank ====================

    #[test]
    fn test_water_tank_matches_equivalent_circular_tank() {
        let (book, mixes) = defaults();
        // A Ø4 × 1.2 tank holds ~15,080 L; requesting that capacity must
        // reproduce the same shell.
        let by_diameter = estimate(
            &ProductParams::CircularTank {
                diameter_m: 4.0,
                wall_height_m: 1.2,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        let by_capacity = estimate(
            &ProductParams::WaterTank {
                capacity_liters: 15_079.64,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        assert_eq!(by_capacity.materials, by_diameter.materials);
        assert!((by_capacity.geometry.area_m2 - by_diameter.geometry.area_m2).abs() < 0.01);
    }

    // ==================== vault ====================

    #[test]
    fn test_vault_mesh_scales_with_envelope_not_footprint() {
        let (book, mixes) = defaults();
        // Same footprint, taller skirt: more envelope, more mesh.
        let low = estimate(
            &ProductParams::Vault {
                span_width_m: 3.5,
                length_m: 6.0,
                base_wall_height_m: 0.4,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        let high = estimate(
            &ProductParams::Vault {
                span_width_m: 3.5,
                length_m: 6.0,
                base_wall_height_m: 1.0,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        assert!(high.materials[sku::MESH].quantity > low.materials[sku::MESH].quantity);
    }

    #[test]
    fn test_vault_rib_count() {
        let (book, mixes) = defaults();
        let out = estimate(
            &ProductParams::Vault {
                span_width_m: 3.5,
                length_m: 6.0,
                base_wall_height_m: 0.6,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        // ribs = ceil(6 / 0.5) + 1 = 13; cross-section ≈ 6.70 m → 2 bars.
        assert_eq!(out.materials[sku::REBAR].quantity, dec!(26));
        assert_eq!(out.materials[sku::STEEL_TUBE].quantity, dec!(2));
        assert_eq!(out.extras.len(), 2);
    }

    #[test]
    fn test_vault_reports_ridge_height() {
        let (book, mixes) = defaults();
        let out = estimate(
            &ProductParams::Vault {
                span_width_m: 3.5,
                length_m: 6.0,
                base_wall_height_m: 0.6,
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        assert!((out.geometry.height_m - (0.6 + 1.75)).abs() < 1e-9);
    }

    // ==================== house ====================

    #[test]
    fn test_house_finish_styles_are_mutually_exclusive() {
        let (book, mixes) = defaults();
        let params = ProductParams::House {
            model: "familiar".to_string(),
        };

        let industrial = estimate(
            &params,
            &StyleOptions {
                finish: Some(FinishStyle::Industrial),
                ..style()
            },
            &book,
            &mixes,
        )
        .unwrap();
        assert!(industrial.materials.contains_key(sku::PAINT));
        assert!(!industrial.materials.contains_key(sku::VINYL_CLADDING));
        assert!(!industrial.materials.contains_key(sku::VINYL_ADHESIVE));

        let wood = estimate(
            &params,
            &StyleOptions {
                finish: Some(FinishStyle::WoodLook),
                ..style()
            },
            &book,
            &mixes,
        )
        .unwrap();
        assert!(wood.materials.contains_key(sku::VINYL_CLADDING));
        assert!(wood.materials.contains_key(sku::VINYL_ADHESIVE));
        assert!(!wood.materials.contains_key(sku::PAINT));
    }

    #[test]
    fn test_house_structure_only_quote_skips_finishes() {
        let (book, mixes) = defaults();
        let out = estimate(
            &ProductParams::House {
                model: "loft".to_string(),
            },
            &StyleOptions {
                include_finishes: false,
                ..style()
            },
            &book,
            &mixes,
        )
        .unwrap();
        assert!(!out.materials.contains_key(sku::PAINT));
        assert!(!out.materials.contains_key(sku::VINYL_CLADDING));
    }

    #[test]
    fn test_house_roofing_and_kit_lines() {
        let (book, mixes) = defaults();
        let out = estimate(
            &ProductParams::House {
                model: "loft".to_string(),
            },
            &style(),
            &book,
            &mixes,
        )
        .unwrap();
        // Roof area 35 × 1.15 = 40.25 m² over 5.4 m² panels → 8.
        assert_eq!(out.materials[sku::ROOF_PANEL].quantity, dec!(8));
        // Long side 7 m → 3 ridge caps.
        assert_eq!(out.materials[sku::RIDGE_CAP].quantity, dec!(3));
        assert!(out.materials[sku::PURLIN].quantity > dec!(0));
        assert_eq!(out.extras[0].sku, sku::GLAZING_KIT_SMALL);
        assert_eq!(out.labor[0].sku, sku::LABOR_HOUSE_M2);
        assert_eq!(out.labor[0].area_m2, 35.0);
    }

    #[test]
    fn test_house_models_step_glazing_kits() {
        let (book, mixes) = defaults();
        for (model, kit) in [
            ("loft", sku::GLAZING_KIT_SMALL),
            ("familiar", sku::GLAZING_KIT_MEDIUM),
            ("hacienda", sku::GLAZING_KIT_LARGE),
        ] {
            let out = estimate(
                &ProductParams::House {
                    model: model.to_string(),
                },
                &style(),
                &book,
                &mixes,
            )
            .unwrap();
            assert_eq!(out.extras[0].sku, kit, "model {model}");
        }
    }

    // ==================== ceiling invariant ====================

    #[test]
    fn test_all_countable_quantities_are_integral() {
        let (book, mixes) = defaults();
        let products = [
            ProductParams::House {
                model: "hacienda".to_string(),
            },
            ProductParams::PerimeterWall {
                length_m: 37.3,
                height_m: 2.1,
            },
            ProductParams::CircularTank {
                diameter_m: 5.3,
                wall_height_m: 1.4,
            },
            ProductParams::Vault {
                span_width_m: 4.2,
                length_m: 7.7,
                base_wall_height_m: 0.55,
            },
            ProductParams::WaterTank {
                capacity_liters: 9_000.0,
            },
        ];
        for params in &products {
            let out = estimate(params, &style(), &book, &mixes).unwrap();
            for (sku, line) in &out.materials {
                assert!(
                    line.quantity >= rust_decimal::Decimal::ZERO,
                    "{sku} negative"
                );
                if line.unit.is_countable() {
                    assert_eq!(
                        line.quantity,
                        line.quantity.trunc(),
                        "{sku} must be a whole count, got {}",
                        line.quantity
                    );
                }
            }
        }
    }
}
