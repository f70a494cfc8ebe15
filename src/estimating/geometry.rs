//! Pure geometry helpers.
//!
//! Area/volume/length formulas per shape family. Referentially transparent:
//! same inputs, same outputs, no state. This is what keeps the whole
//! costing core trivially unit-testable.

use std::f64::consts::PI;

/// Wall face area of a straight run: perimeter (or length) × height.
pub fn rectangular_wall_area(perimeter_m: f64, height_m: f64) -> f64 {
    perimeter_m * height_m
}

/// Area of a circle given its diameter.
pub fn circle_area(diameter_m: f64) -> f64 {
    let radius = diameter_m / 2.0;
    PI * radius * radius
}

/// Circumference of a circle given its diameter.
pub fn circle_perimeter(diameter_m: f64) -> f64 {
    PI * diameter_m
}

/// Shell figures for a cylindrical tank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankShell {
    pub floor_area_m2: f64,
    pub wall_area_m2: f64,
    /// Floor + wall: the total area the crew plasters.
    pub working_area_m2: f64,
    pub capacity_liters: f64,
}

/// Cylindrical tank: floor = π·r², wall = π·d·h.
pub fn circular_tank_shell(diameter_m: f64, wall_height_m: f64) -> TankShell {
    let floor_area_m2 = circle_area(diameter_m);
    let wall_area_m2 = circle_perimeter(diameter_m) * wall_height_m;
    TankShell {
        floor_area_m2,
        wall_area_m2,
        working_area_m2: floor_area_m2 + wall_area_m2,
        capacity_liters: floor_area_m2 * wall_height_m * 1000.0,
    }
}

/// Shell figures for a vaulted (half-barrel) structure on skirt walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VaultShell {
    pub radius_m: f64,
    /// Arc length of the half-circle cross-section.
    pub arc_length_m: f64,
    /// Arc + two vertical skirts: the cross-section perimeter one rib
    /// follows.
    pub cross_section_m: f64,
    /// (arc + skirts) × length.
    pub envelope_area_m2: f64,
    /// One end cap (tympanum): semicircle over a skirt-height rectangle.
    pub tympanum_area_m2: f64,
    /// Envelope plus both end caps.
    pub shell_area_m2: f64,
    pub footprint_area_m2: f64,
    /// Skirt height + radius. Larger spans yield taller ceilings by
    /// construction; the coupling is a design property of the product.
    pub ridge_height_m: f64,
}

/// Vault modeled as a circular-segment cross-section (half-circle
/// approximation) over vertical skirt walls of the given base height.
pub fn vault_shell(span_width_m: f64, length_m: f64, skirt_height_m: f64) -> VaultShell {
    let radius_m = span_width_m / 2.0;
    let arc_length_m = PI * radius_m;
    let cross_section_m = arc_length_m + 2.0 * skirt_height_m;
    let tympanum_area_m2 = PI * radius_m * radius_m / 2.0 + span_width_m * skirt_height_m;
    let envelope_area_m2 = cross_section_m * length_m;
    VaultShell {
        radius_m,
        arc_length_m,
        cross_section_m,
        envelope_area_m2,
        tympanum_area_m2,
        shell_area_m2: envelope_area_m2 + 2.0 * tympanum_area_m2,
        footprint_area_m2: span_width_m * length_m,
        ridge_height_m: skirt_height_m + radius_m,
    }
}

/// Recover a rectangle's (long, short) sides from its perimeter and area.
///
/// Used to find the ridge/purlin runs of a house roof when only the floor
/// area and the perimeter are known. Falls back to a square of equal area
/// when the pair is not realizable as a rectangle.
pub fn rectangle_sides(perimeter_m: f64, area_m2: f64) -> (f64, f64) {
    let half = perimeter_m / 2.0;
    let discriminant = (half / 2.0) * (half / 2.0) - area_m2;
    if discriminant < 0.0 {
        let side = area_m2.sqrt();
        return (side, side);
    }
    let offset = discriminant.sqrt();
    (half / 2.0 + offset, half / 2.0 - offset)
}

/// Invert V = π·r²·h: radius of a cylinder holding `volume_m3` at the given
/// wall height.
pub fn cylinder_radius_for_volume(volume_m3: f64, height_m: f64) -> f64 {
    (volume_m3 / (PI * height_m)).sqrt()
}
