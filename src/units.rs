//! Inch ↔ scene-unit conversion.
//!
//! One scene unit is one meter. Artwork and wall dimensions are authored in
//! inches; everything the renderer sees is in scene units.

use glam::Vec2;

/// Inches per scene unit (1 m = 39.3700787 in).
pub const INCHES_PER_UNIT: f32 = 39.370_0787;

/// Smallest extent (scene units) any generated surface may have.
pub const MIN_SCENE_EXTENT: f32 = 0.01;

/// Convert inches to scene units.
#[inline]
pub fn to_scene(inches: f32) -> f32 {
    inches / INCHES_PER_UNIT
}

/// Convert scene units to inches.
#[inline]
pub fn to_inches(units: f32) -> f32 {
    units * INCHES_PER_UNIT
}

/// Per-axis [`to_scene`].
#[inline]
pub fn size_to_scene(inches: Vec2) -> Vec2 {
    inches / INCHES_PER_UNIT
}

/// Per-axis [`to_inches`].
#[inline]
pub fn size_to_inches(units: Vec2) -> Vec2 {
    units * INCHES_PER_UNIT
}

/// Convert inches to scene units, clamped to at least [`MIN_SCENE_EXTENT`].
///
/// Non-finite and non-positive inputs produce the minimum extent.
pub(crate) fn to_scene_extent(inches: f32) -> f32 {
    let units = to_scene(inches);
    if units.is_finite() && units > MIN_SCENE_EXTENT {
        units
    } else {
        MIN_SCENE_EXTENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_meter_is_39_37_inches() {
        assert!((to_inches(1.0) - 39.370_08).abs() < 1e-4);
        assert!((to_scene(39.370_0787) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(to_scene(0.0), 0.0);
        assert_eq!(to_inches(0.0), 0.0);
    }

    #[test]
    fn vec_helpers_match_scalar() {
        let v = Vec2::new(20.0, 30.0);
        let s = size_to_scene(v);
        assert_eq!(s.x, to_scene(20.0));
        assert_eq!(s.y, to_scene(30.0));
        let back = size_to_inches(s);
        assert!((back - v).abs().max_element() < 1e-4);
    }

    #[test]
    fn extent_clamps_degenerate_input() {
        assert_eq!(to_scene_extent(0.0), MIN_SCENE_EXTENT);
        assert_eq!(to_scene_extent(-12.0), MIN_SCENE_EXTENT);
        assert_eq!(to_scene_extent(f32::NAN), MIN_SCENE_EXTENT);
        assert_eq!(to_scene_extent(f32::INFINITY), MIN_SCENE_EXTENT);
        // 0.2 in is below 1 cm
        assert_eq!(to_scene_extent(0.2), MIN_SCENE_EXTENT);
        assert!((to_scene_extent(120.0) - 120.0 / INCHES_PER_UNIT).abs() < 1e-7);
    }

    proptest! {
        #[test]
        fn inches_round_trip(x in 0.0f32..256.0) {
            let back = to_inches(to_scene(x));
            prop_assert!((back - x).abs() <= 1e-4, "{x} -> {back}");
        }

        #[test]
        fn inches_round_trip_large(x in 256.0f32..10_000.0) {
            let back = to_inches(to_scene(x));
            // Past 256 in, a few f32 ulps exceed 1e-4; bound the error relatively.
            prop_assert!((back - x).abs() <= x * 1e-6, "{x} -> {back}");
        }
    }
}
