//! Artwork → frame sizing.
//!
//! Sizing is a pure function of the artwork's declared size, its image
//! aspect ratio, and the frame style. No frame has to exist before its
//! outer size is known, so placement can validate before creating anything.
//!
//! ```
//! use zenhang::{ArtworkSpec, FrameStyle, ImageSource, sizing::measure};
//!
//! let art = ArtworkSpec::new("Panorama")
//!     .size_inches(20.0, 30.0)
//!     .image(ImageSource::Loaded { width: 2000, height: 1000 });
//!
//! let m = measure(&art, &FrameStyle::unframed());
//! // Height follows the 2:1 image, not the declared 30 in.
//! assert!((m.plane_scene.y - m.plane_scene.x / 2.0).abs() < 1e-6);
//! ```

use glam::Vec2;
use tracing::debug;

use crate::artwork::ArtworkSpec;
use crate::units::{MIN_SCENE_EXTENT, size_to_inches, size_to_scene};

/// Bleed, frame thickness and depth, all in inches.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "json", serde(default, rename_all = "camelCase"))]
pub struct FrameStyle {
    /// Margin between artwork edge and inner frame edge.
    pub bleed_inches: f32,
    /// Width of the frame moulding on each side.
    pub frame_thickness_inches: f32,
    /// How far the frame sticks out from the wall.
    pub frame_depth_inches: f32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            bleed_inches: 1.0,
            frame_thickness_inches: 1.0,
            frame_depth_inches: 1.5,
        }
    }
}

impl FrameStyle {
    /// Style with the given dimensions. Negative values clamp to zero.
    pub fn new(bleed_inches: f32, frame_thickness_inches: f32, frame_depth_inches: f32) -> Self {
        Self {
            bleed_inches,
            frame_thickness_inches,
            frame_depth_inches,
        }
        .normalized()
    }

    /// No bleed, no moulding: outer size equals the artwork plane.
    pub const fn unframed() -> Self {
        Self {
            bleed_inches: 0.0,
            frame_thickness_inches: 0.0,
            frame_depth_inches: 0.0,
        }
    }

    /// Copy with negative or non-finite values replaced by zero.
    pub fn normalized(self) -> Self {
        fn non_negative(v: f32) -> f32 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        Self {
            bleed_inches: non_negative(self.bleed_inches),
            frame_thickness_inches: non_negative(self.frame_thickness_inches),
            frame_depth_inches: non_negative(self.frame_depth_inches),
        }
    }

    /// Bleed + thickness added to each side of the artwork.
    pub fn border_inches(&self) -> f32 {
        let s = self.normalized();
        s.bleed_inches + s.frame_thickness_inches
    }
}

/// Result of sizing one artwork.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameMeasure {
    /// Artwork plane (width, height) in scene units.
    pub plane_scene: Vec2,
    /// Framed size (width, height) in inches, including bleed and moulding.
    pub outer_inches: Vec2,
}

/// Size an artwork for the given frame style.
///
/// Uses the image's aspect ratio when `maintain_aspect_ratio` is set and the
/// image is loaded. Otherwise the declared size is used unchanged.
pub fn measure(artwork: &ArtworkSpec, style: &FrameStyle) -> FrameMeasure {
    let aspect = if artwork.maintain_aspect_ratio {
        let aspect = artwork.image.aspect_ratio();
        if aspect.is_none() {
            debug!(
                title = %artwork.title,
                "no loaded image; using declared size without aspect correction"
            );
        }
        aspect
    } else {
        None
    };
    measure_with_aspect(artwork.preferred_size_inches, aspect, style)
}

/// Size a plane of `preferred_inches`, optionally correcting height to `aspect`
/// (image width / height).
pub fn measure_with_aspect(
    preferred_inches: Vec2,
    aspect: Option<f32>,
    style: &FrameStyle,
) -> FrameMeasure {
    let mut plane = size_to_scene(preferred_inches).max(Vec2::splat(MIN_SCENE_EXTENT));
    if !plane.is_finite() {
        plane = Vec2::splat(MIN_SCENE_EXTENT);
    }
    if let Some(aspect) = aspect.filter(|a| a.is_finite() && *a > 0.0) {
        plane.y = (plane.x / aspect).max(MIN_SCENE_EXTENT);
    }
    let border = style.border_inches();
    FrameMeasure {
        plane_scene: plane,
        outer_inches: size_to_inches(plane) + Vec2::splat(2.0 * border),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::ImageSource;
    use crate::units::to_inches;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn aspect_ratio_overrides_declared_height() {
        let art = ArtworkSpec::new("wide")
            .size_inches(20.0, 30.0)
            .image(ImageSource::Loaded {
                width: 1000,
                height: 500,
            });
        let m = measure(&art, &FrameStyle::unframed());
        assert!(close(m.plane_scene.y, m.plane_scene.x / 2.0));
        assert!(close(to_inches(m.plane_scene.x), 20.0));
        assert!(close(to_inches(m.plane_scene.y), 10.0));
    }

    #[test]
    fn missing_image_keeps_declared_size() {
        let art = ArtworkSpec::new("pending")
            .size_inches(20.0, 30.0)
            .image(ImageSource::Pending {
                url: "https://example.com/x.png".into(),
            });
        let m = measure(&art, &FrameStyle::unframed());
        assert!(close(to_inches(m.plane_scene.y), 30.0));
    }

    #[test]
    fn aspect_ignored_when_not_maintained() {
        let art = ArtworkSpec::new("free")
            .size_inches(20.0, 30.0)
            .maintain_aspect_ratio(false)
            .image(ImageSource::Loaded {
                width: 1000,
                height: 500,
            });
        let m = measure(&art, &FrameStyle::unframed());
        assert!(close(to_inches(m.plane_scene.y), 30.0));
    }

    #[test]
    fn outer_adds_bleed_and_thickness_on_both_sides() {
        let art = ArtworkSpec::new("framed").size_inches(10.0, 8.0);
        let m = measure(&art, &FrameStyle::new(0.5, 1.5, 2.0));
        assert!(close(m.outer_inches.x, 14.0));
        assert!(close(m.outer_inches.y, 12.0));
    }

    #[test]
    fn negative_style_values_clamp_to_zero() {
        let style = FrameStyle::new(-1.0, -3.0, f32::NAN);
        assert_eq!(style, FrameStyle::unframed());
        // Unnormalized literals are clamped when measured too.
        let raw = FrameStyle {
            bleed_inches: -4.0,
            frame_thickness_inches: 1.0,
            frame_depth_inches: 0.0,
        };
        assert_eq!(raw.border_inches(), 1.0);
    }

    #[test]
    fn repeated_measure_is_stable() {
        let art = ArtworkSpec::new("stable")
            .size_inches(17.3, 11.1)
            .image(ImageSource::Loaded {
                width: 1234,
                height: 987,
            });
        let style = FrameStyle::default();
        let first = measure(&art, &style);
        for _ in 0..10 {
            assert_eq!(measure(&art, &style), first);
        }
    }

    #[test]
    fn degenerate_size_clamps_to_minimum_extent() {
        let m = measure_with_aspect(Vec2::new(0.0, -5.0), None, &FrameStyle::unframed());
        assert_eq!(m.plane_scene, Vec2::splat(MIN_SCENE_EXTENT));
        let m = measure_with_aspect(Vec2::new(f32::NAN, 5.0), Some(f32::NAN), &FrameStyle::unframed());
        assert!(m.plane_scene.is_finite());
    }

    #[test]
    fn outer_never_smaller_than_plane() {
        for (w, h) in [(1.0, 1.0), (48.0, 12.0), (5.5, 72.25)] {
            let art = ArtworkSpec::new("x").size_inches(w, h);
            let m = measure(&art, &FrameStyle::default());
            let plane = size_to_inches(m.plane_scene);
            assert!(m.outer_inches.x >= plane.x);
            assert!(m.outer_inches.y >= plane.y);
        }
    }
}
