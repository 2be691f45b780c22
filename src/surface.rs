//! Scene collaborators: the ray-intersection service and the registry of
//! wall surfaces.
//!
//! The crate never intersects rays itself. Hosts implement [`Raycaster`]
//! on top of their physics engine and hand discovered walls over as a
//! [`WallRegistry`] instead of letting placement query a live scene.

use alloc::string::String;
use alloc::vec::Vec;

use glam::{Quat, Vec2, Vec3};

/// Tag a surface must carry to count as a wall.
pub const WALL_TAG: &str = "Wall";

/// Physics layer filter passed to ray casts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Deserialize, serde::Serialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// No layer.
    pub const NONE: Self = Self(0);

    /// Mask containing only `layer` (0-31). Out-of-range layers give [`NONE`](Self::NONE).
    pub const fn layer(layer: u32) -> Self {
        if layer < 32 {
            Self(1 << layer)
        } else {
            Self::NONE
        }
    }

    /// Whether `layer` is in the mask.
    pub const fn contains(self, layer: u32) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Host-side identifier of a scene surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// A ray intersection reported by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    /// Surface normal at `point`, facing back toward the ray origin.
    pub normal: Vec3,
    pub surface: SurfaceId,
    /// Scene tag of the hit object.
    pub tag: String,
}

impl RayHit {
    /// Whether the hit object is tagged [`WALL_TAG`].
    pub fn is_wall(&self) -> bool {
        self.tag == WALL_TAG
    }
}

/// Ray-intersection service.
pub trait Raycaster {
    /// Nearest hit along `direction` (normalized) within `max_distance` on
    /// any layer in `layers`.
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit>;
}

impl<R: Raycaster + ?Sized> Raycaster for &R {
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        (**self).cast(origin, direction, max_distance, layers)
    }
}

/// A wall discovered in the scene, for coarse (non-grid) placement.
#[derive(Clone, Debug, PartialEq)]
pub struct WallSurface {
    pub id: SurfaceId,
    /// Center of the wall's bounding box.
    pub center: Vec3,
    /// Orientation: local X = right, Y = up, Z = out of the front face.
    pub rotation: Quat,
    /// Bounding size (width, height) in scene units.
    pub size: Vec2,
    pub tag: String,
    /// False when the wall has no renderable face to hang on.
    pub has_surface: bool,
}

impl WallSurface {
    /// Renderable wall-tagged surface.
    pub fn new(id: SurfaceId, center: Vec3, rotation: Quat, size: Vec2) -> Self {
        Self {
            id,
            center,
            rotation,
            size,
            tag: String::from(WALL_TAG),
            has_surface: true,
        }
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Explicit collection of wall surfaces handed to placement.
#[derive(Clone, Debug, Default)]
pub struct WallRegistry {
    walls: Vec<WallSurface>,
}

impl WallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface. Surfaces not tagged [`WALL_TAG`] are kept but never
    /// used for placement.
    pub fn register(&mut self, wall: WallSurface) -> &mut Self {
        self.walls.push(wall);
        self
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// All registered surfaces, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &WallSurface> {
        self.walls.iter()
    }

    /// Wall-tagged surfaces, in registration order.
    pub fn walls(&self) -> impl Iterator<Item = &WallSurface> {
        self.walls.iter().filter(|w| w.tag == WALL_TAG)
    }
}

impl FromIterator<WallSurface> for WallRegistry {
    fn from_iter<I: IntoIterator<Item = WallSurface>>(iter: I) -> Self {
        Self {
            walls: iter.into_iter().collect(),
        }
    }
}
