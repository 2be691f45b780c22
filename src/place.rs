//! Placement orchestration.
//!
//! [`Gallery`] owns the wall grids and every placed frame. All mutation goes
//! through `&mut Gallery`, so occupancy decisions always see the latest
//! state. Six strategies are available, chosen by the caller:
//!
//! | Strategy | Method | Uses grid | Failure |
//! |----------|--------|-----------|---------|
//! | Direct | [`place_direct`](Gallery::place_direct) | no | bad normal |
//! | Snap to wall | [`place_snapped`](Gallery::place_snapped) | no | soft: anchor kept |
//! | Center cell | [`place_center`](Gallery::place_center) | yes | center taken |
//! | Side by side | [`place_side_by_side`](Gallery::place_side_by_side) | yes | no occupant, too big |
//! | Round robin | [`place_round_robin`](Gallery::place_round_robin) | no | no usable walls |
//! | Anchor list | [`place_at_anchors`](Gallery::place_at_anchors) | no | extras ignored |
//!
//! ```
//! use zenhang::{ArtworkSpec, Gallery, PlacementConfig, WallSpec};
//!
//! let mut gallery = Gallery::new(PlacementConfig::default());
//! let wall = gallery.add_wall(WallSpec::new(120.0, 96.0)).unwrap();
//!
//! let first = ArtworkSpec::new("Left").size_inches(30.0, 40.0);
//! let second = ArtworkSpec::new("Right").size_inches(30.0, 40.0);
//!
//! gallery.place_center(wall, &first).unwrap();
//! let pair = gallery.place_side_by_side(wall, &second).unwrap();
//!
//! let left = gallery.frame(pair.left).unwrap().transform.position;
//! let right = gallery.frame(pair.right).unwrap().transform.position;
//! assert!(left.x < right.x);
//! ```

use alloc::vec::Vec;
use core::fmt;

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use crate::artwork::ArtworkSpec;
use crate::frame::{FrameArena, FrameId, FrameInstance, Transform};
use crate::grid::{GridError, WallGrid, WallId, WallSpec};
use crate::occupancy::Footprint;
use crate::sizing::{FrameMeasure, FrameStyle, measure};
use crate::surface::{LayerMask, Raycaster, WallRegistry, WallSurface};

/// Placement tuning. Distances are in scene units.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "json", serde(default, rename_all = "camelCase"))]
pub struct PlacementConfig {
    /// Gap between a grid cell on the wall face and the frame's back.
    pub wall_distance: f32,
    /// Gap between a ray hit point and a snapped frame.
    pub snap_offset: f32,
    /// Longest ray cast when snapping anchors to walls.
    pub max_snap_distance: f32,
    /// Physics layers that contain walls.
    pub wall_layers: LayerMask,
    /// Frames per row in round-robin placement.
    pub per_row: u32,
    /// Horizontal center-to-center spacing in round-robin placement.
    pub column_spacing: f32,
    /// Vertical spacing between round-robin rows.
    pub row_spacing: f32,
    /// Frame moulding applied to every placed artwork.
    pub frame_style: FrameStyle,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            wall_distance: 0.02,
            snap_offset: 0.02,
            max_snap_distance: 5.0,
            wall_layers: LayerMask::ALL,
            per_row: 3,
            column_spacing: 2.0,
            row_spacing: 1.5,
            frame_style: FrameStyle::default(),
        }
    }
}

impl PlacementConfig {
    pub fn wall_distance(mut self, distance: f32) -> Self {
        self.wall_distance = distance;
        self
    }

    pub fn snap_offset(mut self, offset: f32) -> Self {
        self.snap_offset = offset;
        self
    }

    pub fn max_snap_distance(mut self, distance: f32) -> Self {
        self.max_snap_distance = distance;
        self
    }

    pub fn wall_layers(mut self, layers: LayerMask) -> Self {
        self.wall_layers = layers;
        self
    }

    /// Round-robin row length (at least 1).
    pub fn per_row(mut self, per_row: u32) -> Self {
        self.per_row = per_row.max(1);
        self
    }

    pub fn spacing(mut self, column: f32, row: f32) -> Self {
        self.column_spacing = column;
        self.row_spacing = row;
        self
    }

    pub fn frame_style(mut self, style: FrameStyle) -> Self {
        self.frame_style = style.normalized();
        self
    }

    /// Read a config from JSON. Missing fields keep their defaults.
    ///
    /// ```
    /// let config = zenhang::PlacementConfig::from_json(
    ///     r#"{ "perRow": 4, "frameStyle": { "bleedInches": 2.0 } }"#,
    /// ).unwrap();
    /// assert_eq!(config.per_row, 4);
    /// assert_eq!(config.frame_style.bleed_inches, 2.0);
    /// assert_eq!(config.frame_style.frame_thickness_inches, 1.0);
    /// ```
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.per_row(config.per_row).frame_style(config.frame_style))
    }
}

/// Left or right half of a wall in side-by-side placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HalfSide {
    Left,
    Right,
}

impl fmt::Display for HalfSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Why a placement was rejected. Rejections never leave partial state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("no wall with id {0:?}")]
    UnknownWall(WallId),
    #[error("wall dimensions must be positive and at most {} inches", crate::grid::MAX_CELLS)]
    DegenerateWall,
    #[error("wall normal must be non-zero and finite")]
    InvalidNormal,
    #[error("position must be finite")]
    InvalidPosition,
    #[error("center of wall {0:?} is already occupied")]
    CenterOccupied(WallId),
    #[error("wall {0:?} has no center occupant to pair with")]
    NoCenterOccupant(WallId),
    #[error("center of wall {0:?} already holds a pair")]
    CenterFull(WallId),
    #[error("frame is {needed} cells tall, wall has {available}")]
    ExceedsWallHeight { needed: u32, available: u32 },
    #[error("frame is {needed} cells wide, {side} half has {available}")]
    ExceedsHalfWidth {
        side: HalfSide,
        needed: u32,
        available: u32,
    },
    #[error("no wall surface to hang on")]
    NoWallSurfaces,
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// How a snapped placement resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SnapOutcome {
    /// Wall found behind the anchor (along −forward).
    Behind,
    /// Wall found in front of the anchor (along +forward).
    Ahead,
    /// No wall in either direction; the anchor transform was used as-is.
    Unsnapped,
}

/// Result of a successful side-by-side placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SideBySide {
    /// The previous center occupant, now centered on the left half.
    pub left: FrameId,
    /// The new frame, centered on the right half.
    pub right: FrameId,
    /// Cells spanned from the left frame's left edge to the right frame's
    /// right edge, by the taller frame's height.
    pub footprint: Footprint,
}

/// Wall grids plus every placed frame.
#[derive(Clone, Debug, Default)]
pub struct Gallery {
    config: PlacementConfig,
    walls: Vec<WallGrid>,
    frames: FrameArena,
}

impl Gallery {
    /// Empty gallery.
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config: PlacementConfig {
                per_row: config.per_row.max(1),
                frame_style: config.frame_style.normalized(),
                ..config
            },
            walls: Vec::new(),
            frames: FrameArena::new(),
        }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Build and register a wall grid.
    pub fn add_wall(&mut self, spec: WallSpec) -> Result<WallId, PlacementError> {
        if !spec.is_valid() {
            warn!(
                width = spec.width_inches,
                height = spec.height_inches,
                "rejecting degenerate wall"
            );
            return Err(PlacementError::DegenerateWall);
        }
        let id = WallId(self.walls.len() as u32);
        self.walls.push(spec.build());
        Ok(id)
    }

    pub fn wall(&self, id: WallId) -> Option<&WallGrid> {
        self.walls.get(id.index())
    }

    /// Registered walls in order.
    pub fn walls(&self) -> impl Iterator<Item = (WallId, &WallGrid)> {
        self.walls
            .iter()
            .enumerate()
            .map(|(i, w)| (WallId(i as u32), w))
    }

    pub fn frame(&self, id: FrameId) -> Option<&FrameInstance> {
        self.frames.get(id)
    }

    pub fn frames(&self) -> &FrameArena {
        &self.frames
    }

    /// Number of live frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frames registered on `wall`.
    pub fn frames_on(&self, wall: WallId) -> impl Iterator<Item = (FrameId, &FrameInstance)> {
        self.frames.iter().filter(move |(_, f)| f.wall == Some(wall))
    }

    /// Size `artwork` with the configured frame style.
    pub fn measure(&self, artwork: &ArtworkSpec) -> FrameMeasure {
        measure(artwork, &self.config.frame_style)
    }

    fn spawn(
        &mut self,
        artwork: &ArtworkSpec,
        measure: FrameMeasure,
        transform: Transform,
        wall: Option<WallId>,
    ) -> FrameId {
        let id = self.frames.insert(FrameInstance {
            artwork: artwork.clone(),
            measure,
            style: self.config.frame_style,
            transform,
            wall,
        });
        debug!(
            title = %artwork.title,
            x = transform.position.x,
            y = transform.position.y,
            z = transform.position.z,
            "placed frame"
        );
        id
    }

    fn grid(&self, id: WallId) -> Result<&WallGrid, PlacementError> {
        self.walls.get(id.index()).ok_or_else(|| {
            warn!(wall = id.index(), "unknown wall");
            PlacementError::UnknownWall(id)
        })
    }

    /// Place at `position`, facing along `wall_normal`. No grid bookkeeping.
    pub fn place_direct(
        &mut self,
        artwork: &ArtworkSpec,
        position: Vec3,
        wall_normal: Vec3,
    ) -> Result<FrameId, PlacementError> {
        if !position.is_finite() {
            warn!(title = %artwork.title, "direct placement with non-finite position");
            return Err(PlacementError::InvalidPosition);
        }
        let Some(normal) = wall_normal.try_normalize() else {
            warn!(title = %artwork.title, "direct placement with degenerate normal");
            return Err(PlacementError::InvalidNormal);
        };
        let m = self.measure(artwork);
        Ok(self.spawn(artwork, m, Transform::facing(position, normal), None))
    }

    /// Resolve an anchor against nearby walls without placing anything.
    ///
    /// Casts along −forward first, then +forward. A hit must be wall-tagged.
    pub fn snap_to_wall<R: Raycaster + ?Sized>(
        &self,
        anchor: Transform,
        raycaster: &R,
    ) -> (Transform, SnapOutcome) {
        let forward = anchor.forward();
        let attempts = [(-forward, SnapOutcome::Behind), (forward, SnapOutcome::Ahead)];
        for (direction, outcome) in attempts {
            let hit = raycaster
                .cast(
                    anchor.position,
                    direction,
                    self.config.max_snap_distance,
                    self.config.wall_layers,
                )
                .filter(|hit| hit.is_wall());
            let Some(hit) = hit else { continue };
            let Some(normal) = hit.normal.try_normalize() else {
                continue;
            };
            let position = hit.point + normal * self.config.snap_offset;
            return (Transform::facing(position, normal), outcome);
        }
        (anchor, SnapOutcome::Unsnapped)
    }

    /// Place at an anchor, snapped onto the nearest wall in front of or
    /// behind it. Falls back to the anchor transform when no wall is hit.
    pub fn place_snapped<R: Raycaster + ?Sized>(
        &mut self,
        artwork: &ArtworkSpec,
        anchor: Transform,
        raycaster: &R,
    ) -> (FrameId, SnapOutcome) {
        let (transform, outcome) = self.snap_to_wall(anchor, raycaster);
        if outcome == SnapOutcome::Unsnapped {
            warn!(
                title = %artwork.title,
                "no wall found around anchor; using anchor transform"
            );
        }
        let m = self.measure(artwork);
        (self.spawn(artwork, m, transform, None), outcome)
    }

    /// Place at the wall's center cell and record the occupancy.
    pub fn place_center(
        &mut self,
        wall: WallId,
        artwork: &ArtworkSpec,
    ) -> Result<FrameId, PlacementError> {
        let grid = self.grid(wall)?;
        if grid.occupancy().is_center_occupied() {
            warn!(wall = wall.index(), title = %artwork.title, "wall center already occupied");
            return Err(PlacementError::CenterOccupied(wall));
        }
        let (cx, cy) = grid.center_cell();
        let position = grid.world_position(cx, cy)? + grid.normal() * self.config.wall_distance;
        let transform = Transform::new(position, grid.rotation());

        let m = self.measure(artwork);
        let id = self.spawn(artwork, m, transform, Some(wall));
        self.walls[wall.index()]
            .occupancy_mut()
            .mark_center_occupied(id, m.outer_inches);
        Ok(id)
    }

    /// Hang a second artwork next to the wall's current center occupant.
    ///
    /// The wall is split at `cells_x / 2`; the existing frame moves to the
    /// center of the left half and the new one goes to the center of the
    /// right half. Both must fit their half and the wall height, otherwise
    /// nothing changes.
    pub fn place_side_by_side(
        &mut self,
        wall: WallId,
        artwork: &ArtworkSpec,
    ) -> Result<SideBySide, PlacementError> {
        let grid = self.grid(wall)?;
        let occupancy = *grid.occupancy();
        let Some(left) = occupancy.center_frame() else {
            warn!(wall = wall.index(), "side-by-side placement without a center occupant");
            return Err(PlacementError::NoCenterOccupant(wall));
        };
        if occupancy.is_pair() {
            warn!(wall = wall.index(), "wall center already holds a pair");
            return Err(PlacementError::CenterFull(wall));
        }
        let Some(left_frame) = self.frames.get(left) else {
            warn!(wall = wall.index(), "center occupant no longer exists");
            return Err(PlacementError::NoCenterOccupant(wall));
        };

        let right_measure = self.measure(artwork);
        let left_cells = Footprint::from_inches(left_frame.outer_size_inches());
        let right_cells = Footprint::from_inches(right_measure.outer_inches);

        let (cells_x, cells_y) = (grid.cells_x(), grid.cells_y());
        let needed_height = left_cells.height_cells.max(right_cells.height_cells);
        if needed_height > cells_y {
            warn!(
                wall = wall.index(),
                needed = needed_height,
                available = cells_y,
                "side-by-side rejected: too tall"
            );
            return Err(PlacementError::ExceedsWallHeight {
                needed: needed_height,
                available: cells_y,
            });
        }

        let mid = cells_x / 2;
        let right_half = cells_x - mid;
        for (side, needed, available) in [
            (HalfSide::Left, left_cells.width_cells, mid),
            (HalfSide::Right, right_cells.width_cells, right_half),
        ] {
            if needed > available {
                warn!(
                    wall = wall.index(),
                    %side,
                    needed,
                    available,
                    "side-by-side rejected: too wide for half"
                );
                return Err(PlacementError::ExceedsHalfWidth {
                    side,
                    needed,
                    available,
                });
            }
        }

        // mid >= 1 here: a zero-width left half cannot fit the 1-cell minimum.
        let left_x = (mid - 1) / 2;
        let right_x = mid + (right_half - 1) / 2;
        let row = (cells_y - 1) / 2;
        let offset = grid.normal() * self.config.wall_distance;
        let left_pos = grid.world_position(left_x, row)? + offset;
        let right_pos = grid.world_position(right_x, row)? + offset;
        let rotation = grid.rotation();
        let footprint = Footprint::new(
            pair_span(left_x, left_cells.width_cells, right_x, right_cells.width_cells),
            needed_height,
        );

        if let Some(frame) = self.frames.get_mut(left) {
            frame.transform.position = left_pos;
        }
        let right = self.spawn(
            artwork,
            right_measure,
            Transform::new(right_pos, rotation),
            Some(wall),
        );
        self.walls[wall.index()]
            .occupancy_mut()
            .mark_pair_occupied(left, right, footprint);
        Ok(SideBySide {
            left,
            right,
            footprint,
        })
    }

    /// Spread artworks over wall surfaces: artwork `i` goes to usable wall
    /// `i % n`, filling rows of `per_row` frames centered on the wall and
    /// stacking further rows downward.
    ///
    /// Surfaces without a renderable face are skipped with a warning.
    pub fn place_round_robin(
        &mut self,
        artworks: &[ArtworkSpec],
        surfaces: &WallRegistry,
    ) -> Result<Vec<FrameId>, PlacementError> {
        let usable: Vec<&WallSurface> = surfaces
            .walls()
            .filter(|w| {
                if !w.has_surface {
                    warn!(surface = w.id.0, "wall has no renderable surface; skipping");
                }
                w.has_surface
            })
            .collect();
        if usable.is_empty() {
            warn!(artworks = artworks.len(), "no usable wall surfaces");
            return Err(PlacementError::NoWallSurfaces);
        }

        let n = usable.len();
        let per_row = self.config.per_row.max(1) as usize;
        let mut placed = Vec::with_capacity(artworks.len());
        for (i, artwork) in artworks.iter().enumerate() {
            let wall_index = i % n;
            let wall = usable[wall_index];
            let slot = i / n;
            let on_wall = (artworks.len() - wall_index).div_ceil(n);
            let offset = grid_slot_offset(
                slot,
                on_wall,
                per_row,
                Vec2::new(self.config.column_spacing, self.config.row_spacing),
            );
            let position = wall.center
                + wall.right() * offset.x
                + wall.up() * offset.y
                + wall.normal() * self.config.wall_distance;
            let m = self.measure(artwork);
            placed.push(self.spawn(
                artwork,
                m,
                Transform::new(position, wall.rotation),
                None,
            ));
        }
        Ok(placed)
    }

    /// Pair artwork `i` with anchor `i` and snap each onto a wall.
    ///
    /// Stops at the shorter of the two lists; leftovers on either side are
    /// ignored.
    pub fn place_at_anchors<R: Raycaster + ?Sized>(
        &mut self,
        artworks: &[ArtworkSpec],
        anchors: &[Transform],
        raycaster: &R,
    ) -> Vec<(FrameId, SnapOutcome)> {
        if artworks.len() != anchors.len() {
            debug!(
                artworks = artworks.len(),
                anchors = anchors.len(),
                "artwork and anchor counts differ; extras ignored"
            );
        }
        artworks
            .iter()
            .zip(anchors)
            .map(|(artwork, anchor)| self.place_snapped(artwork, *anchor, raycaster))
            .collect()
    }

    /// Remove a frame and update any wall occupancy that referenced it.
    ///
    /// When one frame of a side-by-side pair is removed, the survivor is
    /// moved back to the wall's center cell and becomes the single occupant.
    pub fn remove_frame(&mut self, id: FrameId) -> Option<FrameInstance> {
        let removed = self.frames.remove(id)?;
        let distance = self.config.wall_distance;
        for grid in &mut self.walls {
            let occupancy = *grid.occupancy();
            if !occupancy.references(id) {
                continue;
            }
            let survivor = [occupancy.center_frame(), occupancy.partner_frame()]
                .into_iter()
                .flatten()
                .find(|other| *other != id);
            grid.occupancy_mut().clear();
            let Some(survivor) = survivor else { continue };
            let (cx, cy) = grid.center_cell();
            let Ok(cell) = grid.world_position(cx, cy) else {
                continue;
            };
            let position = cell + grid.normal() * distance;
            if let Some(frame) = self.frames.get_mut(survivor) {
                frame.transform.position = position;
                let outer = frame.outer_size_inches();
                grid.occupancy_mut().mark_center_occupied(survivor, outer);
            }
        }
        Some(removed)
    }

    /// Remove every frame on `wall` and reset its occupancy. Returns the
    /// number of frames removed.
    pub fn clear_wall(&mut self, wall: WallId) -> Result<usize, PlacementError> {
        self.grid(wall)?;
        let ids: Vec<FrameId> = self.frames_on(wall).map(|(id, _)| id).collect();
        for id in &ids {
            self.frames.remove(*id);
        }
        self.walls[wall.index()].occupancy_mut().clear();
        Ok(ids.len())
    }

    /// Remove every frame and reset all occupancy. Walls stay registered.
    pub fn clear(&mut self) {
        self.frames.clear();
        for grid in &mut self.walls {
            grid.occupancy_mut().clear();
        }
    }
}

/// Width in cells from the left frame's left edge to the right frame's
/// right edge, each frame centered on its cell.
fn pair_span(left_x: u32, left_w: u32, right_x: u32, right_w: u32) -> u32 {
    // Doubled edge coordinates keep half cells exact.
    let left_edge2 = 2 * left_x as i64 + 1 - left_w as i64;
    let right_edge2 = 2 * right_x as i64 + 1 + right_w as i64;
    let span2 = (right_edge2 - left_edge2).max(0);
    ((span2 + 1) / 2) as u32
}

/// Offset (right, up) of round-robin slot `slot` on a wall holding `on_wall`
/// frames in rows of `per_row`.
fn grid_slot_offset(slot: usize, on_wall: usize, per_row: usize, spacing: Vec2) -> Vec2 {
    let column = slot % per_row;
    let row = slot / per_row;
    let row_len = on_wall.saturating_sub(row * per_row).clamp(1, per_row);
    let x = (column as f32 - (row_len - 1) as f32 / 2.0) * spacing.x;
    let y = -(row as f32) * spacing.y;
    Vec2::new(x, y)
}
