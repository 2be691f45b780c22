//! Wall grids: a discretized 1-inch-cell coordinate space over a wall face.
//!
//! Cell `(0, 0)` is the bottom-left cell as seen from the front of the wall
//! (bottom-right when `flip_x` is set). Cell positions are cell centers on
//! the wall's front face.
//!
//! ```text
//!          up
//!          ▲
//!   ┌──┬──┬──┬──┐
//!   │03│13│23│33│
//!   ├──┼──┼──┼──┤
//!   │02│12│22│32│      cells_x = cells_y = 4
//!   ├──┼──┼──┼──┤      center_cell() = (1, 1)
//!   │01│11│21│31│
//!   ├──┼──┼──┼──┤
//!   │00│10│20│30│
//!   └──┴──┴──┴──┘ ──► right
//! ```
//!
//! Non-integer inch dimensions round to the nearest whole number of cells
//! while the world size keeps the exact declared inches, so cells on such
//! walls are slightly wider or narrower than one inch.

use glam::{Quat, Vec2, Vec3};
use num_traits::Float;

use crate::occupancy::GridOccupancy;
use crate::units::to_scene_extent;

/// Default distance between wall backing and its front face (scene units).
pub const DEFAULT_SURFACE_OFFSET: f32 = 0.005;

/// Largest wall dimension in inches (and cells per axis). Beyond this, f32
/// cell positions stop being distinct.
pub const MAX_CELLS: u32 = 1 << 24;

/// Index of a wall grid within a [`Gallery`](crate::Gallery).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallId(pub(crate) u32);

impl WallId {
    /// Position of the wall in registration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Grid lookup error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Requested cell lies outside the grid.
    #[error("cell ({x}, {y}) outside {cells_x}×{cells_y} grid")]
    CellOutOfBounds {
        x: u32,
        y: u32,
        cells_x: u32,
        cells_y: u32,
    },
}

/// Declared wall geometry. Build with [`WallSpec::build`].
///
/// ```
/// use zenhang::WallSpec;
/// use glam::Vec3;
///
/// let grid = WallSpec::new(120.0, 96.0)
///     .origin(Vec3::new(0.0, 1.5, -4.0))
///     .build();
///
/// assert_eq!((grid.cells_x(), grid.cells_y()), (120, 96));
/// assert_eq!(grid.center_cell(), (59, 47));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WallSpec {
    pub width_inches: f32,
    pub height_inches: f32,
    /// Center of the wall backing in world space.
    pub origin: Vec3,
    /// Wall orientation: local X = right, Y = up, Z = out of the front face.
    pub rotation: Quat,
    /// Backing → front face distance in scene units.
    pub surface_offset: f32,
    /// Index cells right-to-left instead of left-to-right.
    pub flip_x: bool,
}

impl WallSpec {
    /// Wall of the given size at the origin, front face looking along +Z.
    pub fn new(width_inches: f32, height_inches: f32) -> Self {
        Self {
            width_inches,
            height_inches,
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            surface_offset: DEFAULT_SURFACE_OFFSET,
            flip_x: false,
        }
    }

    pub fn origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Orient the wall so its front face looks along `normal`.
    ///
    /// Zero or non-finite normals leave the rotation unchanged.
    pub fn facing(mut self, normal: Vec3) -> Self {
        if let Some(n) = normal.try_normalize() {
            self.rotation = Quat::from_rotation_arc(Vec3::Z, n);
        }
        self
    }

    pub fn surface_offset(mut self, offset: f32) -> Self {
        self.surface_offset = offset;
        self
    }

    pub fn flip_x(mut self, flip: bool) -> Self {
        self.flip_x = flip;
        self
    }

    /// Whether both dimensions are positive and at most [`MAX_CELLS`] inches.
    pub fn is_valid(&self) -> bool {
        let max = MAX_CELLS as f32;
        self.width_inches > 0.0
            && self.height_inches > 0.0
            && self.width_inches <= max
            && self.height_inches <= max
    }

    /// Discretize into a grid. Degenerate dimensions clamp to one cell and
    /// the minimum scene extent; cell counts are capped at [`MAX_CELLS`].
    pub fn build(&self) -> WallGrid {
        let cells_x = dimension_to_cells(self.width_inches);
        let cells_y = dimension_to_cells(self.height_inches);
        let world_size = Vec2::new(
            to_scene_extent(self.width_inches),
            to_scene_extent(self.height_inches),
        );
        WallGrid {
            cells_x,
            cells_y,
            world_size,
            step: world_size / Vec2::new(cells_x as f32, cells_y as f32),
            origin: self.origin,
            rotation: self.rotation.normalize(),
            surface_offset: if self.surface_offset.is_finite() {
                self.surface_offset
            } else {
                DEFAULT_SURFACE_OFFSET
            },
            flip_x: self.flip_x,
            occupancy: GridOccupancy::new(),
        }
    }
}

fn dimension_to_cells(inches: f32) -> u32 {
    if !inches.is_finite() || inches < 1.5 {
        return 1;
    }
    (Float::round(inches) as u32).min(MAX_CELLS)
}

/// A discretized wall surface plus its center occupancy.
#[derive(Clone, Debug, PartialEq)]
pub struct WallGrid {
    cells_x: u32,
    cells_y: u32,
    world_size: Vec2,
    step: Vec2,
    origin: Vec3,
    rotation: Quat,
    surface_offset: f32,
    flip_x: bool,
    occupancy: GridOccupancy,
}

impl WallGrid {
    pub fn cells_x(&self) -> u32 {
        self.cells_x
    }

    pub fn cells_y(&self) -> u32 {
        self.cells_y
    }

    /// Wall width in scene units.
    pub fn world_width(&self) -> f32 {
        self.world_size.x
    }

    /// Wall height in scene units.
    pub fn world_height(&self) -> f32 {
        self.world_size.y
    }

    /// Scene-unit size of one cell.
    pub fn cell_step(&self) -> Vec2 {
        self.step
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn surface_offset(&self) -> f32 {
        self.surface_offset
    }

    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    /// Direction of increasing wall-local X.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Direction the front face looks.
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Center occupancy of this wall.
    pub fn occupancy(&self) -> &GridOccupancy {
        &self.occupancy
    }

    pub(crate) fn occupancy_mut(&mut self) -> &mut GridOccupancy {
        &mut self.occupancy
    }

    /// Center cell. For even counts this is the lower of the two middle
    /// indices on that axis.
    pub fn center_cell(&self) -> (u32, u32) {
        ((self.cells_x - 1) / 2, (self.cells_y - 1) / 2)
    }

    /// Whether `(x, y)` is inside the grid.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.cells_x && y < self.cells_y
    }

    /// Center of the wall's front face.
    pub fn face_center(&self) -> Vec3 {
        self.origin + self.normal() * self.surface_offset
    }

    /// World position of the center of cell `(x, y)` on the front face.
    pub fn world_position(&self, x: u32, y: u32) -> Result<Vec3, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::CellOutOfBounds {
                x,
                y,
                cells_x: self.cells_x,
                cells_y: self.cells_y,
            });
        }
        Ok(self.local_to_world(self.cell_local(x as f32 + 0.5, y as f32 + 0.5)))
    }

    /// Cell containing the projection of `point` onto the wall plane.
    ///
    /// Inverse of [`world_position`](Self::world_position). Returns `None` for
    /// points outside the wall rectangle.
    pub fn cell_from_world(&self, point: Vec3) -> Option<(u32, u32)> {
        let d = point - self.origin;
        let mut lx = d.dot(self.right());
        if self.flip_x {
            lx = -lx;
        }
        let ly = d.dot(self.up());
        let fx = Float::floor(lx / self.step.x + self.cells_x as f32 / 2.0);
        let fy = Float::floor(ly / self.step.y + self.cells_y as f32 / 2.0);
        if !(fx.is_finite() && fy.is_finite()) || fx < 0.0 || fy < 0.0 {
            return None;
        }
        let (x, y) = (fx as u32, fy as u32);
        self.contains(x, y).then_some((x, y))
    }

    /// World position at fractional cell-edge coordinates, where `(0, 0)` is
    /// the wall's outer corner at cell `(0, 0)` and `(cells_x, cells_y)` the
    /// opposite corner.
    pub fn edge_position(&self, edge_x: f32, edge_y: f32) -> Vec3 {
        self.local_to_world(self.cell_local(edge_x, edge_y))
    }

    fn cell_local(&self, edge_x: f32, edge_y: f32) -> Vec2 {
        let mut lx = (edge_x - self.cells_x as f32 / 2.0) * self.step.x;
        if self.flip_x {
            lx = -lx;
        }
        Vec2::new(lx, (edge_y - self.cells_y as f32 / 2.0) * self.step.y)
    }

    fn local_to_world(&self, local: Vec2) -> Vec3 {
        self.origin
            + self.right() * local.x
            + self.up() * local.y
            + self.normal() * self.surface_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{INCHES_PER_UNIT, MIN_SCENE_EXTENT, to_scene};
    use proptest::prelude::*;

    #[test]
    fn cells_round_to_nearest_inch() {
        let g = WallSpec::new(120.4, 95.6).build();
        assert_eq!((g.cells_x(), g.cells_y()), (120, 96));
        // World size keeps the exact inches.
        assert!((g.world_width() - 120.4 / INCHES_PER_UNIT).abs() < 1e-6);
        assert!((g.world_height() - 95.6 / INCHES_PER_UNIT).abs() < 1e-6);
    }

    #[test]
    fn degenerate_dimensions_clamp() {
        let g = WallSpec::new(0.0, -10.0).build();
        assert_eq!((g.cells_x(), g.cells_y()), (1, 1));
        assert_eq!(g.world_width(), MIN_SCENE_EXTENT);
        assert_eq!(g.world_height(), MIN_SCENE_EXTENT);
        assert_eq!(g.center_cell(), (0, 0));
        assert!(!WallSpec::new(0.0, 10.0).is_valid());
        assert!(!WallSpec::new(f32::NAN, 10.0).is_valid());
        assert!(WallSpec::new(0.5, 10.0).is_valid());
    }

    #[test]
    fn huge_dimensions_cap_cell_count() {
        assert!(WallSpec::new(MAX_CELLS as f32, 10.0).is_valid());
        assert!(!WallSpec::new(10.0, 5.0e9).is_valid());
        let g = WallSpec::new(5.0e9, 10.0).build();
        assert_eq!(g.cells_x(), MAX_CELLS);
        let (cx, _) = g.center_cell();
        assert!(g.world_position(cx, 0).is_ok());
    }

    #[test]
    fn corner_cells_symmetric_about_center() {
        let g = WallSpec::new(10.0, 10.0)
            .origin(Vec3::new(2.0, 1.0, -3.0))
            .build();
        let a = g.world_position(0, 0).unwrap();
        let b = g.world_position(9, 9).unwrap();
        let mid = (a + b) / 2.0;
        assert!(mid.abs_diff_eq(g.face_center(), 1e-6));
        // Half a cell in from each edge.
        let half = to_scene(10.0) / 2.0 - to_scene(0.5);
        assert!((g.face_center().x - a.x - half).abs() < 1e-6);
    }

    #[test]
    fn center_tie_break() {
        assert_eq!(WallSpec::new(3.0, 3.0).build().center_cell(), (1, 1));
        assert_eq!(WallSpec::new(4.0, 4.0).build().center_cell(), (1, 1));
        assert_eq!(WallSpec::new(1.0, 2.0).build().center_cell(), (0, 0));
        assert_eq!(WallSpec::new(11.0, 10.0).build().center_cell(), (5, 4));
    }

    #[test]
    fn out_of_bounds_is_error() {
        let g = WallSpec::new(10.0, 8.0).build();
        assert_eq!(
            g.world_position(10, 0),
            Err(GridError::CellOutOfBounds {
                x: 10,
                y: 0,
                cells_x: 10,
                cells_y: 8
            })
        );
        assert!(g.world_position(9, 7).is_ok());
        assert!(g.world_position(0, 8).is_err());
    }

    #[test]
    fn cells_lie_on_front_face() {
        let g = WallSpec::new(10.0, 10.0)
            .facing(Vec3::X)
            .surface_offset(0.1)
            .build();
        assert!(g.normal().abs_diff_eq(Vec3::X, 1e-6));
        let p = g.world_position(3, 7).unwrap();
        assert!((p.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn flip_x_mirrors_indexing() {
        let plain = WallSpec::new(10.0, 10.0).build();
        let flipped = WallSpec::new(10.0, 10.0).flip_x(true).build();
        let a = plain.world_position(0, 5).unwrap();
        let b = flipped.world_position(0, 5).unwrap();
        assert!(a.x < 0.0);
        assert!(b.x > 0.0);
        assert!((a.x + b.x).abs() < 1e-6);
        assert_eq!(flipped.cell_from_world(b), Some((0, 5)));
    }

    #[test]
    fn cell_from_world_rejects_outside_points() {
        let g = WallSpec::new(10.0, 10.0).build();
        let outside = g.edge_position(-0.5, 5.0);
        assert_eq!(g.cell_from_world(outside), None);
        let beyond = g.edge_position(10.5, 5.0);
        assert_eq!(g.cell_from_world(beyond), None);
        assert_eq!(g.cell_from_world(Vec3::NAN), None);
    }

    #[test]
    fn edge_corners_span_world_size() {
        let g = WallSpec::new(48.0, 30.0).build();
        let lo = g.edge_position(0.0, 0.0);
        let hi = g.edge_position(48.0, 30.0);
        assert!(((hi - lo).x - g.world_width()).abs() < 1e-6);
        assert!(((hi - lo).y - g.world_height()).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn cell_position_round_trips(
            w in 1.0f32..300.0,
            h in 1.0f32..300.0,
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            yaw in -3.1f32..3.1,
            flip in any::<bool>(),
        ) {
            let g = WallSpec::new(w, h)
                .origin(Vec3::new(1.0, 2.0, 3.0))
                .rotation(Quat::from_rotation_y(yaw))
                .flip_x(flip)
                .build();
            let x = ((g.cells_x() as f32 * fx) as u32).min(g.cells_x() - 1);
            let y = ((g.cells_y() as f32 * fy) as u32).min(g.cells_y() - 1);
            let p = g.world_position(x, y).unwrap();
            prop_assert_eq!(g.cell_from_world(p), Some((x, y)));
        }
    }
}
