//! Per-wall center occupancy.
//!
//! Each wall has a single center slot. It holds nothing, one frame, or a
//! side-by-side pair, together with the footprint (in grid cells) the
//! occupant covers.

use glam::Vec2;
use num_traits::Float;

use crate::frame::FrameId;

/// Width × height in whole grid cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub width_cells: u32,
    pub height_cells: u32,
}

impl Footprint {
    /// Empty footprint.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a footprint.
    pub const fn new(width_cells: u32, height_cells: u32) -> Self {
        Self {
            width_cells,
            height_cells,
        }
    }

    /// Cells covered by an object `size` inches across.
    ///
    /// Rounds to the nearest whole cell, never below one cell per axis.
    pub fn from_inches(size: Vec2) -> Self {
        Self::new(inches_to_cells(size.x), inches_to_cells(size.y))
    }

    /// Whether this footprint covers no cells.
    pub fn is_empty(&self) -> bool {
        self.width_cells == 0 || self.height_cells == 0
    }
}

fn inches_to_cells(inches: f32) -> u32 {
    if !inches.is_finite() || inches <= 1.0 {
        return 1;
    }
    // Saturating float→int cast caps absurd sizes at u32::MAX.
    Float::round(inches) as u32
}

/// Occupancy record owned by one wall grid.
///
/// `occupied == false` implies no owner, no partner and a zero footprint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GridOccupancy {
    owner: Option<FrameId>,
    partner: Option<FrameId>,
    footprint: Footprint,
}

impl GridOccupancy {
    /// Empty record.
    pub const fn new() -> Self {
        Self {
            owner: None,
            partner: None,
            footprint: Footprint::ZERO,
        }
    }

    /// Whether the center slot holds anything.
    pub fn is_center_occupied(&self) -> bool {
        self.owner.is_some()
    }

    /// Whether the center slot holds a side-by-side pair.
    pub fn is_pair(&self) -> bool {
        self.partner.is_some()
    }

    /// Record a single frame at the center. Overwrites any previous occupant.
    pub fn mark_center_occupied(&mut self, frame: FrameId, footprint_inches: Vec2) {
        self.owner = Some(frame);
        self.partner = None;
        self.footprint = Footprint::from_inches(footprint_inches);
    }

    /// Record a side-by-side pair covering `footprint` cells.
    pub fn mark_pair_occupied(&mut self, left: FrameId, right: FrameId, footprint: Footprint) {
        self.owner = Some(left);
        self.partner = Some(right);
        self.footprint = footprint;
    }

    /// The single center frame, or the left frame of a pair.
    pub fn center_frame(&self) -> Option<FrameId> {
        self.owner
    }

    /// The right frame of a side-by-side pair.
    pub fn partner_frame(&self) -> Option<FrameId> {
        self.partner
    }

    /// Cells covered by the current occupant(s).
    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Whether `frame` is recorded in this slot.
    pub fn references(&self, frame: FrameId) -> bool {
        self.owner == Some(frame) || self.partner == Some(frame)
    }

    /// Reset to unoccupied.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
