//! Artwork hanging layout: wall grids, frame sizing, occupancy, and placement.
//!
//! Pure geometry and bookkeeping. No rendering, no input, no networking;
//! ray casts and image fetches are supplied by the host. `no_std` + `alloc`
//! compatible.
//!
//! # Modules
//!
//! - [`units`] — Inch ↔ scene-unit (meter) conversion
//! - [`grid`] — Wall grids with 1-inch cells and cell ↔ world mapping
//! - [`occupancy`] — Per-wall center occupancy and cell footprints
//! - [`sizing`] — Artwork plane and framed outer sizes
//! - [`place`] — The [`Gallery`] and its placement strategies
//! - [`surface`] — Ray-cast service trait and wall-surface registry
//! - [`load`] — Gate that holds placement until image loads resolve
//! - [`catalog`] — JSON artwork catalogs (feature `json`)
//! - [`svg`] — Wall occupancy visualization (feature `svg`)
//!
//! # Example
//!
//! ```
//! use zenhang::{ArtworkSpec, Gallery, PlacementConfig, WallSpec, Footprint};
//!
//! let mut gallery = Gallery::new(PlacementConfig::default());
//! let wall = gallery.add_wall(WallSpec::new(120.0, 96.0)).unwrap();
//!
//! let art = ArtworkSpec::new("Study in Blue").size_inches(20.0, 16.0);
//! let frame = gallery.place_center(wall, &art).unwrap();
//!
//! // Default frame style adds 2 in (1 in bleed + 1 in moulding) per side.
//! let occupancy = gallery.wall(wall).unwrap().occupancy();
//! assert_eq!(occupancy.center_frame(), Some(frame));
//! assert_eq!(occupancy.footprint(), Footprint::new(24, 20));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod artwork;
pub mod frame;
pub mod grid;
pub mod load;
pub mod occupancy;
pub mod place;
pub mod sizing;
pub mod surface;
pub mod units;

#[cfg(feature = "json")]
pub mod catalog;

#[cfg(feature = "svg")]
pub mod svg;

pub use artwork::{ArtworkSpec, ImageSource};
pub use frame::{FrameArena, FrameId, FrameInstance, Transform};
pub use grid::{GridError, WallGrid, WallId, WallSpec};
pub use load::{LoadBatch, LoadConfig, LoadError, LoadFailure};
pub use occupancy::{Footprint, GridOccupancy};
pub use place::{Gallery, HalfSide, PlacementConfig, PlacementError, SideBySide, SnapOutcome};
pub use sizing::{FrameMeasure, FrameStyle};
pub use surface::{
    LayerMask, RayHit, Raycaster, SurfaceId, WALL_TAG, WallRegistry, WallSurface,
};

// Re-exported so callers can build positions without a direct glam dependency.
pub use glam;
