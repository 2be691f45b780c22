//! Placed frames and the arena that owns them.

use alloc::vec::Vec;

use glam::{Quat, Vec2, Vec3};

use crate::artwork::ArtworkSpec;
use crate::grid::WallId;
use crate::sizing::{FrameMeasure, FrameStyle};

/// Position and orientation of a placed frame.
///
/// The frame's front face looks along [`forward`](Self::forward) (local +Z).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    /// Origin, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a transform.
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Transform at `position` whose forward axis points along `normal`.
    ///
    /// `normal` must be normalized.
    pub fn facing(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_arc(Vec3::Z, normal),
        }
    }

    /// Local +Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Generational handle to a frame in a [`FrameArena`].
///
/// Handles are relations only: holding one does not keep the frame alive,
/// and a handle to a removed frame never resolves again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameId {
    index: u32,
    generation: u32,
}

/// A placed, renderable occurrence of an artwork.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameInstance {
    /// The artwork shown in this frame.
    pub artwork: ArtworkSpec,
    /// Plane and outer sizes computed at placement time.
    pub measure: FrameMeasure,
    /// Bleed / thickness / depth used for `measure`.
    pub style: FrameStyle,
    /// World transform of the frame's front face center.
    pub transform: Transform,
    /// Wall grid the frame is registered on, if any.
    pub wall: Option<WallId>,
}

impl FrameInstance {
    /// Artwork plane size in scene units.
    pub fn plane_size(&self) -> Vec2 {
        self.measure.plane_scene
    }

    /// Total framed size in inches (plane + bleed + frame on each side).
    pub fn outer_size_inches(&self) -> Vec2 {
        self.measure.outer_inches
    }

    /// Frame depth in inches.
    pub fn depth_inches(&self) -> f32 {
        self.style.frame_depth_inches
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    frame: Option<FrameInstance>,
}

/// Owner of every placed frame.
#[derive(Clone, Debug, Default)]
pub struct FrameArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl FrameArena {
    /// Empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live frames.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no frames are live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store a frame and return its handle.
    pub fn insert(&mut self, frame: FrameInstance) -> FrameId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.frame = Some(frame);
            return FrameId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            frame: Some(frame),
        });
        FrameId {
            index,
            generation: 0,
        }
    }

    /// Remove a frame. Returns `None` for stale handles.
    pub fn remove(&mut self, id: FrameId) -> Option<FrameInstance> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let frame = slot.frame.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(frame)
    }

    /// Whether `id` refers to a live frame.
    pub fn contains(&self, id: FrameId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: FrameId) -> Option<&FrameInstance> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.frame.as_ref()
    }

    pub fn get_mut(&mut self, id: FrameId) -> Option<&mut FrameInstance> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.frame.as_mut()
    }

    /// Live frames with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameId, &FrameInstance)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.frame.as_ref().map(|f| {
                (
                    FrameId {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    f,
                )
            })
        })
    }

    /// Remove every frame. Outstanding handles become stale.
    pub fn clear(&mut self) {
        let ids: Vec<FrameId> = self.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.remove(id);
        }
    }
}
