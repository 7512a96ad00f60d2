#![warn(missing_docs)]
//! Core primitives shared across the workspace.

mod aabb;
mod pose;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use aabb::Aabb;
pub use pose::{Pose, Ray};

/// Render-pass counter. One increment per frame driven by the render loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameNumber(pub u64);

impl FrameNumber {
    /// First frame of any session.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Slot index of a tracked device as reported by the tracking runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceIndex(pub u32);

impl DeviceIndex {
    /// Slot reserved for the headset. Never drives the pointer.
    pub const HMD: Self = Self(0);

    /// Raw slot number.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// Non-owning handle to a prop stored in an external table.
///
/// Wraps an arena index, so handles to removed props fail to resolve instead
/// of aliasing whatever prop reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropId(Index);

impl PropId {
    /// Wrap an arena index.
    pub const fn from_index(index: Index) -> Self {
        Self(index)
    }

    /// Build a handle from a raw slot and generation.
    pub fn from_raw_parts(slot: usize, generation: u64) -> Self {
        Self(Index::from_raw_parts(slot, generation))
    }

    /// Arena index backing the handle.
    pub fn index(self) -> Index {
        self.0
    }

    /// Slot number in the owning arena.
    pub fn slot(self) -> usize {
        self.0.into_raw_parts().0
    }

    /// Generation the slot had when the handle was issued.
    pub fn generation(self) -> u64 {
        self.0.into_raw_parts().1
    }
}

impl From<Index> for PropId {
    fn from(index: Index) -> Self {
        Self(index)
    }
}

impl fmt::Display for PropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prop#{}v{}", self.slot(), self.generation())
    }
}
