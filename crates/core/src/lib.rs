#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod color;
pub mod ray;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use color::{Color, ParseColorError};
pub use ray::{pose_looking_along, Ray};

/// Monotonic frame counter driven by the render loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// First frame of any run.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Identifier of a body inside the room. Equal to its creation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// One of the two fixed controller slots (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ControllerIndex(u8);

/// Returned when a controller slot outside `0..=1` is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("controller index {0} is out of range (expected 0 or 1)")]
pub struct InvalidControllerIndex(pub u8);

impl ControllerIndex {
    /// Number of controller slots.
    pub const COUNT: usize = 2;

    /// Both slots in processing order.
    pub const ALL: [Self; Self::COUNT] = [Self(0), Self(1)];

    /// Slot for `index`, if it exists.
    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < Self::COUNT).then_some(Self(index))
    }

    /// Slot number as an array index.
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u8> for ControllerIndex {
    type Error = InvalidControllerIndex;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidControllerIndex(value))
    }
}

impl From<ControllerIndex> for u8 {
    fn from(value: ControllerIndex) -> Self {
        value.0
    }
}

impl fmt::Display for ControllerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
