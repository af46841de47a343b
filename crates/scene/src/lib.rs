#![warn(missing_docs)]
//! Scene data for the room: procedural geometry, the room and its bodies,
//! the highlight marker and ray casting.

pub mod builder;
pub mod geometry;
pub mod highlight;
pub mod raycast;
pub mod room;

pub use builder::{SceneBuilder, SceneConfig};
pub use geometry::{LineData, MeshData};
pub use highlight::{Highlight, HighlightConfig};
pub use raycast::{RayHit, Raycaster};
pub use room::{Body, Room, RoomShell};
