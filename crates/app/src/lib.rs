#![warn(missing_docs)]
//! Application core: the scene context and the render loop that drives it.
//!
//! Windowing and GPU work live elsewhere; this crate only needs something
//! implementing [`FrameRenderer`] and an [`xr_room_xr::XrHost`].

mod context;
mod render_loop;
mod stats;

pub use context::{ActiveSpotLight, Lighting, SceneContext};
pub use render_loop::{FrameRenderer, FrameReport, FrameSource, LoopError, LoopState, RenderLoop};
pub use stats::FrameStats;
