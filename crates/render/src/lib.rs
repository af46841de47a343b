#![warn(missing_docs)]
//! Rendering facade built on top of wgpu.
//!
//! [`SceneDrawList`] turns a [`xr_room_app::SceneContext`] into instanced
//! batches and line vertices without touching the GPU; [`Renderer`] uploads
//! and draws it into a winit window.

mod camera;
mod context;
mod draw_list;
mod gpu_mesh;
mod lighting;
mod mesh;
mod pipeline;
mod renderer;
mod window;

pub use camera::CameraUniform;
pub use context::{RenderContext, RenderError, DEPTH_FORMAT};
pub use draw_list::{
    DrawBatch, DrawListRenderer, MaterialKind, MeshKey, SceneDrawList, RETICLE_ALPHA,
};
pub use gpu_mesh::{DynamicBuffer, GpuMesh};
pub use lighting::{LightingUniform, SpotLightUniform, MAX_SPOT_LIGHTS};
pub use mesh::{InstanceRaw, LineVertex, MeshBuffers, MeshVertex};
pub use pipeline::{begin_scene_pass, LinePipeline, MeshPipeline, SceneBindings};
pub use renderer::Renderer;
pub use window::{WindowConfig, WindowManager};
