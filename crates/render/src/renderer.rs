//! Windowed renderer: uploads a [`SceneDrawList`] and draws it.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, warn};
use winit::window::Window;
use xr_room_app::{FrameRenderer, SceneContext};
use xr_room_core::Color;
use xr_room_scene::{geometry, Room};
use xr_room_xr::Reticle;

use crate::context::{RenderContext, RenderError};
use crate::draw_list::{MaterialKind, MeshKey, SceneDrawList};
use crate::gpu_mesh::{DynamicBuffer, GpuMesh};
use crate::mesh::{InstanceRaw, LineVertex};
use crate::pipeline::{begin_scene_pass, LinePipeline, MeshPipeline, SceneBindings};

const CYLINDER_SEGMENTS: u32 = 24;
const RING_SEGMENTS: u32 = 32;

struct MeshLibrary {
    icosahedron: GpuMesh,
    cube: GpuMesh,
    cylinder: GpuMesh,
    ring: GpuMesh,
}

impl MeshLibrary {
    fn new(device: &wgpu::Device, room: &Room, reticle: &Reticle) -> Self {
        // Instances scale the ring by the outer radius.
        let inner = if reticle.outer_radius > 0.0 {
            reticle.inner_radius / reticle.outer_radius
        } else {
            0.5
        };
        Self {
            icosahedron: GpuMesh::upload(device, "Icosahedron", room.body_mesh()),
            cube: GpuMesh::upload(device, "Cube", &geometry::unit_cube()),
            cylinder: GpuMesh::upload(
                device,
                "Cylinder",
                &geometry::unit_cylinder(CYLINDER_SEGMENTS),
            ),
            ring: GpuMesh::upload(device, "Ring", &geometry::ring(inner, 1.0, RING_SEGMENTS)),
        }
    }

    fn get(&self, key: MeshKey) -> &GpuMesh {
        match key {
            MeshKey::Icosahedron => &self.icosahedron,
            MeshKey::Cube => &self.cube,
            MeshKey::Cylinder => &self.cylinder,
            MeshKey::Ring => &self.ring,
        }
    }
}

/// GPU renderer presenting to a window.
pub struct Renderer {
    context: RenderContext,
    bindings: SceneBindings,
    meshes: MeshLibrary,
    mesh_pipelines: Vec<MeshPipeline>,
    line_pipeline: LinePipeline,
    instance_buffer: DynamicBuffer,
    line_buffer: DynamicBuffer,
}

impl Renderer {
    /// Bring up the GPU for `window`, blocking until the device is ready.
    /// `reticle` fixes the ring proportions.
    pub fn new(window: Arc<Window>, room: &Room, reticle: &Reticle) -> Result<Self> {
        let context = pollster::block_on(RenderContext::new(window))
            .context("failed to initialise GPU rendering")?;
        let device = &context.device;

        let bindings = SceneBindings::new(device);
        let mesh_pipelines = [
            MaterialKind::Lambert,
            MaterialKind::BackSide,
            MaterialKind::Basic,
        ]
        .into_iter()
        .map(|material| MeshPipeline::new(&context, bindings.layout(), material))
        .collect::<Result<Vec<_>>>()?;
        let line_pipeline = LinePipeline::new(&context, bindings.layout())?;

        let instance_bytes = (room.bodies().len() + 16) * std::mem::size_of::<InstanceRaw>();
        let line_bytes = (room.shell().lines().segments.len() * 2 + 4)
            * std::mem::size_of::<LineVertex>();

        Ok(Self {
            meshes: MeshLibrary::new(device, room, reticle),
            instance_buffer: DynamicBuffer::new(
                device,
                "Instance Buffer",
                wgpu::BufferUsages::VERTEX,
                instance_bytes as u64,
            ),
            line_buffer: DynamicBuffer::new(
                device,
                "Line Buffer",
                wgpu::BufferUsages::VERTEX,
                line_bytes as u64,
            ),
            bindings,
            mesh_pipelines,
            line_pipeline,
            context,
        })
    }

    /// Resize the surface.
    pub fn resize(&mut self, size: (u32, u32)) {
        self.context.resize(size);
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.context.size
    }

    /// Draw one frame. Lost or outdated surfaces are reconfigured and the
    /// frame is skipped.
    pub fn draw(&mut self, list: &SceneDrawList) -> Result<(), RenderError> {
        let frame = match self.context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("surface acquire timed out; skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.context.device;
        let queue = &self.context.queue;
        self.bindings.update(queue, list.camera(), list.lighting());

        let mut ranges = Vec::with_capacity(list.batches().len());
        let mut instances: Vec<InstanceRaw> = Vec::with_capacity(list.instance_count());
        for batch in list.batches() {
            let start = instances.len() as u32;
            instances.extend_from_slice(&batch.instances);
            ranges.push(start..instances.len() as u32);
        }
        self.instance_buffer
            .write(device, queue, bytemuck::cast_slice(&instances));
        self.line_buffer
            .write(device, queue, bytemuck::cast_slice(list.lines()));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        {
            let mut pass = begin_scene_pass(
                &mut encoder,
                &view,
                self.context.depth_view(),
                clear_color(list.clear_color()),
            );
            pass.set_bind_group(0, self.bindings.bind_group(), &[]);

            if !list.lines().is_empty() {
                pass.set_pipeline(self.line_pipeline.pipeline());
                pass.set_vertex_buffer(0, self.line_buffer.buffer().slice(..));
                pass.draw(0..list.lines().len() as u32, 0..1);
            }

            for (batch, range) in list.batches().iter().zip(ranges) {
                let Some(pipeline) = self
                    .mesh_pipelines
                    .iter()
                    .find(|p| p.material() == batch.material)
                else {
                    continue;
                };
                let mesh = self.meshes.get(batch.mesh);
                pass.set_pipeline(pipeline.pipeline());
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.buffer().slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, range);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl FrameRenderer for Renderer {
    fn render_frame(&mut self, ctx: &SceneContext) -> Result<()> {
        let list = SceneDrawList::build(ctx);
        self.draw(&list)?;
        Ok(())
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    let [r, g, b] = color.to_linear();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}
