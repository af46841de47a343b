//! Vertex layouts and CPU-side conversion from scene geometry.

use xr_room_scene::MeshData;

/// Packed vertex layout for lit and unlit meshes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Vertex normal (unit length).
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout (slot 0, per vertex).
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Per-instance transform and colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Model matrix, column major.
    pub model: [[f32; 4]; 4],
    /// Linear RGBA colour.
    pub color: [f32; 4],
}

impl InstanceRaw {
    /// Instance with the given transform and colour.
    pub fn new(model: glam::Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }

    /// Vertex buffer layout (slot 1, per instance).
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Coloured line vertex; pairs form segments.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// World position.
    pub position: [f32; 3],
    /// Linear RGBA colour.
    pub color: [f32; 4],
}

impl LineVertex {
    /// Vertex buffer layout.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Interleaved vertices plus indices ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    /// Vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Interleave positions and normals. Missing normals become +Y.
    pub fn from_mesh(mesh: &MeshData) -> Self {
        let vertices = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| MeshVertex {
                position: p.to_array(),
                normal: mesh.normals.get(i).copied().unwrap_or(glam::Vec3::Y).to_array(),
            })
            .collect();
        Self {
            vertices,
            indices: mesh.indices.clone(),
        }
    }
}
