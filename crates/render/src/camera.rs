//! Camera uniform uploaded once per frame.

use xr_room_camera::OrbitCamera;

/// Camera data sent to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space
    pub camera_pos: [f32; 4],
}

impl CameraUniform {
    /// Create camera uniform from camera.
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        let position = camera.position();
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: [position.x, position.y, position.z, 1.0],
        }
    }
}
