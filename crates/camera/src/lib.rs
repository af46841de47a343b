#![warn(missing_docs)]
//! Orbit camera for desktop viewing of the room.

use glam::{Mat4, Vec2, Vec3};
use xr_room_core::Ray;

/// Closest allowed orbit distance.
pub const MIN_DISTANCE: f32 = 0.5;
/// Furthest allowed orbit distance.
pub const MAX_DISTANCE: f32 = 20.0;
// Keeps the view matrix defined at the poles.
const MAX_ELEVATION: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Perspective camera orbiting a target point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at and orbits around.
    pub target: Vec3,
    /// Distance from the target.
    pub distance: f32,
    /// Rotation around +Y in radians; 0 puts the camera on the +Z side.
    pub azimuth: f32,
    /// Angle above the horizontal plane in radians.
    pub elevation: f32,

    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 1.6, 3.0), Vec3::new(0.0, 1.6, 0.0))
    }
}

impl OrbitCamera {
    /// Camera at `eye` orbiting `target`, with the demo lens (50°, 0.1..100).
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let (azimuth, elevation) = if offset.length_squared() > 0.0 {
            let dir = offset.normalize();
            (dir.x.atan2(dir.z), dir.y.clamp(-1.0, 1.0).asin())
        } else {
            (0.0, 0.0)
        };

        Self {
            target,
            distance,
            azimuth,
            elevation: elevation.clamp(-MAX_ELEVATION, MAX_ELEVATION),
            fov: 50f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        let (az_sin, az_cos) = self.azimuth.sin_cos();
        let (el_sin, el_cos) = self.elevation.sin_cos();
        self.target + Vec3::new(el_cos * az_sin, el_sin, el_cos * az_cos) * self.distance
    }

    /// Unit direction from the camera to the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize()
    }

    /// Camera's local X axis.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Camera's local Y axis.
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Build combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio from a surface size. Zero-sized surfaces
    /// (minimized windows) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Orbit by the given angles, clamping elevation short of the poles.
    pub fn rotate(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth = (self.azimuth + delta_azimuth).rem_euclid(std::f32::consts::TAU);
        self.elevation = (self.elevation + delta_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Move the target in the view plane. Units are world metres at the
    /// target distance.
    pub fn pan(&mut self, right: f32, up: f32) {
        self.target += self.right() * right + self.up() * up;
    }

    /// Scale the orbit distance by `factor`, clamped to
    /// [`MIN_DISTANCE`]..=[`MAX_DISTANCE`].
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    /// World ray from the eye through a cursor position in physical pixels.
    pub fn screen_ray(&self, cursor: Vec2, screen: Vec2) -> Ray {
        if screen.x <= 0.0 || screen.y <= 0.0 {
            return Ray::new(self.position(), self.forward());
        }
        let ndc = Vec2::new(2.0 * cursor.x / screen.x - 1.0, 1.0 - 2.0 * cursor.y / screen.y);

        let inv_view_proj = self.view_projection_matrix().inverse();
        // glam's perspective_rh maps depth to 0..1.
        let near = inv_view_proj.project_point3(ndc.extend(0.0));
        let far = inv_view_proj.project_point3(ndc.extend(1.0));
        Ray::new(self.position(), far - near)
    }
}

/// Mouse sensitivity for [`OrbitCamera`] manipulation.
#[derive(Debug, Clone, Copy)]
pub struct OrbitControls {
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Fraction of the orbit distance per pixel of drag.
    pub pan_speed: f32,
    /// Zoom factor per wheel notch.
    pub zoom_step: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            pan_speed: 0.0015,
            zoom_step: 0.9,
        }
    }
}

impl OrbitControls {
    /// Dragging right spins the scene right, dragging down tilts it down.
    pub fn rotate(&self, camera: &mut OrbitCamera, drag: Vec2) {
        camera.rotate(-drag.x * self.rotate_speed, drag.y * self.rotate_speed);
    }

    /// Dragging moves the scene with the cursor.
    pub fn pan(&self, camera: &mut OrbitCamera, drag: Vec2) {
        let scale = self.pan_speed * camera.distance;
        camera.pan(-drag.x * scale, drag.y * scale);
    }

    /// Positive notches zoom in.
    pub fn zoom(&self, camera: &mut OrbitCamera, notches: f32) {
        camera.zoom(self.zoom_step.powf(notches));
    }
}
