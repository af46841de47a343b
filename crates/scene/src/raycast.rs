//! Ray casting against room bodies.

use crate::geometry::MeshData;
use crate::room::Room;
use glam::{Mat4, Vec3};
use xr_room_core::{BodyId, Ray};

const EPSILON: f32 = 1e-7;
const EDGE_SLACK: f32 = 1e-5;

/// One body hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Body that was hit.
    pub body: BodyId,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Hit point in world space.
    pub point: Vec3,
}

/// Intersects rays with meshes, keeping hits inside `[near, far]`.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    /// Closest accepted distance.
    pub near: f32,
    /// Furthest accepted distance.
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl Raycaster {
    /// All bodies hit by `ray`, nearest first.
    ///
    /// Only front faces count, so a ray starting inside a body does not hit
    /// it. Each body contributes at most its nearest hit.
    pub fn intersect_room(&self, ray: &Ray, room: &Room) -> Vec<RayHit> {
        let mesh = room.body_mesh();
        let radius = room.body_radius();

        let mut hits: Vec<RayHit> = room
            .bodies()
            .iter()
            .filter(|body| ray_hits_sphere(ray, body.position, radius))
            .filter_map(|body| {
                self.intersect_mesh(ray, mesh, &body.transform())
                    .map(|distance| RayHit {
                        body: body.id,
                        distance,
                        point: ray.at(distance),
                    })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest front-face hit distance of `ray` against `mesh` placed by
    /// `transform`.
    pub fn intersect_mesh(&self, ray: &Ray, mesh: &MeshData, transform: &Mat4) -> Option<f32> {
        // Work in model space. The local direction is left unnormalized so
        // the hit parameter is the world distance.
        let inverse = transform.inverse();
        let origin = inverse.transform_point3(ray.origin);
        let direction = inverse.transform_vector3(ray.direction);

        mesh.triangles()
            .filter_map(|tri| intersect_triangle(origin, direction, tri))
            .filter(|t| *t >= self.near && *t <= self.far)
            .min_by(f32::total_cmp)
    }
}

/// Coarse reject: does the ray pass within `radius` of `center` ahead of
/// its origin?
fn ray_hits_sphere(ray: &Ray, center: Vec3, radius: f32) -> bool {
    let to_center = center - ray.origin;
    let along = to_center.dot(ray.direction);
    let dist_sq = to_center.length_squared() - along * along;
    if dist_sq > radius * radius {
        return false;
    }
    // Sphere entirely behind the origin.
    along >= -radius || to_center.length_squared() <= radius * radius
}

/// Möller–Trumbore with back-face culling. Returns the ray parameter.
fn intersect_triangle(origin: Vec3, direction: Vec3, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    // det <= 0 means the ray meets the back of the triangle or runs parallel.
    if det < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = origin - a;
    // Barycentric slack keeps rays through shared edges from slipping
    // between both neighbours.
    let u = s.dot(p) * inv_det;
    if !(-EDGE_SLACK..=1.0 + EDGE_SLACK).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < -EDGE_SLACK || u + v > 1.0 + EDGE_SLACK {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}
