//! The room: a wireframe shell and the bodies floating inside it.

use crate::geometry::{box_line_grid, LineData, MeshData};
use glam::{Mat4, Vec3};
use std::sync::Arc;
use xr_room_core::{BodyId, Color};

/// Wireframe cube the bodies float in. Lines are stored lifted so the floor
/// sits at y = 0.
#[derive(Debug, Clone)]
pub struct RoomShell {
    /// Edge length of the cube.
    pub size: f32,
    /// Grid divisions per axis.
    pub divisions: u32,
    /// Line colour.
    pub color: Color,
    lines: LineData,
}

impl RoomShell {
    /// Build a cube shell of edge `size` with `divisions` grid cells per face
    /// axis.
    pub fn new(size: f32, divisions: u32, color: Color) -> Self {
        let lines = box_line_grid(Vec3::splat(size), [divisions; 3])
            .translated(Vec3::Y * (size * 0.5));
        Self {
            size,
            divisions,
            color,
            lines,
        }
    }

    /// Grid lines in world space.
    pub fn lines(&self) -> &LineData {
        &self.lines
    }
}

/// Icosahedron placed in the room. Shares the room's body mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Creation index.
    pub id: BodyId,
    /// Centre in room (and world) space.
    pub position: Vec3,
    /// Surface colour.
    pub color: Color,
}

impl Body {
    /// Model transform. Bodies are never rotated or scaled.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }
}

/// Singleton scene root. The room sits at the world origin, so body
/// positions are world positions.
#[derive(Debug, Clone)]
pub struct Room {
    shell: RoomShell,
    body_mesh: Arc<MeshData>,
    body_radius: f32,
    bodies: Vec<Body>,
}

impl Room {
    /// Empty room whose bodies will all use `body_mesh`.
    pub fn new(shell: RoomShell, body_mesh: Arc<MeshData>) -> Self {
        let body_radius = body_mesh.bounding_radius();
        Self {
            shell,
            body_mesh,
            body_radius,
            bodies: Vec::new(),
        }
    }

    /// Append a body; ids follow insertion order.
    pub fn add_body(&mut self, position: Vec3, color: Color) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Body {
            id,
            position,
            color,
        });
        id
    }

    /// Bodies in creation order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Look up a body by id.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    /// Mesh shared by every body.
    pub fn body_mesh(&self) -> &Arc<MeshData> {
        &self.body_mesh
    }

    /// Bounding radius of the shared body mesh.
    pub fn body_radius(&self) -> f32 {
        self.body_radius
    }

    /// The wireframe shell.
    pub fn shell(&self) -> &RoomShell {
        &self.shell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::icosahedron;

    #[test]
    fn shell_floor_sits_at_zero() {
        let shell = RoomShell::new(6.0, 10, Color::from_hex(0x808080));
        let ys = shell.lines().segments.iter().flatten().map(|p| p.y);
        let (min, max) = ys.fold((f32::MAX, f32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
        assert!(min.abs() < 1e-5);
        assert!((max - 6.0).abs() < 1e-5);
    }

    #[test]
    fn body_ids_follow_insertion_order() {
        let shell = RoomShell::new(6.0, 10, Color::from_hex(0x808080));
        let mut room = Room::new(shell, Arc::new(icosahedron(0.08, 2)));
        let a = room.add_body(Vec3::X, Color::WHITE);
        let b = room.add_body(Vec3::Y, Color::BLACK);

        assert_eq!((a, b), (BodyId(0), BodyId(1)));
        assert_eq!(room.body(b).map(|body| body.position), Some(Vec3::Y));
        assert!(room.body(BodyId(2)).is_none());
        assert!((room.body_radius() - 0.08).abs() < 1e-5);
    }
}
