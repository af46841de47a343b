//! Ready-made scenes and assets for tests.

use glam::Vec3;
use std::sync::Arc;
use xr_room_assets::{ModelAsset, ModelPart, PartShape, SpotLightDef};
use xr_room_core::Color;
use xr_room_scene::{geometry, Room, RoomShell};

/// Demo-sized room (6 m, 10 divisions) with white bodies at `positions`,
/// using the demo icosahedron (radius 0.08, detail 2).
pub fn room_with_bodies(positions: &[Vec3]) -> Room {
    let shell = RoomShell::new(6.0, 10, Color::from_hex(0x808080));
    let mut room = Room::new(shell, Arc::new(geometry::icosahedron(0.08, 2)));
    for position in positions {
        room.add_body(*position, Color::WHITE);
    }
    room
}

/// A two-part flashlight with a spotlight, matching the shipped model's
/// layout closely enough for attachment tests.
pub fn flashlight_asset() -> ModelAsset {
    ModelAsset {
        name: "flashlight".into(),
        parts: vec![
            ModelPart {
                shape: PartShape::Cylinder {
                    radius: 0.02,
                    length: 0.14,
                },
                color: Color::from_hex(0x2b2b2b),
                offset: Vec3::ZERO,
            },
            ModelPart {
                shape: PartShape::Cylinder {
                    radius: 0.026,
                    length: 0.04,
                },
                color: Color::from_hex(0x3d3d3d),
                offset: Vec3::new(0.0, 0.0, -0.07),
            },
        ],
        spotlight: Some(SpotLightDef {
            offset: Vec3::new(0.0, 0.0, -0.09),
            direction: Vec3::NEG_Z,
            angle_degrees: 22.0,
            range: 12.0,
            color: Color::WHITE,
            intensity: 2.0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_valid() {
        assert!(flashlight_asset().validate().is_ok());
        let room = room_with_bodies(&[Vec3::ZERO, Vec3::ONE]);
        assert_eq!(room.bodies().len(), 2);
    }
}
