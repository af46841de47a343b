//! Everything one frame needs, gathered in one place.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use xr_room_camera::OrbitCamera;
use xr_room_core::Color;
use xr_room_scene::{Highlight, Room};
use xr_room_xr::{ControllerRig, InteractionHandler};

/// Scene-wide lights and clear colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    /// Clear colour.
    pub background: Color,
    /// Hemisphere light colour from above.
    pub sky: Color,
    /// Hemisphere light colour from below.
    pub ground: Color,
    /// Hemisphere light intensity.
    pub hemisphere_intensity: f32,
    /// Direction *towards* the directional light.
    pub sun_direction: Vec3,
    /// Directional light colour.
    pub sun_color: Color,
    /// Directional light intensity.
    pub sun_intensity: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x505050),
            sky: Color::from_hex(0x606060),
            ground: Color::from_hex(0x404040),
            hemisphere_intensity: 1.0,
            sun_direction: Vec3::ONE.normalize(),
            sun_color: Color::WHITE,
            sun_intensity: 1.0,
        }
    }
}

/// A lit flashlight in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveSpotLight {
    /// Light origin.
    pub position: Vec3,
    /// Unit direction of the cone axis.
    pub direction: Vec3,
    /// Cosine of the cone half-angle.
    pub cos_cutoff: f32,
    /// Fade-out distance.
    pub range: f32,
    /// Light colour.
    pub color: Color,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// The whole scene plus the controller machinery that mutates it. Owned by
/// the thread running the render loop.
#[derive(Debug)]
pub struct SceneContext {
    /// Desktop viewpoint.
    pub camera: OrbitCamera,
    /// Room and bodies.
    pub room: Room,
    /// Target marker.
    pub highlight: Highlight,
    /// Controller slots.
    pub rig: ControllerRig,
    /// Per-frame ray casting.
    pub interaction: InteractionHandler,
    /// Lights and background.
    pub lighting: Lighting,
}

impl SceneContext {
    /// Assemble a context.
    pub fn new(
        camera: OrbitCamera,
        room: Room,
        highlight: Highlight,
        rig: ControllerRig,
        lighting: Lighting,
    ) -> Self {
        let interaction = InteractionHandler::new(rig.config().max_ray_length);
        Self {
            camera,
            room,
            highlight,
            rig,
            interaction,
            lighting,
        }
    }

    /// Where to draw the highlight this frame, if anywhere.
    pub fn highlight_transform(&self) -> Option<Mat4> {
        self.interaction
            .highlight_transform(&self.room, &self.highlight)
    }

    /// Spotlights of connected controllers whose model light is on, in slot
    /// order.
    pub fn active_spotlights(&self) -> Vec<ActiveSpotLight> {
        self.rig
            .controllers()
            .iter()
            .filter(|c| c.is_connected())
            .filter_map(|controller| {
                let model = controller.model().filter(|m| m.spotlight_visible)?;
                let light = model.asset.spotlight.as_ref()?;
                let pose = controller.pose();
                Some(ActiveSpotLight {
                    position: pose.transform_point3(light.offset),
                    direction: pose
                        .transform_vector3(light.direction)
                        .try_normalize()
                        .unwrap_or(Vec3::NEG_Z),
                    cos_cutoff: light.cos_cutoff(),
                    range: light.range,
                    color: light.color,
                    intensity: light.intensity,
                })
            })
            .collect()
    }
}
