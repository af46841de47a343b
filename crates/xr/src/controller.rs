//! Controller slots and the visuals attached to them.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use xr_room_assets::ModelAsset;
use xr_room_core::{Color, ControllerIndex, Ray};

/// How a connected input source aims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetRayMode {
    /// Hand-held pointer with its own pose.
    TrackedPointer,
    /// Head gaze.
    Gaze,
    /// Screen tap (handheld AR).
    Screen,
}

impl fmt::Display for TargetRayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetRayMode::TrackedPointer => "tracked-pointer",
            TargetRayMode::Gaze => "gaze",
            TargetRayMode::Screen => "screen",
        })
    }
}

/// Live connection of an input source to a controller slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    /// Aiming mode reported on connect.
    pub mode: TargetRayMode,
    /// Unique per connect; lets late async work detect a stale slot.
    pub generation: u64,
}

/// Line from the controller origin along local -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayLine {
    /// Drawn length. Zero hides the line.
    pub length: f32,
}

/// A loaded model carried by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedModel {
    /// Model description.
    pub asset: Arc<ModelAsset>,
    /// Whether the model's spotlight (if any) is lit.
    pub spotlight_visible: bool,
}

/// Ring shown in front of a gaze controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reticle {
    /// Hole radius.
    pub inner_radius: f32,
    /// Outer radius.
    pub outer_radius: f32,
    /// Distance in front of the controller.
    pub distance: f32,
}

impl Reticle {
    /// Local transform of the ring relative to its controller.
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::NEG_Z * self.distance)
    }
}

/// Visual child of a controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Pointer ray.
    RayLine(RayLine),
    /// Loaded model.
    Model(AttachedModel),
    /// Gaze reticle.
    Reticle(Reticle),
}

/// Procedural stand-in for a vendor controller model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GripModel {
    /// Body colour.
    pub color: Color,
    /// Box extents in grip space.
    pub size: Vec3,
}

/// Grip space of a controller: where the hand holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Grip {
    /// World pose of the grip.
    pub pose: Mat4,
    /// Model drawn at the grip.
    pub model: Option<GripModel>,
}

/// One controller slot.
#[derive(Debug, Clone)]
pub struct Controller {
    index: ControllerIndex,
    selecting: bool,
    pose: Mat4,
    grip: Grip,
    connection: Option<Connection>,
    attachments: Vec<Attachment>,
}

impl Controller {
    /// Disconnected slot with no attachments at the origin.
    pub fn new(index: ControllerIndex) -> Self {
        Self {
            index,
            selecting: false,
            pose: Mat4::IDENTITY,
            grip: Grip {
                pose: Mat4::IDENTITY,
                model: None,
            },
            connection: None,
            attachments: Vec::new(),
        }
    }

    /// Slot index.
    pub fn index(&self) -> ControllerIndex {
        self.index
    }

    /// Whether the select button is held.
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Set the select flag. Returns whether it changed.
    pub fn set_selecting(&mut self, selecting: bool) -> bool {
        let changed = self.selecting != selecting;
        self.selecting = selecting;
        changed
    }

    /// Target-ray pose in world space.
    pub fn pose(&self) -> Mat4 {
        self.pose
    }

    /// Update the target-ray pose.
    pub fn set_pose(&mut self, pose: Mat4) {
        self.pose = pose;
    }

    /// Ray from the target-ray pose.
    pub fn ray(&self) -> Ray {
        Ray::from_pose(&self.pose)
    }

    /// Grip space.
    pub fn grip(&self) -> &Grip {
        &self.grip
    }

    /// Mutable grip space.
    pub fn grip_mut(&mut self) -> &mut Grip {
        &mut self.grip
    }

    /// Current connection, if any.
    pub fn connection(&self) -> Option<Connection> {
        self.connection
    }

    /// Whether an input source is connected.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub(crate) fn set_connection(&mut self, connection: Option<Connection>) {
        self.connection = connection;
    }

    /// Visual children in attach order.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Add a visual child.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Remove every visual child. Returns how many were removed.
    pub fn clear_attachments(&mut self) -> usize {
        let removed = self.attachments.len();
        self.attachments.clear();
        removed
    }

    /// The pointer ray, if attached.
    pub fn ray_line(&self) -> Option<&RayLine> {
        self.attachments.iter().find_map(|a| match a {
            Attachment::RayLine(line) => Some(line),
            _ => None,
        })
    }

    /// Mutable pointer ray, if attached.
    pub fn ray_line_mut(&mut self) -> Option<&mut RayLine> {
        self.attachments.iter_mut().find_map(|a| match a {
            Attachment::RayLine(line) => Some(line),
            _ => None,
        })
    }

    /// Set the pointer ray length when a ray is attached.
    pub fn set_ray_length(&mut self, length: f32) {
        if let Some(line) = self.ray_line_mut() {
            line.length = length;
        }
    }

    /// The attached model, if loaded.
    pub fn model(&self) -> Option<&AttachedModel> {
        self.attachments.iter().find_map(|a| match a {
            Attachment::Model(model) => Some(model),
            _ => None,
        })
    }

    /// Replace any attached model with `model`.
    pub fn attach_model(&mut self, model: AttachedModel) {
        self.attachments
            .retain(|a| !matches!(a, Attachment::Model(_)));
        self.attachments.push(Attachment::Model(model));
    }

    /// The gaze reticle, if attached.
    pub fn reticle(&self) -> Option<&Reticle> {
        self.attachments.iter().find_map(|a| match a {
            Attachment::Reticle(reticle) => Some(reticle),
            _ => None,
        })
    }

    /// Light or darken the attached model's spotlight. No-op without one.
    pub fn set_spotlight_visible(&mut self, visible: bool) {
        for attachment in &mut self.attachments {
            if let Attachment::Model(model) = attachment {
                if model.asset.spotlight.is_some() {
                    model.spotlight_visible = visible;
                }
            }
        }
    }
}
