#![warn(missing_docs)]
//! Attachment model schema, validation and loading.
//!
//! Models are small JSON documents made of primitive parts (boxes and
//! cylinders) plus an optional spotlight. The flashlight carried by tracked
//! pointers is the one shipped model.

mod loader;

pub use loader::{
    model_from_file, model_from_str, LoadCompletion, LoadTicket, ModelLoader, ThreadedModelLoader,
};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use xr_room_core::Color;

/// Errors emitted while loading a model.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading model files.
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
    /// Parsed, but the contents make no sense.
    #[error("invalid model `{model}`: {reason}")]
    Invalid {
        /// Model name from the document.
        model: String,
        /// What is wrong.
        reason: String,
    },
}

/// A renderable model built from primitives, in controller-local space
/// (forward is -Z).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    /// Display name.
    pub name: String,
    /// Primitive parts.
    pub parts: Vec<ModelPart>,
    /// Light emitted by the model while its controller selects.
    #[serde(default)]
    pub spotlight: Option<SpotLightDef>,
}

/// One primitive of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPart {
    /// Primitive shape and size.
    pub shape: PartShape,
    /// Surface colour.
    pub color: Color,
    /// Centre of the part relative to the model origin.
    #[serde(default)]
    pub offset: Vec3,
}

/// Primitive shape of a [`ModelPart`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartShape {
    /// Axis-aligned box.
    Box {
        /// Edge lengths.
        size: Vec3,
    },
    /// Cylinder along Z.
    Cylinder {
        /// Radius.
        radius: f32,
        /// Length along Z.
        length: f32,
    },
}

impl PartShape {
    /// Per-axis scale that turns the matching unit primitive into this shape.
    pub fn scale(&self) -> Vec3 {
        match *self {
            PartShape::Box { size } => size,
            PartShape::Cylinder { radius, length } => Vec3::new(radius, radius, length),
        }
    }
}

/// Cone light attached to a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLightDef {
    /// Light origin relative to the model.
    #[serde(default)]
    pub offset: Vec3,
    /// Direction in model space.
    #[serde(default = "SpotLightDef::default_direction")]
    pub direction: Vec3,
    /// Half-angle of the cone in degrees.
    pub angle_degrees: f32,
    /// Distance where the light fades out.
    pub range: f32,
    /// Light colour.
    pub color: Color,
    /// Intensity multiplier.
    #[serde(default = "SpotLightDef::default_intensity")]
    pub intensity: f32,
}

impl SpotLightDef {
    fn default_direction() -> Vec3 {
        Vec3::NEG_Z
    }

    fn default_intensity() -> f32 {
        1.0
    }

    /// Cosine of the cone half-angle.
    pub fn cos_cutoff(&self) -> f32 {
        self.angle_degrees.to_radians().cos()
    }
}

impl ModelAsset {
    /// Reject models that cannot be drawn.
    pub fn validate(&self) -> Result<(), AssetError> {
        let invalid = |reason: String| AssetError::Invalid {
            model: self.name.clone(),
            reason,
        };

        if self.parts.is_empty() {
            return Err(invalid("model has no parts".into()));
        }
        for (index, part) in self.parts.iter().enumerate() {
            let scale = part.shape.scale();
            if !scale.is_finite() || scale.min_element() <= 0.0 {
                return Err(invalid(format!("part {index} has non-positive dimensions")));
            }
        }
        if let Some(light) = &self.spotlight {
            if !(light.angle_degrees > 0.0 && light.angle_degrees < 90.0) {
                return Err(invalid(format!(
                    "spotlight angle {} must be within (0, 90) degrees",
                    light.angle_degrees
                )));
            }
            if light.range <= 0.0 || light.direction.length_squared() == 0.0 {
                return Err(invalid("spotlight needs a positive range and a direction".into()));
            }
        }
        Ok(())
    }
}
