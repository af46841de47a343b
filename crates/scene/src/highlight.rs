//! The single enlarged back-face marker drawn around the targeted body.

use crate::room::Body;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use xr_room_core::Color;

/// Appearance of the highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Uniform scale relative to the target body.
    pub scale: f32,
    /// Unlit colour.
    pub color: Color,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            scale: 1.2,
            color: Color::WHITE,
        }
    }
}

/// Visibility plus appearance. Which body it wraps is tracked by the
/// interaction handler, not here.
#[derive(Debug, Clone)]
pub struct Highlight {
    visible: bool,
    scale: f32,
    color: Color,
}

impl Highlight {
    /// Hidden highlight with the given appearance.
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            visible: false,
            scale: config.scale,
            color: config.color,
        }
    }

    /// Whether the highlight is drawn.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Scale relative to the target.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Unlit colour.
    pub fn color(&self) -> Color {
        self.color
    }

    /// World transform when wrapped around `target`.
    pub fn transform_around(&self, target: &Body) -> Mat4 {
        target.transform() * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

impl Default for Highlight {
    fn default() -> Self {
        Self::new(&HighlightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xr_room_core::BodyId;

    #[test]
    fn starts_hidden_with_demo_appearance() {
        let highlight = Highlight::default();
        assert!(!highlight.is_visible());
        assert_eq!(highlight.scale(), 1.2);
        assert_eq!(highlight.color(), Color::WHITE);
    }

    #[test]
    fn transform_follows_target_and_scales() {
        let highlight = Highlight::default();
        let body = Body {
            id: BodyId(3),
            position: Vec3::new(1.0, 2.0, 3.0),
            color: Color::BLACK,
        };
        let m = highlight.transform_around(&body);
        let (scale, _, translation) = m.to_scale_rotation_translation();
        assert!((scale - Vec3::splat(1.2)).length() < 1e-5);
        assert!((translation - body.position).length() < 1e-5);
    }
}
