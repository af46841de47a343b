//! Replay controller input from a TOML script.
//!
//! ```toml
//! session_active = false
//!
//! [[step]]
//! frame = 0
//! actions = [
//!     { type = "connected", controller = 0, mode = "tracked-pointer" },
//!     { type = "pose", controller = 0, position = [0.0, 1.6, 3.0], direction = [0.0, 0.0, -1.0] },
//! ]
//!
//! [[step]]
//! frame = 2
//! actions = [{ type = "select-start", controller = 0 }]
//! ```

use crate::controller::TargetRayMode;
use crate::host::{XrEvent, XrHost};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use xr_room_core::{pose_looking_along, ControllerIndex, FrameIndex};

/// Errors emitted while loading a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Wrap IO errors when reading the script.
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap TOML parsing issues.
    #[error("failed to parse script: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Whole script document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XrScript {
    /// Report an active XR session for the whole run.
    #[serde(default)]
    pub session_active: bool,
    /// Steps; order in the file does not matter.
    #[serde(default, rename = "step")]
    pub steps: Vec<ScriptStep>,
}

/// Actions applied at the start of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Frame the actions fire on.
    pub frame: u64,
    /// Actions in order.
    #[serde(default)]
    pub actions: Vec<ScriptAction>,
}

/// One scripted input action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScriptAction {
    /// Connect an input source.
    Connected {
        /// Slot.
        controller: ControllerIndex,
        /// How it aims.
        mode: TargetRayMode,
    },
    /// Disconnect the input source.
    Disconnected {
        /// Slot.
        controller: ControllerIndex,
    },
    /// Press select.
    SelectStart {
        /// Slot.
        controller: ControllerIndex,
    },
    /// Release select.
    SelectEnd {
        /// Slot.
        controller: ControllerIndex,
    },
    /// Move the slot's target ray and grip.
    Pose {
        /// Slot.
        controller: ControllerIndex,
        /// World position.
        position: Vec3,
        /// World direction of local -Z.
        direction: Vec3,
    },
}

impl XrScript {
    /// Load a script from `path`.
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let data = fs::read_to_string(path)?;
        Self::parse(&data)
    }

    /// Parse a script from TOML text.
    pub fn parse(input: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(input)?)
    }

    /// Last frame any step fires on.
    pub fn last_frame(&self) -> Option<u64> {
        self.steps.iter().map(|s| s.frame).max()
    }
}

/// [`XrHost`] that replays an [`XrScript`].
///
/// Steps for frames that were skipped still fire, on the next polled frame.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    session_active: bool,
    steps: Vec<ScriptStep>,
    cursor: usize,
    poses: [Option<Mat4>; ControllerIndex::COUNT],
}

impl ScriptedHost {
    /// Host replaying `script`.
    pub fn new(script: XrScript) -> Self {
        let mut steps = script.steps;
        steps.sort_by_key(|s| s.frame);
        Self {
            session_active: script.session_active,
            steps,
            cursor: 0,
            poses: [None; ControllerIndex::COUNT],
        }
    }

    /// Whether every step has fired.
    pub fn finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }
}

impl XrHost for ScriptedHost {
    fn session_active(&self) -> bool {
        self.session_active
    }

    fn poll_events(&mut self, frame: FrameIndex) -> Vec<XrEvent> {
        let mut events = Vec::new();
        while let Some(step) = self.steps.get(self.cursor) {
            if step.frame > frame.0 {
                break;
            }
            for action in &step.actions {
                match *action {
                    ScriptAction::Connected { controller, mode } => {
                        events.push(XrEvent::Connected { controller, mode });
                    }
                    ScriptAction::Disconnected { controller } => {
                        events.push(XrEvent::Disconnected { controller });
                    }
                    ScriptAction::SelectStart { controller } => {
                        events.push(XrEvent::SelectStart { controller });
                    }
                    ScriptAction::SelectEnd { controller } => {
                        events.push(XrEvent::SelectEnd { controller });
                    }
                    ScriptAction::Pose {
                        controller,
                        position,
                        direction,
                    } => {
                        self.poses[controller.get()] = Some(pose_looking_along(position, direction));
                    }
                }
            }
            debug!(frame = frame.0, step_frame = step.frame, "script step fired");
            self.cursor += 1;
        }
        events
    }

    fn target_ray_pose(&self, controller: ControllerIndex) -> Option<Mat4> {
        self.poses[controller.get()]
    }

    fn grip_pose(&self, controller: ControllerIndex) -> Option<Mat4> {
        self.poses[controller.get()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
session_active = true

[[step]]
frame = 3
actions = [{ type = "select-end", controller = 0 }, { type = "disconnected", controller = 0 }]

[[step]]
frame = 0
actions = [
    { type = "connected", controller = 0, mode = "tracked-pointer" },
    { type = "connected", controller = 1, mode = "gaze" },
    { type = "pose", controller = 0, position = [0.0, 1.6, 3.0], direction = [0.0, 0.0, -1.0] },
]

[[step]]
frame = 1
actions = [{ type = "select-start", controller = 0 }]
"#;

    #[test]
    fn parses_every_action_kind() {
        let script = XrScript::parse(SCRIPT).unwrap();
        assert!(script.session_active);
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.last_frame(), Some(3));
        let kinds: Vec<_> = script
            .steps
            .iter()
            .flat_map(|s| s.actions.iter())
            .map(std::mem::discriminant)
            .collect();
        assert_eq!(kinds.len(), 6);
    }

    #[test]
    fn replays_steps_in_frame_order() {
        let mut host = ScriptedHost::new(XrScript::parse(SCRIPT).unwrap());
        let first = host.poll_events(FrameIndex(0));
        assert_eq!(first.len(), 2);
        assert!(matches!(
            first[0],
            XrEvent::Connected {
                mode: TargetRayMode::TrackedPointer,
                ..
            }
        ));
        let pose = host.target_ray_pose(ControllerIndex::ALL[0]).unwrap();
        assert!((pose.w_axis.truncate() - Vec3::new(0.0, 1.6, 3.0)).length() < 1e-6);
        assert!(host.target_ray_pose(ControllerIndex::ALL[1]).is_none());

        assert_eq!(host.poll_events(FrameIndex(1)).len(), 1);
        assert!(host.poll_events(FrameIndex(2)).is_empty());
        assert!(!host.finished());
        assert_eq!(host.poll_events(FrameIndex(3)).len(), 2);
        assert!(host.finished());
    }

    #[test]
    fn skipped_frames_fire_late() {
        let mut host = ScriptedHost::new(XrScript::parse(SCRIPT).unwrap());
        assert_eq!(host.poll_events(FrameIndex(10)).len(), 5);
    }

    #[test]
    fn rejects_unknown_actions_and_bad_slots() {
        let unknown = "[[step]]\nframe = 0\nactions = [{ type = \"squeeze\", controller = 0 }]\n";
        assert!(matches!(XrScript::parse(unknown), Err(ScriptError::Parse(_))));
        let slot = "[[step]]\nframe = 0\nactions = [{ type = \"select-start\", controller = 2 }]\n";
        assert!(XrScript::parse(slot).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = XrScript::from_path(Path::new("/no/such/script.toml")).unwrap_err();
        assert!(matches!(err, ScriptError::Io(_)));
    }
}
