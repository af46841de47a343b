//! The boundary to whatever supplies controller input.

use crate::controller::TargetRayMode;
use glam::Mat4;
use xr_room_core::{ControllerIndex, FrameIndex};

/// Input-source notification for one controller slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrEvent {
    /// An input source appeared on the slot.
    Connected {
        /// Slot.
        controller: ControllerIndex,
        /// How it aims.
        mode: TargetRayMode,
    },
    /// The input source went away.
    Disconnected {
        /// Slot.
        controller: ControllerIndex,
    },
    /// Primary button pressed.
    SelectStart {
        /// Slot.
        controller: ControllerIndex,
    },
    /// Primary button released.
    SelectEnd {
        /// Slot.
        controller: ControllerIndex,
    },
}

impl XrEvent {
    /// Slot the event concerns.
    pub fn controller(&self) -> ControllerIndex {
        match *self {
            XrEvent::Connected { controller, .. }
            | XrEvent::Disconnected { controller }
            | XrEvent::SelectStart { controller }
            | XrEvent::SelectEnd { controller } => controller,
        }
    }
}

/// Supplies controller events and poses to the render loop.
///
/// Implementations: the desktop emulator and the scripted host. A real XR
/// runtime binding would be a third.
pub trait XrHost {
    /// Whether an immersive session currently drives frames.
    fn session_active(&self) -> bool;

    /// Events queued for `frame`, in arrival order.
    fn poll_events(&mut self, frame: FrameIndex) -> Vec<XrEvent>;

    /// Current target-ray pose, if the slot is tracked.
    fn target_ray_pose(&self, controller: ControllerIndex) -> Option<Mat4>;

    /// Current grip pose, if the slot is tracked.
    fn grip_pose(&self, controller: ControllerIndex) -> Option<Mat4>;
}
