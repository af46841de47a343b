#![warn(missing_docs)]
//! XR controller handling: controller slots and their attachments, the rig
//! that reacts to connect and select events, per-frame ray interaction and
//! the hosts that feed it.

pub mod controller;
pub mod host;
pub mod interaction;
pub mod rig;
pub mod script;

pub use controller::{
    AttachedModel, Attachment, Connection, Controller, Grip, GripModel, RayLine, Reticle,
    TargetRayMode,
};
pub use host::{XrEvent, XrHost};
pub use interaction::InteractionHandler;
pub use rig::{ControllerRig, RigConfig};
pub use script::{ScriptAction, ScriptError, ScriptStep, ScriptedHost, XrScript};
