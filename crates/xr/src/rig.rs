//! The two-controller rig: attaches visuals and reacts to controller events.

use crate::controller::{
    AttachedModel, Attachment, Connection, Controller, GripModel, RayLine, Reticle, TargetRayMode,
};
use crate::host::{XrEvent, XrHost};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use xr_room_assets::{LoadTicket, ModelLoader};
use xr_room_core::{Color, ControllerIndex};
use xr_room_scene::Highlight;

/// Rig tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Model loaded onto tracked pointers.
    pub flashlight_model: PathBuf,
    /// Ray length while selecting with nothing hit.
    pub max_ray_length: f32,
    /// Gaze reticle hole radius.
    pub reticle_inner_radius: f32,
    /// Gaze reticle outer radius.
    pub reticle_outer_radius: f32,
    /// Gaze reticle distance in front of the controller.
    pub reticle_distance: f32,
    /// Colour of the procedural grip model.
    pub grip_color: Color,
    /// Extents of the procedural grip model.
    pub grip_size: Vec3,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            flashlight_model: PathBuf::from("assets/models/flashlight.json"),
            max_ray_length: 10.0,
            reticle_inner_radius: 0.02,
            reticle_outer_radius: 0.04,
            reticle_distance: 1.0,
            grip_color: Color::from_hex(0x303840),
            grip_size: Vec3::new(0.04, 0.05, 0.12),
        }
    }
}

impl RigConfig {
    /// Reticle described by this configuration.
    pub fn reticle(&self) -> Reticle {
        Reticle {
            inner_radius: self.reticle_inner_radius,
            outer_radius: self.reticle_outer_radius,
            distance: self.reticle_distance,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingLoad {
    controller: ControllerIndex,
    generation: u64,
}

/// Owns controller slots 0 and 1 and everything attached to them.
pub struct ControllerRig {
    config: RigConfig,
    controllers: [Controller; ControllerIndex::COUNT],
    loader: Box<dyn ModelLoader>,
    pending: HashMap<LoadTicket, PendingLoad>,
    next_generation: u64,
}

impl ControllerRig {
    /// Build both slots, each with a collapsed ray line and a grip model.
    pub fn new(config: RigConfig, loader: Box<dyn ModelLoader>) -> Self {
        let controllers = ControllerIndex::ALL.map(|index| {
            let mut controller = Controller::new(index);
            controller.attach(Attachment::RayLine(RayLine { length: 0.0 }));
            controller.grip_mut().model = Some(GripModel {
                color: config.grip_color,
                size: config.grip_size,
            });
            controller
        });

        Self {
            config,
            controllers,
            loader,
            pending: HashMap::new(),
            next_generation: 1,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Slot `index`.
    pub fn controller(&self, index: ControllerIndex) -> &Controller {
        &self.controllers[index.get()]
    }

    /// Mutable slot `index`.
    pub fn controller_mut(&mut self, index: ControllerIndex) -> &mut Controller {
        &mut self.controllers[index.get()]
    }

    /// Both slots in index order.
    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    /// Both slots in index order, mutably.
    pub fn controllers_mut(&mut self) -> &mut [Controller] {
        &mut self.controllers
    }

    /// Model loads not yet collected.
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    /// React to one controller event.
    pub fn dispatch(&mut self, event: XrEvent, highlight: &mut Highlight) {
        match event {
            XrEvent::Connected { controller, mode } => self.on_connected(controller, mode),
            XrEvent::Disconnected { controller } => self.on_disconnected(controller, highlight),
            XrEvent::SelectStart { controller } => self.on_select_start(controller),
            XrEvent::SelectEnd { controller } => self.on_select_end(controller, highlight),
        }
    }

    /// Copy host poses onto tracked controllers and grips.
    pub fn update_poses(&mut self, host: &dyn XrHost) {
        for controller in &mut self.controllers {
            let index = controller.index();
            if let Some(pose) = host.target_ray_pose(index) {
                controller.set_pose(pose);
            }
            if let Some(pose) = host.grip_pose(index) {
                controller.grip_mut().pose = pose;
            }
        }
    }

    /// Attach models whose loads finished. Loads for a slot that has since
    /// disconnected or reconnected are dropped.
    pub fn apply_completed_loads(&mut self) {
        for completion in self.loader.poll_completed() {
            let Some(pending) = self.pending.remove(&completion.ticket) else {
                debug!(ticket = completion.ticket.0, "ignoring unknown model load");
                continue;
            };
            let controller = &mut self.controllers[pending.controller.get()];

            match completion.result {
                Ok(asset) => {
                    let current = controller.connection().map(|c| c.generation);
                    if current != Some(pending.generation) {
                        debug!(
                            controller = %pending.controller,
                            model = %asset.name,
                            "discarding model load for a stale connection"
                        );
                        continue;
                    }
                    let spotlight_visible = controller.is_selecting() && asset.spotlight.is_some();
                    info!(controller = %pending.controller, model = %asset.name, "attachment model loaded");
                    controller.attach_model(AttachedModel {
                        asset,
                        spotlight_visible,
                    });
                }
                Err(err) => {
                    warn!(
                        controller = %pending.controller,
                        path = %completion.path.display(),
                        error = %err,
                        "failed to load attachment model"
                    );
                }
            }
        }
    }

    fn on_connected(&mut self, index: ControllerIndex, mode: TargetRayMode) {
        let generation = self.next_generation;
        self.next_generation += 1;

        let controller = &mut self.controllers[index.get()];
        controller.set_connection(Some(Connection { mode, generation }));
        info!(controller = %index, %mode, "controller connected");

        match mode {
            TargetRayMode::TrackedPointer => {
                if controller.ray_line().is_none() {
                    let length = if controller.is_selecting() {
                        self.config.max_ray_length
                    } else {
                        0.0
                    };
                    controller.attach(Attachment::RayLine(RayLine { length }));
                }
                let ticket = self.loader.request(&self.config.flashlight_model);
                self.pending.insert(
                    ticket,
                    PendingLoad {
                        controller: index,
                        generation,
                    },
                );
            }
            TargetRayMode::Gaze => {
                controller.attach(Attachment::Reticle(self.config.reticle()));
            }
            TargetRayMode::Screen => {
                debug!(controller = %index, "screen input source has no attachment");
            }
        }
    }

    fn on_disconnected(&mut self, index: ControllerIndex, highlight: &mut Highlight) {
        if self.controllers[index.get()].is_selecting() {
            self.on_select_end(index, highlight);
        }
        let controller = &mut self.controllers[index.get()];
        let removed = controller.clear_attachments();
        controller.set_connection(None);
        info!(controller = %index, removed, "controller disconnected");
    }

    fn on_select_start(&mut self, index: ControllerIndex) {
        let controller = &mut self.controllers[index.get()];
        controller.set_selecting(true);
        controller.set_ray_length(self.config.max_ray_length);
        controller.set_spotlight_visible(true);
        debug!(controller = %index, "select start");
    }

    fn on_select_end(&mut self, index: ControllerIndex, highlight: &mut Highlight) {
        let controller = &mut self.controllers[index.get()];
        controller.set_selecting(false);
        controller.set_ray_length(0.0);
        controller.set_spotlight_visible(false);
        highlight.set_visible(false);
        debug!(controller = %index, "select end");
    }
}

impl std::fmt::Debug for ControllerRig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRig")
            .field("config", &self.config)
            .field("controllers", &self.controllers)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xr_room_testkit::{fixtures, StubLoader, StubLoaderHandle, StubOutcome};

    const LEFT: ControllerIndex = ControllerIndex::ALL[0];
    const RIGHT: ControllerIndex = ControllerIndex::ALL[1];

    fn rig_with(outcome: StubOutcome) -> (ControllerRig, StubLoaderHandle) {
        let (loader, handle) = StubLoader::new(outcome);
        (ControllerRig::new(RigConfig::default(), Box::new(loader)), handle)
    }

    fn flashlight() -> StubOutcome {
        StubOutcome::Model(Arc::new(fixtures::flashlight_asset()))
    }

    fn connect(rig: &mut ControllerRig, index: ControllerIndex, mode: TargetRayMode) {
        rig.dispatch(
            XrEvent::Connected {
                controller: index,
                mode,
            },
            &mut Highlight::default(),
        );
    }

    #[test]
    fn build_attaches_collapsed_rays_and_grip_models() {
        let (rig, _) = rig_with(flashlight());
        for controller in rig.controllers() {
            assert_eq!(controller.attachments().len(), 1);
            assert_eq!(controller.ray_line().map(|l| l.length), Some(0.0));
            assert!(controller.grip().model.is_some());
            assert!(!controller.is_connected());
        }
    }

    #[test]
    fn tracked_pointer_gets_flashlight_after_load() {
        let (mut rig, handle) = rig_with(flashlight());
        connect(&mut rig, LEFT, TargetRayMode::TrackedPointer);

        assert_eq!(handle.requests(), vec![RigConfig::default().flashlight_model]);
        assert!(rig.controller(LEFT).model().is_none());

        rig.apply_completed_loads();
        let model = rig.controller(LEFT).model().expect("model attached");
        assert_eq!(model.asset.name, "flashlight");
        assert!(!model.spotlight_visible);
        assert_eq!(rig.pending_loads(), 0);
    }

    #[test]
    fn failed_load_leaves_no_model() {
        let (mut rig, _) = rig_with(StubOutcome::Missing);
        connect(&mut rig, LEFT, TargetRayMode::TrackedPointer);
        rig.apply_completed_loads();

        assert!(rig.controller(LEFT).model().is_none());
        assert!(rig.controller(LEFT).ray_line().is_some());
        assert!(rig.controller(LEFT).is_connected());
    }

    #[test]
    fn gaze_gets_reticle_and_screen_gets_nothing() {
        let (mut rig, handle) = rig_with(flashlight());
        connect(&mut rig, RIGHT, TargetRayMode::Gaze);
        connect(&mut rig, LEFT, TargetRayMode::Screen);

        let reticle = rig.controller(RIGHT).reticle().copied().unwrap();
        assert_eq!(reticle.inner_radius, 0.02);
        assert_eq!(reticle.outer_radius, 0.04);
        assert_eq!(reticle.distance, 1.0);
        assert_eq!(rig.controller(LEFT).attachments().len(), 1);
        assert!(handle.requests().is_empty());
    }

    #[test]
    fn select_start_and_end_drive_ray_and_highlight() {
        let (mut rig, _) = rig_with(flashlight());
        let mut highlight = Highlight::default();
        connect(&mut rig, LEFT, TargetRayMode::TrackedPointer);
        rig.apply_completed_loads();

        rig.dispatch(XrEvent::SelectStart { controller: LEFT }, &mut highlight);
        let c = rig.controller(LEFT);
        assert!(c.is_selecting());
        assert_eq!(c.ray_line().unwrap().length, 10.0);
        assert!(c.model().unwrap().spotlight_visible);

        highlight.set_visible(true);
        rig.dispatch(XrEvent::SelectEnd { controller: LEFT }, &mut highlight);
        let c = rig.controller(LEFT);
        assert!(!c.is_selecting());
        assert_eq!(c.ray_line().unwrap().length, 0.0);
        assert!(!c.model().unwrap().spotlight_visible);
        assert!(!highlight.is_visible());
    }

    #[test]
    fn disconnect_clears_everything_and_reconnect_starts_fresh() {
        let (mut rig, _) = rig_with(flashlight());
        let mut highlight = Highlight::default();
        connect(&mut rig, LEFT, TargetRayMode::TrackedPointer);
        rig.apply_completed_loads();
        rig.dispatch(XrEvent::SelectStart { controller: LEFT }, &mut highlight);
        highlight.set_visible(true);

        rig.dispatch(XrEvent::Disconnected { controller: LEFT }, &mut highlight);
        let c = rig.controller(LEFT);
        assert!(c.attachments().is_empty());
        assert!(c.connection().is_none());
        assert!(!c.is_selecting());
        assert!(!highlight.is_visible());

        connect(&mut rig, LEFT, TargetRayMode::Gaze);
        let kinds: Vec<_> = rig
            .controller(LEFT)
            .attachments()
            .iter()
            .map(|a| matches!(a, Attachment::Reticle(_)))
            .collect();
        assert_eq!(kinds, vec![true]);
    }

    #[test]
    fn pointer_reconnect_restores_the_ray() {
        let (mut rig, _) = rig_with(flashlight());
        let mut highlight = Highlight::default();
        rig.dispatch(XrEvent::Disconnected { controller: RIGHT }, &mut highlight);
        assert!(rig.controller(RIGHT).ray_line().is_none());

        connect(&mut rig, RIGHT, TargetRayMode::TrackedPointer);
        assert_eq!(rig.controller(RIGHT).ray_line().map(|l| l.length), Some(0.0));
    }

    #[test]
    fn load_finishing_after_disconnect_is_discarded() {
        let (mut rig, handle) = rig_with(flashlight());
        let mut highlight = Highlight::default();
        handle.hold();
        connect(&mut rig, LEFT, TargetRayMode::TrackedPointer);
        rig.dispatch(XrEvent::Disconnected { controller: LEFT }, &mut highlight);

        handle.release();
        rig.apply_completed_loads();
        assert!(rig.controller(LEFT).model().is_none());
        assert!(rig.controller(LEFT).attachments().is_empty());
    }

    #[test]
    fn stale_load_after_reconnect_is_discarded_but_fresh_one_lands() {
        let (mut rig, handle) = rig_with(flashlight());
        let mut highlight = Highlight::default();
        handle.hold();
        connect(&mut rig, LEFT, TargetRayMode::TrackedPointer);
        rig.dispatch(XrEvent::Disconnected { controller: LEFT }, &mut highlight);
        connect(&mut rig, LEFT, TargetRayMode::TrackedPointer);
        assert_eq!(handle.pending(), 2);

        handle.release();
        rig.apply_completed_loads();
        let models = rig
            .controller(LEFT)
            .attachments()
            .iter()
            .filter(|a| matches!(a, Attachment::Model(_)))
            .count();
        assert_eq!(models, 1);
    }

    #[test]
    fn select_events_apply_to_disconnected_slots() {
        let (mut rig, _) = rig_with(flashlight());
        let mut highlight = Highlight::default();
        rig.dispatch(XrEvent::SelectStart { controller: RIGHT }, &mut highlight);
        assert!(rig.controller(RIGHT).is_selecting());
        assert_eq!(rig.controller(RIGHT).ray_line().unwrap().length, 10.0);
    }
}
