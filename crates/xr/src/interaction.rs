//! Per-frame controller ray casting into the room.

use crate::controller::Controller;
use glam::Mat4;
use tracing::trace;
use xr_room_core::BodyId;
use xr_room_scene::{Highlight, RayHit, Raycaster, Room};

/// Casts selecting controllers' rays and tracks which body the highlight
/// wraps.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    raycaster: Raycaster,
    max_ray_length: f32,
    current_target: Option<BodyId>,
}

impl InteractionHandler {
    /// Handler that resets unobstructed rays to `max_ray_length`.
    pub fn new(max_ray_length: f32) -> Self {
        Self {
            raycaster: Raycaster::default(),
            max_ray_length,
            current_target: None,
        }
    }

    /// Body the highlight last attached to. Kept across misses.
    pub fn current_target(&self) -> Option<BodyId> {
        self.current_target
    }

    /// Cast `controller`'s ray if it is selecting.
    ///
    /// A hit retargets the highlight, shows it and trims the ray to the hit.
    /// A miss hides the highlight and stretches the ray to full length.
    /// A controller that is not selecting changes nothing.
    pub fn handle_controller(
        &mut self,
        controller: &mut Controller,
        room: &Room,
        highlight: &mut Highlight,
    ) -> Option<RayHit> {
        if !controller.is_selecting() {
            return None;
        }

        let ray = controller.ray();
        let hit = self.raycaster.intersect_room(&ray, room).into_iter().next();
        match hit {
            Some(hit) => {
                trace!(controller = %controller.index(), body = %hit.body, distance = hit.distance, "ray hit");
                self.current_target = Some(hit.body);
                highlight.set_visible(true);
                controller.set_ray_length(hit.distance);
            }
            None => {
                highlight.set_visible(false);
                controller.set_ray_length(self.max_ray_length);
            }
        }
        hit
    }

    /// Where to draw the highlight this frame, if anywhere.
    pub fn highlight_transform(&self, room: &Room, highlight: &Highlight) -> Option<Mat4> {
        if !highlight.is_visible() {
            return None;
        }
        let body = room.body(self.current_target?)?;
        Some(highlight.transform_around(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Attachment, RayLine};
    use glam::Vec3;
    use xr_room_core::{pose_looking_along, ControllerIndex};
    use xr_room_testkit::fixtures;

    fn pointer_at(position: Vec3, direction: Vec3, selecting: bool) -> Controller {
        let mut controller = Controller::new(ControllerIndex::ALL[0]);
        controller.attach(Attachment::RayLine(RayLine { length: 0.0 }));
        controller.set_pose(pose_looking_along(position, direction));
        controller.set_selecting(selecting);
        controller
    }

    #[test]
    fn idle_controller_changes_nothing() {
        let room = fixtures::room_with_bodies(&[Vec3::new(0.0, 1.6, 0.0)]);
        let mut handler = InteractionHandler::new(10.0);
        let mut highlight = Highlight::default();
        highlight.set_visible(true);
        let mut controller = pointer_at(Vec3::new(0.0, 1.6, 3.0), Vec3::NEG_Z, false);

        assert!(handler.handle_controller(&mut controller, &room, &mut highlight).is_none());
        assert!(highlight.is_visible());
        assert_eq!(handler.current_target(), None);
        assert_eq!(controller.ray_line().unwrap().length, 0.0);
    }

    #[test]
    fn hit_targets_body_and_trims_ray() {
        let room = fixtures::room_with_bodies(&[Vec3::new(0.0, 1.6, 0.0)]);
        let mut handler = InteractionHandler::new(10.0);
        let mut highlight = Highlight::default();
        let mut controller = pointer_at(Vec3::new(0.0, 1.6, 3.0), Vec3::NEG_Z, true);

        let hit = handler
            .handle_controller(&mut controller, &room, &mut highlight)
            .expect("hit");
        assert_eq!(hit.body, BodyId(0));
        assert!(highlight.is_visible());
        assert_eq!(handler.current_target(), Some(BodyId(0)));
        assert_eq!(controller.ray_line().unwrap().length, hit.distance);

        let transform = handler.highlight_transform(&room, &highlight).unwrap();
        assert!((transform.w_axis.truncate() - Vec3::new(0.0, 1.6, 0.0)).length() < 1e-6);
    }

    #[test]
    fn nearest_body_wins_over_insertion_order() {
        let room = fixtures::room_with_bodies(&[
            Vec3::new(0.0, 1.6, -1.0),
            Vec3::new(0.0, 1.6, 1.0),
        ]);
        let mut handler = InteractionHandler::new(10.0);
        let mut highlight = Highlight::default();
        let mut controller = pointer_at(Vec3::new(0.0, 1.6, 3.0), Vec3::NEG_Z, true);

        handler.handle_controller(&mut controller, &room, &mut highlight);
        assert_eq!(handler.current_target(), Some(BodyId(1)));
    }

    #[test]
    fn miss_hides_highlight_and_keeps_target() {
        let room = fixtures::room_with_bodies(&[Vec3::new(0.0, 1.6, 0.0)]);
        let mut handler = InteractionHandler::new(10.0);
        let mut highlight = Highlight::default();
        let mut controller = pointer_at(Vec3::new(0.0, 1.6, 3.0), Vec3::NEG_Z, true);
        handler.handle_controller(&mut controller, &room, &mut highlight);
        assert!(highlight.is_visible());

        controller.set_pose(pose_looking_along(Vec3::new(0.0, 1.6, 3.0), Vec3::Y));
        assert!(handler.handle_controller(&mut controller, &room, &mut highlight).is_none());
        assert!(!highlight.is_visible());
        assert_eq!(handler.current_target(), Some(BodyId(0)));
        assert_eq!(controller.ray_line().unwrap().length, 10.0);
        assert!(handler.highlight_transform(&room, &highlight).is_none());
    }

    #[test]
    fn last_selecting_controller_decides_visibility() {
        let room = fixtures::room_with_bodies(&[Vec3::new(0.0, 1.6, 0.0)]);
        let mut handler = InteractionHandler::new(10.0);
        let mut highlight = Highlight::default();
        let mut hitting = pointer_at(Vec3::new(0.0, 1.6, 3.0), Vec3::NEG_Z, true);
        let mut missing = pointer_at(Vec3::new(0.0, 1.6, 3.0), Vec3::Z, true);

        handler.handle_controller(&mut hitting, &room, &mut highlight);
        handler.handle_controller(&mut missing, &room, &mut highlight);
        assert!(!highlight.is_visible());

        handler.handle_controller(&mut missing, &room, &mut highlight);
        handler.handle_controller(&mut hitting, &room, &mut highlight);
        assert!(highlight.is_visible());
    }
}
