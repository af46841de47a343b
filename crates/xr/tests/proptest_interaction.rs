//! Property tests for controller ray casting and highlight state.

use glam::Vec3;
use proptest::prelude::*;
use xr_room_core::{pose_looking_along, BodyId, ControllerIndex};
use xr_room_scene::Highlight;
use xr_room_testkit::fixtures;
use xr_room_xr::{Attachment, Controller, InteractionHandler, RayLine};

const MAX_RAY: f32 = 10.0;

fn pointer_at(origin: Vec3, direction: Vec3, selecting: bool) -> Controller {
    let mut controller = Controller::new(ControllerIndex::ALL[0]);
    controller.attach(Attachment::RayLine(RayLine { length: 0.0 }));
    controller.set_pose(pose_looking_along(origin, direction));
    controller.set_selecting(selecting);
    controller
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn idle_controller_leaves_highlight_alone(
        origin in prop::array::uniform3(-2.0f32..2.0),
        dir in prop::array::uniform3(-1.0f32..1.0),
        visible in any::<bool>(),
    ) {
        let direction = Vec3::from_array(dir);
        prop_assume!(direction.length() > 0.1);
        let room = fixtures::room_with_bodies(&[Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0)]);
        let mut handler = InteractionHandler::new(MAX_RAY);
        let mut highlight = Highlight::default();
        highlight.set_visible(visible);
        let mut controller = pointer_at(Vec3::from_array(origin), direction, false);

        let hit = handler.handle_controller(&mut controller, &room, &mut highlight);

        prop_assert!(hit.is_none());
        prop_assert_eq!(highlight.is_visible(), visible);
        prop_assert_eq!(handler.current_target(), None);
        prop_assert_eq!(controller.ray_line().map(|r| r.length), Some(0.0));
    }

    #[test]
    fn nearest_body_along_the_ray_wins(
        offsets in prop::collection::btree_set(0u8..40, 1..6),
        shuffle in any::<u64>(),
    ) {
        // Bodies on the -Z axis, 0.25 m apart, inserted in a scrambled order.
        let mut zs: Vec<f32> = offsets.iter().map(|o| -(*o as f32) * 0.25).collect();
        let rotate = (shuffle as usize) % zs.len();
        zs.rotate_left(rotate);
        let positions: Vec<Vec3> = zs.iter().map(|z| Vec3::new(0.0, 0.0, *z)).collect();
        let room = fixtures::room_with_bodies(&positions);

        let mut handler = InteractionHandler::new(MAX_RAY);
        let mut highlight = Highlight::default();
        let mut controller = pointer_at(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z, true);

        let hit = handler.handle_controller(&mut controller, &room, &mut highlight);
        let hit = hit.expect("axis ray hits a body");

        let nearest_z = zs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let nearest = zs.iter().position(|z| *z == nearest_z).unwrap();
        prop_assert_eq!(hit.body, BodyId(nearest as u32));
        prop_assert_eq!(handler.current_target(), Some(hit.body));
        prop_assert!(highlight.is_visible());
        prop_assert_eq!(controller.ray_line().map(|r| r.length), Some(hit.distance));
        prop_assert!((hit.distance - (1.0 - nearest_z - 0.08)).abs() < 0.01);
    }

    #[test]
    fn miss_hides_highlight_and_stretches_ray(visible in any::<bool>(), x in -3.0f32..3.0) {
        let room = fixtures::room_with_bodies(&[Vec3::ZERO]);
        let mut handler = InteractionHandler::new(MAX_RAY);
        let mut highlight = Highlight::default();
        highlight.set_visible(visible);
        // Pointing away from the only body.
        let mut controller = pointer_at(Vec3::new(x, 0.0, 1.0), Vec3::Z, true);

        let hit = handler.handle_controller(&mut controller, &room, &mut highlight);

        prop_assert!(hit.is_none());
        prop_assert!(!highlight.is_visible());
        prop_assert_eq!(controller.ray_line().map(|r| r.length), Some(MAX_RAY));
    }
}
