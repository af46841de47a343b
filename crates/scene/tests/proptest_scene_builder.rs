//! Property tests for room population and ray casting.

use glam::Vec3;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use xr_room_core::Ray;
use xr_room_scene::{Raycaster, SceneBuilder, SceneConfig};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn bodies_stay_inside_spawn_range(seed in any::<u64>(), range in 0.0f32..5.0, count in 0usize..300) {
        let builder = SceneBuilder::new(SceneConfig {
            body_count: count,
            spawn_range: range,
            seed: Some(seed),
            ..SceneConfig::default()
        });
        let room = builder.build();

        prop_assert_eq!(room.bodies().len(), count);
        for (index, body) in room.bodies().iter().enumerate() {
            prop_assert_eq!(body.id.0 as usize, index);
            for c in body.position.to_array() {
                prop_assert!(c >= -range && c <= range, "{} outside ±{}", c, range);
            }
            prop_assert!(body.color.to_hex() <= 0xFF_FFFF);
        }
    }

    #[test]
    fn hits_are_ordered_and_on_the_ray(seed in any::<u64>(), dir in prop::array::uniform3(-1.0f32..1.0)) {
        let direction = Vec3::from_array(dir);
        prop_assume!(direction.length() > 0.1);

        let mut rng = StdRng::seed_from_u64(seed);
        let room = SceneBuilder::new(SceneConfig::default()).build_with_rng(&mut rng);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), direction);
        let hits = Raycaster::default().intersect_room(&ray, &room);

        for pair in hits.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
        }
        for hit in &hits {
            let body = room.body(hit.body).unwrap();
            // Hit points lie on the body surface, within its bounding sphere.
            prop_assert!((hit.point - body.position).length() <= room.body_radius() + 1e-4);
            prop_assert!(hit.distance >= 0.0);
        }
    }
}
