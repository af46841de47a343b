//! Random room population.

use crate::geometry::icosahedron;
use crate::room::{Room, RoomShell};
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use xr_room_core::Color;

/// Parameters for [`SceneBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of bodies to scatter.
    pub body_count: usize,
    /// Each body coordinate is drawn from `[-spawn_range, spawn_range]`.
    pub spawn_range: f32,
    /// Icosahedron radius.
    pub body_radius: f32,
    /// Icosahedron subdivision level.
    pub body_detail: u32,
    /// Room edge length.
    pub room_size: f32,
    /// Grid divisions per room axis.
    pub room_divisions: u32,
    /// Room line colour.
    pub room_color: Color,
    /// Fixed RNG seed; `None` draws fresh entropy.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            body_count: 200,
            spawn_range: 2.0,
            body_radius: 0.08,
            body_detail: 2,
            room_size: 6.0,
            room_divisions: 10,
            room_color: Color::from_hex(0x808080),
            seed: None,
        }
    }
}

/// Builds the room and scatters randomly coloured bodies in it.
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    config: SceneConfig,
}

impl SceneBuilder {
    /// Builder for `config`. Negative or non-finite ranges are treated as 0.
    pub fn new(mut config: SceneConfig) -> Self {
        if !config.spawn_range.is_finite() || config.spawn_range < 0.0 {
            config.spawn_range = 0.0;
        }
        if !config.body_radius.is_finite() || config.body_radius < 0.0 {
            config.body_radius = 0.0;
        }
        Self { config }
    }

    /// Effective configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Build using the configured seed, or OS entropy when there is none.
    pub fn build(&self) -> Room {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_with_rng(&mut rng)
    }

    /// Build drawing positions and colours from `rng`.
    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Room {
        let config = &self.config;
        let shell = RoomShell::new(config.room_size, config.room_divisions, config.room_color);
        let mesh = Arc::new(icosahedron(config.body_radius, config.body_detail));
        let mut room = Room::new(shell, mesh);

        let r = config.spawn_range;
        for _ in 0..config.body_count {
            let position = Vec3::new(
                rng.gen_range(-r..=r),
                rng.gen_range(-r..=r),
                rng.gen_range(-r..=r),
            );
            room.add_body(position, Color::random(rng));
        }

        info!(
            bodies = room.bodies().len(),
            range = r,
            seeded = config.seed.is_some(),
            "room built"
        );
        room
    }
}
