//! Light uniform: hemisphere, sun and up to two spotlights.

use xr_room_app::{ActiveSpotLight, Lighting};

/// Spotlights the shader evaluates.
pub const MAX_SPOT_LIGHTS: usize = 2;

/// One spotlight slot.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightUniform {
    /// World position (w unused).
    pub position: [f32; 4],
    /// Unit cone axis (w unused).
    pub direction: [f32; 4],
    /// Linear colour premultiplied by intensity (w unused).
    pub color: [f32; 4],
    /// `cos_cutoff`, `range`, `enabled`, unused.
    pub params: [f32; 4],
}

impl SpotLightUniform {
    fn from_light(light: &ActiveSpotLight) -> Self {
        let [r, g, b] = light.color.to_linear().map(|c| c * light.intensity);
        Self {
            position: light.position.extend(1.0).to_array(),
            direction: light.direction.extend(0.0).to_array(),
            color: [r, g, b, 1.0],
            params: [light.cos_cutoff, light.range, 1.0, 0.0],
        }
    }

    /// Whether the shader should evaluate this slot.
    pub fn enabled(&self) -> bool {
        self.params[2] > 0.5
    }
}

/// Lighting data sent to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Hemisphere colour from above, linear, times intensity.
    pub sky: [f32; 4],
    /// Hemisphere colour from below, linear, times intensity.
    pub ground: [f32; 4],
    /// Direction towards the sun.
    pub sun_direction: [f32; 4],
    /// Sun colour, linear, times intensity.
    pub sun_color: [f32; 4],
    /// Flashlights.
    pub spots: [SpotLightUniform; MAX_SPOT_LIGHTS],
}

impl LightingUniform {
    /// Pack scene lighting plus the spotlights that are switched on. Extra
    /// spotlights beyond [`MAX_SPOT_LIGHTS`] are dropped.
    pub fn new(lighting: &Lighting, spots: &[ActiveSpotLight]) -> Self {
        let linear = |c: xr_room_core::Color, k: f32| {
            let [r, g, b] = c.to_linear().map(|v| v * k);
            [r, g, b, 1.0]
        };
        let mut uniform = Self {
            sky: linear(lighting.sky, lighting.hemisphere_intensity),
            ground: linear(lighting.ground, lighting.hemisphere_intensity),
            sun_direction: lighting
                .sun_direction
                .normalize_or_zero()
                .extend(0.0)
                .to_array(),
            sun_color: linear(lighting.sun_color, lighting.sun_intensity),
            spots: [SpotLightUniform::default(); MAX_SPOT_LIGHTS],
        };
        for (slot, light) in uniform.spots.iter_mut().zip(spots) {
            *slot = SpotLightUniform::from_light(light);
        }
        uniform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use xr_room_core::Color;

    fn spot(x: f32) -> ActiveSpotLight {
        ActiveSpotLight {
            position: Vec3::new(x, 1.0, 0.0),
            direction: Vec3::NEG_Z,
            cos_cutoff: 0.9,
            range: 12.0,
            color: Color::WHITE,
            intensity: 2.0,
        }
    }

    #[test]
    fn uniform_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<SpotLightUniform>(), 64);
        assert_eq!(std::mem::size_of::<LightingUniform>() % 16, 0);
    }

    #[test]
    fn unused_slots_stay_disabled() {
        let uniform = LightingUniform::new(&Lighting::default(), &[spot(1.0)]);
        assert!(uniform.spots[0].enabled());
        assert!(!uniform.spots[1].enabled());
        assert_eq!(uniform.spots[0].params[1], 12.0);
        assert!((uniform.spots[0].color[0] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn extra_spots_are_dropped() {
        let spots = [spot(1.0), spot(2.0), spot(3.0)];
        let uniform = LightingUniform::new(&Lighting::default(), &spots);
        assert_eq!(uniform.spots[1].position[0], 2.0);
    }
}
