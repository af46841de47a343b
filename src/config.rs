use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;
use xr_room_app::Lighting;
use xr_room_camera::{OrbitCamera, OrbitControls};
use xr_room_render::WindowConfig;
use xr_room_scene::{HighlightConfig, SceneConfig};
use xr_room_xr::RigConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/xr-room.toml";

/// Everything tunable, one TOML table per concern.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub highlight: HighlightConfig,
    pub controllers: RigConfig,
    pub lighting: Lighting,
    pub desktop: DesktopConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.6, 3.0),
            target: Vec3::new(0.0, 1.6, 0.0),
            fov_degrees: 50.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn camera(&self) -> OrbitCamera {
        let mut camera = OrbitCamera::looking_at(self.eye, self.target);
        camera.fov = self.fov_degrees.to_radians();
        camera.near = self.near;
        camera.far = self.far;
        camera
    }
}

/// Mouse sensitivity for the orbit controls.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_step: f32,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        let controls = OrbitControls::default();
        Self {
            rotate_speed: controls.rotate_speed,
            pan_speed: controls.pan_speed,
            zoom_step: controls.zoom_step,
        }
    }
}

impl DesktopConfig {
    pub fn controls(&self) -> OrbitControls {
        OrbitControls {
            rotate_speed: self.rotate_speed,
            pan_speed: self.pan_speed,
            zoom_step: self.zoom_step,
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                AppConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("xr-room-{name}-{nanos}.toml"))
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_path(&temp_path("missing"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.scene.body_count, 200);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_path("malformed");
        fs::write(&path, "[scene\nbody_count = ").unwrap();
        assert_eq!(AppConfig::load_from_path(&path), AppConfig::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = temp_path("partial");
        fs::write(
            &path,
            "[scene]\nbody_count = 12\nseed = 9\n\n[lighting]\nbackground = \"#000000\"\n",
        )
        .unwrap();
        let config = AppConfig::load_from_path(&path);
        assert_eq!(config.scene.body_count, 12);
        assert_eq!(config.scene.seed, Some(9));
        assert_eq!(config.scene.spawn_range, 2.0);
        assert_eq!(config.lighting.background.to_hex(), 0);
        assert_eq!(config.controllers, RigConfig::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn saved_config_loads_back() {
        let path = temp_path("saved");
        let mut config = AppConfig::default();
        config.window.title = "saved room".into();
        config.camera.fov_degrees = 65.0;
        config.save_to_path(&path).unwrap();
        assert_eq!(AppConfig::load_from_path(&path), config);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn camera_config_matches_demo_camera() {
        let camera = CameraConfig::default().camera();
        assert!((camera.position() - Vec3::new(0.0, 1.6, 3.0)).length() < 1e-4);
        assert!((camera.fov.to_degrees() - 50.0).abs() < 1e-4);
    }
}
