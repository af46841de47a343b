use crate::config::AppConfig;
use tracing::info;
use xr_room_app::SceneContext;
use xr_room_assets::ThreadedModelLoader;
use xr_room_scene::{Highlight, SceneBuilder};
use xr_room_xr::ControllerRig;

/// Build the room, camera, highlight and controller rig described by
/// `config`. `seed` overrides the configured seed.
pub fn build_context(config: &AppConfig, seed: Option<u64>) -> SceneContext {
    let mut scene = config.scene.clone();
    if seed.is_some() {
        scene.seed = seed;
    }
    let room = SceneBuilder::new(scene).build();
    let rig = ControllerRig::new(
        config.controllers.clone(),
        Box::new(ThreadedModelLoader::new()),
    );
    info!(
        bodies = room.bodies().len(),
        flashlight = %config.controllers.flashlight_model.display(),
        "scene ready"
    );
    SceneContext::new(
        config.camera.camera(),
        room,
        Highlight::new(&config.highlight),
        rig,
        config.lighting.clone(),
    )
}
