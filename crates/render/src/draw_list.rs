//! CPU-side frame description: what to draw, with which material, where.
//!
//! Building the list needs no GPU, so headless runs and tests inspect exactly
//! what the windowed renderer would upload.

use crate::camera::CameraUniform;
use crate::lighting::LightingUniform;
use crate::mesh::{InstanceRaw, LineVertex};
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;
use xr_room_app::{FrameRenderer, SceneContext};
use xr_room_assets::PartShape;
use xr_room_core::Color;
use xr_room_xr::Controller;

/// Reticles are drawn half transparent.
pub const RETICLE_ALPHA: f32 = 0.5;

const RAY_COLOR: Color = Color::WHITE;

/// Shared mesh an instance refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MeshKey {
    /// Body geometry (also used by the highlight).
    Icosahedron,
    /// Unit cube.
    Cube,
    /// Unit cylinder along Z.
    Cylinder,
    /// Reticle ring with outer radius 1.
    Ring,
}

/// Shading applied to a batch. Batches draw in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaterialKind {
    /// Lit by hemisphere, sun and spotlights.
    Lambert,
    /// Unlit, back faces only.
    BackSide,
    /// Unlit, double sided, alpha blended.
    Basic,
}

/// Instances sharing one mesh and material.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    /// Mesh to draw.
    pub mesh: MeshKey,
    /// Material to draw it with.
    pub material: MaterialKind,
    /// One entry per copy.
    pub instances: Vec<InstanceRaw>,
}

/// Everything the GPU needs for one frame.
#[derive(Debug, Clone)]
pub struct SceneDrawList {
    batches: Vec<DrawBatch>,
    lines: Vec<LineVertex>,
    camera: CameraUniform,
    lighting: LightingUniform,
    clear_color: Color,
}

impl SceneDrawList {
    /// Collect the frame from the current scene state.
    pub fn build(ctx: &SceneContext) -> Self {
        let mut batches: BTreeMap<(MaterialKind, MeshKey), Vec<InstanceRaw>> = BTreeMap::new();
        let mut push = |material, mesh, model: Mat4, color: [f32; 4]| {
            batches
                .entry((material, mesh))
                .or_default()
                .push(InstanceRaw::new(model, color));
        };

        for body in ctx.room.bodies() {
            push(
                MaterialKind::Lambert,
                MeshKey::Icosahedron,
                body.transform(),
                body.color.to_linear_rgba(1.0),
            );
        }

        if let Some(model) = ctx.highlight_transform() {
            push(
                MaterialKind::BackSide,
                MeshKey::Icosahedron,
                model,
                ctx.highlight.color().to_linear_rgba(1.0),
            );
        }

        let mut lines = Vec::new();
        let shell = ctx.room.shell();
        push_segments(&mut lines, &shell.lines().segments, shell.color);

        for controller in ctx.rig.controllers().iter().filter(|c| c.is_connected()) {
            let grip = controller.grip();
            if let Some(model) = grip.model {
                push(
                    MaterialKind::Lambert,
                    MeshKey::Cube,
                    grip.pose * Mat4::from_scale(model.size),
                    model.color.to_linear_rgba(1.0),
                );
            }

            if let Some(attached) = controller.model() {
                for part in &attached.asset.parts {
                    let mesh = match part.shape {
                        PartShape::Box { .. } => MeshKey::Cube,
                        PartShape::Cylinder { .. } => MeshKey::Cylinder,
                    };
                    let local = Mat4::from_translation(part.offset)
                        * Mat4::from_scale(part.shape.scale());
                    push(
                        MaterialKind::Lambert,
                        mesh,
                        controller.pose() * local,
                        part.color.to_linear_rgba(1.0),
                    );
                }
            }

            if let Some(reticle) = controller.reticle() {
                push(
                    MaterialKind::Basic,
                    MeshKey::Ring,
                    controller.pose()
                        * reticle.local_transform()
                        * Mat4::from_scale(Vec3::splat(reticle.outer_radius)),
                    Color::WHITE.to_linear_rgba(RETICLE_ALPHA),
                );
            }

            push_ray(&mut lines, controller);
        }

        let spots = ctx.active_spotlights();
        Self {
            batches: batches
                .into_iter()
                .map(|((material, mesh), instances)| DrawBatch {
                    mesh,
                    material,
                    instances,
                })
                .collect(),
            lines,
            camera: CameraUniform::from_camera(&ctx.camera),
            lighting: LightingUniform::new(&ctx.lighting, &spots),
            clear_color: ctx.lighting.background,
        }
    }

    /// Batches in draw order.
    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// Instances of one mesh/material pair.
    pub fn batch(&self, material: MaterialKind, mesh: MeshKey) -> Option<&[InstanceRaw]> {
        self.batches
            .iter()
            .find(|b| b.material == material && b.mesh == mesh)
            .map(|b| b.instances.as_slice())
    }

    /// Total instances across batches.
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(|b| b.instances.len()).sum()
    }

    /// Line-list vertices (room grid, then controller rays).
    pub fn lines(&self) -> &[LineVertex] {
        &self.lines
    }

    /// Camera uniform.
    pub fn camera(&self) -> &CameraUniform {
        &self.camera
    }

    /// Light uniform.
    pub fn lighting(&self) -> &LightingUniform {
        &self.lighting
    }

    /// Background colour.
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }
}

/// Renderer that only builds draw lists. Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct DrawListRenderer {
    frames: u64,
    last: Option<SceneDrawList>,
}

impl DrawListRenderer {
    /// Renderer with no frames yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames built so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<&SceneDrawList> {
        self.last.as_ref()
    }
}

impl FrameRenderer for DrawListRenderer {
    fn render_frame(&mut self, ctx: &SceneContext) -> anyhow::Result<()> {
        self.last = Some(SceneDrawList::build(ctx));
        self.frames += 1;
        Ok(())
    }
}

fn push_segments(lines: &mut Vec<LineVertex>, segments: &[[Vec3; 2]], color: Color) {
    let color = color.to_linear_rgba(1.0);
    for [a, b] in segments {
        lines.push(LineVertex {
            position: a.to_array(),
            color,
        });
        lines.push(LineVertex {
            position: b.to_array(),
            color,
        });
    }
}

fn push_ray(lines: &mut Vec<LineVertex>, controller: &Controller) {
    let Some(ray) = controller.ray_line().filter(|r| r.length > 0.0) else {
        return;
    };
    let pose = controller.pose();
    let start = pose.transform_point3(Vec3::ZERO);
    let end = pose.transform_point3(Vec3::NEG_Z * ray.length);
    push_segments(lines, &[[start, end]], RAY_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xr_room_app::Lighting;
    use xr_room_camera::OrbitCamera;
    use xr_room_core::{pose_looking_along, ControllerIndex};
    use xr_room_scene::Highlight;
    use xr_room_testkit::{fixtures, StubLoader, StubOutcome};
    use xr_room_xr::{ControllerRig, RigConfig, TargetRayMode, XrEvent};

    const LEFT: ControllerIndex = ControllerIndex::ALL[0];
    const RIGHT: ControllerIndex = ControllerIndex::ALL[1];

    fn context(bodies: &[Vec3]) -> SceneContext {
        let (loader, _) =
            StubLoader::new(StubOutcome::Model(Arc::new(fixtures::flashlight_asset())));
        SceneContext::new(
            OrbitCamera::default(),
            fixtures::room_with_bodies(bodies),
            Highlight::default(),
            ControllerRig::new(RigConfig::default(), Box::new(loader)),
            Lighting::default(),
        )
    }

    fn connect(ctx: &mut SceneContext, controller: ControllerIndex, mode: TargetRayMode) {
        ctx.rig
            .dispatch(XrEvent::Connected { controller, mode }, &mut ctx.highlight);
        ctx.rig.apply_completed_loads();
    }

    #[test]
    fn idle_scene_draws_bodies_and_room_only() {
        let ctx = context(&[Vec3::ZERO, Vec3::ONE]);
        let list = SceneDrawList::build(&ctx);

        assert_eq!(list.batches().len(), 1);
        let bodies = list
            .batch(MaterialKind::Lambert, MeshKey::Icosahedron)
            .unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[1].model[3], [1.0, 1.0, 1.0, 1.0]);

        // 10 divisions per axis: 4 * (10 + 10 + 10 + 3) segments.
        assert_eq!(list.lines().len(), 2 * 4 * 33);
        assert_eq!(list.clear_color().to_hex(), 0x505050);
        assert!(!list.lighting().spots[0].enabled());
    }

    #[test]
    fn pointer_draws_grip_flashlight_and_ray_while_selecting() {
        let mut ctx = context(&[Vec3::new(0.0, 1.6, 0.0)]);
        connect(&mut ctx, LEFT, TargetRayMode::TrackedPointer);
        ctx.rig
            .controller_mut(LEFT)
            .set_pose(pose_looking_along(Vec3::new(0.0, 1.6, 3.0), Vec3::NEG_Z));

        let idle = SceneDrawList::build(&ctx);
        assert_eq!(idle.batch(MaterialKind::Lambert, MeshKey::Cube).unwrap().len(), 1);
        assert_eq!(
            idle.batch(MaterialKind::Lambert, MeshKey::Cylinder).unwrap().len(),
            2
        );
        let room_vertices = idle.lines().len();

        ctx.rig
            .dispatch(XrEvent::SelectStart { controller: LEFT }, &mut ctx.highlight);
        let controller = ctx.rig.controller_mut(LEFT);
        ctx.interaction
            .handle_controller(controller, &ctx.room, &mut ctx.highlight);

        let selecting = SceneDrawList::build(&ctx);
        assert_eq!(selecting.lines().len(), room_vertices + 2);
        let end = selecting.lines()[room_vertices + 1].position;
        // The ray stops on the body's surface.
        assert!((end[2] - 0.08).abs() < 0.01, "ray end {end:?}");
        assert_eq!(
            selecting
                .batch(MaterialKind::BackSide, MeshKey::Icosahedron)
                .unwrap()
                .len(),
            1
        );
        assert!(selecting.lighting().spots[0].enabled());
    }

    #[test]
    fn gaze_draws_reticle_in_front_of_controller() {
        let mut ctx = context(&[]);
        connect(&mut ctx, RIGHT, TargetRayMode::Gaze);
        ctx.rig
            .controller_mut(RIGHT)
            .set_pose(pose_looking_along(Vec3::new(0.0, 1.6, 0.0), Vec3::X));

        let list = SceneDrawList::build(&ctx);
        let reticle = list.batch(MaterialKind::Basic, MeshKey::Ring).unwrap();
        assert_eq!(reticle.len(), 1);
        let translation = Vec3::from_slice(&reticle[0].model[3][..3]);
        assert!((translation - Vec3::new(1.0, 1.6, 0.0)).length() < 1e-4);
        assert_eq!(reticle[0].color[3], RETICLE_ALPHA);
    }

    #[test]
    fn disconnected_controllers_are_not_drawn() {
        let mut ctx = context(&[]);
        connect(&mut ctx, LEFT, TargetRayMode::TrackedPointer);
        ctx.rig
            .dispatch(XrEvent::Disconnected { controller: LEFT }, &mut ctx.highlight);
        let list = SceneDrawList::build(&ctx);
        assert_eq!(list.instance_count(), 0);
        assert_eq!(list.lines().len(), 2 * 4 * 33);
    }

    #[test]
    fn draw_list_renderer_keeps_last_frame() {
        let ctx = context(&[Vec3::ZERO]);
        let mut renderer = DrawListRenderer::new();
        assert!(renderer.last_frame().is_none());
        renderer.render_frame(&ctx).unwrap();
        renderer.render_frame(&ctx).unwrap();
        assert_eq!(renderer.frames(), 2);
        assert_eq!(renderer.last_frame().unwrap().instance_count(), 1);
    }
}
