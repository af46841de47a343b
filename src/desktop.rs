//! Windowed run: orbit camera plus keyboard-emulated XR controllers.

use anyhow::Result;
use glam::{Mat4, Vec2};
use std::time::Instant;
use tracing::{error, info};
use winit::event::{Event, MouseButton, WindowEvent};
use winit::keyboard::KeyCode;
use xr_room_app::RenderLoop;
use xr_room_camera::OrbitCamera;
use xr_room_core::{pose_looking_along, ControllerIndex, FrameIndex};
use xr_room_input::InputState;
use xr_room_render::{Renderer, WindowManager};
use xr_room_xr::{TargetRayMode, XrEvent, XrHost};

use crate::config::AppConfig;
use crate::scene::build_context;

const POINTER: ControllerIndex = ControllerIndex::ALL[0];
const GAZE: ControllerIndex = ControllerIndex::ALL[1];

/// Keyboard binding for one emulated controller.
#[derive(Debug, Clone, Copy)]
struct Binding {
    controller: ControllerIndex,
    mode: TargetRayMode,
    toggle: KeyCode,
    select: KeyCode,
}

const BINDINGS: [Binding; ControllerIndex::COUNT] = [
    Binding {
        controller: POINTER,
        mode: TargetRayMode::TrackedPointer,
        toggle: KeyCode::KeyC,
        select: KeyCode::Space,
    },
    Binding {
        controller: GAZE,
        mode: TargetRayMode::Gaze,
        toggle: KeyCode::KeyG,
        select: KeyCode::Enter,
    },
];

/// [`XrHost`] driven from the desktop keyboard and mouse.
///
/// `C` toggles a tracked pointer in slot 0, aimed from the eye through the
/// cursor and selected with `Space`. `G` toggles a gaze source in slot 1,
/// aimed along the view and selected with `Enter`. No XR session is ever
/// reported.
#[derive(Debug, Default)]
pub struct DesktopHost {
    connected: [bool; ControllerIndex::COUNT],
    selecting: [bool; ControllerIndex::COUNT],
    poses: [Option<Mat4>; ControllerIndex::COUNT],
    pending: Vec<XrEvent>,
}

impl DesktopHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn this frame's input into controller events and poses.
    pub fn update(&mut self, input: &InputState, camera: &OrbitCamera, screen: Vec2) {
        for binding in BINDINGS {
            let slot = binding.controller.get();
            let controller = binding.controller;

            if input.key_just_pressed(binding.toggle) {
                if self.connected[slot] {
                    self.connected[slot] = false;
                    self.selecting[slot] = false;
                    self.pending.push(XrEvent::Disconnected { controller });
                } else {
                    self.connected[slot] = true;
                    self.pending.push(XrEvent::Connected {
                        controller,
                        mode: binding.mode,
                    });
                }
            }

            let held = self.connected[slot] && input.key_pressed(binding.select);
            if held != self.selecting[slot] {
                self.selecting[slot] = held;
                self.pending.push(if held {
                    XrEvent::SelectStart { controller }
                } else {
                    XrEvent::SelectEnd { controller }
                });
            }
        }

        let eye = camera.position();
        let aim = match input.cursor_position() {
            Some(cursor) => camera.screen_ray(cursor, screen).direction,
            None => camera.forward(),
        };
        self.poses[POINTER.get()] =
            self.connected[POINTER.get()].then(|| pose_looking_along(eye, aim));
        self.poses[GAZE.get()] =
            self.connected[GAZE.get()].then(|| pose_looking_along(eye, camera.forward()));
    }
}

impl XrHost for DesktopHost {
    fn session_active(&self) -> bool {
        false
    }

    fn poll_events(&mut self, _frame: FrameIndex) -> Vec<XrEvent> {
        std::mem::take(&mut self.pending)
    }

    fn target_ray_pose(&self, controller: ControllerIndex) -> Option<Mat4> {
        self.poses[controller.get()]
    }

    fn grip_pose(&self, controller: ControllerIndex) -> Option<Mat4> {
        self.poses[controller.get()]
    }
}

pub fn run(config: AppConfig, seed: Option<u64>) -> Result<()> {
    let manager = WindowManager::new(&config.window)?;
    let mut ctx = build_context(&config, seed);
    let (width, height) = manager.size();
    ctx.camera.set_viewport(width, height);

    let reticle = ctx.rig.config().reticle();
    let mut renderer = Renderer::new(manager.window(), &ctx.room, &reticle)?;
    let controls = config.desktop.controls();
    let title = config.window.title.clone();
    let mut input = InputState::new();
    let mut host = DesktopHost::new();
    let mut render_loop = RenderLoop::new();
    let mut shown_fps = 0.0_f32;
    render_loop.start();
    info!("desktop controls: C/G connect, Space/Enter select, drag to orbit");

    manager.run(move |event, window| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => return false,
                WindowEvent::Resized(size) => {
                    renderer.resize((size.width, size.height));
                    ctx.camera.set_viewport(size.width, size.height);
                }
                WindowEvent::RedrawRequested => {
                    if input.key_just_pressed(KeyCode::Escape) {
                        return false;
                    }
                    controls.rotate(&mut ctx.camera, input.drag_delta(MouseButton::Left));
                    controls.pan(&mut ctx.camera, input.drag_delta(MouseButton::Right));
                    controls.zoom(&mut ctx.camera, input.mouse_wheel_delta);

                    let (w, h) = renderer.size();
                    host.update(&input, &ctx.camera, Vec2::new(w as f32, h as f32));
                    if let Err(err) =
                        render_loop.tick(&mut ctx, &mut host, &mut renderer, Instant::now())
                    {
                        error!(error = %err, "frame failed; exiting");
                        return false;
                    }
                    input.begin_frame();

                    let fps = render_loop.stats().fps();
                    if fps != shown_fps {
                        shown_fps = fps;
                        window.set_title(&format!("{title} | {fps:.0} fps"));
                    }
                }
                other => input.handle_event(&other),
            },
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn toggle_connects_then_disconnects() {
        let camera = OrbitCamera::default();
        let mut host = DesktopHost::new();
        let mut input = InputState::new();

        input.press_key(KeyCode::KeyC);
        host.update(&input, &camera, SCREEN);
        assert_eq!(
            host.poll_events(FrameIndex::ZERO),
            vec![XrEvent::Connected {
                controller: POINTER,
                mode: TargetRayMode::TrackedPointer,
            }]
        );
        assert!(host.target_ray_pose(POINTER).is_some());
        assert!(host.target_ray_pose(GAZE).is_none());

        input.release_key(KeyCode::KeyC);
        input.begin_frame();
        input.press_key(KeyCode::KeyC);
        host.update(&input, &camera, SCREEN);
        assert_eq!(
            host.poll_events(FrameIndex(1)),
            vec![XrEvent::Disconnected { controller: POINTER }]
        );
        assert!(host.target_ray_pose(POINTER).is_none());
        assert!(!host.session_active());
    }

    #[test]
    fn select_follows_held_key_only_while_connected() {
        let camera = OrbitCamera::default();
        let mut host = DesktopHost::new();
        let mut input = InputState::new();

        input.press_key(KeyCode::Enter);
        host.update(&input, &camera, SCREEN);
        assert!(host.poll_events(FrameIndex::ZERO).is_empty());

        input.press_key(KeyCode::KeyG);
        host.update(&input, &camera, SCREEN);
        assert_eq!(
            host.poll_events(FrameIndex(1)),
            vec![
                XrEvent::Connected {
                    controller: GAZE,
                    mode: TargetRayMode::Gaze,
                },
                XrEvent::SelectStart { controller: GAZE },
            ]
        );

        input.begin_frame();
        input.release_key(KeyCode::Enter);
        host.update(&input, &camera, SCREEN);
        assert_eq!(
            host.poll_events(FrameIndex(2)),
            vec![XrEvent::SelectEnd { controller: GAZE }]
        );
    }

    #[test]
    fn pointer_aims_through_cursor() {
        let camera = OrbitCamera::default();
        let mut host = DesktopHost::new();
        let mut input = InputState::new();
        input.press_key(KeyCode::KeyC);
        input.move_cursor(SCREEN / 2.0);
        host.update(&input, &camera, SCREEN);

        let pose = host.target_ray_pose(POINTER).unwrap();
        let forward = pose.transform_vector3(Vec3::NEG_Z);
        assert!((forward - Vec3::NEG_Z).length() < 1e-3);
        assert!((pose.transform_point3(Vec3::ZERO) - camera.position()).length() < 1e-4);
    }
}
