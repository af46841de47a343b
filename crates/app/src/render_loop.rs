//! The per-frame driver: events, interaction, render, statistics.

use crate::context::SceneContext;
use crate::stats::FrameStats;
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};
use xr_room_core::{BodyId, ControllerIndex, FrameIndex};
use xr_room_scene::RayHit;
use xr_room_xr::XrHost;

/// Errors emitted by [`RenderLoop::tick`].
#[derive(Debug, Error)]
pub enum LoopError {
    /// `tick` was called before `start`.
    #[error("render loop ticked before it was started")]
    NotStarted,
    /// The renderer failed to produce the frame.
    #[error("renderer failed: {0:#}")]
    Render(anyhow::Error),
}

/// Loop lifecycle. Running is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not yet started.
    Idle,
    /// Producing frames.
    Running,
}

/// What paced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// Window animation callback (no XR session).
    Animation,
    /// XR session frame.
    XrSession,
}

impl FrameSource {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            FrameSource::Animation => "animation",
            FrameSource::XrSession => "xr-session",
        }
    }
}

impl fmt::Display for FrameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draws a prepared scene.
pub trait FrameRenderer {
    /// Draw one frame of `ctx`.
    fn render_frame(&mut self, ctx: &SceneContext) -> anyhow::Result<()>;
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Frame that was produced.
    pub frame: FrameIndex,
    /// What paced it.
    pub source: FrameSource,
    /// Highlight target after the interaction pass.
    pub target: Option<BodyId>,
    /// Highlight visibility after the interaction pass.
    pub highlight_visible: bool,
    /// Hit per controller slot this frame.
    pub hits: [Option<RayHit>; ControllerIndex::COUNT],
}

/// Idle → Running state machine that produces frames.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    frame: FrameIndex,
    stats: FrameStats,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    /// Idle loop at frame 0.
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frame: FrameIndex::ZERO,
            stats: FrameStats::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Next frame to be produced.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    /// Frame statistics.
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Begin producing frames. Starting twice is a no-op.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
            info!("render loop started");
        }
    }

    /// Produce one frame.
    ///
    /// Finished model loads are attached first, then host events are
    /// dispatched, so a select-end hides the highlight before this frame's
    /// ray casts. Controllers are processed in slot order.
    pub fn tick(
        &mut self,
        ctx: &mut SceneContext,
        host: &mut dyn XrHost,
        renderer: &mut dyn FrameRenderer,
        now: Instant,
    ) -> Result<FrameReport, LoopError> {
        if self.state != LoopState::Running {
            return Err(LoopError::NotStarted);
        }

        let source = if host.session_active() {
            FrameSource::XrSession
        } else {
            FrameSource::Animation
        };

        ctx.rig.apply_completed_loads();
        for event in host.poll_events(self.frame) {
            ctx.rig.dispatch(event, &mut ctx.highlight);
        }
        ctx.rig.update_poses(host);

        let mut hits = [None; ControllerIndex::COUNT];
        for (slot, controller) in ctx.rig.controllers_mut().iter_mut().enumerate() {
            hits[slot] = ctx
                .interaction
                .handle_controller(controller, &ctx.room, &mut ctx.highlight);
        }

        renderer.render_frame(ctx).map_err(LoopError::Render)?;

        if self.stats.record_frame(now) {
            debug!(fps = self.stats.fps(), frame = self.frame.0, "frame stats");
        }

        let report = FrameReport {
            frame: self.frame,
            source,
            target: ctx.interaction.current_target(),
            highlight_visible: ctx.highlight.is_visible(),
            hits,
        };
        self.frame = self.frame.advance(1);
        Ok(report)
    }
}
