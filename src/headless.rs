//! Scripted run without a window: replay controller input, build draw lists
//! and optionally record one JSON line per frame.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use xr_room_app::{FrameReport, RenderLoop, SceneContext};
use xr_room_render::DrawListRenderer;
use xr_room_testkit::{ControllerRecord, FrameRecord, JsonlSink, SessionHeader};
use xr_room_xr::{ScriptedHost, XrScript};

use crate::config::AppConfig;
use crate::scene::build_context;

/// Frames run when neither `--frames` nor a script says otherwise.
const DEFAULT_FRAMES: u64 = 120;

#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub script: Option<PathBuf>,
    pub frames: Option<u64>,
    pub record: Option<PathBuf>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSummary {
    pub frames: u64,
    pub last_target: Option<u32>,
    pub highlight_visible: bool,
    pub instances: usize,
}

pub fn run(config: &AppConfig, options: &HeadlessOptions) -> Result<HeadlessSummary> {
    let script = match &options.script {
        Some(path) => XrScript::from_path(path)
            .with_context(|| format!("failed to load script {}", path.display()))?,
        None => XrScript::default(),
    };
    // Run one frame past the last step so its effect is visible.
    let frames = options
        .frames
        .or_else(|| script.last_frame().map(|last| last + 2))
        .unwrap_or(DEFAULT_FRAMES);

    let mut ctx = build_context(config, options.seed);
    let seed = options.seed.or(config.scene.seed);
    let mut sink = match &options.record {
        Some(path) => {
            let mut sink = JsonlSink::create(path)
                .with_context(|| format!("failed to create recording {}", path.display()))?;
            sink.write(&SessionHeader::now(
                seed,
                ctx.room.bodies().len(),
                options.script.as_ref().map(|p| p.display().to_string()),
            ))?;
            Some(sink)
        }
        None => None,
    };

    let mut host = ScriptedHost::new(script);
    let mut renderer = DrawListRenderer::new();
    let mut render_loop = RenderLoop::new();
    render_loop.start();

    let mut last = None;
    for _ in 0..frames {
        let report = render_loop.tick(&mut ctx, &mut host, &mut renderer, Instant::now())?;
        if let Some(sink) = sink.as_mut() {
            sink.write(&frame_record(&report, &ctx))?;
        }
        last = Some(report);
    }
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }

    let summary = HeadlessSummary {
        frames,
        last_target: last.as_ref().and_then(|r| r.target).map(|id| id.0),
        highlight_visible: last.as_ref().is_some_and(|r| r.highlight_visible),
        instances: renderer
            .last_frame()
            .map(|list| list.instance_count())
            .unwrap_or(0),
    };
    info!(
        frames = summary.frames,
        target = ?summary.last_target,
        highlight = summary.highlight_visible,
        script_done = host.finished(),
        "headless run finished"
    );
    Ok(summary)
}

fn frame_record(report: &FrameReport, ctx: &SceneContext) -> FrameRecord {
    FrameRecord {
        frame: report.frame.0,
        source: report.source.to_string(),
        target: report.target.map(|id| id.0),
        highlight_visible: report.highlight_visible,
        controllers: ctx
            .rig
            .controllers()
            .iter()
            .map(|controller| ControllerRecord {
                index: controller.index().into(),
                mode: controller.connection().map(|c| c.mode.to_string()),
                selecting: controller.is_selecting(),
                ray_length: controller.ray_line().map(|r| r.length),
                has_model: controller.model().is_some(),
                has_reticle: controller.reticle().is_some(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str, ext: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("xr-room-headless-{name}-{nanos}.{ext}"))
    }

    fn one_body_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.scene.body_count = 1;
        config.scene.spawn_range = 0.0;
        config
    }

    #[test]
    fn no_script_runs_requested_frames_without_targets() {
        let options = HeadlessOptions {
            frames: Some(3),
            seed: Some(1),
            ..HeadlessOptions::default()
        };
        let summary = run(&AppConfig::default(), &options).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.last_target, None);
        assert_eq!(summary.instances, 200);
    }

    #[test]
    fn scripted_gaze_select_targets_centre_body() {
        let script = temp_path("script", "toml");
        fs::write(
            &script,
            r#"
session_active = true

[[step]]
frame = 0
actions = [
    { type = "connected", controller = 1, mode = "gaze" },
    { type = "pose", controller = 1, position = [0.0, 0.0, 2.0], direction = [0.0, 0.0, -1.0] },
]

[[step]]
frame = 1
actions = [{ type = "select-start", controller = 1 }]
"#,
        )
        .unwrap();
        let record = temp_path("record", "jsonl");
        let options = HeadlessOptions {
            script: Some(script.clone()),
            record: Some(record.clone()),
            ..HeadlessOptions::default()
        };

        let summary = run(&one_body_config(), &options).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.last_target, Some(0));
        assert!(summary.highlight_visible);

        let (header, frames) = xr_room_testkit::read_recording(&record).unwrap();
        assert_eq!(header.bodies, 1);
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.source == "xr-session"));
        assert!(frames[0].controllers[1].has_reticle);
        assert!(!frames[0].highlight_visible);
        let gaze = &frames[2].controllers[1];
        assert!(gaze.selecting);
        assert!((gaze.ray_length.unwrap() - 1.92).abs() < 0.01);

        let _ = fs::remove_file(script);
        let _ = fs::remove_file(record);
    }
}
