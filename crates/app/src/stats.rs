use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Frame counter with an FPS estimate refreshed once per second.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    total_frames: u64,
    window_start: Option<Instant>,
    window_frames: u32,
    fps: f32,
    last_frame: Option<Instant>,
    last_frame_time: Duration,
}

impl FrameStats {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame finished at `now`. Returns `true` when the FPS estimate
    /// was refreshed.
    pub fn record_frame(&mut self, now: Instant) -> bool {
        self.total_frames += 1;
        if let Some(last) = self.last_frame {
            self.last_frame_time = now.saturating_duration_since(last);
        }
        self.last_frame = Some(now);

        let start = *self.window_start.get_or_insert(now);
        self.window_frames += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= WINDOW {
            self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_frames = 0;
            self.window_start = Some(now);
            return true;
        }
        false
    }

    /// Frames per second over the last complete window; 0 before the first.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Frames recorded since creation.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Time between the last two frames.
    pub fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }
}
