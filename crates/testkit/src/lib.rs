#![warn(missing_docs)]
//! Testing surfaces: frame recordings, fixtures and loader doubles.

pub mod fixtures;
mod stub_loader;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use stub_loader::{StubLoader, StubLoaderHandle, StubOutcome};

/// First line of every recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    /// Wall-clock start time (RFC 3339).
    pub started_at: String,
    /// Scene seed, when one was fixed.
    pub seed: Option<u64>,
    /// Number of bodies in the room.
    pub bodies: usize,
    /// Script that drove the run, if any.
    pub script: Option<String>,
}

impl SessionHeader {
    /// Header stamped with the current time.
    pub fn now(seed: Option<u64>, bodies: usize, script: Option<String>) -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            seed,
            bodies,
            script,
        }
    }
}

/// Per-controller state captured each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerRecord {
    /// Slot index.
    pub index: u8,
    /// Target-ray mode when connected.
    pub mode: Option<String>,
    /// Select flag.
    pub selecting: bool,
    /// Ray line length when a ray is attached.
    pub ray_length: Option<f32>,
    /// Whether a model is attached.
    pub has_model: bool,
    /// Whether a reticle is attached.
    pub has_reticle: bool,
}

/// One rendered frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame number.
    pub frame: u64,
    /// `"animation"` or `"xr-session"`.
    pub source: String,
    /// Body the highlight wraps, if any was ever hit.
    pub target: Option<u32>,
    /// Highlight visibility after the interaction pass.
    pub highlight_visible: bool,
    /// Both controller slots.
    pub controllers: Vec<ControllerRecord>,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one record as a line.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Read a recording back: the header followed by its frames.
pub fn read_recording<P: AsRef<Path>>(path: P) -> Result<(SessionHeader, Vec<FrameRecord>)> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
    let header_line = lines
        .next()
        .ok_or_else(|| anyhow::anyhow!("recording is empty"))?;
    let header = serde_json::from_str(header_line)?;
    let frames = lines
        .map(serde_json::from_str)
        .collect::<Result<Vec<FrameRecord>, _>>()?;
    Ok((header, frames))
}
