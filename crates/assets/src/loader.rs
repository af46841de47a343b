use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::{AssetError, ModelAsset};

/// Load and validate a model from the provided JSON file path.
pub fn model_from_file(path: &Path) -> Result<ModelAsset, AssetError> {
    let data = fs::read_to_string(path)?;
    model_from_str(&data)
}

/// Load and validate a model from an in-memory JSON string.
pub fn model_from_str(input: &str) -> Result<ModelAsset, AssetError> {
    let model: ModelAsset = serde_json::from_str(input)?;
    model.validate()?;
    Ok(model)
}

/// Handle identifying one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

/// A finished load, successful or not.
#[derive(Debug)]
pub struct LoadCompletion {
    /// Ticket returned by [`ModelLoader::request`].
    pub ticket: LoadTicket,
    /// Requested path.
    pub path: PathBuf,
    /// Loaded model or the reason it failed.
    pub result: Result<Arc<ModelAsset>, AssetError>,
}

/// Fire-and-forget model loading. Completions are collected by polling from
/// the thread that owns the scene.
pub trait ModelLoader {
    /// Start loading `path`.
    fn request(&mut self, path: &Path) -> LoadTicket;

    /// Loads that finished since the last poll. Never blocks.
    fn poll_completed(&mut self) -> Vec<LoadCompletion>;
}

/// Runs each load on a short-lived thread and reports back over a channel.
pub struct ThreadedModelLoader {
    next_ticket: u64,
    in_flight: usize,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
}

impl ThreadedModelLoader {
    /// Create an idle loader.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            next_ticket: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Loads requested but not yet polled.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Block until at least one load finishes or `timeout` elapses, then
    /// return everything that is ready.
    pub fn wait_completed(&mut self, timeout: Duration) -> Vec<LoadCompletion> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        if self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if let Ok(first) = self.rx.recv_timeout(remaining) {
                done.push(first);
            }
        }
        done.extend(self.rx.try_iter());
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }
}

impl Default for ThreadedModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader for ThreadedModelLoader {
    fn request(&mut self, path: &Path) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight += 1;

        let tx = self.tx.clone();
        let path = path.to_path_buf();
        debug!(path = %path.display(), ticket = ticket.0, "model load requested");
        thread::spawn(move || {
            let result = model_from_file(&path).map(Arc::new);
            // The receiver is gone only when the loader was dropped.
            let _ = tx.send(LoadCompletion {
                ticket,
                path,
                result,
            });
        });
        ticket
    }

    fn poll_completed(&mut self) -> Vec<LoadCompletion> {
        let done: Vec<_> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }
}
