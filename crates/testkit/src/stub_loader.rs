use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use xr_room_assets::{AssetError, LoadCompletion, LoadTicket, ModelAsset, ModelLoader};

/// What every request made to a [`StubLoader`] resolves to.
#[derive(Debug, Clone)]
pub enum StubOutcome {
    /// Succeed with this model.
    Model(Arc<ModelAsset>),
    /// Fail as if the file did not exist.
    Missing,
}

#[derive(Debug)]
struct StubState {
    outcome: StubOutcome,
    held: bool,
    next_ticket: u64,
    pending: Vec<(LoadTicket, PathBuf)>,
    requests: Vec<PathBuf>,
}

/// Synchronous [`ModelLoader`] double. Requests complete on the next poll
/// unless the paired handle holds them back.
#[derive(Debug)]
pub struct StubLoader {
    state: Rc<RefCell<StubState>>,
}

/// Test-side view of a [`StubLoader`] that was moved into its owner.
#[derive(Debug, Clone)]
pub struct StubLoaderHandle {
    state: Rc<RefCell<StubState>>,
}

impl StubLoader {
    /// Loader plus the handle used to steer it.
    pub fn new(outcome: StubOutcome) -> (Self, StubLoaderHandle) {
        let state = Rc::new(RefCell::new(StubState {
            outcome,
            held: false,
            next_ticket: 0,
            pending: Vec::new(),
            requests: Vec::new(),
        }));
        (
            Self {
                state: Rc::clone(&state),
            },
            StubLoaderHandle { state },
        )
    }
}

impl ModelLoader for StubLoader {
    fn request(&mut self, path: &Path) -> LoadTicket {
        let mut state = self.state.borrow_mut();
        let ticket = LoadTicket(state.next_ticket);
        state.next_ticket += 1;
        state.requests.push(path.to_path_buf());
        state.pending.push((ticket, path.to_path_buf()));
        ticket
    }

    fn poll_completed(&mut self) -> Vec<LoadCompletion> {
        let mut state = self.state.borrow_mut();
        if state.held {
            return Vec::new();
        }
        let outcome = state.outcome.clone();
        state
            .pending
            .drain(..)
            .map(|(ticket, path)| LoadCompletion {
                ticket,
                result: match &outcome {
                    StubOutcome::Model(model) => Ok(Arc::clone(model)),
                    StubOutcome::Missing => Err(AssetError::Io(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("{} not found", path.display()),
                    ))),
                },
                path,
            })
            .collect()
    }
}

impl StubLoaderHandle {
    /// Keep completions back until [`StubLoaderHandle::release`].
    pub fn hold(&self) {
        self.state.borrow_mut().held = true;
    }

    /// Let held completions through on the next poll.
    pub fn release(&self) {
        self.state.borrow_mut().held = false;
    }

    /// Every path requested so far.
    pub fn requests(&self) -> Vec<PathBuf> {
        self.state.borrow().requests.clone()
    }

    /// Requests not yet delivered.
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_requests_wait_for_release() {
        let (mut loader, handle) = StubLoader::new(StubOutcome::Missing);
        handle.hold();
        let ticket = loader.request(Path::new("a.json"));
        assert!(loader.poll_completed().is_empty());
        assert_eq!(handle.pending(), 1);

        handle.release();
        let done = loader.poll_completed();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, ticket);
        assert!(done[0].result.is_err());
        assert_eq!(handle.requests(), vec![PathBuf::from("a.json")]);
    }
}
