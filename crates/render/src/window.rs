//! Window management with winit.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use winit::{
    event::Event,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

/// Window configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width
    pub width: u32,
    /// Initial height
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "xr-room".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Window manager wrapping winit.
pub struct WindowManager {
    window: Arc<Window>,
    event_loop: Option<EventLoop<()>>,
}

impl WindowManager {
    /// Create a new window with the given configuration.
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .build(&event_loop)?;

        Ok(Self {
            window: Arc::new(window),
            event_loop: Some(event_loop),
        })
    }

    /// Get Arc reference to the window.
    pub fn window(&self) -> Arc<Window> {
        self.window.clone()
    }

    /// Get the current window size.
    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Run the event loop with a callback.
    ///
    /// The callback receives events and returns whether to continue running.
    pub fn run<F>(mut self, mut callback: F) -> Result<()>
    where
        F: FnMut(Event<()>, &Window) -> bool + 'static,
    {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("Event loop already consumed"))?;

        let window = self.window;

        event_loop.run(move |event, elwt| {
            if !callback(event, &window) {
                elwt.exit();
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_config_fills_missing_fields() {
        let config: WindowConfig = serde_json::from_str(r#"{"title":"room"}"#).unwrap();
        assert_eq!(config.title, "room");
        assert_eq!((config.width, config.height), (1280, 720));
    }
}
