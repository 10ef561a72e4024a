//! Rendering backend that never opens a window.

use std::time::Duration;

use anyhow::Result as AnyResult;
use tracing::debug;
use turret_defence_core::InputEvent;
use turret_defence_rendering::{Frame, Presentation, RenderingBackend};

/// Runs a fixed number of frames at a fixed step without input.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadlessBackend {
    frames: u64,
    step: Duration,
}

impl HeadlessBackend {
    pub(crate) fn new(frames: u64, step_ms: f32) -> Self {
        Self {
            frames,
            step: Duration::from_micros((f64::from(step_ms) * 1_000.0).round() as u64),
        }
    }
}

/// Converts a frame step back into simulated milliseconds.
pub(crate) fn step_ms(step: Duration) -> f32 {
    step.as_micros() as f32 / 1_000.0
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &[InputEvent], &mut Frame) -> AnyResult<bool> + 'static,
    {
        debug!(
            title = %presentation.window_title,
            frames = self.frames,
            "headless run started"
        );
        let mut frame = presentation.frame;
        for index in 0..self.frames {
            if !update_frame(self.step, &[], &mut frame)? {
                debug!(frame = index, "run stopped early");
                break;
            }
        }
        debug!(quads = frame.draw_list.len(), "last frame");
        Ok(())
    }
}
