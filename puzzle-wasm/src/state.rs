use std::cell::RefCell;

use puzzle_core::{Engine, FrameStatus};

use crate::TimedPuzzle;
use crate::canvas::{CanvasSurface, CountdownLabel};

/// Everything one running puzzle owns. Lives behind an `Rc<RefCell<_>>`
/// shared by the JS handle and the frame callback.
pub struct Run {
    pub engine: Option<Engine<CanvasSurface>>,
    pub countdown: CountdownLabel,
}

impl Run {
    /// One animation frame. Returns whether another frame is wanted.
    pub fn frame(&mut self, now: f64) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        let frame = engine.tick(now);
        self.countdown.show(&frame.countdown);
        frame.status == FrameStatus::Continue
    }

    pub fn is_finished(&self) -> bool {
        self.engine.as_ref().is_none_or(|e| e.is_finished())
    }

    /// Release the surface; later frames find no engine and do nothing.
    pub fn teardown(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.destroy();
        }
    }
}

// Puzzle started by the page bootstrap, kept so the page can tear it down.
thread_local! {
    pub static BOOTED: RefCell<Option<TimedPuzzle>> = const { RefCell::new(None) };
}
