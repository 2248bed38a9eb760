use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

type RafClosure = Closure<dyn FnMut(f64)>;

/// Book-keeping shared by the loop handle and its callback: the queued
/// request id and whether the loop has been stopped.
#[derive(Debug, Default)]
struct FrameGate {
    pending: Cell<Option<i32>>,
    cancelled: Cell<bool>,
}

impl FrameGate {
    /// A frame fired. Returns `false` once cancelled.
    fn enter(&self) -> bool {
        self.pending.set(None);
        !self.cancelled.get()
    }

    fn scheduled(&self, id: i32) {
        self.pending.set(Some(id));
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Stop the loop and hand back the request still queued, if any.
    fn cancel(&self) -> Option<i32> {
        self.cancelled.set(true);
        self.pending.take()
    }
}

/// `requestAnimationFrame` loop. Each callback runs `on_frame` with the frame
/// timestamp and re-enqueues itself while it returns `true`.
///
/// The closure only holds a weak reference to itself, so once the loop
/// stops on its own it lives exactly as long as this handle.
pub struct FrameLoop {
    window: Window,
    callback: Rc<RefCell<Option<RafClosure>>>,
    gate: Rc<FrameGate>,
}

fn request(window: &Window, callback: &RafClosure, gate: &FrameGate) {
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => gate.scheduled(id),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
}

impl FrameLoop {
    pub fn start<F>(window: Window, mut on_frame: F) -> Self
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let callback: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
        let gate = Rc::new(FrameGate::default());

        let slot: Weak<RefCell<Option<RafClosure>>> = Rc::downgrade(&callback);
        let win = window.clone();
        let g = gate.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            if !g.enter() || !on_frame(ts) || g.is_cancelled() {
                return;
            }
            if let Some(slot) = slot.upgrade() {
                if let Some(cb) = slot.borrow().as_ref() {
                    request(&win, cb, &g);
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(cb) = callback.borrow().as_ref() {
            request(&window, cb, &gate);
        }
        FrameLoop {
            window,
            callback,
            gate,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.gate.is_cancelled()
    }

    /// Stop for good: cancel the queued frame and drop the callback, which
    /// also releases everything it captured. Safe to call more than once.
    pub fn cancel(&self) {
        if let Some(id) = self.gate.cancel() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_run_until_cancelled() {
        let gate = FrameGate::default();
        assert!(gate.enter());
        gate.scheduled(4);
        assert!(gate.enter());
        assert_eq!(gate.pending.get(), None);

        gate.scheduled(5);
        assert_eq!(gate.cancel(), Some(5));
        assert!(gate.is_cancelled());
        assert!(!gate.enter());
    }

    #[test]
    fn second_cancel_has_nothing_to_cancel() {
        let gate = FrameGate::default();
        gate.scheduled(9);
        assert_eq!(gate.cancel(), Some(9));
        assert_eq!(gate.cancel(), None);
        assert!(!gate.enter());
    }
}
