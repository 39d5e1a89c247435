//! Browser implementations of the frame loop's collaborators.
use super::graphics::Canvas;
use super::scheduler::{Clock, Deferrer, SurfaceProvider};
use super::Screen;
use crate::browser;
use anyhow::Result;
use log::warn;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Performance};

/// `performance.now()`, monotonic unlike `Date.now()`
pub struct PerformanceClock {
    performance: Performance,
}

impl PerformanceClock {
    pub fn new() -> Result<Self> {
        Ok(PerformanceClock {
            performance: browser::performance()?,
        })
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        self.performance.now()
    }
}

/// Defers ticks with `setTimeout`, or with `requestAnimationFrame` when
/// there is no time left to wait.
pub struct BrowserDeferrer;

/// A scheduled tick. Owns its JS closure, dropping the handle after the
/// callback fired releases it.
pub enum TimerHandle {
    Timeout {
        id: i32,
        _callback: Closure<dyn FnMut()>,
    },
    AnimationFrame {
        id: i32,
        _callback: Closure<dyn FnMut()>,
    },
}

impl Deferrer for BrowserDeferrer {
    type Handle = TimerHandle;

    fn defer(&self, delay_ms: f64, tick: Box<dyn FnOnce()>) -> Result<TimerHandle> {
        let callback = browser::closure_once(move || tick());
        if delay_ms > 0.0 {
            // never fire early, timers only take whole milliseconds
            let id = browser::set_timeout(&callback, delay_ms.ceil() as i32)?;
            Ok(TimerHandle::Timeout {
                id,
                _callback: callback,
            })
        } else {
            let id = browser::request_animation_frame(&callback)?;
            Ok(TimerHandle::AnimationFrame {
                id,
                _callback: callback,
            })
        }
    }

    fn cancel(&self, handle: TimerHandle) {
        let cancelled = match handle {
            TimerHandle::Timeout { id, .. } => browser::clear_timeout(id),
            TimerHandle::AnimationFrame { id, .. } => browser::cancel_animation_frame(id),
        };
        if let Err(err) = cancelled {
            warn!("could not cancel pending frame: {:#}", err);
        }
    }
}

/// Gives out the page canvas once per frame, the way Android's
/// `SurfaceHolder` locks and posts a surface.
///
/// The context state is saved on lock and restored on post so nothing a
/// frame sets leaks into the next one. A canvas that was removed from the
/// document is reported as unavailable.
pub struct SurfaceHolder {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl SurfaceHolder {
    pub fn new(canvas_id: &str) -> Result<Self> {
        let canvas = browser::canvas(canvas_id)?;
        let context = browser::context(&canvas)?;
        Ok(SurfaceHolder { canvas, context })
    }

    pub fn canvas_element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn screen(&self) -> Screen {
        Screen {
            width: self.canvas.width() as i32,
            height: self.canvas.height() as i32,
        }
    }
}

impl SurfaceProvider for SurfaceHolder {
    type Target = Canvas;

    fn lock_canvas(&mut self) -> Option<Canvas> {
        if !self.canvas.is_connected() {
            return None;
        }
        self.context.save();
        Some(Canvas::new(
            self.context.clone(),
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        ))
    }

    fn unlock_canvas_and_post(&mut self, canvas: Canvas) -> Result<()> {
        // the 2D context presents on its own, only the state needs undoing
        canvas.context().restore();
        Ok(())
    }
}
