use super::fps::FpsMeter;
use anyhow::{anyhow, Result};
use log::{debug, error, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Monotonic time source in milliseconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Runs a callback later. A delay of zero (or less) means "as soon as
/// convenient", never synchronously inside `defer`.
pub trait Deferrer {
    type Handle;

    fn defer(&self, delay_ms: f64, tick: Box<dyn FnOnce()>) -> Result<Self::Handle>;
    fn cancel(&self, handle: Self::Handle);
}

/// Hands out the render target for one frame and takes it back afterwards.
pub trait SurfaceProvider {
    type Target;

    /// `None` while no surface is available, the frame is skipped
    fn lock_canvas(&mut self) -> Option<Self::Target>;
    fn unlock_canvas_and_post(&mut self, target: Self::Target) -> Result<()>;
}

pub type FrameCallback<T> = Box<dyn FnMut(&mut T) -> Result<()>>;

/// Page lifecycle changes the loop follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTransition {
    Hide,
    /// `persisted` is set when the page comes back from the back/forward
    /// cache rather than being freshly loaded
    Show { persisted: bool },
}

/// Time left in the frame budget. Negative when the frame overran.
pub fn wait_time(frame_interval_ms: f64, elapsed_ms: f64) -> f64 {
    frame_interval_ms - elapsed_ms
}

/// Delay before the next tick, an overrun frame is followed immediately
pub fn pacing_delay(frame_interval_ms: f64, elapsed_ms: f64) -> f64 {
    let wait = wait_time(frame_interval_ms, elapsed_ms);
    if wait > 0.0 {
        wait
    } else {
        0.0
    }
}

struct LoopState<H> {
    running: bool,
    // bumped by every start/stop, a tick only runs for the run that
    // scheduled it
    run: u64,
    pending: Option<H>,
    last_frame_start: Option<f64>,
    last_wait_ms: f64,
    frames: u64,
    fps: FpsMeter,
}

struct Shared<C, D: Deferrer, P: SurfaceProvider> {
    clock: C,
    deferrer: D,
    surfaces: RefCell<P>,
    callback: RefCell<FrameCallback<P::Target>>,
    state: RefCell<LoopState<D::Handle>>,
    target_fps: u32,
    frame_interval_ms: f64,
}

/// Fixed-rate frame loop for a single-threaded host.
///
/// Each tick locks the render target, runs the frame callback, posts the
/// target and defers the next tick by whatever is left of the frame budget.
/// Nothing ever blocks: between frames control goes back to the host's event
/// loop. At most one tick is pending at any time.
///
/// Clones share the same loop. Scheduled ticks only hold a weak reference,
/// so dropping the last clone cancels the pending tick.
pub struct FrameScheduler<C, D, P>
where
    C: Clock + 'static,
    D: Deferrer + 'static,
    P: SurfaceProvider + 'static,
{
    shared: Rc<Shared<C, D, P>>,
}

/// Non-owning handle, safe to capture inside the frame callback.
pub struct WeakScheduler<C, D, P>
where
    C: Clock + 'static,
    D: Deferrer + 'static,
    P: SurfaceProvider + 'static,
{
    shared: Weak<Shared<C, D, P>>,
}

impl<C, D, P> FrameScheduler<C, D, P>
where
    C: Clock + 'static,
    D: Deferrer + 'static,
    P: SurfaceProvider + 'static,
{
    pub fn new<F>(target_fps: u32, clock: C, deferrer: D, surfaces: P, callback: F) -> Result<Self>
    where
        F: FnMut(&mut P::Target) -> Result<()> + 'static,
    {
        if target_fps == 0 {
            return Err(anyhow!("FrameScheduler: target fps must be positive"));
        }
        let frame_interval_ms = 1000.0 / f64::from(target_fps);
        Ok(FrameScheduler {
            shared: Rc::new(Shared {
                clock,
                deferrer,
                surfaces: RefCell::new(surfaces),
                callback: RefCell::new(Box::new(callback)),
                state: RefCell::new(LoopState {
                    running: false,
                    run: 0,
                    pending: None,
                    last_frame_start: None,
                    last_wait_ms: frame_interval_ms,
                    frames: 0,
                    fps: FpsMeter::new(target_fps, f64::from(target_fps)),
                }),
                target_fps,
                frame_interval_ms,
            }),
        })
    }

    /// Starts ticking, the first frame is scheduled right away. No-op while
    /// already running.
    pub fn start(&self) -> Result<()> {
        let run = {
            let mut state = self.shared.state.borrow_mut();
            if state.running {
                return Ok(());
            }
            state.running = true;
            state.run += 1;
            state.last_frame_start = None;
            state.fps.reset();
            state.run
        };
        debug!(
            "frame loop started at {} fps ({:.2}ms per frame)",
            self.shared.target_fps, self.shared.frame_interval_ms
        );
        if let Err(err) = Shared::schedule(&self.shared, 0.0, run) {
            self.shared.halt();
            return Err(err);
        }
        Ok(())
    }

    /// Stops ticking and cancels the pending tick. A frame already in
    /// progress finishes but schedules nothing.
    pub fn stop(&self) {
        self.shared.halt();
    }

    /// Pauses while the page is hidden, resumes when it is restored from the
    /// back/forward cache
    pub fn page_transition(&self, transition: PageTransition) -> Result<()> {
        match transition {
            PageTransition::Hide => {
                self.stop();
                Ok(())
            }
            PageTransition::Show { persisted: true } => self.start(),
            PageTransition::Show { persisted: false } => Ok(()),
        }
    }

    pub fn downgrade(&self) -> WeakScheduler<C, D, P> {
        WeakScheduler {
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.state.borrow().running
    }

    pub fn has_pending_tick(&self) -> bool {
        self.shared.state.borrow().pending.is_some()
    }

    pub fn target_fps(&self) -> u32 {
        self.shared.target_fps
    }

    pub fn target_frame_interval_ms(&self) -> f64 {
        self.shared.frame_interval_ms
    }

    /// Frames per second over the last full window of `target_fps` frame
    /// durations, `target_fps` until the first window fills. A duration runs
    /// from one tick start to the next, so the first window after `start()`
    /// closes on tick `target_fps + 1`.
    pub fn average_fps(&self) -> f64 {
        self.shared.state.borrow().fps.average()
    }

    /// Frames that reached the callback
    pub fn frame_count(&self) -> u64 {
        self.shared.state.borrow().frames
    }

    /// Frame budget left after the most recent tick, negative on overrun
    pub fn last_wait_ms(&self) -> f64 {
        self.shared.state.borrow().last_wait_ms
    }
}

impl<C, D, P> Clone for FrameScheduler<C, D, P>
where
    C: Clock + 'static,
    D: Deferrer + 'static,
    P: SurfaceProvider + 'static,
{
    fn clone(&self) -> Self {
        FrameScheduler {
            shared: self.shared.clone(),
        }
    }
}

impl<C, D, P> WeakScheduler<C, D, P>
where
    C: Clock + 'static,
    D: Deferrer + 'static,
    P: SurfaceProvider + 'static,
{
    pub fn upgrade(&self) -> Option<FrameScheduler<C, D, P>> {
        self.shared
            .upgrade()
            .map(|shared| FrameScheduler { shared })
    }

    pub fn stop(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.halt();
        }
    }
}

impl<C, D, P> Clone for WeakScheduler<C, D, P>
where
    C: Clock + 'static,
    D: Deferrer + 'static,
    P: SurfaceProvider + 'static,
{
    fn clone(&self) -> Self {
        WeakScheduler {
            shared: self.shared.clone(),
        }
    }
}

impl<C, D, P> Shared<C, D, P>
where
    C: Clock + 'static,
    D: Deferrer + 'static,
    P: SurfaceProvider + 'static,
{
    fn schedule(shared: &Rc<Self>, delay_ms: f64, run: u64) -> Result<()> {
        let weak = Rc::downgrade(shared);
        let handle = shared.deferrer.defer(
            delay_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Shared::tick(&shared, run);
                }
            }),
        )?;
        shared.state.borrow_mut().pending = Some(handle);
        Ok(())
    }

    fn halt(&self) {
        let pending = {
            let mut state = self.state.borrow_mut();
            if !state.running && state.pending.is_none() {
                return;
            }
            state.running = false;
            state.run += 1;
            state.last_frame_start = None;
            state.pending.take()
        };
        if let Some(handle) = pending {
            self.deferrer.cancel(handle);
        }
        debug!("frame loop stopped");
    }

    fn is_current(&self, run: u64) -> bool {
        let state = self.state.borrow();
        state.running && state.run == run
    }

    fn tick(shared: &Rc<Self>, run: u64) {
        let frame_start = shared.clock.now();
        {
            let mut state = shared.state.borrow_mut();
            if !state.running || state.run != run {
                return;
            }
            // this is the tick that was pending
            state.pending = None;
            if let Some(previous) = state.last_frame_start {
                if let Some(average) = state.fps.record(frame_start - previous) {
                    debug!("average fps over last {} frames: {:.2}", shared.target_fps, average);
                }
            }
            state.last_frame_start = Some(frame_start);
        }

        let target = shared.surfaces.borrow_mut().lock_canvas();
        match target {
            Some(mut target) => {
                let result = {
                    let mut callback = shared.callback.borrow_mut();
                    (*callback)(&mut target)
                };
                if let Err(err) = result {
                    error!("frame callback failed: {:#}", err);
                }
                if let Err(err) = shared.surfaces.borrow_mut().unlock_canvas_and_post(target) {
                    error!("could not post frame: {:#}", err);
                }
                shared.state.borrow_mut().frames += 1;
            }
            None => trace!("no surface available, frame skipped"),
        }

        let elapsed = shared.clock.now() - frame_start;
        shared.state.borrow_mut().last_wait_ms = wait_time(shared.frame_interval_ms, elapsed);

        // the callback may have stopped (or stopped and restarted) the loop
        if !shared.is_current(run) {
            return;
        }
        let delay = pacing_delay(shared.frame_interval_ms, elapsed);
        if let Err(err) = Shared::schedule(shared, delay, run) {
            error!("could not schedule next frame, stopping: {:#}", err);
            shared.halt();
        }
    }
}

impl<C, D: Deferrer, P: SurfaceProvider> Drop for Shared<C, D, P> {
    fn drop(&mut self) {
        if let Some(handle) = self.state.get_mut().pending.take() {
            self.deferrer.cancel(handle);
        }
    }
}
