use crate::browser;
use crate::config::GameConfig;
use anyhow::{Context, Result};
// wasm is single threaded, so Rc RefCell over Arc Mutex
use async_trait::async_trait;
use log::{error, info};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::PageTransitionEvent;

pub mod fps;
pub mod graphics;
pub mod input;
pub mod platform;
pub mod scheduler;

use self::graphics::Canvas;
use self::input::MotionEvent;
use self::platform::{BrowserDeferrer, PerformanceClock, SurfaceHolder};
use self::scheduler::{FrameScheduler, PageTransition};

/// Size of the drawing surface in pixels. Handed to whatever needs the
/// screen bounds instead of keeping them in globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: i32,
    pub height: i32,
}

/// Something that can render itself
pub trait Drawable {
    fn draw(&self, canvas: &Canvas) -> Result<()>;
}

/// Something that advances once per frame
pub trait Updatable {
    fn update(&mut self);
}

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self, screen: Screen) -> Result<Box<dyn Game>>;
    fn update(&mut self);
    fn draw(&self, canvas: &Canvas) -> Result<()>;
    fn on_touch(&mut self, event: &MotionEvent);
}

pub type BrowserScheduler = FrameScheduler<PerformanceClock, BrowserDeferrer, SurfaceHolder>;

pub struct GameLoop;

impl GameLoop {
    /// Initializes `game` and runs it on a frame scheduler: every frame
    /// updates, then draws. Input goes to `Game::on_touch` between frames.
    /// The loop pauses while the page is hidden and resumes when the page is
    /// restored from the back/forward cache.
    pub async fn start(game: impl Game + 'static, config: GameConfig) -> Result<BrowserScheduler> {
        let surfaces = SurfaceHolder::new(&config.canvas_id)
            .with_context(|| format!("No drawing surface '{}'", config.canvas_id))?;
        let screen = surfaces.screen();
        let game: Rc<RefCell<Box<dyn Game>>> =
            Rc::new(RefCell::new(game.initialize(screen).await?));

        let touched = game.clone();
        input::bind(surfaces.canvas_element(), &config, move |event| {
            touched.borrow_mut().on_touch(&event);
        })?;

        let scheduler = FrameScheduler::new(
            config.target_fps,
            PerformanceClock::new()?,
            BrowserDeferrer,
            surfaces,
            move |canvas: &mut Canvas| {
                let mut game = game.borrow_mut();
                game.update();
                game.draw(canvas)
            },
        )?;
        scheduler.start()?;
        info!(
            "game loop running at {} fps on {}x{}",
            config.target_fps, screen.width, screen.height
        );

        // the listeners live as long as the page and keep the loop alive
        let window = browser::window()?;
        for kind in ["pagehide", "pageshow"] {
            let owner = scheduler.clone();
            let listener = browser::closure_wrap(Box::new(move |event: PageTransitionEvent| {
                let transition = match event.type_().as_str() {
                    "pagehide" => PageTransition::Hide,
                    _ => PageTransition::Show {
                        persisted: event.persisted(),
                    },
                };
                if let Err(err) = owner.page_transition(transition) {
                    error!("could not resume game loop: {:#}", err);
                }
            }) as Box<dyn FnMut(PageTransitionEvent)>);
            browser::add_event_listener(&window, kind, listener)?;
        }

        Ok(scheduler)
    }
}
