//! Browser tests, run with `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use android2wasm_game::config::GameConfig;
use android2wasm_game::draw_view::DrawView;
use android2wasm_game::engine::graphics::{Canvas, Color};
use android2wasm_game::engine::input::{self, Action, MotionEvent};
use android2wasm_game::engine::platform::{BrowserDeferrer, PerformanceClock, SurfaceHolder};
use android2wasm_game::engine::scheduler::{FrameScheduler, SurfaceProvider, WeakScheduler};
use android2wasm_game::engine::{Game, GameLoop, Screen};
use anyhow::Result;
use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PageTransitionEvent,
    PageTransitionEventInit,
};

wasm_bindgen_test_configure!(run_in_browser);

type BrowserWeak = WeakScheduler<PerformanceClock, BrowserDeferrer, SurfaceHolder>;

fn attach_canvas(id: &str, width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas.set_id(id);
    canvas.set_width(width);
    canvas.set_height(height);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

fn pixel(canvas: &HtmlCanvasElement, x: f64, y: f64) -> Vec<u8> {
    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    context.get_image_data(x, y, 1.0, 1.0).unwrap().data().0
}

#[wasm_bindgen_test]
fn draw_view_paints_background_and_rect() {
    let canvas = attach_canvas("draw-view-test", 300, 250);
    DrawView.show("draw-view-test").unwrap();

    assert_eq!(pixel(&canvas, 5.0, 5.0), vec![255, 255, 255, 255]);
    assert_eq!(pixel(&canvas, 200.0, 75.0), vec![255, 0, 0, 255]);
    // inside the lower half of the arc
    assert_eq!(pixel(&canvas, 210.0, 200.0), vec![100, 200, 200, 255]);
    canvas.remove();
}

#[wasm_bindgen_test]
fn detached_canvas_is_unavailable() {
    let canvas = attach_canvas("detached-test", 10, 10);
    let mut surfaces = SurfaceHolder::new("detached-test").unwrap();
    let locked = surfaces.lock_canvas().unwrap();
    surfaces.unlock_canvas_and_post(locked).unwrap();

    canvas.remove();
    assert!(surfaces.lock_canvas().is_none());
}

#[wasm_bindgen_test]
fn missing_canvas_is_an_error() {
    assert!(SurfaceHolder::new("no-such-canvas").is_err());
}

#[wasm_bindgen_test]
async fn scheduler_runs_frames_until_stopped() {
    let canvas = attach_canvas("scheduler-test", 20, 20);
    let (tx, rx) = oneshot::channel::<()>();
    let tx = RefCell::new(Some(tx));
    let frames = Rc::new(Cell::new(0));
    let weak: Rc<RefCell<Option<BrowserWeak>>> = Rc::new(RefCell::new(None));

    let scheduler = {
        let frames = frames.clone();
        let weak = weak.clone();
        FrameScheduler::new(
            60,
            PerformanceClock::new().unwrap(),
            BrowserDeferrer,
            SurfaceHolder::new("scheduler-test").unwrap(),
            move |canvas: &mut Canvas| {
                frames.set(frames.get() + 1);
                canvas.draw_color(Color::BLUE);
                if frames.get() == 3 {
                    if let Some(scheduler) = weak.borrow().as_ref() {
                        scheduler.stop();
                    }
                    if let Some(tx) = tx.borrow_mut().take() {
                        let _ = tx.send(());
                    }
                }
                Ok(())
            },
        )
        .unwrap()
    };
    *weak.borrow_mut() = Some(scheduler.downgrade());

    scheduler.start().unwrap();
    rx.await.unwrap();

    assert_eq!(frames.get(), 3);
    assert_eq!(scheduler.frame_count(), 3);
    assert!(!scheduler.is_running());
    assert!(!scheduler.has_pending_tick());
    assert_eq!(pixel(&canvas, 1.0, 1.0), vec![0, 0, 255, 255]);
    canvas.remove();
}

#[wasm_bindgen_test]
fn config_fields_default_when_missing() {
    let value = js_sys::JSON::parse(r#"{ "target_fps": 60, "canvas_id": "game" }"#).unwrap();
    let config: GameConfig = serde_wasm_bindgen::from_value(value).unwrap();
    assert_eq!(config.target_fps, 60);
    assert_eq!(config.canvas_id, "game");
    assert_eq!(config.enemy_image, GameConfig::default().enemy_image);
    assert!(config.allow_mouse_input);
}

#[derive(Clone)]
struct FirstFrame {
    frames: Rc<Cell<u32>>,
    drawn: Rc<RefCell<Option<oneshot::Sender<()>>>>,
}

#[async_trait(?Send)]
impl Game for FirstFrame {
    async fn initialize(&self, _screen: Screen) -> Result<Box<dyn Game>> {
        Ok(Box::new(self.clone()))
    }

    fn update(&mut self) {
        self.frames.set(self.frames.get() + 1);
    }

    fn draw(&self, canvas: &Canvas) -> Result<()> {
        canvas.draw_color(Color::GREEN);
        if let Some(tx) = self.drawn.borrow_mut().take() {
            let _ = tx.send(());
        }
        Ok(())
    }

    fn on_touch(&mut self, _event: &MotionEvent) {}
}

fn page_transition(kind: &str, persisted: bool) {
    let init = PageTransitionEventInit::new();
    init.set_persisted(persisted);
    let event = PageTransitionEvent::new_with_event_init_dict(kind, &init).unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
async fn game_loop_pauses_on_pagehide_and_resumes_from_cache() {
    let canvas = attach_canvas("game-loop-test", 40, 30);
    let (tx, rx) = oneshot::channel::<()>();
    let game = FirstFrame {
        frames: Rc::new(Cell::new(0)),
        drawn: Rc::new(RefCell::new(Some(tx))),
    };
    let config = GameConfig {
        canvas_id: "game-loop-test".to_string(),
        target_fps: 60,
        ..GameConfig::default()
    };

    let scheduler = GameLoop::start(game.clone(), config).await.unwrap();
    rx.await.unwrap();
    assert!(game.frames.get() >= 1);
    assert!(scheduler.is_running());

    page_transition("pagehide", true);
    assert!(!scheduler.is_running());
    assert!(!scheduler.has_pending_tick());

    page_transition("pageshow", true);
    assert!(scheduler.is_running());
    assert!(scheduler.has_pending_tick());

    scheduler.stop();
    canvas.remove();
}

#[wasm_bindgen_test]
fn mouse_release_outside_canvas_ends_drag() {
    let canvas = attach_canvas("mouse-test", 40, 30);
    let actions = Rc::new(RefCell::new(Vec::new()));
    let recorded = actions.clone();
    let config = GameConfig {
        allow_touch_input: false,
        ..GameConfig::default()
    };
    input::bind(&canvas, &config, move |event: MotionEvent| {
        recorded.borrow_mut().push(event.action);
    })
    .unwrap();

    let mouse = |kind: &str| MouseEvent::new(kind).unwrap();
    canvas.dispatch_event(&mouse("mousedown")).unwrap();
    // released over the page, not the canvas
    web_sys::window()
        .unwrap()
        .dispatch_event(&mouse("mouseup"))
        .unwrap();
    canvas.dispatch_event(&mouse("mousemove")).unwrap();

    assert_eq!(*actions.borrow(), vec![Action::Down, Action::Up]);
    canvas.remove();
}
