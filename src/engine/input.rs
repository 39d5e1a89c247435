use crate::browser;
use crate::config::GameConfig;
use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, Touch, TouchEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Down,
    Move,
    Up,
}

/// A touch or mouse event in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent {
    pub action: Action,
    pub x: f32,
    pub y: f32,
}

/// Where the canvas sits on the page and how big its backing store is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPlacement {
    pub left: f64,
    pub top: f64,
    pub css_width: f64,
    pub css_height: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasPlacement {
    fn of(canvas: &HtmlCanvasElement) -> Self {
        let rect = canvas.get_bounding_client_rect();
        CanvasPlacement {
            left: rect.left(),
            top: rect.top(),
            css_width: rect.width(),
            css_height: rect.height(),
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        }
    }

    /// Page client coordinates to canvas pixels, accounting for CSS scaling
    pub fn to_canvas(&self, client_x: f64, client_y: f64) -> (f32, f32) {
        let scale_x = if self.css_width > 0.0 {
            self.width / self.css_width
        } else {
            1.0
        };
        let scale_y = if self.css_height > 0.0 {
            self.height / self.css_height
        } else {
            1.0
        };
        (
            ((client_x - self.left) * scale_x) as f32,
            ((client_y - self.top) * scale_y) as f32,
        )
    }
}

/// Mouse moves only count as touch moves while the button is held.
#[derive(Debug, Default)]
pub struct MouseTracker {
    pressed: bool,
}

impl MouseTracker {
    pub fn translate(&mut self, kind: &str, x: f32, y: f32) -> Option<MotionEvent> {
        let action = match kind {
            "mousedown" => {
                self.pressed = true;
                Action::Down
            }
            "mousemove" if self.pressed => Action::Move,
            "mouseup" if self.pressed => {
                self.pressed = false;
                Action::Up
            }
            _ => return None,
        };
        Some(MotionEvent { action, x, y })
    }
}

pub fn touch_action(kind: &str) -> Option<Action> {
    match kind {
        "touchstart" => Some(Action::Down),
        "touchmove" => Some(Action::Move),
        "touchend" | "touchcancel" => Some(Action::Up),
        _ => None,
    }
}

type MotionHandler = Rc<RefCell<dyn FnMut(MotionEvent)>>;

/// Wires touch and/or mouse listeners on `canvas`, as allowed by `config`.
/// `mouseup` is heard on the whole window.
pub fn bind<F>(canvas: &HtmlCanvasElement, config: &GameConfig, handler: F) -> Result<()>
where
    F: FnMut(MotionEvent) + 'static,
{
    let handler: MotionHandler = Rc::new(RefCell::new(handler));

    if config.allow_touch_input {
        for kind in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let handler = handler.clone();
            let target = canvas.clone();
            let listener = browser::closure_wrap(Box::new(move |event: TouchEvent| {
                // keeps the browser from synthesizing mouse events as well
                event.prevent_default();
                let Some(action) = touch_action(&event.type_()) else {
                    return;
                };
                // a lifted finger is no longer in `touches`
                let touch: Option<Touch> = match action {
                    Action::Up => event.changed_touches().get(0),
                    _ => event.touches().get(0),
                };
                if let Some(touch) = touch {
                    let (x, y) = CanvasPlacement::of(&target)
                        .to_canvas(f64::from(touch.client_x()), f64::from(touch.client_y()));
                    (&mut *handler.borrow_mut())(MotionEvent { action, x, y });
                }
            }) as Box<dyn FnMut(TouchEvent)>);
            browser::add_event_listener(canvas, kind, listener)?;
        }
    }

    if config.allow_mouse_input {
        let tracker = Rc::new(RefCell::new(MouseTracker::default()));
        let window = browser::window()?;
        let on_canvas: &EventTarget = canvas;
        let on_window: &EventTarget = &window;
        // a release outside the canvas still ends the drag
        let kinds = [
            (on_canvas, "mousedown"),
            (on_canvas, "mousemove"),
            (on_window, "mouseup"),
        ];
        for (event_target, kind) in kinds {
            let handler = handler.clone();
            let tracker = tracker.clone();
            let target = canvas.clone();
            let listener = browser::closure_wrap(Box::new(move |event: MouseEvent| {
                let (x, y) = CanvasPlacement::of(&target)
                    .to_canvas(f64::from(event.client_x()), f64::from(event.client_y()));
                let motion = tracker.borrow_mut().translate(&event.type_(), x, y);
                if let Some(motion) = motion {
                    event.prevent_default();
                    (&mut *handler.borrow_mut())(motion);
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            browser::add_event_listener(event_target, kind, listener)?;
        }
    }

    Ok(())
}
