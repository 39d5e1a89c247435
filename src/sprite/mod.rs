// Game objects of the demo. Each one embeds a `Sprite` for position, size
// and velocity and picks the capabilities it needs:
//
// ┌──────────┬──────────┬───────────┬────────────────────────────────┐
// │ object   │ Drawable │ Updatable │ moves by                       │
// ├──────────┼──────────┼───────────┼────────────────────────────────┤
// │ Ball     │ yes      │ no        │ Ball::step (needs the paddle)  │
// │ Paddle   │ yes      │ yes       │ touch input                    │
// │ Enemy    │ yes      │ yes       │ its velocity (zero by default) │
// └──────────┴──────────┴───────────┴────────────────────────────────┘
use crate::engine::graphics::Rect;
use crate::engine::Updatable;

pub mod ball;
pub mod enemy;
pub mod paddle;

pub use self::ball::{Ball, BallEvent};
pub use self::enemy::Enemy;
pub use self::paddle::Paddle;

/// Position, size and velocity of an on-screen object, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sprite {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub velocity_x: i32,
    pub velocity_y: i32,
}

impl Sprite {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Sprite {
            x,
            y,
            width,
            height,
            velocity_x: 0,
            velocity_y: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.x, self.y, self.width, self.height)
    }

    pub fn overlaps(&self, other: &Sprite) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

impl Updatable for Sprite {
    fn update(&mut self) {
        self.x += self.velocity_x;
        self.y += self.velocity_y;
    }
}
