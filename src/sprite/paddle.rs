use super::Sprite;
use crate::engine::graphics::{Canvas, Color, Paint, PaintStyle};
use crate::engine::{Drawable, Updatable};
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct Paddle {
    pub sprite: Sprite,
}

impl Paddle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Paddle {
            sprite: Sprite::new(x, y, width, height),
        }
    }

    /// Puts the paddle's vertical center on `y`
    pub fn center_on(&mut self, y: f32) {
        let half = self.sprite.height / 2;
        self.sprite.y = (y - half as f32) as i32;
    }
}

impl Updatable for Paddle {
    // follows touch input, not the frame loop
    fn update(&mut self) {}
}

impl Drawable for Paddle {
    fn draw(&self, canvas: &Canvas) -> Result<()> {
        let mut paint = Paint::new();
        paint.set_color(Color::GRAY);
        paint.set_style(PaintStyle::Fill);
        canvas.draw_rect(self.sprite.bounds(), &paint);
        Ok(())
    }
}
