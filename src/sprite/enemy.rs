use super::Sprite;
use crate::engine::graphics::{Bitmap, Canvas, Color, Paint};
use crate::engine::{Drawable, Updatable};
use anyhow::Result;
use std::rc::Rc;

/// A target for the ball. Drawn from a shared bitmap, or as a plain block
/// when the image did not load.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub sprite: Sprite,
    image: Option<Rc<Bitmap>>,
}

impl Enemy {
    pub fn new(x: i32, y: i32, size: i32, image: Option<Rc<Bitmap>>) -> Self {
        Enemy {
            sprite: Sprite::new(x, y, size, size),
            image,
        }
    }
}

impl Updatable for Enemy {
    fn update(&mut self) {
        self.sprite.update();
    }
}

impl Drawable for Enemy {
    fn draw(&self, canvas: &Canvas) -> Result<()> {
        match &self.image {
            Some(image) => canvas.draw_bitmap(image, None, self.sprite.bounds()),
            None => {
                let mut paint = Paint::new();
                paint.set_color(Color::GREEN);
                canvas.draw_rect(self.sprite.bounds(), &paint);
                Ok(())
            }
        }
    }
}
