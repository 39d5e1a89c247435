use crate::engine::graphics::{Canvas, Color, Paint, PaintStyle, Rect, RectF};
use crate::engine::platform::SurfaceHolder;
use crate::engine::scheduler::SurfaceProvider;
use crate::engine::Drawable;
use anyhow::{anyhow, Result};

/// Static drawing demo, a few shapes rendered once
pub struct DrawView;

impl Drawable for DrawView {
    fn draw(&self, canvas: &Canvas) -> Result<()> {
        let mut paint = Paint::new();

        canvas.draw_color(Color::WHITE);

        // blue circle outline
        paint.set_style(PaintStyle::Stroke);
        paint.set_color(Color::BLUE);
        canvas.draw_circle(75.0, 100.0, 50.0, &paint)?;

        // filled red rectangle
        paint.set_style(PaintStyle::Fill);
        paint.set_color(Color::RED);
        canvas.draw_rect(Rect::new(150, 50, 250, 100), &paint);

        // filled lower half circle
        paint.set_argb(255, 100, 200, 200);
        canvas.draw_arc(RectF::new(160.0, 120.0, 260.0, 220.0), 0.0, 180.0, false, &paint)
    }
}

impl DrawView {
    /// Draws the view once onto the canvas with id `canvas_id`
    pub fn show(&self, canvas_id: &str) -> Result<()> {
        let mut surfaces = SurfaceHolder::new(canvas_id)?;
        let canvas = surfaces
            .lock_canvas()
            .ok_or_else(|| anyhow!("Canvas '{}' is not attached to the page", canvas_id))?;
        let drawn = self.draw(&canvas);
        surfaces.unlock_canvas_and_post(canvas)?;
        drawn
    }
}
