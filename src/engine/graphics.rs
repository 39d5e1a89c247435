use crate::browser;
use anyhow::{anyhow, Error, Result};
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Packed 0xAARRGGBB color, the Android layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const DKGRAY: Color = Color(0xFF44_4444);
    pub const GRAY: Color = Color(0xFF88_8888);
    pub const LTGRAY: Color = Color(0xFFCC_CCCC);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const RED: Color = Color(0xFFFF_0000);
    pub const GREEN: Color = Color(0xFF00_FF00);
    pub const BLUE: Color = Color(0xFF00_00FF);
    pub const YELLOW: Color = Color(0xFFFF_FF00);
    pub const CYAN: Color = Color(0xFF00_FFFF);
    pub const MAGENTA: Color = Color(0xFFFF_00FF);
    pub const TRANSPARENT: Color = Color(0);

    pub const fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Color((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color::argb(0xFF, red, green, blue)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// CSS color string, alpha moves from the front to a trailing 0..1
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.red(),
            self.green(),
            self.blue(),
            f64::from(self.alpha()) / 255.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
    FillAndStroke,
}

/// How to draw: color, fill/stroke and text settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    color: Color,
    style: PaintStyle,
    stroke_width: f64,
    text_size: f64,
    font_family: String,
}

impl Default for Paint {
    fn default() -> Self {
        Paint {
            color: Color::BLACK,
            style: PaintStyle::Fill,
            stroke_width: 1.0,
            text_size: 12.0,
            font_family: "Arial".to_string(),
        }
    }
}

impl Paint {
    pub fn new() -> Self {
        Paint::default()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_argb(&mut self, alpha: u8, red: u8, green: u8, blue: u8) {
        self.color = Color::argb(alpha, red, green, blue);
    }

    pub fn style(&self) -> PaintStyle {
        self.style
    }

    pub fn set_style(&mut self, style: PaintStyle) {
        self.style = style;
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width.max(0.0);
    }

    pub fn text_size(&self) -> f64 {
        self.text_size
    }

    pub fn set_text_size(&mut self, size: f64) {
        self.text_size = size;
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// CSS font shorthand, e.g. `12px Arial`
    pub fn font(&self) -> String {
        format!("{}px {}", self.text_size, self.font_family)
    }
}

/// Integer rectangle, edges are `left..right` and `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect::new(x, y, x + width, y + height)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn center_x(&self) -> i32 {
        (self.left + self.right) / 2
    }

    pub const fn center_y(&self) -> i32 {
        (self.top + self.bottom) / 2
    }

    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }

    /// True when the two rects overlap, touching edges do not count
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        RectF {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    pub fn intersects(&self, other: &RectF) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

impl From<Rect> for RectF {
    fn from(rect: Rect) -> Self {
        RectF::new(
            rect.left as f32,
            rect.top as f32,
            rect.right as f32,
            rect.bottom as f32,
        )
    }
}

/// A loaded image
#[derive(Debug, Clone)]
pub struct Bitmap {
    element: HtmlImageElement,
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(Bitmap)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<Bitmap> {
    let image = browser::create_html_image_element()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!("Error loading image: {:#?}", err)));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callbacks alive until the image loads or errors
    success_callback.forget();
    error_callback.forget();

    // Result<Result<(), Error>, oneshot::Canceled>
    rx.await??;

    Ok(Bitmap { element: image })
}

/// Android style drawing on top of the HTML 2D context.
///
/// Angles are degrees, clockwise from 3 o'clock, as on Android. Paths are
/// filled, stroked or both depending on the paint's style.
#[derive(Debug, Clone)]
pub struct Canvas {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Canvas {
    pub fn new(context: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Canvas {
            context,
            width,
            height,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.context
    }

    fn apply(&self, paint: &Paint) {
        let css = paint.color().to_css();
        self.context.set_fill_style_str(&css);
        self.context.set_stroke_style_str(&css);
        self.context.set_line_width(paint.stroke_width());
    }

    fn paint_path(&self, paint: &Paint) {
        match paint.style() {
            PaintStyle::Fill => self.context.fill(),
            PaintStyle::Stroke => self.context.stroke(),
            PaintStyle::FillAndStroke => {
                self.context.fill();
                self.context.stroke();
            }
        }
    }

    /// Fills the whole surface
    pub fn draw_color(&self, color: Color) {
        self.context.save();
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill_rect(0.0, 0.0, self.width, self.height);
        self.context.restore();
    }

    pub fn draw_rect(&self, rect: impl Into<RectF>, paint: &Paint) {
        let rect = rect.into();
        self.apply(paint);
        self.context.begin_path();
        self.context.rect(
            rect.left.into(),
            rect.top.into(),
            rect.width().into(),
            rect.height().into(),
        );
        self.paint_path(paint);
    }

    pub fn draw_oval(&self, oval: impl Into<RectF>, paint: &Paint) -> Result<()> {
        let oval = oval.into();
        self.apply(paint);
        self.context.begin_path();
        self.context
            .ellipse(
                oval.center_x().into(),
                oval.center_y().into(),
                (oval.width() * 0.5).abs().into(),
                (oval.height() * 0.5).abs().into(),
                0.0,
                0.0,
                2.0 * PI,
            )
            .map_err(|err| anyhow!("Error drawing oval {:?} : {:#?}", oval, err))?;
        self.paint_path(paint);
        Ok(())
    }

    pub fn draw_circle(&self, cx: f64, cy: f64, radius: f64, paint: &Paint) -> Result<()> {
        self.apply(paint);
        self.context.begin_path();
        self.context
            .arc(cx, cy, radius.abs(), 0.0, 2.0 * PI)
            .map_err(|err| anyhow!("Error drawing circle at ({}, {}) : {:#?}", cx, cy, err))?;
        self.paint_path(paint);
        Ok(())
    }

    /// Arc of the ellipse inscribed in `oval`. With `use_center` the arc is
    /// closed through the center (a wedge), otherwise along its chord.
    pub fn draw_arc(
        &self,
        oval: impl Into<RectF>,
        start_degrees: f64,
        sweep_degrees: f64,
        use_center: bool,
        paint: &Paint,
    ) -> Result<()> {
        let oval = oval.into();
        let start = start_degrees.to_radians();
        let end = (start_degrees + sweep_degrees).to_radians();
        let (cx, cy) = (f64::from(oval.center_x()), f64::from(oval.center_y()));

        self.apply(paint);
        self.context.begin_path();
        if use_center {
            self.context.move_to(cx, cy);
        }
        self.context
            .ellipse_with_anticlockwise(
                cx,
                cy,
                f64::from((oval.width() * 0.5).abs()),
                f64::from((oval.height() * 0.5).abs()),
                0.0,
                start,
                end,
                sweep_degrees < 0.0,
            )
            .map_err(|err| anyhow!("Error drawing arc in {:?} : {:#?}", oval, err))?;
        if use_center {
            self.context.close_path();
        }
        self.paint_path(paint);
        Ok(())
    }

    /// `x, y` is the left end of the baseline
    pub fn draw_text(&self, text: &str, x: f64, y: f64, paint: &Paint) -> Result<()> {
        self.apply(paint);
        self.context.set_font(&paint.font());
        let drawn = match paint.style() {
            PaintStyle::Fill => self.context.fill_text(text, x, y),
            PaintStyle::Stroke => self.context.stroke_text(text, x, y),
            PaintStyle::FillAndStroke => self
                .context
                .fill_text(text, x, y)
                .and_then(|_| self.context.stroke_text(text, x, y)),
        };
        drawn.map_err(|err| anyhow!("Error drawing text '{}' : {:#?}", text, err))
    }

    /// Bounds of `text` relative to its baseline origin, `top` is negative
    pub fn text_bounds(&self, text: &str, paint: &Paint) -> Result<Rect> {
        self.context.set_font(&paint.font());
        let metrics = self
            .context
            .measure_text(text)
            .map_err(|err| anyhow!("Error measuring text '{}' : {:#?}", text, err))?;
        Ok(Rect::new(
            0,
            -metrics.actual_bounding_box_ascent().ceil() as i32,
            metrics.width().ceil() as i32,
            metrics.actual_bounding_box_descent().ceil() as i32,
        ))
    }

    /// Draws `source` (the whole bitmap when `None`) scaled into `destination`
    pub fn draw_bitmap(
        &self,
        bitmap: &Bitmap,
        source: Option<Rect>,
        destination: impl Into<RectF>,
    ) -> Result<()> {
        let destination = destination.into();
        let drawn = match source {
            Some(source) => self
                .context
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    &bitmap.element,
                    source.left.into(),
                    source.top.into(),
                    source.width().into(),
                    source.height().into(),
                    destination.left.into(),
                    destination.top.into(),
                    destination.width().into(),
                    destination.height().into(),
                ),
            None => self.context.draw_image_with_html_image_element_and_dw_and_dh(
                &bitmap.element,
                destination.left.into(),
                destination.top.into(),
                destination.width().into(),
                destination.height().into(),
            ),
        };
        drawn.map_err(|err| anyhow!("Error drawing bitmap : {:#?}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_components_are_argb_ordered() {
        let color = Color::argb(0x80, 100, 200, 50);
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.red(), 100);
        assert_eq!(color.green(), 200);
        assert_eq!(color.blue(), 50);
        assert_eq!(Color::rgb(255, 0, 255), Color::MAGENTA);
    }

    #[test]
    fn css_moves_alpha_to_the_end() {
        assert_eq!(Color::MAGENTA.to_css(), "rgba(255, 0, 255, 1)");
        assert_eq!(Color::TRANSPARENT.to_css(), "rgba(0, 0, 0, 0)");
        assert_eq!(Color::GRAY.to_css(), "rgba(136, 136, 136, 1)");
        assert_eq!(Color::argb(51, 1, 2, 3).to_css(), "rgba(1, 2, 3, 0.2)");
    }

    #[test]
    fn paint_defaults_and_font() {
        let mut paint = Paint::new();
        assert_eq!(paint.color(), Color::BLACK);
        assert_eq!(paint.style(), PaintStyle::Fill);
        assert_eq!(paint.font(), "12px Arial");

        paint.set_text_size(20.0);
        paint.set_font_family("monospace");
        paint.set_argb(255, 100, 200, 200);
        assert_eq!(paint.font(), "20px monospace");
        assert_eq!(paint.color(), Color::rgb(100, 200, 200));

        paint.set_stroke_width(-3.0);
        assert_eq!(paint.stroke_width(), 0.0);
    }

    #[test]
    fn rect_geometry() {
        let rect = Rect::new(150, 50, 250, 100);
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 50);
        assert_eq!(rect.center_x(), 200);
        assert_eq!(rect.center_y(), 75);
        assert!(rect.contains_point(150, 100));
        assert!(!rect.contains_point(149, 75));
        assert_eq!(Rect::from_size(10, 20, 5, 5), Rect::new(10, 20, 15, 25));
    }

    #[test]
    fn rect_intersection_excludes_touching_edges() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(5, 5, 15, 15)));
        assert!(a.intersects(&Rect::new(2, 2, 4, 4)));
        assert!(!a.intersects(&Rect::new(10, 0, 20, 10)));
        assert!(!a.intersects(&Rect::new(0, 10, 10, 20)));
    }

    #[test]
    fn rectf_from_rect() {
        let rect: RectF = Rect::new(160, 120, 260, 220).into();
        assert_eq!(rect, RectF::new(160.0, 120.0, 260.0, 220.0));
        assert_eq!(rect.center_x(), 210.0);
        assert_eq!(rect.center_y(), 170.0);
        assert!(rect.intersects(&RectF::new(200.0, 200.0, 300.0, 300.0)));
    }
}
