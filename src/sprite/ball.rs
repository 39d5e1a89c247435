use super::{Paddle, Sprite};
use crate::engine::graphics::{Canvas, Color, Paint, PaintStyle};
use crate::engine::{Drawable, Screen, Updatable};
use anyhow::Result;

const INITIAL_SPEED: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEvent {
    None,
    /// The ball left the screen past the paddle
    Missed,
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub sprite: Sprite,
}

impl Ball {
    pub fn new(x: i32, y: i32, size: i32) -> Self {
        let mut sprite = Sprite::new(x, y, size, size);
        sprite.velocity_x = INITIAL_SPEED;
        sprite.velocity_y = INITIAL_SPEED;
        Ball { sprite }
    }

    /// Moves the ball and resolves bounces off the right, top and bottom
    /// edges and off the paddle.
    pub fn step(&mut self, screen: &Screen, paddle: &Paddle) -> BallEvent {
        self.sprite.update();

        if self.sprite.x >= screen.width {
            self.sprite.velocity_x = -self.sprite.velocity_x;
        }
        if self.sprite.y >= screen.height || self.sprite.y <= 0 {
            self.sprite.velocity_y = -self.sprite.velocity_y;
        }
        // off the paddle it always heads right
        if self.hitting_paddle(paddle) {
            self.sprite.velocity_x = self.sprite.velocity_x.abs();
        }

        if self.sprite.x + self.sprite.width <= 0 {
            BallEvent::Missed
        } else {
            BallEvent::None
        }
    }

    pub fn hitting_paddle(&self, paddle: &Paddle) -> bool {
        let ball = &self.sprite;
        let paddle = &paddle.sprite;
        let within_height = ball.y + ball.height > paddle.y && ball.y < paddle.y + paddle.height;
        // inside the paddle, or exactly on its right edge
        within_height && ball.x > paddle.x && ball.x <= paddle.x + paddle.width
    }
}

impl Drawable for Ball {
    fn draw(&self, canvas: &Canvas) -> Result<()> {
        let mut paint = Paint::new();
        paint.set_color(Color::MAGENTA);
        paint.set_style(PaintStyle::Fill);
        canvas.draw_oval(self.sprite.bounds(), &paint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Screen = Screen {
        width: 800,
        height: 600,
    };

    fn far_paddle() -> Paddle {
        Paddle::new(40, 1000, 20, 80)
    }

    #[test]
    fn moves_by_velocity() {
        let mut ball = Ball::new(100, 100, 20);
        assert_eq!(ball.step(&SCREEN, &far_paddle()), BallEvent::None);
        assert_eq!((ball.sprite.x, ball.sprite.y), (105, 105));
    }

    #[test]
    fn bounces_off_right_edge() {
        let mut ball = Ball::new(798, 100, 20);
        ball.step(&SCREEN, &far_paddle());
        assert_eq!(ball.sprite.velocity_x, -5);
    }

    #[test]
    fn bounces_off_top_and_bottom() {
        let mut ball = Ball::new(100, 598, 20);
        ball.step(&SCREEN, &far_paddle());
        assert_eq!(ball.sprite.velocity_y, -5);

        let mut ball = Ball::new(100, 3, 20);
        ball.sprite.velocity_y = -5;
        ball.step(&SCREEN, &far_paddle());
        assert_eq!(ball.sprite.velocity_y, 5);
    }

    #[test]
    fn paddle_sends_ball_right() {
        let paddle = Paddle::new(40, 100, 20, 80);
        let mut ball = Ball::new(65, 120, 20);
        ball.sprite.velocity_x = -10;
        ball.sprite.velocity_y = 0;

        ball.step(&SCREEN, &paddle);
        assert_eq!(ball.sprite.x, 55);
        assert_eq!(ball.sprite.velocity_x, 10);
    }

    #[test]
    fn paddle_right_edge_counts_as_hit() {
        let paddle = Paddle::new(40, 100, 20, 80);
        let mut ball = Ball::new(60, 120, 20);
        assert!(ball.hitting_paddle(&paddle));

        ball.sprite.x = 61;
        assert!(!ball.hitting_paddle(&paddle));
        ball.sprite.x = 50;
        ball.sprite.y = 180;
        assert!(!ball.hitting_paddle(&paddle));
    }

    #[test]
    fn leaving_on_the_left_is_a_miss() {
        let mut ball = Ball::new(-15, 300, 20);
        ball.sprite.velocity_x = -5;
        ball.sprite.velocity_y = 0;
        assert_eq!(ball.step(&SCREEN, &far_paddle()), BallEvent::Missed);
    }
}
