use crate::config::GameConfig;
use crate::engine::graphics::{self, Bitmap, Canvas, Color, Paint};
use crate::engine::input::{Action, MotionEvent};
use crate::engine::{Drawable, Game, Screen, Updatable};
use crate::sprite::{Ball, BallEvent, Enemy, Paddle};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

/// Frames to wait before play starts, and again after every miss
pub const COUNTDOWN_FRAMES: u32 = 200;
/// Frames a finished game ignores touches before one restarts it
pub const RESTART_FRAMES: u32 = 200;
pub const STARTING_LIVES: u32 = 3;
pub const ENEMY_COUNT: usize = 5;
pub const ENEMY_POINTS: u32 = 100;

const LOSE_TEXT: &str = "Better luck next time!";
const WIN_TEXT: &str = "You win!";

/// The paddle-and-ball demo
///
/// ┌──────────── Frame ─────────────┐
/// │ countdown > 0 → count down     │
/// │ game over     → count up       │
/// │ paused        → nothing        │
/// │ otherwise     → move ball,     │
/// │                 hit enemies    │
/// └────────────────────────────────┘
pub enum DemoGame {
    /// Assets are being loaded
    Loading(GameConfig),
    Loaded(Box<PaddleBall>),
}

impl DemoGame {
    pub fn new(config: GameConfig) -> Self {
        DemoGame::Loading(config)
    }
}

#[async_trait(?Send)]
impl Game for DemoGame {
    async fn initialize(&self, screen: Screen) -> Result<Box<dyn Game>> {
        match self {
            DemoGame::Loading(config) => {
                // the game is playable without the image
                let enemy_image = match graphics::load_image(&config.enemy_image).await {
                    Ok(image) => Some(Rc::new(image)),
                    Err(err) => {
                        warn!("enemies drawn as blocks, {}: {:#}", config.enemy_image, err);
                        None
                    }
                };
                let game = PaddleBall::new(screen, enemy_image, SmallRng::from_entropy());
                info!("demo game ready on {}x{}", screen.width, screen.height);
                Ok(Box::new(DemoGame::Loaded(Box::new(game))))
            }
            DemoGame::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self) {
        if let DemoGame::Loaded(game) = self {
            game.update();
        }
    }

    fn draw(&self, canvas: &Canvas) -> Result<()> {
        match self {
            DemoGame::Loaded(game) => game.draw(canvas),
            DemoGame::Loading(_) => Ok(()),
        }
    }

    fn on_touch(&mut self, event: &MotionEvent) {
        if let DemoGame::Loaded(game) = self {
            game.handle_touch(event);
        }
    }
}

/// State of one running demo game
pub struct PaddleBall {
    screen: Screen,
    rng: SmallRng,
    ball: Ball,
    paddle: Paddle,
    enemies: Vec<Enemy>,
    enemy_image: Option<Rc<Bitmap>>,
    score: u32,
    lives: u32,
    paused: bool,
    game_over: bool,
    game_over_frames: u32,
    countdown: u32,
}

impl PaddleBall {
    pub fn new(screen: Screen, enemy_image: Option<Rc<Bitmap>>, rng: SmallRng) -> Self {
        let ball_size = Self::ball_size(&screen);
        let centered_y = screen.height / 2 - ball_size / 2;
        let mut game = PaddleBall {
            screen,
            rng,
            ball: Ball::new(screen.width / 2 - ball_size / 2, centered_y, ball_size),
            paddle: Paddle::new(ball_size * 2, centered_y, ball_size, ball_size * 4),
            enemies: Vec::with_capacity(ENEMY_COUNT),
            enemy_image,
            score: 0,
            lives: STARTING_LIVES,
            paused: false,
            game_over: false,
            game_over_frames: 0,
            countdown: COUNTDOWN_FRAMES,
        };
        game.load_enemies();
        game
    }

    fn ball_size(screen: &Screen) -> i32 {
        (screen.width as f32 / 40.0).round() as i32
    }

    fn enemy_size(screen: &Screen) -> i32 {
        (screen.width as f32 / 20.0).round() as i32
    }

    /// Replaces the enemies with a fresh set, placed randomly in the right
    /// half of the screen
    pub fn load_enemies(&mut self) {
        let size = Self::enemy_size(&self.screen);
        let half_width = (self.screen.width as f32 / 2.0).round() as i32;
        self.enemies.clear();
        for _ in 0..ENEMY_COUNT {
            let x = self.screen.width / 2 + self.rng.gen_range(0..(half_width - size).max(1));
            let y = self.rng.gen_range(0..(self.screen.height - size).max(1));
            self.enemies
                .push(Enemy::new(x, y, size, self.enemy_image.clone()));
        }
    }

    /// Ball speed becomes its own width per frame in both directions
    pub fn start(&mut self) {
        self.ball.sprite.velocity_x = self.ball.sprite.width;
        self.ball.sprite.velocity_y = self.ball.sprite.width;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn handle_miss(&mut self) {
        self.reset_ball_and_time();
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
        }
    }

    /// Puts the ball back near the middle, heading away from the paddle,
    /// and restarts the countdown
    pub fn reset_ball_and_time(&mut self) {
        let ball = &mut self.ball.sprite;
        ball.x = self.screen.width / 2 + self.rng.gen_range(0..(ball.width * 3).max(1));
        ball.y = self.rng.gen_range(0..(self.screen.height - ball.height).max(1));
        ball.velocity_x = ball.velocity_x.abs();
        self.countdown = COUNTDOWN_FRAMES;
    }

    pub fn update(&mut self) {
        if self.countdown > 0 {
            self.countdown -= 1;
            return;
        }
        if self.game_over {
            self.game_over_frames += 1;
            return;
        }
        if self.paused {
            return;
        }

        self.paddle.update();
        if self.ball.step(&self.screen, &self.paddle) == BallEvent::Missed {
            self.handle_miss();
        }

        for enemy in self.enemies.iter_mut() {
            enemy.update();
        }
        // one hit per frame
        if let Some(hit) = self
            .enemies
            .iter()
            .position(|enemy| self.ball.sprite.overlaps(&enemy.sprite))
        {
            self.enemies.remove(hit);
            self.score += ENEMY_POINTS;
            if self.enemies.is_empty() {
                self.game_over = true;
            }
        }
    }

    pub fn handle_touch(&mut self, event: &MotionEvent) {
        match event.action {
            Action::Down | Action::Move => self.handle_touch_down_or_move(event.y),
            Action::Up => {}
        }
    }

    fn handle_touch_down_or_move(&mut self, y: f32) {
        if !self.paused {
            self.paddle.center_on(y);
        }
        if self.game_over && self.game_over_frames >= RESTART_FRAMES {
            self.restart();
        }
    }

    fn restart(&mut self) {
        self.game_over = false;
        self.game_over_frames = 0;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.load_enemies();
        self.reset_ball_and_time();
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn has_won(&self) -> bool {
        self.game_over && self.enemies.is_empty()
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn draw(&self, canvas: &Canvas) -> Result<()> {
        canvas.draw_color(Color::BLACK);

        self.paddle.draw(canvas)?;
        self.ball.draw(canvas)?;
        for enemy in &self.enemies {
            enemy.draw(canvas)?;
        }

        let width = f64::from(self.screen.width);
        let height = f64::from(self.screen.height);
        let mut paint = Paint::new();
        paint.set_color(Color::WHITE);

        let lives = format!("Lives: {}", self.lives);
        let bounds = canvas.text_bounds(&lives, &paint)?;
        canvas.draw_text(
            &lives,
            width / 4.0 - f64::from(bounds.width()) / 2.0,
            f64::from(bounds.height() * 3),
            &paint,
        )?;

        let score = format!("Score: {}", self.score);
        let bounds = canvas.text_bounds(&score, &paint)?;
        canvas.draw_text(
            &score,
            3.0 * width / 4.0 - f64::from(bounds.width()) / 2.0,
            f64::from(bounds.height() * 3),
            &paint,
        )?;

        let banner = if self.has_won() {
            Some(WIN_TEXT)
        } else if self.game_over && self.lives == 0 {
            Some(LOSE_TEXT)
        } else {
            None
        };
        if let Some(text) = banner {
            paint.set_text_size(20.0);
            paint.set_color(Color::YELLOW);
            let bounds = canvas.text_bounds(text, &paint)?;
            canvas.draw_text(
                text,
                width / 2.0 - f64::from(bounds.width()) / 2.0,
                height / 2.0 - f64::from(bounds.height()) / 2.0,
                &paint,
            )?;
        }
        Ok(())
    }
}
