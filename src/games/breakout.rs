use super::{draw_hint, BACKGROUND};
use crate::{
    button::{Button, ButtonStyle},
    geometry::overlaps,
    layout,
    text::{draw_text_aligned, draw_text_centered, TextAlign},
    timer::{frame_time, FixedStep, TICK_60HZ},
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use derive_more::derive::Deref;
use futures::{future::LocalBoxFuture, FutureExt};
use itertools::iproduct;
use macroquad::{
    color::{self, Color},
    color_u8,
    input::{is_key_down, is_key_pressed, KeyCode},
    logging::debug,
    math::{Rect, Vec2},
    shapes::{draw_rectangle, draw_rectangle_lines},
    window::{clear_background, next_frame},
};
use rand::rngs::SmallRng;

pub const INFO: GameInfo = GameInfo {
    id: "breakout",
    title: "Breakout",
    description: "Break bricks with ball and paddle",
    difficulty: Difficulty::Hard,
};

pub const AREA: Vec2 = Vec2::new(800.0, 600.0);
pub const LIVES: u32 = 3;

const PADDLE: Rect = Rect {
    x: 350.0,
    y: 550.0,
    w: 100.0,
    h: 10.0,
};
const PADDLE_SPEED: f32 = 7.0;
const BALL_SIZE: f32 = 10.0;
const BALL_START: Vec2 = Vec2::new(400.0, 300.0);
const BALL_VEL: Vec2 = Vec2::new(4.0, -4.0);
/// Horizontal speed range the paddle can give the ball.
const SPIN: f32 = 8.0;

const ROWS: usize = 5;
const COLS: usize = 10;
const ROW_COLORS: [Color; ROWS] = [
    color_u8!(255, 0, 0, 255),
    color_u8!(255, 128, 0, 255),
    color_u8!(255, 255, 0, 255),
    color_u8!(128, 255, 0, 255),
    color_u8!(0, 255, 0, 255),
];

#[derive(Clone, Copy, PartialEq, Debug, Deref)]
pub struct Brick {
    #[deref]
    rect: Rect,
    row: usize,
}

impl Brick {
    fn new(row: usize, col: usize) -> Self {
        Self {
            rect: Rect::new(col as f32 * 80.0 + 5.0, row as f32 * 30.0 + 50.0, 75.0, 25.0),
            row,
        }
    }

    pub fn points(&self) -> u32 {
        (ROWS - self.row) as u32 * 10
    }

    pub fn color(&self) -> Color {
        ROW_COLORS[self.row]
    }
}

fn wall() -> Vec<Brick> {
    iproduct!(0..ROWS, 0..COLS)
        .map(|(row, col)| Brick::new(row, col))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: BALL_START,
            vel: BALL_VEL,
        }
    }
}

impl Ball {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BALL_SIZE, BALL_SIZE)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    Paused,
    Won,
    Over,
}

/// Arrow keys held during a tick.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Steer {
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug)]
pub struct Breakout {
    paddle: Rect,
    ball: Ball,
    bricks: Vec<Brick>,
    score: u32,
    lives: u32,
    phase: Phase,
}

impl Default for Breakout {
    fn default() -> Self {
        Self {
            paddle: PADDLE,
            ball: Ball::default(),
            bricks: wall(),
            score: 0,
            lives: LIVES,
            phase: Phase::Ready,
        }
    }
}

impl Breakout {
    pub fn paddle(&self) -> Rect {
        self.paddle
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start(&mut self) {
        if matches!(self.phase, Phase::Won | Phase::Over) {
            *self = Self::default();
        }
        self.phase = Phase::Playing;
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    pub fn toggle(&mut self) {
        if self.phase == Phase::Playing {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn tick(&mut self, steer: Steer) {
        if self.phase != Phase::Playing {
            return;
        }

        if steer.left && self.paddle.x > 0.0 {
            self.paddle.x -= PADDLE_SPEED;
        }
        if steer.right && self.paddle.x < AREA.x - self.paddle.w {
            self.paddle.x += PADDLE_SPEED;
        }

        let ball = &mut self.ball;
        ball.pos += ball.vel;
        if ball.pos.x <= 0.0 || ball.pos.x >= AREA.x - BALL_SIZE {
            ball.vel.x = -ball.vel.x;
        }
        if ball.pos.y <= 0.0 {
            ball.vel.y = -ball.vel.y;
        }

        let rect = ball.rect();
        let paddle = self.paddle;
        if ball.vel.y > 0.0
            && rect.bottom() >= paddle.top()
            && rect.top() <= paddle.bottom()
            && rect.right() >= paddle.left()
            && rect.left() <= paddle.right()
        {
            let hit = (rect.center().x - paddle.x) / paddle.w;
            ball.vel = Vec2::new(SPIN * (hit - 0.5), -ball.vel.y);
        }

        let count = self.bricks.len();
        let mut points = 0;
        self.bricks.retain(|brick| {
            let hit = overlaps(brick, &rect);
            if hit {
                points += brick.points();
            }
            !hit
        });
        if self.bricks.len() < count {
            self.score += points;
            ball.vel.y = -ball.vel.y;
        }

        if ball.pos.y > AREA.y {
            self.lives = self.lives.saturating_sub(1);
            *ball = Ball::default();
            if self.lives == 0 {
                debug!("breakout: game over with {} points", self.score);
                self.phase = Phase::Over;
                return;
            }
        }

        if self.bricks.is_empty() {
            debug!("breakout: cleared with {} lives left", self.lives);
            self.phase = Phase::Won;
        }
    }
}

pub async fn main(_rng: SmallRng) -> Result<(), Error> {
    let area = Rect::new(0.0, 0.0, AREA.x, AREA.y);
    let field = Playfield::new(Rect::new(-10.0, -60.0, AREA.x + 20.0, AREA.y + 100.0));
    let mut step = FixedStep::new(TICK_60HZ);
    let mut game = Breakout::default();

    while !is_key_down(KeyCode::Escape) {
        if is_key_pressed(KeyCode::Space) {
            game.toggle();
            step.reset();
        }
        let steer = Steer {
            left: is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::Right),
        };
        let dt = frame_time();
        for _ in 0..step.advance(dt) {
            game.tick(steer);
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        draw_rectangle(area.x, area.y, area.w, area.h, color::BLACK);
        for brick in game.bricks() {
            draw_rectangle(brick.x, brick.y, brick.w, brick.h, brick.color());
            draw_rectangle_lines(brick.x, brick.y, brick.w, brick.h, 1.0, color::BLACK);
        }
        let paddle = game.paddle();
        draw_rectangle(paddle.x, paddle.y, paddle.w, paddle.h, color::WHITE);
        let ball = game.ball().rect();
        draw_rectangle(ball.x, ball.y, ball.w, ball.h, color::WHITE);

        draw_text_aligned(
            &format!("Score: {}", game.score()),
            area.x,
            area.y - 20.0,
            TextAlign::Left,
            30.0,
            color::WHITE,
        );
        draw_text_aligned(
            &format!("Lives: {}", game.lives()),
            area.center().x,
            area.y - 20.0,
            TextAlign::Center,
            30.0,
            color::WHITE,
        );
        let label = match game.phase() {
            Phase::Playing => "Pause",
            Phase::Won | Phase::Over => "Play Again",
            Phase::Ready | Phase::Paused => "Start",
        };
        if Button::new(Rect::new(area.right() - 140.0, area.y - 52.0, 140.0, 44.0), label)
            .style(ButtonStyle::filled(color::PURPLE))
            .ui(mouse)
        {
            game.toggle();
            step.reset();
        }

        let center = area.center();
        let banner = match game.phase() {
            Phase::Over => Some(("Game Over!", color::RED)),
            Phase::Won => Some(("You Won!", color::GREEN)),
            _ => None,
        };
        if let Some((text, color)) = banner {
            draw_rectangle(area.x, area.y, area.w, area.h, Color::new(0.0, 0.0, 0.0, 0.5));
            draw_text_centered(text, center.x, center.y, 56.0, color);
            draw_text_centered(
                &format!("Final Score: {}", game.score()),
                center.x,
                center.y + 50.0,
                28.0,
                color::WHITE,
            );
        }
        draw_hint(field.bounds(), "Arrow keys move the paddle, Space to start or pause, Esc to leave");

        field.end();
        next_frame().await
    }

    Ok(())
}

pub struct Game;

impl crate::Game for Game {
    fn info(&self) -> &'static GameInfo {
        &INFO
    }

    fn draw_preview(&self, rect: Rect) {
        let square = layout::preview_square(rect);
        let rows = layout::board(
            Rect::new(square.x, square.y, square.w, square.h * 0.4),
            4,
            ROWS,
            2.0,
        );
        for (i, brick) in rows.iter().enumerate() {
            draw_rectangle(brick.x, brick.y, brick.w, brick.h, ROW_COLORS[i / 4]);
        }
        let (w, h) = (square.w * 0.3, square.h * 0.05);
        draw_rectangle(square.center().x - w / 2.0, square.bottom() - h, w, h, color::WHITE);
        draw_rectangle(square.x + square.w * 0.6, square.y + square.h * 0.65, h, h, color::WHITE);
    }

    fn launch(&self, rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>> {
        main(rng).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const IDLE: Steer = Steer {
        left: false,
        right: false,
    };

    fn playing() -> Breakout {
        let mut game = Breakout::default();
        game.start();
        game
    }

    fn with_ball(pos: Vec2, vel: Vec2) -> Breakout {
        let mut game = playing();
        game.ball = Ball { pos, vel };
        game
    }

    #[test]
    fn initial_wall() {
        let game = Breakout::default();
        assert_eq!(game.bricks().len(), ROWS * COLS);
        let first = game.bricks()[0];
        assert_eq!(*first, Rect::new(5.0, 50.0, 75.0, 25.0));
        assert_eq!(first.points(), 50);
        let last = game.bricks()[ROWS * COLS - 1];
        assert_eq!(*last, Rect::new(725.0, 170.0, 75.0, 25.0));
        assert_eq!(last.points(), 10);
        assert_eq!(game.lives(), LIVES);
    }

    #[test]
    fn nothing_moves_until_started() {
        let mut game = Breakout::default();
        game.tick(IDLE);
        assert_eq!(game.ball(), Ball::default());
        game.start();
        game.tick(IDLE);
        assert_eq!(game.ball().pos, Vec2::new(404.0, 296.0));
    }

    #[test]
    fn pause_freezes_ball_and_paddle() {
        let right = Steer {
            left: false,
            right: true,
        };
        let mut game = playing();
        let mut control = playing();
        for _ in 0..10 {
            game.tick(right);
            control.tick(right);
        }

        game.pause();
        assert_eq!(game.phase(), Phase::Paused);
        let (ball, paddle) = (game.ball(), game.paddle());
        for _ in 0..500 {
            game.tick(right);
        }
        assert_eq!(game.ball(), ball);
        assert_eq!(game.paddle(), paddle);

        game.toggle();
        for _ in 0..10 {
            game.tick(right);
            control.tick(right);
        }
        assert_eq!(game.ball(), control.ball());
        assert_eq!(game.paddle(), control.paddle());
        assert_eq!(game.bricks().len(), control.bricks().len());
    }

    #[test]
    fn paddle_stays_in_area() {
        let mut game = playing();
        game.ball = Ball {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::ZERO,
        };
        for _ in 0..100 {
            game.tick(Steer {
                left: true,
                right: false,
            });
        }
        assert_abs_diff_eq!(game.paddle().x, 0.0);
        for _ in 0..200 {
            game.tick(Steer {
                left: false,
                right: true,
            });
        }
        assert_abs_diff_eq!(game.paddle().x, 700.0);
    }

    #[test]
    fn side_and_top_walls_bounce() {
        let mut game = with_ball(Vec2::new(788.0, 300.0), Vec2::new(4.0, -4.0));
        game.tick(IDLE);
        assert_eq!(game.ball().vel, Vec2::new(-4.0, -4.0));

        let mut game = with_ball(Vec2::new(2.0, 300.0), Vec2::new(-4.0, -4.0));
        game.tick(IDLE);
        assert_eq!(game.ball().vel, Vec2::new(4.0, -4.0));

        let mut game = with_ball(Vec2::new(400.0, 3.0), Vec2::new(4.0, -4.0));
        game.bricks.clear();
        game.bricks.push(Brick::new(0, 0));
        game.tick(IDLE);
        assert_eq!(game.ball().vel, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn paddle_angles_ball() {
        let mut game = with_ball(Vec2::new(395.0, 538.0), Vec2::new(4.0, 4.0));
        game.tick(IDLE);
        let vel = game.ball().vel;
        assert_abs_diff_eq!(vel.y, -4.0);
        assert_abs_diff_eq!(vel.x, 0.32, epsilon = 1e-4);

        // Grazing the left end sends the ball back left.
        let mut game = with_ball(Vec2::new(346.0, 538.0), Vec2::new(-4.0, 4.0));
        game.tick(IDLE);
        assert_abs_diff_eq!(game.ball().vel.x, -4.24, epsilon = 1e-4);

        let mut game = with_ball(Vec2::new(440.0, 538.0), Vec2::new(4.0, 4.0));
        game.tick(IDLE);
        assert_abs_diff_eq!(game.ball().vel.x, 3.92, epsilon = 1e-4);
    }

    #[test]
    fn ball_below_paddle_is_lost() {
        let mut game = with_ball(Vec2::new(400.0, 570.0), Vec2::new(4.0, 4.0));
        game.tick(IDLE);
        assert_eq!(game.ball().vel, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn brick_hit_scores_and_bounces() {
        let mut game = with_ball(Vec2::new(10.0, 195.0), Vec2::new(4.0, -4.0));
        game.tick(IDLE);
        assert_eq!(game.bricks().len(), ROWS * COLS - 1);
        assert_eq!(game.score(), 10);
        assert_eq!(game.ball().vel, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn two_bricks_flip_direction_once() {
        let mut game = with_ball(Vec2::new(74.0, 195.0), Vec2::new(4.0, -4.0));
        game.tick(IDLE);
        assert_eq!(game.bricks().len(), ROWS * COLS - 2);
        assert_eq!(game.score(), 20);
        assert_eq!(game.ball().vel.y, 4.0);
    }

    #[test]
    fn falling_ball_costs_life() {
        let mut game = with_ball(Vec2::new(600.0, 598.0), Vec2::new(4.0, 4.0));
        game.tick(IDLE);
        assert_eq!(game.lives(), LIVES - 1);
        assert_eq!(game.ball(), Ball::default());
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn last_life_ends_game() {
        let mut game = with_ball(Vec2::new(600.0, 598.0), Vec2::new(4.0, 4.0));
        game.lives = 1;
        game.tick(IDLE);
        assert_eq!(game.lives(), 0);
        assert_eq!(game.phase(), Phase::Over);
        game.tick(IDLE);
        assert_eq!(game.ball(), Ball::default());

        game.start();
        assert_eq!(game.lives(), LIVES);
        assert_eq!(game.score(), 0);
        assert_eq!(game.bricks().len(), ROWS * COLS);
    }

    #[test]
    fn clearing_wall_wins() {
        let mut game = with_ball(Vec2::new(10.0, 195.0), Vec2::new(4.0, -4.0));
        game.bricks = vec![Brick::new(4, 0)];
        game.tick(IDLE);
        assert!(game.bricks().is_empty());
        assert_eq!(game.phase(), Phase::Won);
        assert_eq!(game.score(), 10);
    }
}
