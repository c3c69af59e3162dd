use super::{draw_hint, BACKGROUND};
use crate::{
    button::{Button, ButtonStyle},
    geometry::in_circle,
    layout,
    text::{draw_text_aligned, draw_text_centered, TextAlign},
    timer::{frame_time, FixedStep, TICK_60HZ},
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use futures::{future::LocalBoxFuture, FutureExt};
use macroquad::{
    color::{self, Color},
    color_u8,
    input::{is_key_down, is_key_pressed, is_mouse_button_pressed, KeyCode, MouseButton},
    logging::debug,
    math::{Rect, Vec2},
    shapes::{draw_circle, draw_rectangle},
    window::{clear_background, next_frame},
};
use rand::{rngs::SmallRng, Rng};
use rand_distr::Uniform;

pub const INFO: GameInfo = GameInfo {
    id: "catch-balls",
    title: "Catch the Falling Balls",
    description: "Click falling balls to catch them",
    difficulty: Difficulty::Medium,
};

pub const AREA: Vec2 = Vec2::new(600.0, 400.0);
pub const BALL_SIZE: f32 = 40.0;
/// Chance of a new ball per tick.
pub const SPAWN_CHANCE: f64 = 0.02;
pub const POINTS: u32 = 10;

const COLORS: [Color; 6] = [
    color_u8!(255, 107, 107, 255),
    color_u8!(78, 205, 196, 255),
    color_u8!(69, 183, 209, 255),
    color_u8!(150, 206, 180, 255),
    color_u8!(254, 202, 87, 255),
    color_u8!(255, 159, 243, 255),
];

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ball {
    /// Top-left corner of the bounding box.
    pub pos: Vec2,
    /// Fall per tick.
    pub speed: f32,
    pub color: Color,
}

impl Ball {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(BALL_SIZE / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        in_circle(point, self.center(), BALL_SIZE / 2.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    Paused,
    Over,
}

#[derive(Clone, Default, Debug)]
pub struct CatchBalls {
    balls: Vec<Ball>,
    score: u32,
    phase: Phase,
}

impl CatchBalls {
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start(&mut self) {
        *self = Self {
            phase: Phase::Playing,
            ..Default::default()
        };
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
        }
    }

    pub fn spawn<R: Rng>(&mut self, rng: &mut R) {
        self.balls.push(Ball {
            pos: Vec2::new(rng.sample(Uniform::new(0.0, AREA.x - BALL_SIZE)), -BALL_SIZE),
            speed: rng.sample(Uniform::new(2.0, 5.0)),
            color: COLORS[rng.gen_range(0..COLORS.len())],
        });
    }

    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        if self.phase != Phase::Playing {
            return;
        }
        for ball in &mut self.balls {
            ball.pos.y += ball.speed;
        }
        let count = self.balls.len();
        self.balls.retain(|ball| ball.pos.y < AREA.y);
        if self.balls.len() < count {
            self.phase = Phase::Over;
            return;
        }
        if rng.gen_bool(SPAWN_CHANCE) {
            self.spawn(rng);
        }
    }

    /// Catches the topmost ball under `point`.
    pub fn click(&mut self, point: Vec2) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        match self.balls.iter().rposition(|ball| ball.contains(point)) {
            Some(index) => {
                self.balls.remove(index);
                self.score += POINTS;
                true
            }
            None => false,
        }
    }

    /// Start, pause or resume, depending on the phase.
    pub fn toggle(&mut self) {
        match self.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Ready | Phase::Over => self.start(),
        }
    }
}

pub async fn main(mut rng: SmallRng) -> Result<(), Error> {
    let area = Rect::new(0.0, 0.0, AREA.x, AREA.y);
    let toggle_button = Rect::new(area.right() - 140.0, area.y - 55.0, 140.0, 40.0);
    let field = Playfield::new(Rect::new(-20.0, -70.0, AREA.x + 40.0, AREA.y + 110.0));
    let mut step = FixedStep::new(TICK_60HZ);
    let mut game = CatchBalls::default();
    let mut game_over_logged = false;

    while !is_key_down(KeyCode::Escape) {
        let dt = frame_time();
        for _ in 0..step.advance(dt) {
            game.tick(&mut rng);
        }
        if game.phase() == Phase::Over && !game_over_logged {
            debug!("catch-balls: game over with {} points", game.score());
            game_over_logged = true;
        }
        if is_key_pressed(KeyCode::Space) {
            game.toggle();
            game_over_logged = false;
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        if is_mouse_button_pressed(MouseButton::Left) && area.contains(mouse) {
            game.click(mouse);
        }

        draw_rectangle(area.x, area.y, area.w, area.h, color_u8!(224, 242, 254, 255));
        for ball in game.balls() {
            let c = ball.center();
            draw_circle(c.x, c.y, BALL_SIZE / 2.0, ball.color);
        }
        draw_text_aligned(
            &format!("Score: {}", game.score()),
            area.x,
            area.y - 24.0,
            TextAlign::Left,
            32.0,
            color::WHITE,
        );

        let label = match game.phase() {
            Phase::Ready => "Start",
            Phase::Playing => "Pause",
            Phase::Paused => "Resume",
            Phase::Over => "Play Again",
        };
        if Button::new(toggle_button, label)
            .style(ButtonStyle::filled(color::DARKBLUE))
            .ui(mouse)
        {
            game.toggle();
            game_over_logged = false;
        }

        let center = area.center();
        match game.phase() {
            Phase::Ready if game.balls().is_empty() => {
                draw_text_centered(
                    "Click Start to begin catching balls!",
                    center.x,
                    center.y,
                    28.0,
                    color::GRAY,
                );
            }
            Phase::Over => {
                draw_rectangle(area.x, area.y, area.w, area.h, Color::new(0.0, 0.0, 0.0, 0.5));
                draw_text_centered("Game Over!", center.x, center.y - 30.0, 48.0, color::WHITE);
                draw_text_centered(
                    &format!("Final Score: {}", game.score()),
                    center.x,
                    center.y + 20.0,
                    28.0,
                    color::WHITE,
                );
            }
            _ => (),
        }
        draw_hint(field.bounds(), "Click the balls, Space to start or pause, Esc to leave");

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
        let r = square.w / 6.0;
        for (i, (x, y)) in [(0.2, 0.3), (0.55, 0.15), (0.8, 0.6), (0.4, 0.75)]
            .into_iter()
            .enumerate()
        {
            draw_circle(
                square.x + x * square.w,
                square.y + y * square.h,
                r,
                COLORS[i % COLORS.len()],
            );
        }
    }

    fn launch(&self, rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>> {
        main(rng).boxed_local()
    }
}
