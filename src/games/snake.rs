use super::{draw_hint, BACKGROUND};
use crate::{
    button::{Button, ButtonStyle},
    layout,
    text::{draw_text_aligned, draw_text_centered, TextAlign},
    timer::{frame_time, FixedStep},
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use futures::{future::LocalBoxFuture, FutureExt};
use glam::IVec2;
use macroquad::{
    color::{self, Color},
    color_u8,
    input::{is_key_down, is_key_pressed, KeyCode},
    logging::debug,
    math::Rect,
    shapes::{draw_line, draw_rectangle},
    window::{clear_background, next_frame},
};
use rand::{rngs::SmallRng, Rng};
use std::{collections::VecDeque, time::Duration};

pub const INFO: GameInfo = GameInfo {
    id: "snake",
    title: "Snake Game",
    description: "Control snake to eat food and grow",
    difficulty: Difficulty::Medium,
};

/// Cells per side.
pub const GRID: i32 = 20;
/// Pixels per cell.
pub const CELL: f32 = 20.0;
pub const START: IVec2 = IVec2::new(10, 10);
pub const FOOD_POINTS: u32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    Paused,
    Over,
}

#[derive(Clone, Debug)]
pub struct Snake {
    /// Head first.
    body: VecDeque<IVec2>,
    food: IVec2,
    direction: IVec2,
    next_direction: IVec2,
    score: u32,
    high_score: u32,
    phase: Phase,
}

impl Snake {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut snake = Self {
            body: VecDeque::from([START]),
            food: START,
            direction: IVec2::ZERO,
            next_direction: IVec2::ZERO,
            score: 0,
            high_score: 0,
            phase: Phase::Ready,
        };
        snake.place_food(rng);
        snake
    }

    pub fn body(&self) -> &VecDeque<IVec2> {
        &self.body
    }

    pub fn head(&self) -> IVec2 {
        self.body.front().copied().unwrap_or(START)
    }

    pub fn food(&self) -> IVec2 {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn place_food<R: Rng>(&mut self, rng: &mut R) {
        if self.body.len() >= (GRID * GRID) as usize {
            return;
        }
        self.food = loop {
            let cell = IVec2::new(rng.gen_range(0..GRID), rng.gen_range(0..GRID));
            if !self.body.contains(&cell) {
                break cell;
            }
        };
    }

    /// Back to a single segment, keeping the session high score.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        *self = Self {
            high_score: self.high_score,
            ..Self::new(rng)
        };
    }

    pub fn start<R: Rng>(&mut self, rng: &mut R) {
        if self.phase == Phase::Over {
            self.reset(rng);
        }
        self.phase = Phase::Playing;
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    /// Queues a turn. Reversing onto the body or continuing straight is ignored.
    pub fn steer(&mut self, direction: IVec2) {
        if self.phase != Phase::Playing {
            return;
        }
        let perpendicular = if direction.x == 0 {
            self.direction.y == 0
        } else {
            self.direction.x == 0
        };
        if perpendicular {
            self.next_direction = direction;
        }
    }

    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        if self.phase != Phase::Playing {
            return;
        }
        self.direction = self.next_direction;
        if self.direction == IVec2::ZERO {
            return;
        }

        let head = self.head() + self.direction;
        let inside = (0..GRID).contains(&head.x) && (0..GRID).contains(&head.y);
        if !inside || self.body.contains(&head) {
            debug!("snake: game over with {} points", self.score);
            self.phase = Phase::Over;
            return;
        }

        self.body.push_front(head);
        if head == self.food {
            self.score += FOOD_POINTS;
            self.high_score = self.high_score.max(self.score);
            self.place_food(rng);
        } else {
            self.body.pop_back();
        }
    }

    pub fn is_new_high_score(&self) -> bool {
        self.phase == Phase::Over && self.score > 0 && self.score == self.high_score
    }
}

fn draw_cell(cell: IVec2, color: Color) {
    draw_rectangle(
        cell.x as f32 * CELL,
        cell.y as f32 * CELL,
        CELL - 2.0,
        CELL - 2.0,
        color,
    );
}

pub async fn main(mut rng: SmallRng, tick: Duration) -> Result<(), Error> {
    let size = GRID as f32 * CELL;
    let field = Playfield::new(Rect::new(-20.0, -70.0, size + 40.0, size + 140.0));
    let mut step = FixedStep::new(tick);
    let mut game = Snake::new(&mut rng);

    while !is_key_down(KeyCode::Escape) {
        for (key, dir) in [
            (KeyCode::Up, IVec2::NEG_Y),
            (KeyCode::Down, IVec2::Y),
            (KeyCode::Left, IVec2::NEG_X),
            (KeyCode::Right, IVec2::X),
        ] {
            if is_key_pressed(key) {
                game.steer(dir);
            }
        }
        if is_key_pressed(KeyCode::Space) {
            if game.phase() == Phase::Playing {
                game.pause();
            } else {
                game.start(&mut rng);
                step.reset();
            }
        }

        let dt = frame_time();
        for _ in 0..step.advance(dt) {
            game.tick(&mut rng);
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        draw_rectangle(0.0, 0.0, size, size, color::BLACK);
        for (i, &cell) in game.body().iter().enumerate() {
            let color = if i == 0 {
                color_u8!(0, 170, 0, 255)
            } else {
                color_u8!(0, 255, 0, 255)
            };
            draw_cell(cell, color);
        }
        draw_cell(game.food(), color::RED);
        for i in 0..=GRID {
            let p = i as f32 * CELL;
            draw_line(p, 0.0, p, size, 1.0, color_u8!(51, 51, 51, 255));
            draw_line(0.0, p, size, p, 1.0, color_u8!(51, 51, 51, 255));
        }

        draw_text_aligned(
            &format!("Score: {}", game.score()),
            0.0,
            -40.0,
            TextAlign::Left,
            26.0,
            color::WHITE,
        );
        draw_text_aligned(
            &format!("High Score: {}", game.high_score()),
            0.0,
            -14.0,
            TextAlign::Left,
            20.0,
            color::LIGHTGRAY,
        );
        let label = match game.phase() {
            Phase::Playing => "Pause",
            Phase::Over => "Play Again",
            Phase::Ready | Phase::Paused => "Start",
        };
        if Button::new(Rect::new(size - 140.0, -60.0, 140.0, 44.0), label)
            .style(ButtonStyle::filled(color::DARKGREEN))
            .ui(mouse)
        {
            if game.phase() == Phase::Playing {
                game.pause();
            } else {
                game.start(&mut rng);
                step.reset();
            }
        }

        if game.phase() == Phase::Over {
            draw_text_centered("Game Over!", size / 2.0, size + 20.0, 32.0, color::RED);
            let line = if game.is_new_high_score() {
                format!("Final Score: {}  New High Score!", game.score())
            } else {
                format!("Final Score: {}", game.score())
            };
            draw_text_centered(&line, size / 2.0, size + 50.0, 22.0, color::WHITE);
        }
        draw_hint(field.bounds(), "Arrow keys to steer, Space to start or pause, Esc to leave");

        field.end();
        next_frame().await
    }

    Ok(())
}

pub struct Game {
    pub tick: Duration,
}

impl crate::Game for Game {
    fn info(&self) -> &'static GameInfo {
        &INFO
    }

    fn draw_preview(&self, rect: Rect) {
        let square = layout::preview_square(rect);
        let cells = layout::board(square, 5, 5, 1.0);
        for (i, rect) in cells.iter().enumerate() {
            let color = match i {
                6 => color::RED,
                16 | 17 | 18 | 13 => color_u8!(0, 255, 0, 255),
                8 => color_u8!(0, 170, 0, 255),
                _ => continue,
            };
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
        }
    }

    fn launch(&self, rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>> {
        main(rng, self.tick).boxed_local()
    }
}
