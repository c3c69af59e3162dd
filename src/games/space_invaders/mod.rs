mod world;

pub use self::world::{Alien, Controls, Invaders, Phase};

use self::world::{AREA, KIND_COLORS};
use super::{draw_hint, BACKGROUND};
use crate::{
    button::{Button, ButtonStyle},
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
    input::{is_key_down, is_key_pressed, KeyCode},
    math::Rect,
    shapes::draw_rectangle,
    window::{clear_background, next_frame},
};
use rand::rngs::SmallRng;

pub const INFO: GameInfo = GameInfo {
    id: "space-invaders",
    title: "Space Invaders",
    description: "Shoot descending aliens",
    difficulty: Difficulty::Hard,
};

const PLAYER_COLOR: Color = color_u8!(0, 255, 0, 255);
const BULLET_COLOR: Color = color_u8!(255, 255, 0, 255);
const ALIEN_BULLET_COLOR: Color = color_u8!(255, 0, 255, 255);

fn fill(rect: &Rect, color: Color) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
}

pub async fn main(mut rng: SmallRng) -> Result<(), Error> {
    let area = Rect::new(0.0, 0.0, AREA.x, AREA.y);
    let field = Playfield::new(Rect::new(-10.0, -60.0, AREA.x + 20.0, AREA.y + 100.0));
    let mut step = FixedStep::new(TICK_60HZ);
    let mut game = Invaders::default();

    while !is_key_down(KeyCode::Escape) {
        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::P) {
            game.toggle();
            step.reset();
        }
        let controls = Controls {
            left: is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::Right),
            fire: is_key_down(KeyCode::Space),
        };
        let dt = frame_time();
        for _ in 0..step.advance(dt) {
            game.tick(controls, &mut rng);
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        fill(&area, color::BLACK);
        fill(&game.player(), PLAYER_COLOR);
        for bullet in game.bullets() {
            fill(bullet, BULLET_COLOR);
        }
        for alien in game.aliens() {
            fill(alien, alien.color());
        }
        for bullet in game.alien_bullets() {
            fill(bullet, ALIEN_BULLET_COLOR);
        }

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
            Phase::Over => "Play Again",
            Phase::Ready | Phase::Paused => "Start",
        };
        if Button::new(Rect::new(area.right() - 140.0, area.y - 52.0, 140.0, 44.0), label)
            .style(ButtonStyle::filled(color::DARKGRAY))
            .ui(mouse)
        {
            game.toggle();
            step.reset();
        }

        if game.phase() == Phase::Over {
            let center = area.center();
            fill(&area, Color::new(0.0, 0.0, 0.0, 0.5));
            draw_text_centered("Game Over!", center.x, center.y, 56.0, color::RED);
            draw_text_centered(
                &format!("Final Score: {}", game.score()),
                center.x,
                center.y + 50.0,
                28.0,
                color::WHITE,
            );
        }
        draw_hint(
            field.bounds(),
            "Arrows to move, Space to shoot, Enter or P to start or pause, Esc to leave",
        );

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
        let formation = layout::board(
            Rect::new(square.x, square.y, square.w, square.h * 0.5),
            5,
            3,
            square.w * 0.06,
        );
        for (i, cell) in formation.iter().enumerate() {
            fill(cell, KIND_COLORS[i / 5]);
        }
        let (w, h) = (square.w * 0.2, square.h * 0.12);
        fill(
            &Rect::new(square.center().x - w / 2.0, square.bottom() - h, w, h),
            PLAYER_COLOR,
        );
    }

    fn launch(&self, rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>> {
        main(rng).boxed_local()
    }
}
