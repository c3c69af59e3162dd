use anyhow::Error;
use macroquad::{
    color::{self, Color},
    input::{is_mouse_button_pressed, mouse_position, MouseButton},
    logging::info,
    math::{Rect, Vec2},
    miniquad::window::{screen_size, set_window_size},
    shapes::{draw_rectangle, draw_rectangle_lines},
    window::{clear_background, next_frame},
};
use minigames::{
    config::Settings,
    games::{self, BACKGROUND},
    layout,
    text::{Text, TextAlign},
    Game,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::env;

const TITLE: &str = "Simple Games Collection";
const SUBTITLE: &str = "10 classic games, press Esc in any game to come back";
const CARD_COLOR: Color = Color::new(0.16, 0.16, 0.22, 1.0);

/// Draws `value` no wider than `max_width`, shrinking it if needed.
fn draw_fitted(value: &str, x: f32, y: f32, size: f32, max_width: f32, color: Color) {
    let mut text = Text::new(value, size);
    let width = text.measure().width;
    if width > max_width {
        text.size *= max_width / width;
    }
    text.draw(x, y, TextAlign::Center, color);
}

fn draw_card(game: &dyn Game, rect: Rect, hover: bool) {
    let margin = 8.0;
    let card = Rect::new(
        rect.x + margin,
        rect.y + margin,
        rect.w - 2.0 * margin,
        rect.h - 2.0 * margin,
    );
    draw_rectangle(card.x, card.y, card.w, card.h, CARD_COLOR);

    let info = game.info();
    let unit = card.h / 10.0;
    game.draw_preview(Rect::new(card.x, card.y + unit, card.w, 4.5 * unit));
    draw_fitted(
        info.title,
        card.center().x,
        card.y + 7.0 * unit,
        1.2 * unit,
        card.w - 16.0,
        color::WHITE,
    );
    draw_fitted(
        info.description,
        card.center().x,
        card.y + 8.2 * unit,
        0.7 * unit,
        card.w - 16.0,
        color::LIGHTGRAY,
    );

    let badge = Text::new(info.difficulty.to_string(), 0.6 * unit);
    let badge_w = badge.measure().width + 12.0;
    let badge_rect = Rect::new(card.x + 8.0, card.bottom() - 1.2 * unit, badge_w, 0.9 * unit);
    draw_rectangle(
        badge_rect.x,
        badge_rect.y,
        badge_rect.w,
        badge_rect.h,
        info.difficulty.color(),
    );
    badge.draw(
        badge_rect.center().x,
        badge_rect.bottom() - 0.25 * unit,
        TextAlign::Center,
        color::WHITE,
    );
    Text::new("Play", 0.7 * unit).draw(
        card.right() - 8.0,
        card.bottom() - 0.45 * unit,
        TextAlign::Right,
        color::VIOLET,
    );

    if hover {
        draw_rectangle_lines(card.x, card.y, card.w, card.h, 4.0, color::GRAY);
    }
}

#[macroquad::main("Mini Games")]
async fn main() -> Result<(), Error> {
    let settings = Settings::load().await;
    let [width, height] = settings.window_size;
    set_window_size(width, height);

    let games = games::all(&settings);
    let mut rng = SmallRng::seed_from_u64(settings.seed());

    if let Some(id) = env::args().nth(1) {
        let game = games::find(&games, &id)?;
        info!("Launching {}", id);
        return game.launch(SmallRng::seed_from_u64(rng.gen())).await;
    }

    loop {
        let viewport = Vec2::from(screen_size());
        let header = (viewport.y / 6.0).min(120.0);
        clear_background(BACKGROUND);

        let title = Text::new(TITLE, header * 0.4);
        title.draw(viewport.x / 2.0, header * 0.5, TextAlign::Center, color::WHITE);
        Text::new(SUBTITLE, header * 0.2).draw(
            viewport.x / 2.0,
            header * 0.85,
            TextAlign::Center,
            color::GRAY,
        );

        let area = Rect::new(0.0, header, viewport.x, viewport.y - header);
        let boxes = layout::grid(area, games.len(), 4.0 / 3.0);
        let mouse = Vec2::from(mouse_position());
        let mut launch = None;
        for (game, rect) in games.iter().zip(boxes.iter().flatten()) {
            let hover = rect.contains(mouse);
            draw_card(game.as_ref(), *rect, hover);
            if hover && is_mouse_button_pressed(MouseButton::Left) {
                launch = Some(game);
            }
        }

        next_frame().await;

        if let Some(game) = launch {
            let id = game.info().id;
            info!("Launching {}", id);
            game.launch(SmallRng::seed_from_u64(rng.gen())).await?;
            info!("Back from {}", id);
        }
    }
}
