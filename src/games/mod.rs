use crate::{
    config::Settings,
    text::{draw_text_aligned, TextAlign},
    Game,
};
use anyhow::{anyhow, Error};
use itertools::Itertools;
use macroquad::{
    color::{self, Color},
    color_u8,
    input::{is_key_pressed, KeyCode},
    math::Rect,
};

pub mod breakout;
pub mod catch_balls;
pub mod guess_number;
pub mod memory_match;
pub mod rock_paper_scissors;
pub mod simon_says;
pub mod sliding_puzzle;
pub mod snake;
pub mod space_invaders;
pub mod tic_tac_toe;

/// Logical area of the non-arcade games.
pub const BOARD_FIELD: Rect = Rect {
    x: 0.0,
    y: 0.0,
    w: 800.0,
    h: 600.0,
};

pub const BACKGROUND: Color = color_u8!(24, 24, 32, 255);

/// Every game in catalog order.
pub fn all(settings: &Settings) -> Vec<Box<dyn Game>> {
    vec![
        Box::new(tic_tac_toe::Game),
        Box::new(memory_match::Game),
        Box::new(catch_balls::Game),
        Box::new(simon_says::Game),
        Box::new(rock_paper_scissors::Game),
        Box::new(guess_number::Game),
        Box::new(sliding_puzzle::Game),
        Box::new(space_invaders::Game),
        Box::new(breakout::Game),
        Box::new(snake::Game {
            tick: settings.snake_tick(),
        }),
    ]
}

pub fn find<'a>(games: &'a [Box<dyn Game>], id: &str) -> Result<&'a dyn Game, Error> {
    games
        .iter()
        .find(|game| game.info().id == id)
        .map(|game| game.as_ref())
        .ok_or_else(|| {
            anyhow!(
                "Game not found: \"{id}\"\nAvailable games: {}",
                games.iter().map(|game| game.info().id).join(", ")
            )
        })
}

/// Title and status line at the top of a playfield.
pub(crate) fn draw_header(bounds: Rect, title: &str, status: &str) {
    let x = bounds.center().x;
    draw_text_aligned(
        title,
        x,
        bounds.y + 44.0,
        TextAlign::Center,
        40.0,
        color::WHITE,
    );
    draw_text_aligned(
        status,
        x,
        bounds.y + 84.0,
        TextAlign::Center,
        28.0,
        color::LIGHTGRAY,
    );
}

pub(crate) fn draw_hint(bounds: Rect, hint: &str) {
    draw_text_aligned(
        hint,
        bounds.center().x,
        bounds.bottom() - 12.0,
        TextAlign::Center,
        18.0,
        color::GRAY,
    );
}

/// Digit keys `1..=9` (top row or keypad) pressed this frame, as zero-based indices.
pub(crate) fn pressed_digit() -> Option<usize> {
    const KEYS: [[KeyCode; 2]; 9] = [
        [KeyCode::Key1, KeyCode::Kp1],
        [KeyCode::Key2, KeyCode::Kp2],
        [KeyCode::Key3, KeyCode::Kp3],
        [KeyCode::Key4, KeyCode::Kp4],
        [KeyCode::Key5, KeyCode::Kp5],
        [KeyCode::Key6, KeyCode::Kp6],
        [KeyCode::Key7, KeyCode::Kp7],
        [KeyCode::Key8, KeyCode::Kp8],
        [KeyCode::Key9, KeyCode::Kp9],
    ];
    KEYS.iter()
        .position(|[k, kp]| is_key_pressed(*k) || is_key_pressed(*kp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_order_and_ids() {
        let games = all(&Settings::default());
        let ids: Vec<_> = games.iter().map(|game| game.info().id).collect();
        assert_eq!(
            ids,
            [
                "tic-tac-toe",
                "memory-match",
                "catch-balls",
                "simon-says",
                "rock-paper-scissors",
                "guess-number",
                "sliding-puzzle",
                "space-invaders",
                "breakout",
                "snake",
            ]
        );
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    }

    #[test]
    fn routes_known_ids() {
        let games = all(&Settings::default());
        let game = find(&games, "breakout").unwrap();
        assert_eq!(game.info().title, "Breakout");
        assert_eq!(game.info().difficulty, crate::Difficulty::Hard);
    }

    #[test]
    fn unknown_id_lists_available_games() {
        let games = all(&Settings::default());
        let err = find(&games, "pong").err().unwrap().to_string();
        assert!(err.contains("\"pong\""));
        assert!(err.contains("snake"));
        assert!(err.contains("tic-tac-toe"));
    }
}
