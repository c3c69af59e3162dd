use super::{draw_header, draw_hint, pressed_digit, BACKGROUND, BOARD_FIELD};
use crate::{
    button::{Button, ButtonStyle},
    layout,
    text::draw_text_centered,
    timer::frame_time,
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use derive_more::derive::Display;
use futures::{future::LocalBoxFuture, FutureExt};
use macroquad::{
    color::{self, Color},
    color_u8,
    input::{is_key_down, is_key_pressed, KeyCode},
    logging::debug,
    math::{vec2, Rect},
    shapes::draw_rectangle,
    window::{clear_background, next_frame},
};
use rand::{rngs::SmallRng, Rng};
use std::time::Duration;

pub const INFO: GameInfo = GameInfo {
    id: "simon-says",
    title: "Simon Says",
    description: "Repeat the color sequence",
    difficulty: Difficulty::Medium,
};

/// Dark pause before each pad of the sequence lights up.
pub const GAP: Duration = Duration::from_millis(600);
pub const LIT: Duration = Duration::from_millis(400);
/// Pause between a completed round and the next sequence.
pub const ROUND_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Pad {
    #[display("RED")]
    Red,
    #[display("BLUE")]
    Blue,
    #[display("GREEN")]
    Green,
    #[display("YELLOW")]
    Yellow,
}

impl Pad {
    pub const ALL: [Pad; 4] = [Pad::Red, Pad::Blue, Pad::Green, Pad::Yellow];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    fn color(self, lit: bool) -> Color {
        match (self, lit) {
            (Pad::Red, false) => color_u8!(239, 68, 68, 255),
            (Pad::Red, true) => color_u8!(252, 165, 165, 255),
            (Pad::Blue, false) => color_u8!(59, 130, 246, 255),
            (Pad::Blue, true) => color_u8!(147, 197, 253, 255),
            (Pad::Green, false) => color_u8!(34, 197, 94, 255),
            (Pad::Green, true) => color_u8!(134, 239, 172, 255),
            (Pad::Yellow, false) => color_u8!(234, 179, 8, 255),
            (Pad::Yellow, true) => color_u8!(253, 224, 71, 255),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Playing back the sequence; `elapsed` since playback began.
    Showing { elapsed: Duration },
    Input,
    /// Round complete, next pad is added when `left` runs out.
    Next { left: Duration },
    Over,
}

#[derive(Clone, Default, Debug)]
pub struct SimonSays {
    sequence: Vec<Pad>,
    input: Vec<Pad>,
    score: u32,
    phase: Phase,
}

impl SimonSays {
    pub fn sequence(&self) -> &[Pad] {
        &self.sequence
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.input.len(), self.sequence.len())
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::Over)
    }

    pub fn start<R: Rng>(&mut self, rng: &mut R) {
        *self = Self::default();
        self.extend(rng);
    }

    fn extend<R: Rng>(&mut self, rng: &mut R) {
        self.sequence.push(Pad::random(rng));
        self.input.clear();
        self.phase = Phase::Showing {
            elapsed: Duration::ZERO,
        };
    }

    /// Pad lit during playback, if any.
    pub fn active(&self) -> Option<Pad> {
        match self.phase {
            Phase::Showing { elapsed } => {
                let slot = GAP + LIT;
                let index = (elapsed.as_nanos() / slot.as_nanos()) as usize;
                let within = elapsed - slot * index as u32;
                if within >= GAP {
                    self.sequence.get(index).copied()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Playback time at which the lit pad next changes.
    fn next_edge(elapsed: Duration) -> Duration {
        let slot = GAP + LIT;
        let index = (elapsed.as_nanos() / slot.as_nanos()) as u32;
        if elapsed - slot * index < GAP {
            slot * index + GAP
        } else {
            slot * (index + 1)
        }
    }

    /// Advances playback or the round delay.
    ///
    /// Playback stops at every lit/unlit edge, so a long frame cannot skip a pad.
    pub fn update<R: Rng>(&mut self, dt: Duration, rng: &mut R) {
        match self.phase {
            Phase::Showing { elapsed } => {
                let elapsed = (elapsed + dt).min(Self::next_edge(elapsed));
                self.phase = if elapsed >= (GAP + LIT) * self.sequence.len() as u32 {
                    Phase::Input
                } else {
                    Phase::Showing { elapsed }
                };
            }
            Phase::Next { left } => {
                let left = left.saturating_sub(dt);
                if left.is_zero() {
                    self.extend(rng);
                } else {
                    self.phase = Phase::Next { left };
                }
            }
            Phase::Idle | Phase::Input | Phase::Over => (),
        }
    }

    /// Player presses a pad. Ignored unless it is the player's turn.
    pub fn press(&mut self, pad: Pad) -> bool {
        if self.phase != Phase::Input {
            return false;
        }
        let index = self.input.len();
        self.input.push(pad);
        if self.sequence[index] != pad {
            debug!("simon-says: game over at round {}", self.score + 1);
            self.phase = Phase::Over;
        } else if self.input.len() == self.sequence.len() {
            self.score += 1;
            self.phase = Phase::Next { left: ROUND_DELAY };
        }
        true
    }

    pub fn status(&self) -> String {
        match self.phase {
            Phase::Over => format!("Game Over! Score: {}", self.score),
            Phase::Showing { .. } => "Watch the sequence...".to_owned(),
            Phase::Input | Phase::Next { .. } => format!("Round {} - Your turn!", self.score + 1),
            Phase::Idle => INFO.title.to_owned(),
        }
    }
}

pub async fn main(mut rng: SmallRng) -> Result<(), Error> {
    let field = Playfield::new(BOARD_FIELD);
    let mut game = SimonSays::default();

    while !is_key_down(KeyCode::Escape) {
        game.update(frame_time(), &mut rng);
        if let Some(i) = pressed_digit() {
            if let Some(&pad) = Pad::ALL.get(i) {
                game.press(pad);
            }
        }
        if !game.is_playing() && is_key_pressed(KeyCode::Space) {
            game.start(&mut rng);
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        draw_header(BOARD_FIELD, INFO.title, &game.status());
        let pads = layout::board(
            layout::centered(vec2(400.0, 290.0), vec2(420.0, 300.0)),
            2,
            2,
            16.0,
        );
        let active = game.active();
        for (pad, rect) in Pad::ALL.into_iter().zip(pads) {
            let style = ButtonStyle {
                text_size: 32.0,
                ..ButtonStyle::filled(pad.color(active == Some(pad)))
            };
            if Button::new(rect, &pad.to_string())
                .enabled(game.phase() == Phase::Input || active == Some(pad))
                .style(style)
                .ui(mouse)
            {
                game.press(pad);
            }
        }

        if game.is_playing() {
            let (done, total) = game.progress();
            draw_text_centered(
                &format!("Progress: {done} / {total}"),
                400.0,
                485.0,
                24.0,
                color::LIGHTGRAY,
            );
        } else {
            let label = if game.phase() == Phase::Over {
                "Play Again"
            } else {
                "Start Game"
            };
            if Button::new(Rect::new(235.0, 470.0, 330.0, 50.0), label)
                .style(ButtonStyle::filled(color::DARKBLUE))
                .ui(mouse)
            {
                game.start(&mut rng);
            }
        }
        draw_hint(BOARD_FIELD, "Click pads or press 1-4, Space to start, Esc to leave");

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
        let cells = layout::board(layout::preview_square(rect), 2, 2, 4.0);
        for (pad, rect) in Pad::ALL.into_iter().zip(cells) {
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, pad.color(pad == Pad::Green));
        }
    }

    fn launch(&self, rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>> {
        main(rng).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn watch(game: &mut SimonSays, rng: &mut SmallRng) {
        for _ in 0..2 * game.sequence().len() {
            game.update(GAP + LIT, rng);
        }
        assert_eq!(game.phase(), Phase::Input);
    }

    fn repeat(game: &mut SimonSays) {
        for pad in game.sequence().to_vec() {
            assert!(game.press(pad));
        }
    }

    #[test]
    fn start_shows_one_pad() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut game = SimonSays::default();
        assert_eq!(game.status(), "Simon Says");
        game.start(&mut rng);
        assert_eq!(game.sequence().len(), 1);
        assert_eq!(game.status(), "Watch the sequence...");
    }

    #[test]
    fn playback_lights_each_pad_after_gap() {
        let mut rng = SmallRng::seed_from_u64(12);
        let mut game = SimonSays::default();
        game.start(&mut rng);
        game.sequence = vec![Pad::Red, Pad::Yellow];

        assert_eq!(game.active(), None);
        game.update(GAP, &mut rng);
        assert_eq!(game.active(), Some(Pad::Red));
        game.update(LIT, &mut rng);
        assert_eq!(game.active(), None);
        game.update(GAP + Duration::from_millis(1), &mut rng);
        assert_eq!(game.active(), Some(Pad::Yellow));
        game.update(LIT, &mut rng);
        assert_eq!(game.phase(), Phase::Input);
        assert_eq!(game.active(), None);
    }

    #[test]
    fn long_frames_still_light_every_pad() {
        let mut rng = SmallRng::seed_from_u64(16);
        let mut game = SimonSays::default();
        game.start(&mut rng);
        game.sequence = vec![Pad::Red, Pad::Blue, Pad::Green];

        game.update(Duration::from_millis(700), &mut rng);
        assert_eq!(game.active(), Some(Pad::Red));

        let mut lit = Vec::new();
        for _ in 0..10 {
            game.update(Duration::from_millis(2500), &mut rng);
            if let Some(pad) = game.active() {
                lit.push(pad);
            }
        }
        assert_eq!(lit, [Pad::Blue, Pad::Green]);
        assert_eq!(game.phase(), Phase::Input);
    }

    #[test]
    fn input_is_ignored_while_showing() {
        let mut rng = SmallRng::seed_from_u64(13);
        let mut game = SimonSays::default();
        assert!(!game.press(Pad::Red));
        game.start(&mut rng);
        let pad = game.sequence()[0];
        assert!(!game.press(pad));
        assert_eq!(game.progress(), (0, 1));
    }

    #[test]
    fn completed_round_grows_sequence_after_delay() {
        let mut rng = SmallRng::seed_from_u64(14);
        let mut game = SimonSays::default();
        game.start(&mut rng);
        watch(&mut game, &mut rng);
        repeat(&mut game);
        assert_eq!(game.score(), 1);
        assert_eq!(game.status(), "Round 2 - Your turn!");

        game.update(Duration::from_millis(999), &mut rng);
        assert_eq!(game.sequence().len(), 1);
        game.update(Duration::from_millis(1), &mut rng);
        assert_eq!(game.sequence().len(), 2);
        assert_eq!(game.progress(), (0, 2));

        watch(&mut game, &mut rng);
        repeat(&mut game);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn wrong_pad_ends_game() {
        let mut rng = SmallRng::seed_from_u64(15);
        let mut game = SimonSays::default();
        game.start(&mut rng);
        watch(&mut game, &mut rng);
        let wrong = Pad::ALL
            .into_iter()
            .find(|&pad| pad != game.sequence()[0])
            .unwrap();
        assert!(game.press(wrong));
        assert_eq!(game.phase(), Phase::Over);
        assert_eq!(game.status(), "Game Over! Score: 0");
        assert!(!game.press(game.sequence()[0]));

        game.start(&mut rng);
        assert_eq!(game.score(), 0);
        assert_eq!(game.sequence().len(), 1);
    }
}
