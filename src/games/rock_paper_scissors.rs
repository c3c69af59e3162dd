use super::{draw_header, draw_hint, pressed_digit, BACKGROUND, BOARD_FIELD};
use crate::{
    button::{Button, ButtonStyle},
    layout,
    text::{draw_text_aligned, draw_text_centered, TextAlign},
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use derive_more::derive::Display;
use futures::{future::LocalBoxFuture, FutureExt};
use macroquad::{
    color::{self, Color},
    input::{is_key_down, is_key_pressed, KeyCode},
    math::{vec2, Rect, Vec2},
    shapes::{draw_circle, draw_rectangle, draw_triangle},
    window::{clear_background, next_frame},
};
use rand::{rngs::SmallRng, Rng};

pub const INFO: GameInfo = GameInfo {
    id: "rock-paper-scissors",
    title: "Rock Paper Scissors",
    description: "Classic hand game against computer",
    difficulty: Difficulty::Easy,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    pub fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Paper, Choice::Rock)
                | (Choice::Scissors, Choice::Paper)
        )
    }

    pub fn against(self, computer: Choice) -> Outcome {
        if self == computer {
            Outcome::Tie
        } else if self.beats(computer) {
            Outcome::Player
        } else {
            Outcome::Computer
        }
    }

    fn draw(self, center: Vec2, size: f32) {
        let r = size / 2.0;
        match self {
            Choice::Rock => draw_circle(center.x, center.y, r * 0.8, color::GRAY),
            Choice::Paper => draw_rectangle(
                center.x - r * 0.6,
                center.y - r * 0.8,
                r * 1.2,
                r * 1.6,
                color::WHITE,
            ),
            Choice::Scissors => {
                draw_triangle(
                    center + vec2(-r * 0.8, -r * 0.8),
                    center + vec2(-r * 0.3, -r * 0.8),
                    center + vec2(r * 0.2, r * 0.8),
                    color::SKYBLUE,
                );
                draw_triangle(
                    center + vec2(r * 0.8, -r * 0.8),
                    center + vec2(r * 0.3, -r * 0.8),
                    center + vec2(-r * 0.2, r * 0.8),
                    color::SKYBLUE,
                );
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Outcome {
    #[display("You win!")]
    Player,
    #[display("Computer wins!")]
    Computer,
    #[display("It's a tie!")]
    Tie,
}

impl Outcome {
    fn color(self) -> Color {
        match self {
            Outcome::Player => color::GREEN,
            Outcome::Computer => color::RED,
            Outcome::Tie => color::YELLOW,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Tally {
    pub player: u32,
    pub computer: u32,
    pub ties: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Round {
    pub player: Choice,
    pub computer: Choice,
    pub outcome: Outcome,
}

#[derive(Clone, Default, Debug)]
pub struct RockPaperScissors {
    last: Option<Round>,
    tally: Tally,
}

impl RockPaperScissors {
    pub fn last(&self) -> Option<Round> {
        self.last
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn play<R: Rng>(&mut self, player: Choice, rng: &mut R) -> Round {
        let computer = Choice::ALL[rng.gen_range(0..Choice::ALL.len())];
        self.record(player, computer)
    }

    pub fn record(&mut self, player: Choice, computer: Choice) -> Round {
        let outcome = player.against(computer);
        match outcome {
            Outcome::Player => self.tally.player += 1,
            Outcome::Computer => self.tally.computer += 1,
            Outcome::Tie => self.tally.ties += 1,
        }
        let round = Round {
            player,
            computer,
            outcome,
        };
        self.last = Some(round);
        round
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub async fn main(mut rng: SmallRng) -> Result<(), Error> {
    let field = Playfield::new(BOARD_FIELD);
    let mut game = RockPaperScissors::default();

    while !is_key_down(KeyCode::Escape) {
        if let Some(&choice) = pressed_digit().and_then(|i| Choice::ALL.get(i)) {
            game.play(choice, &mut rng);
        }
        if is_key_pressed(KeyCode::R) {
            game.reset();
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        let tally = game.tally();
        draw_header(
            BOARD_FIELD,
            INFO.title,
            &format!(
                "You: {}    Ties: {}    Computer: {}",
                tally.player, tally.ties, tally.computer
            ),
        );
        draw_text_centered("Choose your weapon:", 400.0, 140.0, 26.0, color::WHITE);
        let buttons = layout::board(
            layout::centered(vec2(400.0, 220.0), vec2(380.0, 100.0)),
            3,
            1,
            40.0,
        );
        for (choice, rect) in Choice::ALL.into_iter().zip(buttons) {
            if Button::new(rect, "").style(ButtonStyle::default()).ui(mouse) {
                game.play(choice, &mut rng);
            }
            choice.draw(rect.center(), rect.h * 0.7);
        }

        if let Some(round) = game.last() {
            round.player.draw(vec2(270.0, 350.0), 80.0);
            round.computer.draw(vec2(530.0, 350.0), 80.0);
            draw_text_aligned("You", 270.0, 420.0, TextAlign::Center, 22.0, color::WHITE);
            draw_text_aligned("Computer", 530.0, 420.0, TextAlign::Center, 22.0, color::WHITE);
            draw_text_centered("VS", 400.0, 350.0, 36.0, color::WHITE);
            draw_text_centered(
                &round.outcome.to_string(),
                400.0,
                460.0,
                32.0,
                round.outcome.color(),
            );
        }

        if Button::new(Rect::new(235.0, 500.0, 330.0, 50.0), "Reset Score")
            .style(ButtonStyle::filled(color::DARKBLUE))
            .ui(mouse)
        {
            game.reset();
        }
        draw_hint(BOARD_FIELD, "Click or press 1 rock, 2 paper, 3 scissors, R to reset");

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
        let size = square.w / 3.0;
        for (i, choice) in Choice::ALL.into_iter().enumerate() {
            choice.draw(
                vec2(square.x + size * (i as f32 + 0.5), square.center().y),
                size,
            );
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

    #[test]
    fn outcome_table() {
        use Choice::*;
        for (player, computer, outcome) in [
            (Rock, Scissors, Outcome::Player),
            (Paper, Rock, Outcome::Player),
            (Scissors, Paper, Outcome::Player),
            (Scissors, Rock, Outcome::Computer),
            (Rock, Paper, Outcome::Computer),
            (Paper, Scissors, Outcome::Computer),
            (Rock, Rock, Outcome::Tie),
            (Paper, Paper, Outcome::Tie),
            (Scissors, Scissors, Outcome::Tie),
        ] {
            assert_eq!(player.against(computer), outcome, "{player} vs {computer}");
        }
    }

    #[test]
    fn result_text() {
        assert_eq!(Outcome::Player.to_string(), "You win!");
        assert_eq!(Outcome::Computer.to_string(), "Computer wins!");
        assert_eq!(Outcome::Tie.to_string(), "It's a tie!");
    }

    #[test]
    fn tally_counts_every_round() {
        let mut game = RockPaperScissors::default();
        game.record(Choice::Rock, Choice::Scissors);
        game.record(Choice::Rock, Choice::Paper);
        game.record(Choice::Rock, Choice::Rock);
        game.record(Choice::Paper, Choice::Rock);
        assert_eq!(
            game.tally(),
            Tally {
                player: 2,
                computer: 1,
                ties: 1
            }
        );
        assert_eq!(game.last().unwrap().outcome, Outcome::Player);
    }

    #[test]
    fn computer_uses_every_choice() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut game = RockPaperScissors::default();
        let mut seen = Vec::new();
        for _ in 0..100 {
            let round = game.play(Choice::Rock, &mut rng);
            if !seen.contains(&round.computer) {
                seen.push(round.computer);
            }
        }
        assert_eq!(seen.len(), 3);
        let tally = game.tally();
        assert_eq!(tally.player + tally.computer + tally.ties, 100);
    }

    #[test]
    fn reset_clears_score_and_choices() {
        let mut game = RockPaperScissors::default();
        game.record(Choice::Rock, Choice::Scissors);
        game.reset();
        assert_eq!(game.tally(), Tally::default());
        assert_eq!(game.last(), None);
    }
}
