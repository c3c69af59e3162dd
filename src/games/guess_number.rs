use super::{draw_header, draw_hint, BACKGROUND, BOARD_FIELD};
use crate::{
    button::{Button, ButtonStyle},
    layout,
    text::{draw_text_aligned, draw_text_centered, TextAlign},
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use derive_more::derive::{Display, Error as DeriveError};
use futures::{future::LocalBoxFuture, FutureExt};
use macroquad::{
    color::{self, Color},
    input::{clear_input_queue, get_char_pressed, is_key_down, is_key_pressed, KeyCode},
    logging::debug,
    math::Rect,
    shapes::{draw_rectangle, draw_rectangle_lines},
    window::{clear_background, next_frame},
};
use rand::{rngs::SmallRng, Rng};
use std::ops::RangeInclusive;

pub const INFO: GameInfo = GameInfo {
    id: "guess-number",
    title: "Guess the Number",
    description: "Guess the random number between 1-100",
    difficulty: Difficulty::Easy,
};

pub const RANGE: RangeInclusive<i64> = 1..=100;
const MAX_INPUT_LEN: usize = 4;
const INTRO: &str = "I'm thinking of a number between 1 and 100. Can you guess it?";

#[derive(Clone, Debug, PartialEq, Eq, Display, DeriveError)]
pub enum GuessError {
    #[display("Please enter a valid number between 1 and 100!")]
    NotANumber,
    #[display("Please enter a valid number between 1 and 100!")]
    OutOfRange { value: i64 },
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Hint {
    #[display("Correct!")]
    Correct,
    #[display("Too low")]
    TooLow,
    #[display("Too high")]
    TooHigh,
}

impl Hint {
    fn color(self) -> Color {
        match self {
            Hint::Correct => color::GREEN,
            Hint::TooLow => color::SKYBLUE,
            Hint::TooHigh => color::RED,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Entry {
    pub guess: i64,
    pub hint: Hint,
}

#[derive(Clone, Debug)]
pub struct GuessNumber {
    target: i64,
    attempts: u32,
    message: String,
    history: Vec<Entry>,
}

impl GuessNumber {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::with_target(rng.gen_range(RANGE))
    }

    pub fn with_target(target: i64) -> Self {
        Self {
            target,
            attempts: 0,
            message: INTRO.to_owned(),
            history: Vec::new(),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn history(&self) -> &[Entry] {
        &self.history
    }

    pub fn is_won(&self) -> bool {
        self.history.last().is_some_and(|e| e.hint == Hint::Correct)
    }

    pub fn parse(input: &str) -> Result<i64, GuessError> {
        let value = input
            .trim()
            .parse::<i64>()
            .map_err(|_| GuessError::NotANumber)?;
        if RANGE.contains(&value) {
            Ok(value)
        } else {
            Err(GuessError::OutOfRange { value })
        }
    }

    /// Submits a guess. Rejected input leaves the attempt count unchanged.
    pub fn guess(&mut self, input: &str) -> Result<Option<Hint>, GuessError> {
        if self.is_won() {
            return Ok(None);
        }
        let guess = match Self::parse(input) {
            Ok(guess) => guess,
            Err(err) => {
                self.message = err.to_string();
                return Err(err);
            }
        };
        self.attempts += 1;
        let hint = match guess.cmp(&self.target) {
            std::cmp::Ordering::Equal => {
                self.message = format!(
                    "Congratulations! You guessed it in {} attempts!",
                    self.attempts
                );
                Hint::Correct
            }
            std::cmp::Ordering::Less => {
                self.message = "Too low! Try a higher number.".to_owned();
                Hint::TooLow
            }
            std::cmp::Ordering::Greater => {
                self.message = "Too high! Try a lower number.".to_owned();
                Hint::TooHigh
            }
        };
        self.history.push(Entry { guess, hint });
        Ok(Some(hint))
    }
}

pub async fn main(mut rng: SmallRng) -> Result<(), Error> {
    let field = Playfield::new(BOARD_FIELD);
    let mut game = GuessNumber::new(&mut rng);
    let mut input = String::new();
    clear_input_queue();

    while !is_key_down(KeyCode::Escape) {
        let mut submit = false;
        while let Some(c) = get_char_pressed() {
            if (c.is_ascii_digit() || c == '-') && input.len() < MAX_INPUT_LEN {
                input.push(c);
            }
        }
        if is_key_pressed(KeyCode::Backspace) {
            input.pop();
        }
        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
            submit = true;
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        draw_header(
            BOARD_FIELD,
            INFO.title,
            &format!("Attempts: {}", game.attempts()),
        );
        draw_text_centered(game.message(), 400.0, 130.0, 22.0, color::WHITE);

        if !game.is_won() {
            let input_box = Rect::new(250.0, 160.0, 180.0, 44.0);
            draw_rectangle(input_box.x, input_box.y, input_box.w, input_box.h, color::BLACK);
            draw_rectangle_lines(input_box.x, input_box.y, input_box.w, input_box.h, 2.0, color::GRAY);
            let shown = if input.is_empty() {
                "Enter your guess"
            } else {
                input.as_str()
            };
            draw_text_aligned(
                shown,
                input_box.x + 10.0,
                input_box.y + 30.0,
                TextAlign::Left,
                24.0,
                if input.is_empty() {
                    color::DARKGRAY
                } else {
                    color::WHITE
                },
            );
            if Button::new(Rect::new(440.0, 160.0, 110.0, 44.0), "Guess")
                .style(ButtonStyle::filled(color::DARKBLUE))
                .ui(mouse)
            {
                submit = true;
            }
        }
        if submit {
            if let Ok(Some(Hint::Correct)) = game.guess(&input) {
                debug!("guess-number: solved in {} attempts", game.attempts());
            }
            input.clear();
        }

        if !game.history().is_empty() {
            draw_text_aligned("Guess History:", 250.0, 240.0, TextAlign::Left, 22.0, color::WHITE);
            let rows = layout::board(Rect::new(250.0, 250.0, 300.0, 230.0), 1, 8, 4.0);
            let skip = game.history().len().saturating_sub(rows.len());
            for ((i, entry), row) in game.history().iter().enumerate().skip(skip).zip(rows) {
                draw_rectangle(row.x, row.y, row.w, row.h, Color::new(1.0, 1.0, 1.0, 0.08));
                draw_text_aligned(
                    &format!("Guess #{}: {}", i + 1, entry.guess),
                    row.x + 8.0,
                    row.bottom() - 8.0,
                    TextAlign::Left,
                    20.0,
                    color::LIGHTGRAY,
                );
                draw_text_aligned(
                    &entry.hint.to_string(),
                    row.right() - 8.0,
                    row.bottom() - 8.0,
                    TextAlign::Right,
                    20.0,
                    entry.hint.color(),
                );
            }
        }

        if Button::new(Rect::new(235.0, 500.0, 330.0, 50.0), "New Game")
            .style(ButtonStyle::filled(color::DARKBLUE))
            .ui(mouse)
        {
            game = GuessNumber::new(&mut rng);
            input.clear();
        }
        draw_hint(BOARD_FIELD, "Type a number and press Enter, Esc to leave");

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
        draw_text_centered("?", square.center().x, square.center().y, square.h, color::GOLD);
    }

    fn launch(&self, rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>> {
        main(rng).boxed_local()
    }
}
