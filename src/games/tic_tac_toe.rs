use super::{draw_header, draw_hint, pressed_digit, BACKGROUND, BOARD_FIELD};
use crate::{
    button::{Button, ButtonStyle},
    layout,
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use derive_more::derive::Display;
use futures::{future::LocalBoxFuture, FutureExt};
use itertools::Itertools;
use macroquad::{
    color,
    input::{is_key_down, is_key_pressed, KeyCode},
    logging::debug,
    math::{vec2, Rect},
    shapes::{draw_circle_lines, draw_line, draw_rectangle_lines},
    window::{clear_background, next_frame},
};
use rand::rngs::SmallRng;

pub const INFO: GameInfo = GameInfo {
    id: "tic-tac-toe",
    title: "Tic Tac Toe",
    description: "Classic 3x3 grid game for two players",
    difficulty: Difficulty::Easy,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Debug)]
pub struct TicTacToe {
    board: [Option<Mark>; 9],
    next: Mark,
    winner: Option<Mark>,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self {
            board: [None; 9],
            next: Mark::X,
            winner: None,
        }
    }
}

impl TicTacToe {
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.board.get(index).copied().flatten()
    }

    pub fn next(&self) -> Mark {
        self.next
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none() && self.board.iter().all(Option::is_some)
    }

    pub fn can_play(&self, index: usize) -> bool {
        self.winner.is_none() && index < self.board.len() && self.board[index].is_none()
    }

    /// Places the current mark. Returns `false` if the move is not allowed.
    pub fn play(&mut self, index: usize) -> bool {
        if !self.can_play(index) {
            return false;
        }
        self.board[index] = Some(self.next);
        self.next = self.next.other();
        self.winner = line_winner(&self.board);
        true
    }

    pub fn status(&self) -> String {
        match self.winner {
            Some(mark) => format!("Winner: {mark}!"),
            None if self.is_draw() => "It's a draw!".to_owned(),
            None => format!("Next player: {}", self.next),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn line_winner(board: &[Option<Mark>; 9]) -> Option<Mark> {
    LINES.iter().find_map(|line| {
        line.iter()
            .map(|&i| board[i])
            .all_equal_value()
            .ok()
            .flatten()
    })
}

fn draw_mark(mark: Mark, rect: Rect) {
    let c = rect.center();
    let r = rect.w.min(rect.h) * 0.3;
    match mark {
        Mark::X => {
            draw_line(c.x - r, c.y - r, c.x + r, c.y + r, 8.0, color::SKYBLUE);
            draw_line(c.x - r, c.y + r, c.x + r, c.y - r, 8.0, color::SKYBLUE);
        }
        Mark::O => draw_circle_lines(c.x, c.y, r, 8.0, color::ORANGE),
    }
}

pub async fn main() -> Result<(), Error> {
    let field = Playfield::new(BOARD_FIELD);
    let mut game = TicTacToe::default();

    while !is_key_down(KeyCode::Escape) {
        if let Some(i) = pressed_digit() {
            game.play(i);
        }
        if is_key_pressed(KeyCode::R) {
            game.reset();
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        draw_header(BOARD_FIELD, INFO.title, &game.status());
        let cells = layout::board(
            layout::centered(vec2(400.0, 305.0), vec2(330.0, 330.0)),
            3,
            3,
            10.0,
        );
        for (i, rect) in cells.iter().enumerate() {
            let clicked = Button::new(*rect, "")
                .enabled(game.can_play(i))
                .style(ButtonStyle::filled(color::DARKGRAY))
                .ui(mouse);
            if clicked && game.play(i) {
                if let Some(winner) = game.winner() {
                    debug!("tic-tac-toe: {} wins", winner);
                }
            }
            if let Some(mark) = game.cell(i) {
                draw_mark(mark, *rect);
            }
        }
        if Button::new(Rect::new(235.0, 500.0, 330.0, 50.0), "Reset Game")
            .style(ButtonStyle::filled(color::DARKBLUE))
            .ui(mouse)
        {
            game.reset();
        }
        draw_hint(BOARD_FIELD, "Click a cell or press 1-9, R to reset, Esc to leave");

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
        let cells = layout::board(layout::preview_square(rect), 3, 3, 4.0);
        for (rect, mark) in cells.iter().zip([
            Some(Mark::X),
            None,
            Some(Mark::O),
            None,
            Some(Mark::X),
            None,
            Some(Mark::O),
            None,
            Some(Mark::X),
        ]) {
            draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, color::GRAY);
            if let Some(mark) = mark {
                draw_mark(mark, *rect);
            }
        }
    }

    fn launch(&self, _rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>> {
        main().boxed_local()
    }
}
