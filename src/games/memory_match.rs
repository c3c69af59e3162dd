use super::{draw_header, draw_hint, BACKGROUND, BOARD_FIELD};
use crate::{
    button::{Button, ButtonStyle},
    layout,
    text::draw_text_centered,
    timer::{frame_time, Countdown},
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use futures::{future::LocalBoxFuture, FutureExt};
use macroquad::{
    color::{self, Color},
    input::{is_key_down, is_key_pressed, KeyCode},
    logging::debug,
    math::{vec2, Rect},
    shapes::draw_rectangle,
    window::{clear_background, next_frame},
};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng};
use std::time::Duration;

pub const INFO: GameInfo = GameInfo {
    id: "memory-match",
    title: "Memory Match",
    description: "Flip cards to find matching pairs",
    difficulty: Difficulty::Easy,
};

/// Time a mismatched pair stays face-up.
pub const REVEAL_DELAY: Duration = Duration::from_secs(1);

const SYMBOLS: [(char, Color); 8] = [
    ('A', color::RED),
    ('B', color::ORANGE),
    ('C', color::GOLD),
    ('D', color::GREEN),
    ('E', color::SKYBLUE),
    ('F', color::BLUE),
    ('G', color::VIOLET),
    ('H', color::PINK),
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Card {
    /// Index into the symbol table; pairs share it.
    pub symbol: usize,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    pub fn is_face_up(&self) -> bool {
        self.flipped || self.matched
    }
}

#[derive(Clone, Debug)]
pub struct MemoryMatch {
    cards: Vec<Card>,
    pending: Vec<usize>,
    moves: u32,
    reveal: Countdown,
}

impl MemoryMatch {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut symbols: Vec<usize> = (0..SYMBOLS.len()).chain(0..SYMBOLS.len()).collect();
        symbols.shuffle(rng);
        Self::with_symbols(symbols)
    }

    pub fn with_symbols(symbols: Vec<usize>) -> Self {
        Self {
            cards: symbols
                .into_iter()
                .map(|symbol| Card {
                    symbol,
                    flipped: false,
                    matched: false,
                })
                .collect(),
            pending: Vec::new(),
            moves: 0,
            reveal: Countdown::default(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_won(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|card| card.matched)
    }

    pub fn can_flip(&self, index: usize) -> bool {
        self.pending.len() < 2
            && self
                .cards
                .get(index)
                .is_some_and(|card| !card.is_face_up())
    }

    /// Turns a card face-up. Returns `false` if the click is ignored.
    pub fn flip(&mut self, index: usize) -> bool {
        if !self.can_flip(index) {
            return false;
        }
        self.cards[index].flipped = true;
        self.pending.push(index);
        if self.pending.len() == 2 {
            self.moves += 1;
            self.reveal.start(REVEAL_DELAY);
        }
        true
    }

    /// Resolves the face-up pair once the reveal delay has passed.
    pub fn update(&mut self, dt: Duration) {
        if !self.reveal.update(dt) {
            return;
        }
        if let [first, second] = self.pending[..] {
            if self.cards[first].symbol == self.cards[second].symbol {
                self.cards[first].matched = true;
                self.cards[second].matched = true;
            } else {
                for card in self.cards.iter_mut().filter(|card| !card.matched) {
                    card.flipped = false;
                }
            }
        }
        self.pending.clear();
    }

    pub fn status(&self) -> String {
        if self.is_won() {
            format!("Congratulations! You won in {} moves!", self.moves)
        } else {
            format!("Moves: {}", self.moves)
        }
    }
}

fn draw_card(card: &Card, rect: Rect) {
    if card.is_face_up() {
        let (symbol, color) = SYMBOLS[card.symbol];
        let inset = rect.w.min(rect.h) * 0.2;
        draw_rectangle(
            rect.x + inset,
            rect.y + inset,
            rect.w - 2.0 * inset,
            rect.h - 2.0 * inset,
            color,
        );
        draw_text_centered(
            &symbol.to_string(),
            rect.center().x,
            rect.center().y,
            rect.h * 0.5,
            color::BLACK,
        );
    } else {
        draw_text_centered("?", rect.center().x, rect.center().y, rect.h * 0.5, color::GRAY);
    }
}

pub async fn main(mut rng: SmallRng) -> Result<(), Error> {
    let field = Playfield::new(BOARD_FIELD);
    let mut game = MemoryMatch::new(&mut rng);

    while !is_key_down(KeyCode::Escape) {
        let dt = frame_time();
        let was_won = game.is_won();
        game.update(dt);
        if !was_won && game.is_won() {
            debug!("memory-match: won in {} moves", game.moves());
        }
        if is_key_pressed(KeyCode::N) {
            game = MemoryMatch::new(&mut rng);
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        draw_header(BOARD_FIELD, INFO.title, &game.status());
        let cells = layout::board(
            layout::centered(vec2(400.0, 300.0), vec2(420.0, 370.0)),
            4,
            4,
            10.0,
        );
        for (i, rect) in cells.iter().enumerate() {
            let card = game.cards()[i];
            let fill = if card.is_face_up() {
                color::DARKBLUE
            } else {
                color::DARKGRAY
            };
            if Button::new(*rect, "")
                .enabled(game.can_flip(i))
                .style(ButtonStyle::filled(fill))
                .ui(mouse)
            {
                game.flip(i);
            }
            draw_card(&card, *rect);
        }
        if Button::new(Rect::new(235.0, 505.0, 330.0, 50.0), "New Game")
            .style(ButtonStyle::filled(color::DARKBLUE))
            .ui(mouse)
        {
            game = MemoryMatch::new(&mut rng);
        }
        draw_hint(BOARD_FIELD, "Click cards to flip them, N for a new game, Esc to leave");

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
        for (rect, (symbol, matched)) in cells.iter().zip([(0, true), (3, false), (3, true), (5, false)]) {
            let card = Card {
                symbol,
                flipped: false,
                matched,
            };
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, color::DARKGRAY);
            draw_card(&card, *rect);
        }
    }

    fn launch(&self, rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>> {
        main(rng).boxed_local()
    }
}
