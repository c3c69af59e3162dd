use super::{draw_header, draw_hint, BACKGROUND, BOARD_FIELD};
use crate::{
    button::{Button, ButtonStyle},
    layout,
    view::Playfield,
    Difficulty, GameInfo,
};
use anyhow::Error;
use futures::{future::LocalBoxFuture, FutureExt};
use macroquad::{
    color,
    input::{is_key_down, is_key_pressed, KeyCode},
    logging::debug,
    math::{vec2, Rect},
    shapes::draw_rectangle,
    window::{clear_background, next_frame},
};
use rand::{rngs::SmallRng, seq::SliceRandom, Rng};

pub const INFO: GameInfo = GameInfo {
    id: "sliding-puzzle",
    title: "Sliding Puzzle",
    description: "Arrange tiles in correct order",
    difficulty: Difficulty::Hard,
};

pub const SIDE: usize = 4;
pub const SHUFFLE_MOVES: usize = 1000;

/// Tile numbers in row-major order, 0 is the empty slot.
pub type Tiles = [u8; SIDE * SIDE];

pub fn solved() -> Tiles {
    let mut tiles = [0; SIDE * SIDE];
    for (i, tile) in tiles.iter_mut().take(SIDE * SIDE - 1).enumerate() {
        *tile = i as u8 + 1;
    }
    tiles
}

/// Indices that can slide into the empty slot at `empty`.
pub fn neighbors(empty: usize) -> Vec<usize> {
    let (row, col) = (empty / SIDE, empty % SIDE);
    let mut moves = Vec::with_capacity(4);
    if row > 0 {
        moves.push(empty - SIDE);
    }
    if row < SIDE - 1 {
        moves.push(empty + SIDE);
    }
    if col > 0 {
        moves.push(empty - 1);
    }
    if col < SIDE - 1 {
        moves.push(empty + 1);
    }
    moves
}

#[derive(Clone, Debug)]
pub struct SlidingPuzzle {
    tiles: Tiles,
    moves: u32,
    shuffled: bool,
}

impl Default for SlidingPuzzle {
    fn default() -> Self {
        Self {
            tiles: solved(),
            moves: 0,
            shuffled: false,
        }
    }
}

impl SlidingPuzzle {
    pub fn tiles(&self) -> &Tiles {
        &self.tiles
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn empty(&self) -> usize {
        self.tiles
            .iter()
            .position(|&tile| tile == 0)
            .unwrap_or(SIDE * SIDE - 1)
    }

    pub fn is_solved(&self) -> bool {
        self.tiles == solved()
    }

    /// Solved by the player, as opposed to freshly reset.
    pub fn is_won(&self) -> bool {
        self.shuffled && self.is_solved()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Random valid slides from the current position, so the puzzle stays solvable.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        for _ in 0..SHUFFLE_MOVES {
            let empty = self.empty();
            if let Some(&index) = neighbors(empty).choose(rng) {
                self.tiles.swap(empty, index);
            }
        }
        self.moves = 0;
        self.shuffled = true;
    }

    pub fn can_slide(&self, index: usize) -> bool {
        !self.is_won() && neighbors(self.empty()).contains(&index)
    }

    pub fn slide(&mut self, index: usize) -> bool {
        if !self.can_slide(index) {
            return false;
        }
        let empty = self.empty();
        self.tiles.swap(empty, index);
        self.moves += 1;
        true
    }

    /// Arrow keys move the tile on the opposite side of the empty slot into it.
    pub fn slide_toward(&mut self, dx: isize, dy: isize) -> bool {
        let empty = self.empty();
        let (row, col) = ((empty / SIDE) as isize - dy, (empty % SIDE) as isize - dx);
        if (0..SIDE as isize).contains(&row) && (0..SIDE as isize).contains(&col) {
            self.slide(row as usize * SIDE + col as usize)
        } else {
            false
        }
    }

    pub fn status(&self) -> String {
        if self.is_won() {
            format!("Puzzle Solved in {} moves!", self.moves)
        } else if !self.shuffled {
            "Press Shuffle to start".to_owned()
        } else {
            format!("Moves: {}", self.moves)
        }
    }
}

pub async fn main(mut rng: SmallRng) -> Result<(), Error> {
    let field = Playfield::new(BOARD_FIELD);
    let mut game = SlidingPuzzle::default();

    while !is_key_down(KeyCode::Escape) {
        for (key, dx, dy) in [
            (KeyCode::Left, -1, 0),
            (KeyCode::Right, 1, 0),
            (KeyCode::Up, 0, -1),
            (KeyCode::Down, 0, 1),
        ] {
            if is_key_pressed(key) {
                game.slide_toward(dx, dy);
            }
        }
        if is_key_pressed(KeyCode::S) {
            game.shuffle(&mut rng);
        }
        if is_key_pressed(KeyCode::R) {
            game.reset();
        }

        clear_background(BACKGROUND);
        let mouse = field.begin();

        draw_header(BOARD_FIELD, INFO.title, &game.status());
        let cells = layout::board(
            layout::centered(vec2(400.0, 285.0), vec2(330.0, 330.0)),
            SIDE,
            SIDE,
            8.0,
        );
        let was_won = game.is_won();
        for (i, rect) in cells.iter().enumerate() {
            let tile = game.tiles()[i];
            if tile == 0 {
                continue;
            }
            if Button::new(*rect, &tile.to_string())
                .enabled(game.can_slide(i) || was_won)
                .style(ButtonStyle::filled(color::DARKBLUE))
                .ui(mouse)
            {
                game.slide(i);
            }
        }
        if !was_won && game.is_won() {
            debug!("sliding-puzzle: solved in {} moves", game.moves());
        }

        if Button::new(Rect::new(235.0, 500.0, 160.0, 50.0), "Shuffle")
            .style(ButtonStyle::filled(color::DARKGREEN))
            .ui(mouse)
        {
            game.shuffle(&mut rng);
        }
        if Button::new(Rect::new(405.0, 500.0, 160.0, 50.0), "Reset").ui(mouse) {
            game.reset();
        }
        draw_hint(BOARD_FIELD, "Click tiles or use arrows, S to shuffle, R to reset");

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
        let cells = layout::board(layout::preview_square(rect), SIDE, SIDE, 2.0);
        for (i, rect) in cells.iter().enumerate().take(SIDE * SIDE - 1) {
            let shade = 0.4 + 0.5 * i as f32 / (SIDE * SIDE) as f32;
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, color::Color::new(0.2, 0.4, shade, 1.0));
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

    fn is_solvable(tiles: &Tiles) -> bool {
        let flat: Vec<u8> = tiles.iter().copied().filter(|&t| t != 0).collect();
        let inversions = (0..flat.len())
            .flat_map(|i| (i + 1..flat.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| flat[i] > flat[j])
            .count();
        let empty_row_from_bottom = SIDE - tiles.iter().position(|&t| t == 0).unwrap() / SIDE;
        (inversions + empty_row_from_bottom) % 2 == 1
    }

    #[test]
    fn starts_solved_but_not_won() {
        let game = SlidingPuzzle::default();
        assert!(game.is_solved());
        assert!(!game.is_won());
        assert_eq!(game.empty(), 15);
        assert_eq!(game.tiles()[0], 1);
    }

    #[test]
    fn corner_and_center_neighbors() {
        let mut corner = neighbors(0);
        corner.sort();
        assert_eq!(corner, [1, 4]);
        let mut center = neighbors(5);
        center.sort();
        assert_eq!(center, [1, 4, 6, 9]);
    }

    #[test]
    fn only_adjacent_tiles_slide() {
        let mut game = SlidingPuzzle::default();
        assert!(!game.slide(0));
        assert!(!game.slide(10));
        assert!(game.slide(14));
        assert_eq!(game.empty(), 14);
        assert_eq!(game.tiles()[15], 15);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn shuffle_is_solvable_and_resets_moves() {
        let mut rng = SmallRng::seed_from_u64(41);
        let mut game = SlidingPuzzle::default();
        game.slide(14);
        game.shuffle(&mut rng);
        assert_eq!(game.moves(), 0);
        let mut sorted = *game.tiles();
        sorted.sort();
        let expected: Tiles = std::array::from_fn(|i| i as u8);
        assert_eq!(sorted, expected);
        assert!(is_solvable(game.tiles()));
    }

    #[test]
    fn arrow_moves_tile_into_gap() {
        let mut game = SlidingPuzzle::default();
        assert!(!game.slide_toward(-1, 0));
        assert!(game.slide_toward(1, 0));
        assert_eq!(game.empty(), 14);
        assert!(game.slide_toward(0, 1));
        assert_eq!(game.empty(), 10);
    }

    #[test]
    fn solving_after_shuffle_wins_and_locks_board() {
        let mut game = SlidingPuzzle::default();
        game.shuffled = true;
        game.tiles.swap(15, 14);
        assert!(!game.is_won());
        assert!(game.slide(15));
        assert!(game.is_won());
        assert_eq!(game.status(), "Puzzle Solved in 1 moves!");
        assert!(!game.slide(14));
    }
}
