pub mod button;
pub mod config;
pub mod games;
pub mod geometry;
pub mod layout;
pub mod text;
pub mod timer;
pub mod view;

use anyhow::Error;
use derive_more::derive::Display;
use futures::future::LocalBoxFuture;
use macroquad::{color::Color, color_u8, math::Rect};
use rand::rngs::SmallRng;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn color(self) -> Color {
        match self {
            Difficulty::Easy => color_u8!(22, 163, 74, 255),
            Difficulty::Medium => color_u8!(202, 138, 4, 255),
            Difficulty::Hard => color_u8!(220, 38, 38, 255),
        }
    }
}

/// Catalog card of a game.
#[derive(Clone, Copy, Debug)]
pub struct GameInfo {
    /// Route used on the command line.
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
}

pub trait Game {
    fn info(&self) -> &'static GameInfo;
    fn draw_preview(&self, rect: Rect);
    /// Runs the game until the player leaves it.
    fn launch(&self, rng: SmallRng) -> LocalBoxFuture<'static, Result<(), Error>>;
}
