use crate::{geometry::overlaps, timer::TICK_60HZ};
use derive_more::derive::{Deref, DerefMut};
use itertools::iproduct;
use macroquad::{
    color::Color,
    color_u8,
    logging::debug,
    math::{Rect, Vec2},
};
use rand::{seq::SliceRandom, Rng};
use std::time::Duration;

pub const AREA: Vec2 = Vec2::new(800.0, 600.0);
pub const LIVES: u32 = 3;

const PLAYER: Rect = Rect {
    x: 375.0,
    y: 550.0,
    w: 50.0,
    h: 30.0,
};
const PLAYER_SPEED: f32 = 5.0;

const BULLET_SIZE: Vec2 = Vec2::new(4.0, 10.0);
const BULLET_SPEED: f32 = 7.0;
const ALIEN_BULLET_SPEED: f32 = 5.0;
pub const FIRE_COOLDOWN: Duration = Duration::from_millis(250);

pub const ROWS: usize = 5;
pub const COLS: usize = 10;
const ALIEN_SIZE: Vec2 = Vec2::new(40.0, 30.0);
pub const MARCH_PERIOD: Duration = Duration::from_millis(500);
const MARCH_STEP: f32 = 20.0;
const DROP_STEP: f32 = 30.0;
/// Chance per tick that some alien fires.
const ALIEN_FIRE_CHANCE: f64 = 0.02;
pub const WAVE_BONUS: u32 = 1000;

pub(super) const KIND_COLORS: [Color; ROWS] = [
    color_u8!(255, 0, 0, 255),
    color_u8!(255, 136, 0, 255),
    color_u8!(255, 255, 0, 255),
    color_u8!(0, 255, 136, 255),
    color_u8!(0, 136, 255, 255),
];

#[derive(Clone, Copy, PartialEq, Debug, Deref, DerefMut)]
pub struct Alien {
    #[deref]
    #[deref_mut]
    body: Rect,
    /// Formation row it was spawned in.
    kind: usize,
}

impl Alien {
    fn new(row: usize, col: usize) -> Self {
        Self {
            body: Rect::new(
                col as f32 * 60.0 + 50.0,
                row as f32 * 50.0 + 50.0,
                ALIEN_SIZE.x,
                ALIEN_SIZE.y,
            ),
            kind: row,
        }
    }

    pub fn points(&self) -> u32 {
        (ROWS - self.kind) as u32 * 10
    }

    pub fn color(&self) -> Color {
        KIND_COLORS[self.kind]
    }
}

pub fn formation() -> Vec<Alien> {
    iproduct!(0..ROWS, 0..COLS)
        .map(|(row, col)| Alien::new(row, col))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    Paused,
    Over,
}

/// Keys held during a tick.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[derive(Clone, Debug)]
pub struct Invaders {
    player: Rect,
    bullets: Vec<Rect>,
    aliens: Vec<Alien>,
    alien_bullets: Vec<Rect>,
    /// Horizontal march direction, `1.0` or `-1.0`.
    direction: f32,
    /// Game time, advanced only by ticks.
    time: Duration,
    last_shot: Option<Duration>,
    last_march: Duration,
    score: u32,
    lives: u32,
    phase: Phase,
}

impl Default for Invaders {
    fn default() -> Self {
        Self {
            player: PLAYER,
            bullets: Vec::new(),
            aliens: formation(),
            alien_bullets: Vec::new(),
            direction: 1.0,
            time: Duration::ZERO,
            last_shot: None,
            last_march: Duration::ZERO,
            score: 0,
            lives: LIVES,
            phase: Phase::Ready,
        }
    }
}

impl Invaders {
    pub fn player(&self) -> Rect {
        self.player
    }

    pub fn bullets(&self) -> &[Rect] {
        &self.bullets
    }

    pub fn aliens(&self) -> &[Alien] {
        &self.aliens
    }

    pub fn alien_bullets(&self) -> &[Rect] {
        &self.alien_bullets
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Over {
            *self = Self::default();
        }
        self.phase = Phase::Playing;
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    pub fn toggle(&mut self) {
        if self.phase == Phase::Playing {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn tick<R: Rng>(&mut self, controls: Controls, rng: &mut R) {
        if self.phase != Phase::Playing {
            return;
        }
        self.time += TICK_60HZ;

        if controls.left && self.player.x > 0.0 {
            self.player.x -= PLAYER_SPEED;
        }
        if controls.right && self.player.x < AREA.x - self.player.w {
            self.player.x += PLAYER_SPEED;
        }

        self.fire(controls.fire);
        for bullet in &mut self.bullets {
            bullet.y -= BULLET_SPEED;
        }
        self.bullets.retain(|bullet| bullet.y > 0.0);

        if self.time - self.last_march > MARCH_PERIOD {
            self.march();
            self.last_march = self.time;
        }

        if rng.gen_bool(ALIEN_FIRE_CHANCE) {
            if let Some(alien) = self.aliens.choose(rng) {
                self.alien_bullets.push(Rect::new(
                    alien.x + alien.w / 2.0,
                    alien.bottom(),
                    BULLET_SIZE.x,
                    BULLET_SIZE.y,
                ));
            }
        }
        for bullet in &mut self.alien_bullets {
            bullet.y += ALIEN_BULLET_SPEED;
        }
        self.alien_bullets.retain(|bullet| bullet.y < AREA.y);

        self.resolve_hits();

        let landed = self
            .aliens
            .iter()
            .any(|alien| alien.bottom() >= self.player.y);
        if self.lives == 0 || landed {
            debug!("space-invaders: game over with {} points", self.score);
            self.phase = Phase::Over;
            return;
        }

        if self.aliens.is_empty() {
            debug!("space-invaders: wave cleared");
            self.aliens = formation();
            self.direction = 1.0;
            self.score += WAVE_BONUS;
        }
    }

    fn fire(&mut self, held: bool) {
        let ready = self
            .last_shot
            .map_or(true, |last| self.time - last > FIRE_COOLDOWN);
        if held && ready {
            self.bullets.push(Rect::new(
                self.player.center().x - BULLET_SIZE.x / 2.0,
                self.player.y,
                BULLET_SIZE.x,
                BULLET_SIZE.y,
            ));
            self.last_shot = Some(self.time);
        }
    }

    fn march(&mut self) {
        let mut edge = false;
        for alien in &mut self.aliens {
            alien.x += self.direction * MARCH_STEP;
            edge |= alien.x <= 0.0 || alien.x >= AREA.x - alien.w;
        }
        if edge {
            self.direction = -self.direction;
            for alien in &mut self.aliens {
                alien.y += DROP_STEP;
            }
        }
    }

    fn resolve_hits(&mut self) {
        let aliens = &mut self.aliens;
        let score = &mut self.score;
        self.bullets.retain(|bullet| {
            let count = aliens.len();
            aliens.retain(|alien| {
                let hit = overlaps(alien, bullet);
                if hit {
                    *score += alien.points();
                }
                !hit
            });
            aliens.len() == count
        });

        let player = self.player;
        let count = self.alien_bullets.len();
        self.alien_bullets
            .retain(|bullet| !overlaps(bullet, &player));
        self.lives = self
            .lives
            .saturating_sub((count - self.alien_bullets.len()) as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    /// Never passes the alien fire roll.
    fn quiet() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn playing() -> Invaders {
        let mut game = Invaders::default();
        game.start();
        game
    }

    const IDLE: Controls = Controls {
        left: false,
        right: false,
        fire: false,
    };

    #[test]
    fn initial_formation() {
        let aliens = formation();
        assert_eq!(aliens.len(), ROWS * COLS);
        assert_eq!(*aliens[0], Rect::new(50.0, 50.0, 40.0, 30.0));
        assert_eq!(aliens[0].points(), 50);
        assert_eq!(*aliens[ROWS * COLS - 1], Rect::new(590.0, 250.0, 40.0, 30.0));
        assert_eq!(aliens[ROWS * COLS - 1].points(), 10);
    }

    #[test]
    fn player_stays_in_area() {
        let mut game = playing();
        let mut rng = quiet();
        let left = Controls {
            left: true,
            ..IDLE
        };
        for _ in 0..100 {
            game.tick(left, &mut rng);
        }
        assert_eq!(game.player().x, 0.0);
        let right = Controls {
            right: true,
            ..IDLE
        };
        for _ in 0..200 {
            game.tick(right, &mut rng);
        }
        assert_eq!(game.player().x, 750.0);
    }

    #[test]
    fn fire_respects_cooldown() {
        let mut game = playing();
        let mut rng = quiet();
        let fire = Controls {
            fire: true,
            ..IDLE
        };
        game.tick(fire, &mut rng);
        assert_eq!(game.bullets(), [Rect::new(398.0, 543.0, 4.0, 10.0)]);
        for _ in 0..14 {
            game.tick(fire, &mut rng);
        }
        assert_eq!(game.bullets().len(), 1);
        game.tick(fire, &mut rng);
        assert_eq!(game.bullets().len(), 2);
    }

    #[test]
    fn bullets_leave_at_top() {
        let mut game = playing();
        game.aliens.clear();
        game.aliens.push(Alien::new(0, 0));
        game.bullets.push(Rect::new(700.0, 5.0, 4.0, 10.0));
        game.tick(IDLE, &mut quiet());
        assert!(game.bullets().is_empty());
    }

    #[test]
    fn formation_marches_every_half_second() {
        let mut game = playing();
        let mut rng = quiet();
        for _ in 0..29 {
            game.tick(IDLE, &mut rng);
        }
        assert_eq!(game.aliens()[0].x, 50.0);
        game.tick(IDLE, &mut rng);
        assert_eq!(game.aliens()[0].x, 70.0);
        assert_eq!(game.aliens()[0].y, 50.0);
    }

    #[test]
    fn paused_game_keeps_march_and_cooldown() {
        let fire = Controls {
            fire: true,
            ..IDLE
        };
        let mut rng = quiet();
        let mut game = playing();
        let mut control = playing();
        for _ in 0..20 {
            game.tick(fire, &mut rng);
            control.tick(fire, &mut rng);
        }

        game.toggle();
        assert_eq!(game.phase(), Phase::Paused);
        let frozen = game.clone();
        for _ in 0..1000 {
            game.tick(fire, &mut rng);
        }
        assert_eq!(game.aliens(), frozen.aliens());
        assert_eq!(game.bullets(), frozen.bullets());

        game.toggle();
        assert_eq!(game.phase(), Phase::Playing);
        for _ in 0..40 {
            game.tick(fire, &mut rng);
            control.tick(fire, &mut rng);
        }
        assert_eq!(game.aliens(), control.aliens());
        assert_eq!(game.bullets(), control.bullets());
        assert_eq!(game.score(), control.score());
    }

    #[test]
    fn edge_reverses_and_drops() {
        let mut game = playing();
        game.aliens = vec![Alien::new(0, 0)];
        game.aliens[0].x = 740.0;
        game.march();
        assert_eq!(game.aliens()[0].x, 760.0);
        assert_eq!(game.aliens()[0].y, 80.0);
        game.march();
        assert_eq!(game.aliens()[0].x, 740.0);
        assert_eq!(game.aliens()[0].y, 80.0);
    }

    #[test]
    fn bullet_destroys_alien() {
        let mut game = playing();
        game.bullets.push(Rect::new(60.0, 82.0, 4.0, 10.0));
        game.tick(IDLE, &mut quiet());
        assert_eq!(game.aliens().len(), ROWS * COLS - 1);
        assert!(game.bullets().is_empty());
        assert_eq!(game.score(), 50);
    }

    #[test]
    fn alien_fires_from_its_bottom_center() {
        let mut game = playing();
        game.tick(IDLE, &mut StepRng::new(0, 0));
        assert_eq!(game.alien_bullets(), [Rect::new(70.0, 85.0, 4.0, 10.0)]);
    }

    #[test]
    fn alien_bullet_costs_life() {
        let mut game = playing();
        game.alien_bullets.push(Rect::new(390.0, 545.0, 4.0, 10.0));
        game.tick(IDLE, &mut quiet());
        assert_eq!(game.lives(), LIVES - 1);
        assert!(game.alien_bullets().is_empty());
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn last_life_ends_game() {
        let mut game = playing();
        game.lives = 1;
        game.alien_bullets.push(Rect::new(390.0, 545.0, 4.0, 10.0));
        game.tick(IDLE, &mut quiet());
        assert_eq!(game.phase(), Phase::Over);

        game.start();
        assert_eq!(game.lives(), LIVES);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn landing_ends_game() {
        let mut game = playing();
        game.aliens[0].y = 521.0;
        game.tick(IDLE, &mut quiet());
        assert_eq!(game.phase(), Phase::Over);
    }

    #[test]
    fn cleared_wave_respawns_with_bonus() {
        let mut game = playing();
        game.aliens = vec![Alien::new(4, 0)];
        game.bullets.push(Rect::new(60.0, 282.0, 4.0, 10.0));
        game.tick(IDLE, &mut quiet());
        assert_eq!(game.aliens().len(), ROWS * COLS);
        assert_eq!(game.score(), 10 + WAVE_BONUS);
        assert_eq!(game.phase(), Phase::Playing);
    }
}
