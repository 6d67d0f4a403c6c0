//! All game entity types — plain data plus grid accessors, no game rules.
//!
//! World coordinates are pixels with the origin at the bottom-left corner
//! and y growing upward.  Sprites are positioned by their centre.

use crate::animation::Animation;
use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarchDirection {
    Right,
    Left,
    /// Reached the right edge and dropped; nudge left once, then walk left.
    SwitchLeft,
    /// Reached the left edge and dropped; nudge right once, then walk right.
    SwitchRight,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    None,
    Win,
    Lose,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SoundEffect {
    Fire,
    /// `lives_left` is the count before the hit was subtracted.
    ShipDestroyed { lives_left: u32 },
    AlienDestroyed,
}

impl SoundEffect {
    /// Name of the sample this cue plays.  The blast grows heavier as the
    /// ship runs out of lives.
    pub fn sample(&self) -> &'static str {
        match self {
            SoundEffect::Fire => "pew",
            SoundEffect::ShipDestroyed { lives_left } => match lives_left {
                0 | 1 => "blast3",
                2 => "blast2",
                _ => "blast1",
            },
            SoundEffect::AlienDestroyed => "pop",
        }
    }
}

/// Key state for one frame: `true` while the key is down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub mute: bool,
}

// ── Sprites ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub x: f64,
    pub y: f64,
    pub frame: u32,
    pub dying: Option<Animation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub x: f64,
    pub y: f64,
    /// Which of the three alien sprite sheets this alien uses.
    pub image_set: usize,
    pub frame: u32,
    pub dying: Option<Animation>,
}

/// A laser bolt.  Positive velocity travels up (player), negative down (alien).
#[derive(Clone, Debug, PartialEq)]
pub struct Bolt {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
}

impl Bolt {
    pub fn is_player_bolt(&self) -> bool {
        self.velocity > 0.0
    }
}

// ── Alien grid ───────────────────────────────────────────────────────────────

/// Fixed-size grid of aliens stored row-major.  Row 0 is the top row.
/// Destroyed aliens leave their cell empty; the grid never resizes.
#[derive(Clone, Debug, PartialEq)]
pub struct AlienGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Alien>>,
}

impl AlienGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        AlienGrid {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Alien> {
        self.index(row, col).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Alien> {
        match self.index(row, col) {
            Some(i) => self.cells[i].as_mut(),
            None => None,
        }
    }

    /// Place `alien` at a cell; out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, col: usize, alien: Alien) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = Some(alien);
        }
    }

    /// Empty a cell, returning the alien that was there.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<Alien> {
        self.index(row, col).and_then(|i| self.cells[i].take())
    }

    /// Live aliens in row-major order with their `(row, col)`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Alien)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|a| ((i / cols, i % cols), a)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut Alien)> + '_ {
        let cols = self.cols;
        self.cells
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_mut().map(|a| ((i / cols, i % cols), a)))
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Ascending indices of columns holding at least one alien.
    pub fn occupied_columns(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&col| (0..self.rows).any(|row| self.get(row, col).is_some()))
            .collect()
    }

    /// Row of the lowest alien in `col`, if the column is not empty.
    pub fn bottom_row(&self, col: usize) -> Option<usize> {
        (0..self.rows).rev().find(|&row| self.get(row, col).is_some())
    }
}

// ── Wave ─────────────────────────────────────────────────────────────────────

/// One level: the ship, the alien grid, bolts in flight and the timers that
/// pace the march and alien fire.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct Wave {
    /// `None` once the ship's death animation has finished.
    pub ship: Option<Ship>,
    pub aliens: AlienGrid,
    pub bolts: Vec<Bolt>,
    pub defense_line: f64,
    pub lives: u32,
    /// Seconds accumulated towards the next march step.
    pub march_time: f64,
    pub direction: MarchDirection,
    /// March steps taken since aliens last fired.
    pub steps: u32,
    /// Aliens fire once `steps` exceeds this.
    pub fire_after: u32,
    /// Fire key state on the previous frame, for edge detection.
    pub last_fire: bool,
    pub last_mute: bool,
    pub muted: bool,
    pub outcome: Outcome,
    /// Sound cues raised during the latest tick.
    pub sounds: Vec<SoundEffect>,
    pub config: GameConfig,
}
