//! Bolt collision tests.
//!
//! A bolt hits a target when any of its four corners lies inside the
//! target's bounding box.  This samples corners rather than testing full
//! overlap, so a bolt wider than its target can slip through.

use crate::config::GameConfig;
use crate::entities::{Alien, Bolt, Ship};

/// Whether `point` lies inside the box of `size` centred on `center`.
/// Edges count as inside.
pub fn contains(center: (f64, f64), size: (f64, f64), point: (f64, f64)) -> bool {
    let (cx, cy) = center;
    let (hw, hh) = (size.0 / 2.0, size.1 / 2.0);
    let (px, py) = point;
    px >= cx - hw && px <= cx + hw && py >= cy - hh && py <= cy + hh
}

/// Top-left, top-right, bottom-right, bottom-left.
pub fn bolt_corners(bolt: &Bolt, config: &GameConfig) -> [(f64, f64); 4] {
    let top = bolt.y + config.bolt_height / 2.0;
    let bottom = bolt.y - config.bolt_height / 2.0;
    let left = bolt.x - config.bolt_width / 2.0;
    let right = bolt.x + config.bolt_width / 2.0;
    [(left, top), (right, top), (right, bottom), (left, bottom)]
}

fn any_corner_inside(
    bolt: &Bolt,
    center: (f64, f64),
    size: (f64, f64),
    config: &GameConfig,
) -> bool {
    bolt_corners(bolt, config)
        .iter()
        .any(|&corner| contains(center, size, corner))
}

impl Ship {
    /// Only alien bolts (negative velocity) can hit the ship.
    pub fn collides(&self, bolt: &Bolt, config: &GameConfig) -> bool {
        bolt.velocity < 0.0
            && any_corner_inside(
                bolt,
                (self.x, self.y),
                (config.ship_width, config.ship_height),
                config,
            )
    }
}

impl Alien {
    /// Only player bolts (positive velocity) can hit an alien.
    pub fn collides(&self, bolt: &Bolt, config: &GameConfig) -> bool {
        bolt.velocity > 0.0
            && any_corner_inside(
                bolt,
                (self.x, self.y),
                (config.alien_width, config.alien_height),
                config,
            )
    }
}
