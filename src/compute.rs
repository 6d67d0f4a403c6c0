//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current `Wave`
//! (and, where needed, the frame input, elapsed time or an RNG handle) and
//! returns a brand-new `Wave`.  Side effects are limited to the injected RNG
//! and log output.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::animation::{
    Animation, AnimationStep, ALIEN_DEATH_FIRST_FRAME, SHIP_DEATH_FIRST_FRAME,
};
use crate::config::GameConfig;
use crate::entities::{
    Alien, AlienGrid, Bolt, FrameInput, MarchDirection, Outcome, Ship, SoundEffect, Wave,
};

// ── Constructors ─────────────────────────────────────────────────────────────

fn spawn_ship(config: &GameConfig) -> Ship {
    Ship {
        x: config.game_width / 2.0,
        y: config.ship_bottom,
        frame: 0,
        dying: None,
    }
}

/// Lay out the alien grid: the top row hangs `alien_ceiling` below the top
/// of the playfield, and every pair of rows shares one of three sprite sets.
fn fill_aliens(config: &GameConfig) -> AlienGrid {
    let mut grid = AlienGrid::new(config.alien_rows, config.aliens_in_row);
    let top = config.game_height - config.alien_ceiling - config.alien_height / 2.0;

    for row in 0..config.alien_rows {
        let y = top - row as f64 * (config.alien_height + config.alien_v_sep);
        for col in 0..config.aliens_in_row {
            let x = config.alien_h_sep
                + config.alien_width / 2.0
                + col as f64 * (config.alien_width + config.alien_h_sep);
            grid.set(
                row,
                col,
                Alien {
                    x,
                    y,
                    image_set: (row / 2) % 3,
                    frame: 0,
                    dying: None,
                },
            );
        }
    }
    grid
}

/// How many march steps pass before the next alien shot.  A zero
/// `bolt_rate` (which `GameConfig::validate` rejects) fires every step.
fn draw_fire_after(config: &GameConfig, rng: &mut impl Rng) -> u32 {
    rng.gen_range(0..config.bolt_rate.max(1))
}

/// Build a fresh wave.
pub fn init_wave(config: GameConfig, rng: &mut impl Rng) -> Wave {
    Wave {
        ship: Some(spawn_ship(&config)),
        aliens: fill_aliens(&config),
        bolts: Vec::new(),
        defense_line: config.defense_line,
        lives: config.ship_lives,
        march_time: 0.0,
        direction: MarchDirection::Right,
        steps: 0,
        fire_after: draw_fire_after(&config, rng),
        last_fire: false,
        last_mute: false,
        muted: false,
        outcome: Outcome::None,
        sounds: Vec::new(),
        config,
    }
}

/// Put a new ship on screen after a lost life.  Does nothing while a ship
/// is still present, when no lives remain, or once the wave is decided.
///
/// The fire key state is forgotten, so the first press on the new ship fires
/// even if the key was held when the old one went down.
pub fn respawn_ship(wave: &Wave) -> Wave {
    if wave.ship.is_some() || wave.lives == 0 || wave.outcome != Outcome::None {
        return wave.clone();
    }
    Wave {
        ship: Some(spawn_ship(&wave.config)),
        last_fire: false,
        ..wave.clone()
    }
}

fn emit(wave: &mut Wave, sound: SoundEffect) {
    if !wave.muted {
        wave.sounds.push(sound);
    }
}

pub fn player_bolt_count(wave: &Wave) -> usize {
    wave.bolts.iter().filter(|b| b.is_player_bolt()).count()
}

// ── Ship & bolts ─────────────────────────────────────────────────────────────

/// Move the ship for held direction keys, keeping it fully on screen.
pub fn move_ship(wave: &Wave, input: &FrameInput) -> Wave {
    let mut next = wave.clone();
    let config = &wave.config;
    if let Some(ship) = next.ship.as_mut() {
        if input.left {
            ship.x -= config.ship_movement;
        }
        if input.right {
            ship.x += config.ship_movement;
        }
        let half = config.ship_width / 2.0;
        ship.x = ship.x.clamp(half, (config.game_width - half).max(half));
    }
    next
}

/// Fire on the frame the fire key goes down, if no player bolt is in flight.
pub fn player_fire(wave: &Wave, input: &FrameInput) -> Wave {
    let mut next = wave.clone();
    let pressed = input.fire && !wave.last_fire;
    next.last_fire = input.fire;

    if !pressed || player_bolt_count(wave) > 0 {
        return next;
    }
    if let Some(ship) = &wave.ship {
        next.bolts.push(Bolt {
            x: ship.x,
            y: ship.y + wave.config.ship_height,
            velocity: wave.config.bolt_speed,
        });
        emit(&mut next, SoundEffect::Fire);
    }
    next
}

/// Advance every bolt by its velocity and drop those fully off screen.
pub fn move_bolts(wave: &Wave) -> Wave {
    let config = &wave.config;
    let half = config.bolt_height / 2.0;
    let bolts = wave
        .bolts
        .iter()
        .map(|b| Bolt {
            y: b.y + b.velocity,
            ..b.clone()
        })
        .filter(|b| b.y - half <= config.game_height && b.y + half >= 0.0)
        .collect();
    Wave {
        bolts,
        ..wave.clone()
    }
}

// ── Death animations ─────────────────────────────────────────────────────────

/// Advance the ship's explosion.  When it ends the ship is removed and every
/// bolt is cleared from the screen.
pub fn advance_ship_death(wave: &Wave, dt: f64) -> Wave {
    let mut next = wave.clone();
    let finished = match next.ship.as_mut() {
        Some(Ship {
            dying: Some(anim),
            frame,
            ..
        }) => match anim.step(dt) {
            AnimationStep::Running { frame: f } => {
                *frame = f;
                false
            }
            AnimationStep::Done => true,
        },
        _ => false,
    };
    if finished {
        debug!("ship explosion finished, {} lives left", next.lives);
        next.ship = None;
        next.bolts.clear();
    }
    next
}

/// Advance every dying alien; finished ones leave their cell empty.
pub fn advance_alien_deaths(wave: &Wave, dt: f64) -> Wave {
    let mut next = wave.clone();
    let mut finished = Vec::new();
    for (pos, alien) in next.aliens.iter_mut() {
        if let Some(anim) = alien.dying.as_mut() {
            match anim.step(dt) {
                AnimationStep::Running { frame } => alien.frame = frame,
                AnimationStep::Done => finished.push(pos),
            }
        }
    }
    for (row, col) in finished {
        next.aliens.remove(row, col);
    }
    next
}

// ── March ────────────────────────────────────────────────────────────────────

fn shift_aliens(grid: &mut AlienGrid, dx: f64, dy: f64) {
    for (_, alien) in grid.iter_mut() {
        alien.x += dx;
        alien.y += dy;
    }
}

/// Whether any alien touches the edge it is walking towards.
pub fn alien_at_edge(wave: &Wave, direction: MarchDirection) -> bool {
    let config = &wave.config;
    let half = config.alien_width / 2.0;
    wave.aliens.iter().any(|(_, alien)| match direction {
        MarchDirection::Right => alien.x + half >= config.game_width - config.alien_h_sep,
        MarchDirection::Left => alien.x - half < config.alien_h_sep,
        _ => false,
    })
}

/// Accumulate time and take one march step once `alien_speed` has passed.
///
/// A step toggles the walk pose, then either walks sideways, drops a row at
/// an edge (queuing a reversal), or performs the queued half-width nudge away
/// from the edge and reverses.
pub fn march(wave: &Wave, dt: f64) -> Wave {
    let mut next = wave.clone();
    let config = &wave.config;

    if next.march_time <= config.alien_speed {
        next.march_time += dt;
    }
    if next.march_time <= config.alien_speed {
        return next;
    }

    next.steps += 1;
    for (_, alien) in next.aliens.iter_mut() {
        if alien.dying.is_none() {
            alien.frame = if alien.frame == 0 { 1 } else { 0 };
        }
    }

    let direction = next.direction;
    match direction {
        MarchDirection::SwitchLeft => {
            shift_aliens(&mut next.aliens, -config.alien_width / 2.0, 0.0);
            next.direction = MarchDirection::Left;
        }
        MarchDirection::SwitchRight => {
            shift_aliens(&mut next.aliens, config.alien_width / 2.0, 0.0);
            next.direction = MarchDirection::Right;
        }
        dir if alien_at_edge(&next, dir) => {
            shift_aliens(&mut next.aliens, 0.0, -config.alien_v_walk);
            next.direction = match dir {
                MarchDirection::Right => MarchDirection::SwitchLeft,
                _ => MarchDirection::SwitchRight,
            };
            debug!("aliens reached the edge, now {:?}", next.direction);
        }
        MarchDirection::Right => shift_aliens(&mut next.aliens, config.alien_h_walk, 0.0),
        MarchDirection::Left => shift_aliens(&mut next.aliens, -config.alien_h_walk, 0.0),
    }

    next.march_time = 0.0;
    next
}

// ── Alien fire ───────────────────────────────────────────────────────────────

/// Once enough march steps have passed, the lowest alien of a random
/// occupied column fires, and a new step count is drawn.
pub fn alien_fire(wave: &Wave, rng: &mut impl Rng) -> Wave {
    if wave.steps <= wave.fire_after {
        return wave.clone();
    }
    let mut next = wave.clone();
    let config = &wave.config;

    let columns = wave.aliens.occupied_columns();
    if let Some(&col) = columns.choose(rng) {
        let shooter = wave
            .aliens
            .bottom_row(col)
            .and_then(|row| wave.aliens.get(row, col));
        if let Some(alien) = shooter {
            debug!("alien in column {} fires", col);
            next.bolts.push(Bolt {
                x: alien.x,
                y: alien.y - config.alien_height,
                velocity: -config.bolt_speed,
            });
        }
    }

    next.fire_after = draw_fire_after(config, rng);
    next.steps = 0;
    next
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Each alien still standing is tested against the bolts in row-major order;
/// the first player bolt to hit it is consumed and the alien starts dying.
pub fn destroy_aliens(wave: &Wave) -> Wave {
    let mut next = wave.clone();
    let mut hits = 0;

    for ((row, col), alien) in next.aliens.iter_mut() {
        if alien.dying.is_some() {
            continue;
        }
        if let Some(bi) = next.bolts.iter().position(|b| alien.collides(b, &next.config)) {
            next.bolts.remove(bi);
            alien.dying = Some(Animation::alien_death(next.config.death_speed));
            alien.frame = ALIEN_DEATH_FIRST_FRAME;
            debug!("alien at ({}, {}) hit", row, col);
            hits += 1;
        }
    }

    for _ in 0..hits {
        emit(&mut next, SoundEffect::AlienDestroyed);
    }
    next
}

/// An alien bolt hitting the live ship costs a life and starts its explosion.
pub fn destroy_ship(wave: &Wave) -> Wave {
    let hit = match &wave.ship {
        Some(ship) if ship.dying.is_none() => {
            wave.bolts.iter().position(|b| ship.collides(b, &wave.config))
        }
        _ => None,
    };
    let Some(bi) = hit else {
        return wave.clone();
    };

    let mut next = wave.clone();
    next.bolts.remove(bi);
    if let Some(ship) = next.ship.as_mut() {
        ship.dying = Some(Animation::ship_death(wave.config.death_speed));
        ship.frame = SHIP_DEATH_FIRST_FRAME;
    }
    emit(
        &mut next,
        SoundEffect::ShipDestroyed {
            lives_left: wave.lives,
        },
    );
    next.lives = wave.lives.saturating_sub(1);
    debug!("ship hit, {} lives left", next.lives);
    next
}

// ── Outcome & mute ───────────────────────────────────────────────────────────

/// Win when every cell is empty; lose when an alien crosses the defense line
/// or no lives remain.  A decided outcome never changes.
pub fn check_outcome(wave: &Wave) -> Wave {
    if wave.outcome != Outcome::None {
        return wave.clone();
    }
    let half = wave.config.alien_height / 2.0;
    let outcome = if wave.aliens.is_empty() {
        Outcome::Win
    } else if wave.lives == 0
        || wave
            .aliens
            .iter()
            .any(|(_, alien)| alien.y - half < wave.defense_line)
    {
        Outcome::Lose
    } else {
        Outcome::None
    };

    if outcome != Outcome::None {
        info!("wave decided: {:?}", outcome);
    }
    Wave {
        outcome,
        ..wave.clone()
    }
}

/// Flip the mute flag on the frame the mute key goes down.
pub fn toggle_mute(wave: &Wave, input: &FrameInput) -> Wave {
    let pressed = input.mute && !wave.last_mute;
    Wave {
        muted: wave.muted ^ pressed,
        last_mute: input.mute,
        ..wave.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ───────────────────────────

/// Advance the wave by one frame of `dt` seconds.  All randomness comes
/// through `rng` so callers control determinism (useful for tests with a
/// seeded RNG).  A decided wave is returned unchanged.
pub fn tick(wave: &Wave, input: &FrameInput, dt: f64, rng: &mut impl Rng) -> Wave {
    if wave.outcome != Outcome::None {
        return wave.clone();
    }
    let mut next = wave.clone();
    next.sounds.clear();

    // ── 1. Ship: explode, or move / fire / advance bolts ─────────────────────
    // Bolts hold still while the ship is exploding or gone.
    let ship_dying = next.ship.as_ref().map(|ship| ship.dying.is_some());
    let next = match ship_dying {
        Some(true) => advance_ship_death(&next, dt),
        Some(false) => {
            let next = move_ship(&next, input);
            let next = player_fire(&next, input);
            move_bolts(&next)
        }
        None => next,
    };

    // ── 2. Aliens: explode, march, fire ──────────────────────────────────────
    let next = advance_alien_deaths(&next, dt);
    let next = march(&next, dt);
    let next = alien_fire(&next, rng);

    // ── 3. Collisions ────────────────────────────────────────────────────────
    let next = destroy_aliens(&next);
    let next = destroy_ship(&next);

    // ── 4. Outcome & mute ────────────────────────────────────────────────────
    let next = check_outcome(&next);
    toggle_mute(&next, input)
}
