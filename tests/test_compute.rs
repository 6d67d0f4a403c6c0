use alien_invaders::animation::Animation;
use alien_invaders::compute::*;
use alien_invaders::config::GameConfig;
use alien_invaders::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f64 = 1.0 / 30.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_wave() -> Wave {
    init_wave(GameConfig::default(), &mut seeded_rng())
}

fn alien_at(x: f64, y: f64) -> Alien {
    Alien {
        x,
        y,
        image_set: 0,
        frame: 0,
        dying: None,
    }
}

/// A wave whose grid holds a single alien at (row 0, col 0).
fn wave_with_one_alien(x: f64, y: f64) -> Wave {
    let mut w = make_wave();
    w.aliens = AlienGrid::new(5, 12);
    w.aliens.set(0, 0, alien_at(x, y));
    w
}

fn fire_pressed() -> FrameInput {
    FrameInput {
        fire: true,
        ..FrameInput::default()
    }
}

// ── init_wave ─────────────────────────────────────────────────────────────────

#[test]
fn init_wave_grid_layout() {
    let w = make_wave();
    assert_eq!(w.aliens.rows(), 5);
    assert_eq!(w.aliens.cols(), 12);
    assert_eq!(w.aliens.alive_count(), 60);

    let first = w.aliens.get(0, 0).unwrap();
    assert_eq!(first.x, 32.5); // h_sep + width/2
    assert_eq!(first.y, 583.5); // height - ceiling - height/2

    let last = w.aliens.get(4, 11).unwrap();
    assert_eq!(last.x, 32.5 + 11.0 * 49.0);
    assert_eq!(last.y, 583.5 - 4.0 * 49.0);
}

#[test]
fn init_wave_with_zero_bolt_rate_does_not_panic() {
    let config = GameConfig {
        bolt_rate: 0,
        ..GameConfig::default()
    };
    let w = init_wave(config, &mut seeded_rng());
    assert_eq!(w.fire_after, 0);
}

#[test]
fn init_wave_image_sets_change_every_two_rows() {
    let w = make_wave();
    let sets: Vec<usize> = (0..5).map(|r| w.aliens.get(r, 0).unwrap().image_set).collect();
    assert_eq!(sets, vec![0, 0, 1, 1, 2]);
}

#[test]
fn init_wave_ship_and_counters() {
    let w = make_wave();
    let ship = w.ship.as_ref().unwrap();
    assert_eq!((ship.x, ship.y), (400.0, 32.0));
    assert_eq!(w.lives, 3);
    assert_eq!(w.outcome, Outcome::None);
    assert_eq!(w.direction, MarchDirection::Right);
    assert!(w.fire_after < 5);
    assert!(w.bolts.is_empty());
}

// ── move_ship ─────────────────────────────────────────────────────────────────

#[test]
fn move_ship_left_and_right() {
    let w = make_wave();
    let left = move_ship(&w, &FrameInput { left: true, ..FrameInput::default() });
    assert_eq!(left.ship.unwrap().x, 395.0);
    let right = move_ship(&w, &FrameInput { right: true, ..FrameInput::default() });
    assert_eq!(right.ship.unwrap().x, 405.0);
}

#[test]
fn move_ship_clamps_to_playfield() {
    let mut w = make_wave();
    w.ship.as_mut().unwrap().x = 24.0;
    let w2 = move_ship(&w, &FrameInput { left: true, ..FrameInput::default() });
    assert_eq!(w2.ship.unwrap().x, 22.0); // half the ship width

    w.ship.as_mut().unwrap().x = 776.0;
    let w3 = move_ship(&w, &FrameInput { right: true, ..FrameInput::default() });
    assert_eq!(w3.ship.unwrap().x, 778.0);
}

#[test]
fn move_ship_does_not_mutate_original() {
    let w = make_wave();
    let _ = move_ship(&w, &FrameInput { left: true, ..FrameInput::default() });
    assert_eq!(w.ship.unwrap().x, 400.0);
}

// ── player_fire ───────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_bolt_above_ship() {
    let w = player_fire(&make_wave(), &fire_pressed());
    assert_eq!(w.bolts, vec![Bolt { x: 400.0, y: 76.0, velocity: 10.0 }]);
    assert_eq!(w.sounds, vec![SoundEffect::Fire]);
}

#[test]
fn fire_is_edge_triggered() {
    let w = player_fire(&make_wave(), &fire_pressed());
    let mut held = w.clone();
    held.bolts.clear();
    let held = player_fire(&held, &fire_pressed());
    assert!(held.bolts.is_empty());
}

#[test]
fn fire_blocked_while_player_bolt_on_screen() {
    let w = player_fire(&make_wave(), &fire_pressed());
    let released = player_fire(&w, &FrameInput::default());
    let again = player_fire(&released, &fire_pressed());
    assert_eq!(player_bolt_count(&again), 1);
}

#[test]
fn fire_not_blocked_by_alien_bolts() {
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 100.0, y: 300.0, velocity: -10.0 });
    let w2 = player_fire(&w, &fire_pressed());
    assert_eq!(player_bolt_count(&w2), 1);
    assert_eq!(w2.bolts.len(), 2);
}

#[test]
fn muted_wave_fires_silently() {
    let mut w = make_wave();
    w.muted = true;
    let w2 = player_fire(&w, &fire_pressed());
    assert_eq!(w2.bolts.len(), 1);
    assert!(w2.sounds.is_empty());
}

// ── move_bolts ────────────────────────────────────────────────────────────────

#[test]
fn bolts_move_by_their_velocity() {
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 10.0, y: 300.0, velocity: 10.0 });
    w.bolts.push(Bolt { x: 20.0, y: 300.0, velocity: -10.0 });
    let w2 = move_bolts(&w);
    for (before, after) in w.bolts.iter().zip(&w2.bolts) {
        assert_eq!(after.y - before.y, before.velocity);
        assert_eq!(after.x, before.x);
    }
}

#[test]
fn bolts_leaving_the_top_are_removed() {
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 10.0, y: 700.0, velocity: 10.0 }); // bottom edge 702 > 700
    w.bolts.push(Bolt { x: 20.0, y: 690.0, velocity: 10.0 }); // bottom edge 692
    let w2 = move_bolts(&w);
    assert_eq!(w2.bolts, vec![Bolt { x: 20.0, y: 700.0, velocity: 10.0 }]);
}

#[test]
fn bolts_leaving_the_bottom_are_removed() {
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 10.0, y: 0.0, velocity: -10.0 }); // top edge -2 < 0
    w.bolts.push(Bolt { x: 20.0, y: 10.0, velocity: -10.0 }); // top edge 8
    let w2 = move_bolts(&w);
    assert_eq!(w2.bolts, vec![Bolt { x: 20.0, y: 0.0, velocity: -10.0 }]);
}

// ── march ─────────────────────────────────────────────────────────────────────

#[test]
fn march_waits_for_alien_speed() {
    let w = make_wave();
    let w2 = march(&w, 0.5);
    assert_eq!(w2.march_time, 0.5);
    assert_eq!(w2.aliens.get(0, 0).unwrap().x, 32.5);
    assert_eq!(w2.steps, 0);
}

#[test]
fn march_steps_right_and_toggles_pose() {
    let w = march(&march(&make_wave(), 0.5), 0.6);
    let alien = w.aliens.get(0, 0).unwrap();
    assert_eq!(alien.x, 40.5);
    assert_eq!(alien.frame, 1);
    assert_eq!(w.steps, 1);
    assert_eq!(w.march_time, 0.0);

    let w = march(&w, 1.5);
    assert_eq!(w.aliens.get(0, 0).unwrap().frame, 0);
}

#[test]
fn march_drops_and_reverses_at_right_edge() {
    let w = wave_with_one_alien(770.0, 400.0); // right edge 786.5 >= 784

    let w = march(&w, 1.5);
    let alien = w.aliens.get(0, 0).unwrap();
    assert_eq!((alien.x, alien.y), (770.0, 384.0));
    assert_eq!(w.direction, MarchDirection::SwitchLeft);

    let w = march(&w, 1.5);
    assert_eq!(w.aliens.get(0, 0).unwrap().x, 753.5); // half-width nudge
    assert_eq!(w.direction, MarchDirection::Left);

    let w = march(&w, 1.5);
    assert_eq!(w.aliens.get(0, 0).unwrap().x, 745.5);
}

#[test]
fn march_drops_and_reverses_at_left_edge() {
    let mut w = wave_with_one_alien(30.0, 400.0); // left edge 13.5 < 16
    w.direction = MarchDirection::Left;

    let w = march(&w, 1.5);
    assert_eq!(w.aliens.get(0, 0).unwrap().y, 384.0);
    assert_eq!(w.direction, MarchDirection::SwitchRight);

    let w = march(&w, 1.5);
    assert_eq!(w.aliens.get(0, 0).unwrap().x, 46.5);
    assert_eq!(w.direction, MarchDirection::Right);
}

#[test]
fn alien_at_edge_ignores_far_aliens() {
    let w = wave_with_one_alien(400.0, 400.0);
    assert!(!alien_at_edge(&w, MarchDirection::Right));
    assert!(!alien_at_edge(&w, MarchDirection::Left));
}

// ── alien_fire ────────────────────────────────────────────────────────────────

#[test]
fn aliens_hold_fire_until_enough_steps() {
    let mut w = make_wave();
    w.steps = w.fire_after;
    let w2 = alien_fire(&w, &mut seeded_rng());
    assert!(w2.bolts.is_empty());
}

#[test]
fn lowest_alien_in_column_fires_down() {
    let mut w = make_wave();
    w.aliens = AlienGrid::new(5, 12);
    w.aliens.set(0, 3, alien_at(100.0, 500.0));
    w.aliens.set(2, 3, alien_at(100.0, 402.0));
    w.fire_after = 0;
    w.steps = 1;

    let w2 = alien_fire(&w, &mut seeded_rng());
    assert_eq!(w2.bolts, vec![Bolt { x: 100.0, y: 369.0, velocity: -10.0 }]);
    assert_eq!(w2.steps, 0);
    assert!(w2.fire_after < 5);
}

#[test]
fn empty_grid_fires_nothing() {
    let mut w = make_wave();
    w.aliens = AlienGrid::new(5, 12);
    w.steps = 10;
    let w2 = alien_fire(&w, &mut seeded_rng());
    assert!(w2.bolts.is_empty());
    assert_eq!(w2.steps, 0);
}

#[test]
fn alien_fire_is_reproducible_with_a_seed() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(7);
        let mut w = init_wave(GameConfig::default(), &mut rng);
        let mut shots = Vec::new();
        for _ in 0..10 {
            w.steps = w.fire_after + 1;
            w = alien_fire(&w, &mut rng);
            shots.push((w.bolts.last().unwrap().x, w.fire_after));
        }
        shots
    };
    assert_eq!(run(), run());
}

#[test]
fn tick_is_reproducible_with_a_seed() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(99);
        let mut w = init_wave(GameConfig::default(), &mut rng);
        for _ in 0..600 {
            w = tick(&w, &FrameInput::default(), DT, &mut rng);
        }
        (w.bolts, w.lives, w.fire_after)
    };
    assert_eq!(run(), run());
}

// ── collisions ────────────────────────────────────────────────────────────────

#[test]
fn player_bolt_destroys_alien() {
    let mut w = wave_with_one_alien(300.0, 400.0);
    w.bolts.push(Bolt { x: 300.0, y: 400.0, velocity: 10.0 });
    let w2 = destroy_aliens(&w);
    assert!(w2.bolts.is_empty());
    assert!(w2.aliens.get(0, 0).unwrap().dying.is_some());
    assert_eq!(w2.sounds, vec![SoundEffect::AlienDestroyed]);
}

#[test]
fn alien_bolt_passes_through_aliens() {
    let mut w = wave_with_one_alien(300.0, 400.0);
    w.bolts.push(Bolt { x: 300.0, y: 400.0, velocity: -10.0 });
    let w2 = destroy_aliens(&w);
    assert_eq!(w2.bolts.len(), 1);
    assert!(w2.aliens.get(0, 0).unwrap().dying.is_none());
}

#[test]
fn dying_alien_is_not_hit_again() {
    let mut w = wave_with_one_alien(300.0, 400.0);
    w.aliens.get_mut(0, 0).unwrap().dying = Some(Animation::alien_death(0.3));
    w.bolts.push(Bolt { x: 300.0, y: 400.0, velocity: 10.0 });
    let w2 = destroy_aliens(&w);
    assert_eq!(w2.bolts.len(), 1);
}

#[test]
fn dead_alien_cell_is_emptied_after_animation() {
    let mut w = wave_with_one_alien(300.0, 400.0);
    w.bolts.push(Bolt { x: 300.0, y: 400.0, velocity: 10.0 });
    let w = destroy_aliens(&w);

    let w = advance_alien_deaths(&w, 0.1);
    assert!(w.aliens.get(0, 0).is_some());
    let w = advance_alien_deaths(&w, 0.25);
    assert!(w.aliens.get(0, 0).is_none());
    assert_eq!(w.aliens.rows(), 5);
    assert_eq!(w.aliens.cols(), 12);
}

#[test]
fn two_aliens_explode_independently() {
    let mut w = wave_with_one_alien(300.0, 400.0);
    w.aliens.set(0, 1, alien_at(500.0, 400.0));

    w.bolts.push(Bolt { x: 300.0, y: 400.0, velocity: 10.0 });
    let w = destroy_aliens(&w);
    let w = advance_alien_deaths(&w, 0.1);

    let mut w = w;
    w.bolts.push(Bolt { x: 500.0, y: 400.0, velocity: 10.0 });
    let w = destroy_aliens(&w);
    assert!(w.aliens.get(0, 0).unwrap().dying.is_some());
    assert!(w.aliens.get(0, 1).unwrap().dying.is_some());

    // First explosion ends; the second is still playing.
    let w = advance_alien_deaths(&w, 0.25);
    assert!(w.aliens.get(0, 0).is_none());
    assert!(w.aliens.get(0, 1).is_some());

    let w = advance_alien_deaths(&w, 0.1);
    assert!(w.aliens.is_empty());
}

#[test]
fn alien_bolt_destroys_ship() {
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 400.0, y: 40.0, velocity: -10.0 });
    let w2 = destroy_ship(&w);
    assert!(w2.bolts.is_empty());
    assert_eq!(w2.lives, 2);
    assert!(w2.ship.unwrap().dying.is_some());
    assert_eq!(w2.sounds, vec![SoundEffect::ShipDestroyed { lives_left: 3 }]);
}

#[test]
fn exploding_ship_is_not_hit_again() {
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 400.0, y: 40.0, velocity: -10.0 });
    w.bolts.push(Bolt { x: 400.0, y: 45.0, velocity: -10.0 });
    let w = destroy_ship(&w);
    let w = destroy_ship(&w);
    assert_eq!(w.lives, 2);
    assert_eq!(w.bolts.len(), 1);
}

#[test]
fn player_bolt_does_not_hit_ship() {
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 400.0, y: 40.0, velocity: 10.0 });
    let w2 = destroy_ship(&w);
    assert_eq!(w2.lives, 3);
    assert_eq!(w2.bolts.len(), 1);
}

#[test]
fn ship_death_removes_ship_and_clears_bolts() {
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 400.0, y: 40.0, velocity: -10.0 });
    let mut w = destroy_ship(&w);
    w.bolts.push(Bolt { x: 100.0, y: 300.0, velocity: -10.0 });

    let w = tick(&w, &FrameInput::default(), 0.1, &mut seeded_rng());
    assert!(w.ship.is_some());
    assert_eq!(w.bolts[0].y, 300.0); // frozen while the ship explodes

    let w = tick(&w, &FrameInput::default(), 0.25, &mut seeded_rng());
    assert!(w.ship.is_none());
    assert!(w.bolts.is_empty());
    assert_eq!(w.outcome, Outcome::None);
}

#[test]
fn respawn_ship_rules() {
    let mut w = make_wave();
    w.ship = None;
    w.lives = 2;
    let w2 = respawn_ship(&w);
    assert_eq!(w2.ship.unwrap().x, 400.0);

    w.lives = 0;
    assert!(respawn_ship(&w).ship.is_none());

    w.lives = 2;
    w.outcome = Outcome::Lose;
    assert!(respawn_ship(&w).ship.is_none());
}

#[test]
fn respawned_ship_fires_on_first_press() {
    let mut w = make_wave();
    w.ship = None;
    w.lives = 2;
    w.last_fire = true; // fire was held when the last ship went down
    let w = respawn_ship(&w);
    assert!(!w.last_fire);
    let w = player_fire(&w, &fire_pressed());
    assert_eq!(player_bolt_count(&w), 1);
}

// ── outcome ───────────────────────────────────────────────────────────────────

#[test]
fn empty_grid_wins() {
    let mut w = make_wave();
    w.aliens = AlienGrid::new(5, 12);
    assert_eq!(check_outcome(&w).outcome, Outcome::Win);
}

#[test]
fn alien_below_defense_line_loses() {
    let w = wave_with_one_alien(300.0, 110.0); // bottom edge 93.5
    assert_eq!(check_outcome(&w).outcome, Outcome::Lose);

    let w = wave_with_one_alien(300.0, 120.0); // bottom edge 103.5
    assert_eq!(check_outcome(&w).outcome, Outcome::None);
}

#[test]
fn no_lives_loses() {
    let mut w = make_wave();
    w.lives = 0;
    assert_eq!(check_outcome(&w).outcome, Outcome::Lose);
}

#[test]
fn last_life_lost_in_tick_loses_at_once() {
    let mut w = make_wave();
    w.lives = 1;
    w.bolts.push(Bolt { x: 400.0, y: 50.0, velocity: -10.0 });
    let w = tick(&w, &FrameInput::default(), DT, &mut seeded_rng());
    assert_eq!(w.lives, 0);
    assert_eq!(w.outcome, Outcome::Lose);
    assert!(w.ship.unwrap().dying.is_some()); // still exploding
}

#[test]
fn outcome_is_terminal() {
    let mut w = make_wave();
    w.aliens = AlienGrid::new(5, 12);
    let w = tick(&w, &FrameInput::default(), DT, &mut seeded_rng());
    assert_eq!(w.outcome, Outcome::Win);

    // Even a full grid below the line does not change a decided wave.
    let mut w = w;
    w.aliens.set(0, 0, alien_at(300.0, 50.0));
    let w = tick(&w, &fire_pressed(), DT, &mut seeded_rng());
    assert_eq!(w.outcome, Outcome::Win);
    assert!(w.bolts.is_empty());
}

// ── mute & sounds ─────────────────────────────────────────────────────────────

#[test]
fn mute_toggles_on_key_press() {
    let press = FrameInput { mute: true, ..FrameInput::default() };
    let w = toggle_mute(&make_wave(), &press);
    assert!(w.muted);
    let w = toggle_mute(&w, &press); // still held
    assert!(w.muted);
    let w = toggle_mute(&w, &FrameInput::default());
    let w = toggle_mute(&w, &press);
    assert!(!w.muted);
}

#[test]
fn tick_clears_sounds_from_previous_frame() {
    let w = tick(&make_wave(), &fire_pressed(), DT, &mut seeded_rng());
    assert_eq!(w.sounds, vec![SoundEffect::Fire]);
    let w = tick(&w, &fire_pressed(), DT, &mut seeded_rng());
    assert!(w.sounds.is_empty());
}

// ── tick invariants ───────────────────────────────────────────────────────────

#[test]
fn at_most_one_player_bolt_while_hammering_fire() {
    let mut rng = seeded_rng();
    let mut w = make_wave();
    for frame in 0..300 {
        let input = FrameInput {
            fire: frame % 2 == 0,
            ..FrameInput::default()
        };
        w = tick(&w, &input, DT, &mut rng);
        assert!(player_bolt_count(&w) <= 1);
        if w.outcome != Outcome::None {
            break;
        }
        if w.ship.is_none() {
            w = respawn_ship(&w);
        }
    }
}

#[test]
fn no_bolt_is_left_off_screen_after_tick() {
    let mut rng = seeded_rng();
    let mut w = make_wave();
    w.bolts.push(Bolt { x: 10.0, y: 699.0, velocity: 10.0 });
    w.bolts.push(Bolt { x: 20.0, y: -1.0, velocity: -10.0 });
    let w = tick(&w, &FrameInput::default(), DT, &mut rng);
    let half = w.config.bolt_height / 2.0;
    assert!(w
        .bolts
        .iter()
        .all(|b| b.y - half <= w.config.game_height && b.y + half >= 0.0));
    assert!(w.bolts.is_empty());
}
