mod audio;
mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use alien_invaders::compute::{init_wave, respawn_ship, tick};
use alien_invaders::config::GameConfig;
use alien_invaders::entities::{Outcome, Wave};
use alien_invaders::input::HeldKeys;
use display::{Overlay, Viewport};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Used when no config path is given on the command line and it exists.
const DEFAULT_CONFIG: &str = "invaders.toml";

const WELCOME: &[&str] = &[
    "★  ALIEN  INVADERS  ★",
    "",
    "Stop the aliens before they cross the line",
    "",
    "Press any key to start",
];

// ── Screens ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum Screen {
    Welcome,
    Active,
    /// Ship lost with lives to spare; waiting for the player to continue.
    Paused,
    Complete,
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, `HeldKeys`
/// records the frame of the last press/repeat event for every key.  Each
/// frame the keys still "fresh" become the `FrameInput` handed to the wave,
/// which does its own edge detection for firing and muting.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let mut wave: Wave = init_wave(config.clone(), rng);
    let mut screen = Screen::Welcome;

    let mut keys = HeldKeys::new();
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).as_secs_f64();
        last_frame = frame_start;
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    keys.press(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ if screen == Screen::Welcome => {
                            info!("wave started");
                            screen = Screen::Active;
                        }
                        KeyCode::Char('s') | KeyCode::Char('S') if screen == Screen::Paused => {
                            wave = respawn_ship(&wave);
                            info!("ship respawned, {} lives left", wave.lives);
                            screen = Screen::Active;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if screen == Screen::Complete => {
                            wave = init_wave(config.clone(), rng);
                            info!("wave started");
                            screen = Screen::Active;
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => keys.repeat(code, frame),
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => keys.release(&code),
            }
        }

        // ── Advance the wave ──────────────────────────────────────────────────
        // Built every frame so presses on other screens never carry over.
        let input = keys.frame_input(frame);
        if screen == Screen::Active {
            wave = tick(&wave, &input, dt, rng);
            audio::play(out, &wave.sounds)?;

            if wave.outcome != Outcome::None {
                screen = Screen::Complete;
            } else if wave.ship.is_none() {
                screen = Screen::Paused;
            }
        }

        let (width, height) = terminal::size()?;
        let overlay = match screen {
            Screen::Welcome => Some(Overlay::Message(WELCOME)),
            Screen::Active => None,
            Screen::Paused => Some(Overlay::Paused),
            Screen::Complete => Some(Overlay::Complete(wave.outcome)),
        };
        display::render(out, &wave, Viewport { width, height }, overlay)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Log to a file: stderr would draw over the game screen.
fn init_logging() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("alien_invaders.log");
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_config() -> anyhow::Result<GameConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading config from '{}'", path);
            GameConfig::load(&path).with_context(|| format!("failed to load config '{}'", path))
        }
        None if Path::new(DEFAULT_CONFIG).exists() => {
            info!("Loading config from '{}'", DEFAULT_CONFIG);
            GameConfig::load(DEFAULT_CONFIG)
                .with_context(|| format!("failed to load config '{}'", DEFAULT_CONFIG))
        }
        None => {
            info!("No config file, using defaults");
            Ok(GameConfig::default())
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let config = load_config()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("Alien Invaders init");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &rx, config, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("Alien Invaders exit");
    result.context("terminal I/O failed")
}
