/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// wave.  No game logic is performed; this module only maps world
/// coordinates (y up, pixels) onto terminal cells (y down) and translates
/// the wave into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use alien_invaders::entities::{Alien, Bolt, Outcome, Ship, Wave};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_ALIENS: Color = Color::Green;
const C_HUD_MUTED: Color = Color::DarkGrey;
const C_SHIP: Color = Color::White;
const C_SHIP_EXPLODING: Color = Color::Yellow;
const C_ALIEN_SETS: [Color; 3] = [Color::Green, Color::Cyan, Color::Magenta];
const C_ALIEN_EXPLODING: Color = Color::Yellow;
const C_BOLT_PLAYER: Color = Color::Cyan;
const C_BOLT_ALIEN: Color = Color::Magenta;
const C_DEFENSE_LINE: Color = Color::DarkRed;
const C_HINT: Color = Color::DarkGrey;

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Two walk poses for each of the three alien sprite sets.
const ALIEN_POSES: [[&str; 2]; 3] = [["/o\\", "\\o/"], ["{@}", "}@{"], ["<#>", ">#<"]];
const ALIEN_EXPLOSION: [&str; 4] = ["\\|/", "-*-", "/|\\", " . "];
const SHIP_EXPLOSION: [&str; 8] = [" * ", "\\*/", "-*-", "/*\\", "*#*", "#*#", " # ", " . "];

/// Terminal area the playfield is drawn into.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    /// Map a world point to a (column, row) inside the border.
    fn cell_for(&self, wave: &Wave, x: f64, y: f64) -> (u16, u16) {
        let inner_w = self.width.saturating_sub(2).max(1) as f64;
        let inner_h = self.height.saturating_sub(4).max(1) as f64;
        let col = (x / wave.config.game_width * inner_w).floor();
        let row = ((wave.config.game_height - y) / wave.config.game_height * inner_h).floor();
        let col = col.clamp(0.0, inner_w - 1.0) as u16 + 1;
        let row = row.clamp(0.0, inner_h - 1.0) as u16 + 2;
        (col, row)
    }
}

/// Full-screen message shown between or after waves.
pub enum Overlay<'a> {
    Paused,
    Complete(Outcome),
    Message(&'a [&'a str]),
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    wave: &Wave,
    view: Viewport,
    overlay: Option<Overlay>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, wave, view)?;
    draw_defense_line(out, wave, view)?;

    for (_, alien) in wave.aliens.iter() {
        draw_alien(out, wave, alien, view)?;
    }
    for bolt in &wave.bolts {
        draw_bolt(out, wave, bolt, view)?;
    }
    if let Some(ship) = &wave.ship {
        draw_ship(out, wave, ship, view)?;
    }

    draw_controls_hint(out, view)?;

    match overlay {
        Some(Overlay::Paused) => draw_box(
            out,
            view,
            &["SHIP DESTROYED", "", "S - Continue   Q - Quit"],
            Color::Yellow,
        )?,
        Some(Overlay::Complete(Outcome::Win)) => draw_box(
            out,
            view,
            &["WAVE CLEARED", "", "R - Next Wave   Q - Quit"],
            Color::Green,
        )?,
        Some(Overlay::Complete(_)) => draw_box(
            out,
            view,
            &["GAME  OVER", "", "R - Play Again   Q - Quit"],
            Color::Red,
        )?,
        Some(Overlay::Message(lines)) => draw_box(out, view, lines, Color::Cyan)?,
        None => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, wave: &Wave, view: Viewport) -> std::io::Result<()> {
    // Remaining aliens — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_ALIENS))?;
    out.queue(Print(format!("Aliens:{:>3}", wave.aliens.alive_count())))?;

    // Mute indicator — centre
    if wave.muted {
        let tag = "[ MUTED ]";
        let mx = (view.width / 2).saturating_sub(tag.len() as u16 / 2);
        out.queue(cursor::MoveTo(mx, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_MUTED))?;
        out.queue(Print(tag))?;
    }

    // Lives — right
    let lives_str = format!("Lives:{}", "♥".repeat(wave.lives as usize));
    let rx = view
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

fn draw_defense_line<W: Write>(
    out: &mut W,
    wave: &Wave,
    view: Viewport,
) -> std::io::Result<()> {
    let (_, row) = view.cell_for(wave, 0.0, wave.defense_line);
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_DEFENSE_LINE))?;
    out.queue(Print("╌".repeat(view.width.saturating_sub(2) as usize)))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Print a 3-wide sprite centred on a cell, clipped to the inner columns.
fn print_centred<W: Write>(
    out: &mut W,
    view: Viewport,
    col: u16,
    row: u16,
    glyph: &str,
) -> std::io::Result<()> {
    let lx = col.saturating_sub(1).max(1);
    let lx = lx.min(view.width.saturating_sub(4).max(1));
    out.queue(cursor::MoveTo(lx, row))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_alien<W: Write>(
    out: &mut W,
    wave: &Wave,
    alien: &Alien,
    view: Viewport,
) -> std::io::Result<()> {
    let (col, row) = view.cell_for(wave, alien.x, alien.y);
    let set = alien.image_set % ALIEN_POSES.len();
    if alien.dying.is_some() {
        let frame = (alien.frame as usize).min(ALIEN_EXPLOSION.len() - 1);
        out.queue(style::SetForegroundColor(C_ALIEN_EXPLODING))?;
        print_centred(out, view, col, row, ALIEN_EXPLOSION[frame])
    } else {
        out.queue(style::SetForegroundColor(C_ALIEN_SETS[set]))?;
        print_centred(out, view, col, row, ALIEN_POSES[set][(alien.frame % 2) as usize])
    }
}

fn draw_ship<W: Write>(
    out: &mut W,
    wave: &Wave,
    ship: &Ship,
    view: Viewport,
) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← row y-1    (tip)
    //  /█\      ← row y      (fuselage + wings)
    let (col, row) = view.cell_for(wave, ship.x, ship.y);
    if ship.dying.is_some() {
        let frame = (ship.frame.saturating_sub(1) as usize).min(SHIP_EXPLOSION.len() - 1);
        out.queue(style::SetForegroundColor(C_SHIP_EXPLODING))?;
        return print_centred(out, view, col, row, SHIP_EXPLOSION[frame]);
    }

    out.queue(style::SetForegroundColor(C_SHIP))?;
    if row > 2 {
        out.queue(cursor::MoveTo(col, row - 1))?;
        out.queue(Print("▲"))?;
    }
    print_centred(out, view, col, row, "/█\\")
}

fn draw_bolt<W: Write>(
    out: &mut W,
    wave: &Wave,
    bolt: &Bolt,
    view: Viewport,
) -> std::io::Result<()> {
    let (col, row) = view.cell_for(wave, bolt.x, bolt.y);
    out.queue(cursor::MoveTo(col, row))?;
    if bolt.is_player_bolt() {
        out.queue(style::SetForegroundColor(C_BOLT_PLAYER))?;
        out.queue(Print("║"))?;
    } else {
        out.queue(style::SetForegroundColor(C_BOLT_ALIEN))?;
        out.queue(Print("↓"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Fire   M : Mute   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_box<W: Write>(
    out: &mut W,
    view: Viewport,
    lines: &[&str],
    color: Color,
) -> std::io::Result<()> {
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    let cx = view.width / 2;
    let total_rows = lines.len() as u16 + 2;
    let start_row = (view.height / 2).saturating_sub(total_rows / 2);
    let col = cx.saturating_sub(inner as u16 / 2 + 1);

    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, start_row))?;
    out.queue(Print(format!("╔{}╗", "═".repeat(inner))))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(col, start_row + 1 + i as u16))?;
        out.queue(Print(format!("║{:^width$}║", line, width = inner)))?;
    }
    out.queue(cursor::MoveTo(col, start_row + 1 + lines.len() as u16))?;
    out.queue(Print(format!("╚{}╝", "═".repeat(inner))))?;
    Ok(())
}
