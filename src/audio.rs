use std::io::Write;

use alien_invaders::entities::SoundEffect;
use crossterm::{style::Print, QueueableCommand};
use log::debug;

/// Play the cues raised by the latest tick.  The terminal only gets a bell,
/// one per frame at most.
pub fn play<W: Write>(out: &mut W, sounds: &[SoundEffect]) -> std::io::Result<()> {
    for sound in sounds {
        debug!("sound cue {} ({:?})", sound.sample(), sound);
    }
    if !sounds.is_empty() {
        out.queue(Print('\u{7}'))?;
    }
    Ok(())
}
