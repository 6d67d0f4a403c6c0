//! Time-driven death animations.
//!
//! An animation is advanced once per frame with the elapsed time and reports
//! either the sprite frame to show or that it has finished.

/// Explosion frames of the ship sprite start after the idle frame.
pub const SHIP_DEATH_FIRST_FRAME: u32 = 1;
pub const SHIP_DEATH_FRAME_SPAN: u32 = 7;

pub const ALIEN_DEATH_FIRST_FRAME: u32 = 0;
pub const ALIEN_DEATH_FRAME_SPAN: u32 = 3;

#[derive(Clone, Debug, PartialEq)]
pub enum AnimationStep {
    Running { frame: u32 },
    Done,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub elapsed: f64,
    pub duration: f64,
    pub first_frame: u32,
    pub frame_span: u32,
}

impl Animation {
    pub fn new(duration: f64, first_frame: u32, frame_span: u32) -> Self {
        Animation {
            elapsed: 0.0,
            duration,
            first_frame,
            frame_span,
        }
    }

    pub fn ship_death(duration: f64) -> Self {
        Self::new(duration, SHIP_DEATH_FIRST_FRAME, SHIP_DEATH_FRAME_SPAN)
    }

    pub fn alien_death(duration: f64) -> Self {
        Self::new(duration, ALIEN_DEATH_FIRST_FRAME, ALIEN_DEATH_FRAME_SPAN)
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, dt: f64) -> AnimationStep {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            return AnimationStep::Done;
        }
        let progress = self.elapsed / self.duration;
        let offset = (progress * self.frame_span as f64).round() as u32;
        AnimationStep::Running {
            frame: self.first_frame + offset.min(self.frame_span),
        }
    }
}
