use crate::config::Config;
use std::fmt;

pub const SCROLL_SPEED_MIN: f32 = 100.0;
pub const SCROLL_SPEED_MAX: f32 = 700.0;
pub const SCROLL_SPEED_STEP: f32 = 50.0;

pub const BPM_MIN: f32 = 60.0;
pub const BPM_MAX: f32 = 300.0;
pub const BPM_STEP: f32 = 10.0;

/// Player-adjustable settings. Only bounded steps can change them, so they
/// can never hold an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    scroll_speed: f32,
    bpm: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scroll_speed: 300.0,
            bpm: 120.0,
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} px/s @ {} BPM", self.scroll_speed.round() as i32, self.bpm.round() as i32)
    }
}

/// Clamps into range and rounds onto the step grid starting at `min`.
fn snap(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let clamped = value.clamp(min, max);
    (min + ((clamped - min) / step).round() * step).clamp(min, max)
}

fn stepped(value: f32, delta: f32, min: f32, max: f32) -> f32 {
    (value + delta).clamp(min, max)
}

impl Settings {
    /// Starting values from the config file, forced onto the step grid.
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        let speed = if config.scroll_speed.is_finite() { config.scroll_speed } else { defaults.scroll_speed };
        let bpm = if config.bpm.is_finite() { config.bpm } else { defaults.bpm };
        Self {
            scroll_speed: snap(speed, SCROLL_SPEED_MIN, SCROLL_SPEED_MAX, SCROLL_SPEED_STEP),
            bpm: snap(bpm, BPM_MIN, BPM_MAX, BPM_STEP),
        }
    }

    #[inline(always)]
    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    #[inline(always)]
    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn increase_speed(&mut self) {
        self.scroll_speed = stepped(self.scroll_speed, SCROLL_SPEED_STEP, SCROLL_SPEED_MIN, SCROLL_SPEED_MAX);
    }

    pub fn decrease_speed(&mut self) {
        self.scroll_speed = stepped(self.scroll_speed, -SCROLL_SPEED_STEP, SCROLL_SPEED_MIN, SCROLL_SPEED_MAX);
    }

    pub fn increase_bpm(&mut self) {
        self.bpm = stepped(self.bpm, BPM_STEP, BPM_MIN, BPM_MAX);
    }

    pub fn decrease_bpm(&mut self) {
        self.bpm = stepped(self.bpm, -BPM_STEP, BPM_MIN, BPM_MAX);
    }
}
