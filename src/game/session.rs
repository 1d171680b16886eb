use crate::game::judgment::{Outcome, HIT_REWARD, MISS_PENALTY};

/// Per-play scoreboard. Created when play starts, dropped on return to the menu.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub play_time: f32,
    pub score: u32,
    pub hits: u32,
    pub misses: u32,
    pub max_score: u32,
}

impl Session {
    pub fn new(timeline_len: usize) -> Self {
        Self {
            max_score: (timeline_len as u32).saturating_mul(HIT_REWARD),
            ..Default::default()
        }
    }

    /// Hits add the reward; misses subtract the penalty, floored at zero.
    pub fn apply(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Hit { .. } => {
                self.score = self.score.saturating_add(HIT_REWARD);
                self.hits = self.hits.saturating_add(1);
            }
            Outcome::Miss => {
                self.score = self.score.saturating_sub(MISS_PENALTY);
                self.misses = self.misses.saturating_add(1);
            }
        }
    }

    pub fn score_percent(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        (self.score as f64 / self.max_score as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Share of presses that landed on a note.
    pub fn accuracy(&self) -> f64 {
        let presses = self.hits + self.misses;
        if presses == 0 {
            return 0.0;
        }
        self.hits as f64 / presses as f64 * 100.0
    }
}
