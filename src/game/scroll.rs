use crate::config::{HIT_LINE_Y, SCREEN_HEIGHT};
use crate::game::note::{ActiveNote, TimelineNote};
use log::error;

/// Notes become active once they are this far above the top edge.
pub const ENTER_MARGIN: f32 = 60.0;
/// And retire once they are this far below the bottom edge.
pub const EXIT_MARGIN: f32 = 60.0;

/// Screen-space y of a note. Positive speed scrolls notes downwards onto the
/// hit line; a note sits exactly on the line at its start time.
#[inline(always)]
pub fn note_y(start_time: f32, play_time: f32, speed: f32) -> f32 {
    HIT_LINE_Y - (start_time - play_time) * speed
}

/// Sliding window over a sorted timeline. The cursor only moves forward, so
/// each tick touches just the active notes plus whatever newly scrolled in.
#[derive(Debug, Default, Clone)]
pub struct ScrollWindow {
    cursor: usize,
    active: Vec<ActiveNote>,
}

impl ScrollWindow {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn active(&self) -> &[ActiveNote] {
        &self.active
    }

    /// True once every note has been activated and has scrolled off.
    pub fn is_exhausted(&self, timeline_len: usize) -> bool {
        self.cursor >= timeline_len && self.active.is_empty()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.active.clear();
    }

    /// Recomputes positions purely from `(play_time, speed)`, retires notes
    /// that fell below the screen and admits notes that reached the top.
    /// Hit notes stay in the window until they scroll off.
    pub fn update(&mut self, timeline: &[TimelineNote], play_time: f32, speed: f32) -> &[ActiveNote] {
        let previous_cursor = self.cursor;
        let exit_y = SCREEN_HEIGHT + EXIT_MARGIN;

        self.active.retain_mut(|active| {
            let Some(note) = timeline.get(active.note_index) else {
                return false;
            };
            active.y = note_y(note.start_time, play_time, speed);
            active.hit = note.hit;
            active.y <= exit_y
        });

        while let Some(note) = timeline.get(self.cursor) {
            let y = note_y(note.start_time, play_time, speed);
            if y < -ENTER_MARGIN {
                break;
            }
            // A long tick can carry a note straight past the screen; it is
            // consumed without ever becoming active.
            if y <= exit_y {
                self.active.push(ActiveNote {
                    note_index: self.cursor,
                    lane: note.lane,
                    y,
                    hit: note.hit,
                });
            }
            self.cursor += 1;
        }

        if self.cursor < previous_cursor {
            error!(
                "Scroll cursor moved backwards ({} -> {}).",
                previous_cursor, self.cursor
            );
            debug_assert!(false, "scroll cursor regressed");
        }
        &self.active
    }
}
