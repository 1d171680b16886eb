use crate::config::HIT_LINE_Y;
use crate::core::input::Lane;
use crate::game::note::{ActiveNote, TimelineNote};
use log::debug;

/// Maximum distance from the hit line, in pixels, that still counts as a hit.
pub const HIT_WINDOW_PIXELS: f32 = 60.0;
pub const HIT_REWARD: u32 = 100;
pub const MISS_PENALTY: u32 = 5;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    Hit {
        note_index: usize,
        pitch: u8,
        /// Signed distance from the hit line; positive means late.
        offset_px: f32,
    },
    Miss,
}

impl Outcome {
    #[inline(always)]
    pub fn is_hit(&self) -> bool {
        matches!(self, Outcome::Hit { .. })
    }
}

/// Judges a press on `lane` against this tick's active notes.
///
/// The first unhit note in timeline order that lies inside the hit window is
/// marked hit; that is the only mutation. A miss marks nothing, so the note
/// can still be hit later while it stays in the window.
pub fn judge(lane: Lane, active: &[ActiveNote], timeline: &mut [TimelineNote]) -> Outcome {
    let lane_index = lane.index();
    for candidate in active.iter().filter(|a| a.lane == lane_index) {
        let Some(note) = timeline.get_mut(candidate.note_index) else {
            continue;
        };
        if note.hit {
            continue;
        }

        let offset_px = candidate.y - HIT_LINE_Y;
        if offset_px.abs() < HIT_WINDOW_PIXELS {
            note.hit = true;
            debug!(
                "HIT: note {}, lane {}, pitch {}, offset {:.1}px",
                candidate.note_index, lane_index, note.pitch, offset_px
            );
            return Outcome::Hit {
                note_index: candidate.note_index,
                pitch: note.pitch,
                offset_px,
            };
        }
    }

    debug!("MISS: lane {}", lane_index);
    Outcome::Miss
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::scroll::ScrollWindow;

    fn two_note_timeline() -> Vec<TimelineNote> {
        vec![TimelineNote::new(0.0, 0, 60), TimelineNote::new(0.5, 1, 61)]
    }

    #[test]
    fn press_on_hit_line_hits() {
        let mut timeline = two_note_timeline();
        let mut window = ScrollWindow::new();
        let active = window.update(&timeline, 0.0, 300.0).to_vec();

        let outcome = judge(Lane::First, &active, &mut timeline);
        assert_eq!(
            outcome,
            Outcome::Hit {
                note_index: 0,
                pitch: 60,
                offset_px: 0.0
            }
        );
        assert!(timeline[0].hit);
        assert!(!timeline[1].hit);
    }

    #[test]
    fn press_outside_window_misses_without_consuming() {
        let mut timeline = two_note_timeline();
        let mut window = ScrollWindow::new();
        let active = window.update(&timeline, 0.0, 300.0).to_vec();

        // Note 1 is visible but 150px above the line.
        assert_eq!(judge(Lane::Second, &active, &mut timeline), Outcome::Miss);
        assert!(!timeline[1].hit);

        let active = window.update(&timeline, 0.5, 300.0).to_vec();
        assert!(judge(Lane::Second, &active, &mut timeline).is_hit());
    }

    #[test]
    fn a_note_is_hit_at_most_once() {
        let mut timeline = two_note_timeline();
        let mut window = ScrollWindow::new();
        let active = window.update(&timeline, 0.0, 300.0).to_vec();

        assert!(judge(Lane::First, &active, &mut timeline).is_hit());
        // The view still says unhit; the timeline is authoritative.
        assert_eq!(judge(Lane::First, &active, &mut timeline), Outcome::Miss);
    }

    #[test]
    fn window_edge_is_exclusive() {
        let mut timeline = vec![TimelineNote::new(0.2, 2, 62)];
        let active = vec![ActiveNote {
            note_index: 0,
            lane: 2,
            y: HIT_LINE_Y - HIT_WINDOW_PIXELS,
            hit: false,
        }];
        assert_eq!(judge(Lane::Third, &active, &mut timeline), Outcome::Miss);
    }

    #[test]
    fn earliest_qualifying_note_wins() {
        let mut timeline = vec![TimelineNote::new(0.0, 3, 63), TimelineNote::new(0.1, 3, 67)];
        let active = vec![
            ActiveNote { note_index: 0, lane: 3, y: HIT_LINE_Y + 30.0, hit: false },
            ActiveNote { note_index: 1, lane: 3, y: HIT_LINE_Y, hit: false },
        ];
        let outcome = judge(Lane::Fourth, &active, &mut timeline);
        assert!(matches!(outcome, Outcome::Hit { note_index: 0, .. }));
    }
}
