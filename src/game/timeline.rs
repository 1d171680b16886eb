use crate::config::LANES;
use crate::game::note::{TimelineNote, Track};
use log::{debug, warn};

/// Tempo at which raw onsets are expressed.
pub const REFERENCE_BPM: f32 = 120.0;
/// Minimum spacing between two notes in the same lane. Anything closer is
/// dropped as unplayable.
pub const DEBOUNCE_SECONDS: f32 = 0.05;

#[inline(always)]
pub fn lane_for_pitch(pitch: u8) -> usize {
    pitch as usize % LANES
}

/// Flattens the selected tracks into a sorted, lane-assigned, tempo-scaled
/// and debounced timeline. Returns an empty timeline when nothing is
/// selected or `bpm` is not a positive tempo; the caller must then refuse to
/// start playing.
pub fn build(tracks: &[Track], bpm: f32) -> Vec<TimelineNote> {
    if !bpm.is_finite() || bpm <= 0.0 {
        warn!("Refusing to build a timeline at {} BPM.", bpm);
        return Vec::new();
    }
    let scale = REFERENCE_BPM / bpm;

    let mut notes: Vec<TimelineNote> = tracks
        .iter()
        .filter(|track| track.selected)
        .flat_map(|track| track.notes.iter())
        .map(|raw| TimelineNote::new(raw.onset_seconds * scale, lane_for_pitch(raw.pitch), raw.pitch))
        .collect();
    let raw_count = notes.len();

    // sort_by is stable: equal start times keep track order.
    notes.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut last_accepted = [f32::NEG_INFINITY; LANES];
    notes.retain(|note| {
        if note.start_time - last_accepted[note.lane] > DEBOUNCE_SECONDS {
            last_accepted[note.lane] = note.start_time;
            true
        } else {
            false
        }
    });

    debug!(
        "Built timeline at {} BPM: {} notes kept, {} debounced.",
        bpm,
        notes.len(),
        raw_count - notes.len()
    );
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::note::RawNoteEvent;

    fn raw(pitch: u8, onset: f32) -> RawNoteEvent {
        RawNoteEvent {
            pitch,
            onset_seconds: onset,
            velocity: 100,
        }
    }

    fn tracks() -> Vec<Track> {
        vec![
            Track::new(0, "lead", vec![raw(60, 1.0), raw(61, 0.5), raw(62, 0.25), raw(60, 2.0)]),
            Track::new(1, "bass", vec![raw(37, 0.5), raw(40, 1.5), raw(44, 1.51)]),
        ]
    }

    #[test]
    fn sorted_and_lane_assigned() {
        let timeline = build(&tracks(), 120.0);
        assert!(timeline
            .windows(2)
            .all(|pair| pair[0].start_time <= pair[1].start_time));
        for note in &timeline {
            assert_eq!(note.lane, note.pitch as usize % LANES);
            assert!(!note.hit);
        }
    }

    #[test]
    fn ties_keep_track_order() {
        // 61 (track 0) and 37 (track 1) both start at 0.5 in lane 1.
        // The stable sort keeps 61 first, so 37 is the one debounced.
        let timeline = build(&tracks(), 120.0);
        let at_half: Vec<u8> = timeline
            .iter()
            .filter(|n| n.start_time == 0.5)
            .map(|n| n.pitch)
            .collect();
        assert_eq!(at_half, vec![61]);
    }

    #[test]
    fn same_lane_notes_closer_than_debounce_are_dropped() {
        // 40 and 44 share lane 0 and sit 0.01s apart.
        let timeline = build(&tracks(), 120.0);
        assert!(timeline.iter().any(|n| n.pitch == 40));
        assert!(!timeline.iter().any(|n| n.pitch == 44));

        let mut last = [f32::NEG_INFINITY; LANES];
        for note in &timeline {
            assert!(note.start_time - last[note.lane] > DEBOUNCE_SECONDS);
            last[note.lane] = note.start_time;
        }
    }

    #[test]
    fn exact_debounce_gap_is_rejected() {
        let track = Track::new(0, "t", vec![raw(0, 0.0), raw(4, 0.05), raw(8, 0.1001)]);
        let timeline = build(&[track], 120.0);
        let pitches: Vec<u8> = timeline.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![0, 8]);
    }

    #[test]
    fn halving_bpm_doubles_start_times() {
        let at_120 = build(&tracks(), 120.0);
        let at_60 = build(&tracks(), 60.0);
        assert_eq!(at_120.len(), at_60.len());
        for (fast, slow) in at_120.iter().zip(&at_60) {
            assert_eq!(fast.pitch, slow.pitch);
            assert!((slow.start_time - fast.start_time * 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn unselected_tracks_are_excluded() {
        let mut tracks = tracks();
        tracks[1].selected = false;
        let timeline = build(&tracks, 120.0);
        assert_eq!(timeline.len(), 4);
        assert!(timeline.iter().all(|n| n.pitch >= 60));

        tracks[0].selected = false;
        assert!(build(&tracks, 120.0).is_empty());
    }

    #[test]
    fn non_positive_bpm_builds_nothing() {
        assert!(build(&tracks(), 0.0).is_empty());
        assert!(build(&tracks(), -120.0).is_empty());
        assert!(build(&tracks(), f32::NAN).is_empty());
    }
}
