use crate::game::note::Track;
use crate::game::timeline::REFERENCE_BPM;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Hard cap on a preview, whether or not anyone cancels it.
pub const PREVIEW_MAX_SECONDS: f32 = 8.0;
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Background audition of one track.
///
/// The worker never touches game state. It only sends pitches over a
/// channel; the main loop drains them and plays the cues itself, so the cue
/// cache stays single-threaded. Cancellation is cooperative through the
/// shared `active` flag, which the worker polls between notes and while
/// waiting.
pub struct Preview {
    track_index: usize,
    active: Arc<AtomicBool>,
    pitches: Receiver<u8>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Preview {
    pub fn spawn(track: &Track, bpm: f32) -> std::io::Result<Self> {
        let schedule = preview_schedule(track, bpm);
        let active = Arc::new(AtomicBool::new(true));
        let (sender, pitches) = channel();

        let worker_flag = active.clone();
        let thread = thread::Builder::new()
            .name(format!("preview-{}", track.index))
            .spawn(move || run_preview(schedule, worker_flag, sender))?;

        info!("Previewing track {} '{}'.", track.index, track.name);
        Ok(Self {
            track_index: track.index,
            active,
            pitches,
            thread: Some(thread),
        })
    }

    pub fn track_index(&self) -> usize {
        self.track_index
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Relaxed)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Asks the worker to stop at its next poll point.
    pub fn cancel(&self) {
        if self.active.swap(false, Ordering::Relaxed) {
            debug!("Preview of track {} cancelled.", self.track_index);
        }
    }

    /// Pitches the worker has scheduled since the last call.
    pub fn drain(&self) -> Vec<u8> {
        self.pitches.try_iter().collect()
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// (offset from the first note in seconds, pitch), tempo-scaled and sorted.
fn preview_schedule(track: &Track, bpm: f32) -> Vec<(f32, u8)> {
    let scale = if bpm.is_finite() && bpm > 0.0 { REFERENCE_BPM / bpm } else { 1.0 };
    let mut schedule: Vec<(f32, u8)> = track
        .notes
        .iter()
        .map(|n| (n.onset_seconds * scale, n.pitch))
        .collect();
    schedule.sort_by(|a, b| a.0.total_cmp(&b.0));
    if let Some(&(first, _)) = schedule.first() {
        for entry in &mut schedule {
            entry.0 -= first;
        }
    }
    schedule
}

fn run_preview(schedule: Vec<(f32, u8)>, active: Arc<AtomicBool>, sender: Sender<u8>) {
    let started = Instant::now();
    let limit = Duration::from_secs_f32(PREVIEW_MAX_SECONDS);

    for (offset, pitch) in schedule {
        let due = Duration::from_secs_f32(offset.max(0.0));
        if due > limit {
            break;
        }
        loop {
            if !active.load(Ordering::Relaxed) {
                return;
            }
            let elapsed = started.elapsed();
            if elapsed >= due {
                break;
            }
            thread::sleep((due - elapsed).min(POLL_INTERVAL));
        }
        if sender.send(pitch).is_err() {
            break;
        }
    }
    active.store(false, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::note::RawNoteEvent;

    fn track(onsets: &[(f32, u8)]) -> Track {
        let notes = onsets
            .iter()
            .map(|&(onset, pitch)| RawNoteEvent {
                pitch,
                onset_seconds: onset,
                velocity: 100,
            })
            .collect();
        Track::new(2, "preview", notes)
    }

    fn wait_until_stopped(preview: &Preview) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while preview.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!preview.is_running());
    }

    #[test]
    fn schedule_is_relative_and_tempo_scaled() {
        let schedule = preview_schedule(&track(&[(2.0, 64), (1.0, 60), (1.5, 62)]), 60.0);
        assert_eq!(schedule, vec![(0.0, 60), (1.0, 62), (2.0, 64)]);
    }

    #[test]
    fn plays_every_note_then_stops() {
        let preview = Preview::spawn(&track(&[(0.0, 60), (0.02, 62), (0.04, 64)]), 120.0).unwrap();
        wait_until_stopped(&preview);
        assert_eq!(preview.drain(), vec![60, 62, 64]);
        assert_eq!(preview.track_index(), 2);
    }

    #[test]
    fn cancel_stops_before_later_notes() {
        let preview = Preview::spawn(&track(&[(0.0, 60), (5.0, 72)]), 120.0).unwrap();
        let first = preview.pitches.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(first, 60);

        preview.cancel();
        wait_until_stopped(&preview);
        assert!(preview.drain().is_empty());
    }

    #[test]
    fn notes_past_the_cap_are_never_played() {
        let preview = Preview::spawn(&track(&[(0.0, 60), (9.0, 72)]), 120.0).unwrap();
        wait_until_stopped(&preview);
        assert_eq!(preview.drain(), vec![60]);
    }
}
