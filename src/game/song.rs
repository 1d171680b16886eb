use crate::error::SongError;
use crate::game::note::{RawNoteEvent, Track};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A loaded song: the per-track note dump produced by the external MIDI
/// parser, plus the selection flags the track-select screen edits.
#[derive(Clone, Debug, PartialEq)]
pub struct SongData {
    pub title: String,
    pub tracks: Vec<Track>,
}

#[derive(Deserialize)]
struct SongFile {
    title: String,
    tracks: Vec<TrackFile>,
}

#[derive(Deserialize)]
struct TrackFile {
    #[serde(default)]
    name: String,
    notes: Vec<RawNoteEvent>,
}

impl SongData {
    pub fn new(title: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            title: title.into(),
            tracks,
        }
    }

    /// Parses and validates a song from its JSON note dump.
    pub fn from_json(text: &str) -> Result<Self, SongError> {
        let file: SongFile = serde_json::from_str(text)?;
        if file.tracks.is_empty() {
            return Err(SongError::NoTracks(file.title));
        }

        let mut tracks = Vec::with_capacity(file.tracks.len());
        for (index, track) in file.tracks.into_iter().enumerate() {
            for note in &track.notes {
                validate_note(index, note)?;
            }
            let name = if track.name.trim().is_empty() {
                format!("Track {}", index + 1)
            } else {
                track.name
            };
            tracks.push(Track::new(index, name, track.notes));
        }

        Ok(Self::new(file.title, tracks))
    }

    pub fn load(path: &Path) -> Result<Self, SongError> {
        let text = fs::read_to_string(path)?;
        let song = Self::from_json(&text)?;
        info!(
            "Loaded song '{}' from {:?}: {} tracks, {} notes",
            song.title,
            path,
            song.tracks.len(),
            song.note_count()
        );
        Ok(song)
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.notes.len()).sum()
    }

    pub fn selected_track_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.selected).count()
    }

    /// Flips the selection flag of `index`. Returns the new value, or `None`
    /// if there is no such track.
    pub fn toggle_track(&mut self, index: usize) -> Option<bool> {
        let track = self.tracks.get_mut(index)?;
        track.selected = !track.selected;
        Some(track.selected)
    }
}

fn validate_note(track: usize, note: &RawNoteEvent) -> Result<(), SongError> {
    if note.pitch > 127 {
        return Err(SongError::Invalid {
            track,
            message: format!("pitch {} is outside 0-127", note.pitch),
        });
    }
    if !note.onset_seconds.is_finite() || note.onset_seconds < 0.0 {
        return Err(SongError::Invalid {
            track,
            message: format!("onset {} is not a non-negative time", note.onset_seconds),
        });
    }
    Ok(())
}
