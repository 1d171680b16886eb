use serde::{Deserialize, Serialize};

/// One note as delivered by the MIDI parser: onset already resolved to
/// absolute seconds at the reference tempo.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNoteEvent {
    pub pitch: u8,
    #[serde(rename = "onset")]
    pub onset_seconds: f32,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

fn default_velocity() -> u8 {
    100
}

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub index: usize,
    pub name: String,
    pub notes: Vec<RawNoteEvent>,
    pub selected: bool,
}

impl Track {
    pub fn new(index: usize, name: impl Into<String>, notes: Vec<RawNoteEvent>) -> Self {
        Self {
            index,
            name: name.into(),
            notes,
            selected: true,
        }
    }
}

/// A playable note. Everything but `hit` is fixed once the timeline is built.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimelineNote {
    pub start_time: f32,
    pub lane: usize,
    pub pitch: u8,
    pub hit: bool,
}

impl TimelineNote {
    pub fn new(start_time: f32, lane: usize, pitch: u8) -> Self {
        Self {
            start_time,
            lane,
            pitch,
            hit: false,
        }
    }
}

/// Per-tick view of a note inside the scroll window. `note_index` points
/// back into the timeline; the view is rebuilt every tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ActiveNote {
    pub note_index: usize,
    pub lane: usize,
    pub y: f32,
    pub hit: bool,
}
