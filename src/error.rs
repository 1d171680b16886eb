use thiserror::Error;

/// Failure to turn an external note dump into a playable song.
#[derive(Error, Debug)]
pub enum SongError {
    #[error("Failed to read song file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse song data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid song data in track {track}: {message}")]
    Invalid { track: usize, message: String },

    #[error("Song '{0}' has no tracks")]
    NoTracks(String),
}

/// A screen transition that was refused. The state machine stays where it is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("No song is loaded")]
    NoSongSelected,

    #[error("Song '{0}' contains no notes")]
    EmptySong(String),

    #[error("Select at least one track before playing")]
    NoTracksSelected,

    #[error("Selected tracks produced an empty timeline")]
    EmptyTimeline,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file '{path}': {message}")]
    Access { path: String, message: String },
}
