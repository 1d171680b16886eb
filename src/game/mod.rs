pub mod cue_cache;
pub mod judgment;
pub mod note;
pub mod preview;
pub mod scroll;
pub mod session;
pub mod settings;
pub mod song;
pub mod timeline;
