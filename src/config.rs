use crate::error::ConfigError;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::Path;

// Playfield
pub const WINDOW_TITLE: &str = "Rhythm Hero";
pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;
pub const LANES: usize = 4;
pub const LANE_WIDTH: f32 = SCREEN_WIDTH / LANES as f32;
pub const HIT_LINE_Y: f32 = SCREEN_HEIGHT - 100.0;

// Loop
pub const FPS: u32 = 60;
pub const MAX_DELTA_TIME: f32 = 0.1;

pub const DEFAULT_CONFIG_PATH: &str = "config.ini";

const DEFAULT_SCROLL_SPEED: f32 = 300.0;
const DEFAULT_BPM: f32 = 120.0;
const DEFAULT_CUE_VOLUME: f32 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub scroll_speed: f32,
    pub bpm: f32,
    pub audio_enabled: bool,
    pub cue_volume: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll_speed: DEFAULT_SCROLL_SPEED,
            bpm: DEFAULT_BPM,
            audio_enabled: true,
            cue_volume: DEFAULT_CUE_VOLUME,
        }
    }
}

fn create_default_file(path: &Path) -> Result<(), ConfigError> {
    info!("Config file not found, creating defaults at '{}'.", path.display());
    let defaults = Config::default();
    let mut conf = Ini::new();
    conf.set("Options", "ScrollSpeed", Some(format!("{}", defaults.scroll_speed)));
    conf.set("Options", "Bpm", Some(format!("{}", defaults.bpm)));
    conf.set("Audio", "Enabled", Some("1".to_string()));
    conf.set("Audio", "CueVolume", Some(format!("{}", defaults.cue_volume)));
    conf.write(path).map_err(|e| ConfigError::Access {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn read_f32(conf: &Ini, section: &str, key: &str, fallback: f32) -> f32 {
    match conf.get(section, key) {
        Some(raw) => match raw.trim().parse::<f32>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!("Invalid value '{}' for [{}] {}, using {}.", raw, section, key, fallback);
                fallback
            }
        },
        None => fallback,
    }
}

/// Loads `path`, writing a default file first if it doesn't exist. Any failure
/// falls back to defaults; the game never refuses to start over its config.
pub fn load(path: &Path) -> Config {
    let defaults = Config::default();

    if !path.exists() {
        if let Err(e) = create_default_file(path) {
            warn!("{}", e);
        }
        return defaults;
    }

    let mut conf = Ini::new();
    if let Err(e) = conf.load(path) {
        warn!("Failed to load '{}': {}. Using defaults.", path.display(), e);
        return defaults;
    }

    let audio_enabled = conf
        .get("Audio", "Enabled")
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map_or(defaults.audio_enabled, |v| v != 0);

    let config = Config {
        scroll_speed: read_f32(&conf, "Options", "ScrollSpeed", defaults.scroll_speed),
        bpm: read_f32(&conf, "Options", "Bpm", defaults.bpm),
        audio_enabled,
        cue_volume: read_f32(&conf, "Audio", "CueVolume", defaults.cue_volume).clamp(0.0, 1.0),
    };
    info!(
        "Loaded config from '{}': speed {} px/s, bpm {}, audio {}",
        path.display(),
        config.scroll_speed,
        config.bpm,
        if config.audio_enabled { "on" } else { "off" }
    );
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rhythmhero-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join("config.ini")
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);

        let config = load(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());

        // Second load reads the file we just wrote.
        assert_eq!(load(&path), Config::default());
    }

    #[test]
    fn reads_values_and_falls_back_on_garbage() {
        let path = scratch_path("values");
        fs::write(
            &path,
            "[Options]\nScrollSpeed=450\nBpm=fast\n[Audio]\nEnabled=0\nCueVolume=3.5\n",
        )
        .unwrap();

        let config = load(&path);
        assert_eq!(config.scroll_speed, 450.0);
        assert_eq!(config.bpm, DEFAULT_BPM);
        assert!(!config.audio_enabled);
        assert_eq!(config.cue_volume, 1.0);
    }
}
