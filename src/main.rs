use log::{error, info, warn, LevelFilter};
use rhythmhero::app::App;
use rhythmhero::config::{self, DEFAULT_CONFIG_PATH, FPS, HIT_LINE_Y, MAX_DELTA_TIME};
use rhythmhero::core::audio::{AudioBackend, CpalAudio, SilentAudio};
use rhythmhero::core::input::{Command, Lane};
use rhythmhero::game::settings::Settings;
use rhythmhero::game::song::SongData;
use rhythmhero::screens::Screen;
use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

const USAGE: &str = "usage: rhythmhero [--config PATH] [--autoplay] [--silent] SONG.json...";

/// Pixels above the hit line at which the bot presses.
const AUTOPLAY_LEAD_PX: f32 = 10.0;

struct Args {
    config_path: PathBuf,
    autoplay: bool,
    silent: bool,
    songs: Vec<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        autoplay: false,
        silent: false,
        songs: Vec::new(),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                args.config_path = PathBuf::from(path);
            }
            "--autoplay" => args.autoplay = true,
            "--silent" => args.silent = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{}'\n{}", flag, USAGE)),
            _ => args.songs.push(PathBuf::from(arg)),
        }
    }
    if args.songs.is_empty() {
        return Err(USAGE.to_string());
    }
    Ok(args)
}

fn load_songs(paths: &[PathBuf]) -> Vec<SongData> {
    let mut songs = Vec::with_capacity(paths.len());
    for path in paths {
        match SongData::load(path) {
            Ok(song) => {
                info!(
                    "Loaded '{}': {} tracks, {} notes.",
                    song.title,
                    song.tracks.len(),
                    song.note_count()
                );
                songs.push(song);
            }
            Err(e) => error!("Skipping '{}': {}", path.display(), e),
        }
    }
    songs
}

fn open_audio(enabled: bool, volume: f32) -> Box<dyn AudioBackend> {
    if !enabled {
        info!("Audio disabled; running silent.");
        return Box::new(SilentAudio);
    }
    match CpalAudio::init(volume) {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            warn!("Audio unavailable ({}); running silent.", e);
            Box::new(SilentAudio)
        }
    }
}

/// Plays every loaded song in order with perfect timing.
#[derive(Default)]
struct Autoplay {
    next_song: usize,
    pressed: HashSet<usize>,
}

impl Autoplay {
    fn drive(&mut self, app: &mut App) {
        match app.current_screen() {
            Screen::Menu => {
                if self.next_song >= app.songs().len() {
                    app.handle_command(Command::Back);
                    return;
                }
                if app.frame().cursor != self.next_song {
                    app.handle_command(Command::Down);
                    return;
                }
                app.handle_command(Command::Confirm);
                if app.current_screen() == Screen::Menu {
                    self.next_song += 1;
                }
            }
            Screen::TrackSelect => {
                self.pressed.clear();
                app.handle_command(Command::Confirm);
                if app.current_screen() == Screen::TrackSelect {
                    self.next_song += 1;
                    app.handle_command(Command::Back);
                }
            }
            Screen::Playing => {
                let due: Vec<usize> = app
                    .active_notes()
                    .iter()
                    .filter(|n| !n.hit && n.y >= HIT_LINE_Y - AUTOPLAY_LEAD_PX)
                    .filter(|n| self.pressed.insert(n.note_index))
                    .map(|n| n.lane)
                    .collect();
                for lane in due.into_iter().filter_map(Lane::from_index) {
                    app.handle_command(Command::Lane(lane));
                }
            }
            Screen::Paused => app.handle_command(Command::Back),
            Screen::GameOver => {
                self.next_song += 1;
                app.handle_command(Command::Confirm);
            }
        }
    }
}

fn run(mut app: App, mut bot: Autoplay) {
    let frame_duration = Duration::from_secs_f32(1.0 / FPS as f32);
    let mut last_tick = Instant::now();

    while !app.exit_requested() {
        let frame_start = Instant::now();
        let delta_time = frame_start
            .duration_since(last_tick)
            .as_secs_f32()
            .min(MAX_DELTA_TIME);
        last_tick = frame_start;

        bot.drive(&mut app);
        app.tick(delta_time);

        if let Some(remaining) = frame_duration.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .filter_module("rhythmhero::game", LevelFilter::Debug)
        .filter_module("rhythmhero::core::audio", LevelFilter::Info)
        .init();

    let args = parse_args()?;
    info!("Application starting...");

    let config = config::load(&args.config_path);
    let songs = load_songs(&args.songs);
    if songs.is_empty() {
        error!("No playable songs given.");
        return Err("no playable songs".into());
    }

    if !args.autoplay {
        for song in &songs {
            info!(
                "'{}': {} tracks ({} selected), {} notes.",
                song.title,
                song.tracks.len(),
                song.selected_track_count(),
                song.note_count()
            );
        }
        info!("Nothing to drive without --autoplay; exiting.");
        return Ok(());
    }

    let audio = open_audio(config.audio_enabled && !args.silent, config.cue_volume);
    let app = App::new(Settings::from_config(&config), songs, audio);
    run(app, Autoplay::default());

    info!("Application exited gracefully.");
    Ok(())
}
