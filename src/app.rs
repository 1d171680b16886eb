use crate::config::{LANE_WIDTH, LANES};
use crate::core::audio::AudioBackend;
use crate::core::input::{self, Command};
use crate::error::TransitionError;
use crate::game::cue_cache::AudioCueCache;
use crate::game::judgment::Outcome;
use crate::game::note::{ActiveNote, TimelineNote};
use crate::game::preview::Preview;
use crate::game::session::Session;
use crate::game::settings::Settings;
use crate::game::song::SongData;
use crate::game::timeline;
use crate::screens::{game_over, gameplay, menu, track_select, Screen, ScreenAction};
use log::{error, info, warn};
use winit::event::KeyEvent;

/// What a renderer needs to draw one frame. Built on demand, owns its data.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub screen: Screen,
    pub song_title: Option<String>,
    /// Highlighted row of the current list (songs, tracks or pause options).
    pub cursor: usize,
    pub notes: Vec<NoteSprite>,
    pub session: Option<Session>,
    pub settings: Settings,
    pub diagnostic: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSprite {
    pub lane: usize,
    pub x: f32,
    pub y: f32,
    pub hit: bool,
}

impl From<&ActiveNote> for NoteSprite {
    fn from(note: &ActiveNote) -> Self {
        Self {
            lane: note.lane,
            x: note.lane as f32 * LANE_WIDTH + LANE_WIDTH * 0.5,
            y: note.y,
            hit: note.hit,
        }
    }
}

/// The game's state machine. Owns every piece of mutable game state and is
/// driven by two inputs: `handle_command` for player input and `tick` for
/// the clock. Nothing here blocks or panics on bad data; refused transitions
/// leave the current screen in place and set a diagnostic.
pub struct App {
    current_screen: Screen,
    settings: Settings,
    songs: Vec<SongData>,
    selected_song: Option<usize>,
    menu_state: menu::State,
    track_select_state: track_select::State,
    gameplay_state: Option<gameplay::State>,
    game_over_state: Option<game_over::State>,
    cue_cache: AudioCueCache,
    audio: Box<dyn AudioBackend>,
    preview: Option<Preview>,
    diagnostic: Option<String>,
    exit_requested: bool,
}

impl App {
    pub fn new(settings: Settings, songs: Vec<SongData>, audio: Box<dyn AudioBackend>) -> Self {
        info!("Starting with {} songs, {}.", songs.len(), settings);
        Self {
            current_screen: Screen::Menu,
            settings,
            songs,
            selected_song: None,
            menu_state: menu::init(),
            track_select_state: track_select::init(),
            gameplay_state: None,
            game_over_state: None,
            cue_cache: AudioCueCache::new(),
            audio,
            preview: None,
            diagnostic: None,
            exit_requested: false,
        }
    }

    pub fn current_screen(&self) -> Screen {
        self.current_screen
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn songs(&self) -> &[SongData] {
        &self.songs
    }

    pub fn song(&self) -> Option<&SongData> {
        self.selected_song.and_then(|i| self.songs.get(i))
    }

    pub fn session(&self) -> Option<&Session> {
        self.gameplay_state.as_ref().map(|gs| &gs.session)
    }

    /// Final scoreboard while on the game-over screen.
    pub fn summary(&self) -> Option<&Session> {
        self.game_over_state.as_ref().map(|s| &s.summary)
    }

    pub fn timeline(&self) -> &[TimelineNote] {
        self.gameplay_state.as_ref().map_or(&[][..], |gs| gs.timeline.as_slice())
    }

    pub fn active_notes(&self) -> &[ActiveNote] {
        self.gameplay_state.as_ref().map_or(&[][..], |gs| gs.window.active())
    }

    pub fn scroll_cursor(&self) -> Option<usize> {
        self.gameplay_state.as_ref().map(|gs| gs.window.cursor())
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn cue_cache(&self) -> &AudioCueCache {
        &self.cue_cache
    }

    pub fn preview_running(&self) -> bool {
        self.preview.as_ref().is_some_and(Preview::is_running)
    }

    /// Entry point for a windowing layer forwarding raw key events.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        if let Some(command) = input::command_from_key_event(event) {
            self.handle_command(command);
        }
    }

    pub fn handle_command(&mut self, command: Command) {
        let action = match self.current_screen {
            Screen::Menu => menu::handle_command(&mut self.menu_state, command, self.songs.len()),
            Screen::TrackSelect => {
                let Some(song) = self.selected_song.and_then(|i| self.songs.get_mut(i)) else {
                    error!("Track select is active without a song; returning to menu.");
                    self.enter_menu();
                    return;
                };
                track_select::handle_command(
                    &mut self.track_select_state,
                    command,
                    song,
                    &mut self.settings,
                )
            }
            Screen::Playing => match self.gameplay_state.as_mut() {
                Some(gs) => gameplay::handle_command(gs, command),
                None => ScreenAction::None,
            },
            Screen::Paused => match self.gameplay_state.as_mut() {
                Some(gs) => gameplay::handle_paused_command(gs, command, &mut self.settings),
                None => ScreenAction::None,
            },
            Screen::GameOver => match self.game_over_state.as_mut() {
                Some(state) => game_over::handle_command(state, command),
                None => ScreenAction::Navigate(Screen::Menu),
            },
        };
        self.handle_action(action);
    }

    /// Advances the clock by `delta_time` seconds. Only Playing consumes
    /// time; track select uses the tick to forward preview notes to audio.
    pub fn tick(&mut self, delta_time: f32) {
        match self.current_screen {
            Screen::TrackSelect => self.pump_preview(),
            Screen::Playing => {
                let speed = self.settings.scroll_speed();
                let Some(gs) = self.gameplay_state.as_mut() else {
                    error!("Playing without gameplay state; returning to menu.");
                    self.enter_menu();
                    return;
                };
                let (action, outcomes) = gameplay::update(gs, delta_time, speed);
                for outcome in outcomes {
                    if let Outcome::Hit { pitch, .. } = outcome {
                        self.play_pitch(pitch);
                    }
                }
                self.handle_action(action);
            }
            Screen::Menu | Screen::Paused | Screen::GameOver => {}
        }
    }

    pub fn frame(&self) -> Frame {
        let cursor = match self.current_screen {
            Screen::Menu => self.menu_state.selected_index,
            Screen::TrackSelect => self.track_select_state.cursor,
            Screen::Paused => self.gameplay_state.as_ref().map_or(0, |gs| gs.pause_index),
            Screen::Playing | Screen::GameOver => 0,
        };
        let session = match self.current_screen {
            Screen::GameOver => self.summary().copied(),
            _ => self.session().copied(),
        };
        Frame {
            screen: self.current_screen,
            song_title: self.song().map(|s| s.title.clone()),
            cursor,
            notes: self.active_notes().iter().map(NoteSprite::from).collect(),
            session,
            settings: self.settings,
            diagnostic: self.diagnostic.clone(),
        }
    }

    fn handle_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Navigate(to) => {
                if let Err(e) = self.navigate(to) {
                    warn!("Refused {:?} -> {:?}: {}", self.current_screen, to, e);
                    self.diagnostic = Some(e.to_string());
                }
            }
            ScreenAction::StartPreview(track_index) => self.start_preview(track_index),
            ScreenAction::Exit => {
                info!("Exit requested.");
                self.stop_preview();
                self.exit_requested = true;
            }
        }
    }

    fn navigate(&mut self, to: Screen) -> Result<(), TransitionError> {
        let from = self.current_screen;
        match (from, to) {
            (Screen::Menu, Screen::TrackSelect) => self.enter_track_select()?,
            (Screen::TrackSelect, Screen::Playing) => self.start_playing()?,
            (Screen::TrackSelect, Screen::Menu) => self.enter_menu(),
            (Screen::Playing, Screen::Paused) => self.current_screen = Screen::Paused,
            (Screen::Playing, Screen::GameOver) => self.enter_game_over(),
            (Screen::Paused, Screen::Playing) => self.current_screen = Screen::Playing,
            (Screen::Paused, Screen::TrackSelect) => {
                self.gameplay_state = None;
                self.current_screen = Screen::TrackSelect;
            }
            (Screen::Paused, Screen::Menu) | (Screen::GameOver, Screen::Menu) => self.enter_menu(),
            _ => {
                error!("Unsupported transition {:?} -> {:?} ignored.", from, to);
                return Ok(());
            }
        }
        self.diagnostic = None;
        info!("Screen {:?} -> {:?}", from, self.current_screen);
        Ok(())
    }

    fn enter_track_select(&mut self) -> Result<(), TransitionError> {
        let index = self.menu_state.selected_index;
        let song = self.songs.get(index).ok_or(TransitionError::NoSongSelected)?;
        if song.note_count() == 0 {
            return Err(TransitionError::EmptySong(song.title.clone()));
        }
        self.selected_song = Some(index);
        self.track_select_state = track_select::init();
        self.current_screen = Screen::TrackSelect;
        Ok(())
    }

    fn start_playing(&mut self) -> Result<(), TransitionError> {
        let song = self.song().ok_or(TransitionError::NoSongSelected)?;
        if song.selected_track_count() == 0 {
            return Err(TransitionError::NoTracksSelected);
        }
        let notes = timeline::build(&song.tracks, self.settings.bpm());
        if notes.is_empty() {
            return Err(TransitionError::EmptyTimeline);
        }
        info!(
            "Playing '{}': {} notes, {}.",
            song.title,
            notes.len(),
            self.settings
        );
        self.stop_preview();
        self.gameplay_state = Some(gameplay::init(notes));
        self.current_screen = Screen::Playing;
        Ok(())
    }

    fn enter_game_over(&mut self) {
        let summary = self
            .gameplay_state
            .take()
            .map(|gs| gs.session)
            .unwrap_or_default();
        let title = self.song().map(|s| s.title.clone()).unwrap_or_default();
        info!(
            "Game over '{}': score {}/{} ({:.1}%), hits {}, misses {}, accuracy {:.1}%",
            title,
            summary.score,
            summary.max_score,
            summary.score_percent(),
            summary.hits,
            summary.misses,
            summary.accuracy()
        );
        self.game_over_state = Some(game_over::init(title, summary));
        self.current_screen = Screen::GameOver;
    }

    /// Total reset: nothing from a previous song survives into the menu.
    fn enter_menu(&mut self) {
        self.stop_preview();
        self.gameplay_state = None;
        self.game_over_state = None;
        self.selected_song = None;
        self.track_select_state = track_select::init();
        self.current_screen = Screen::Menu;
    }

    fn start_preview(&mut self, track_index: usize) {
        self.stop_preview();
        let Some(track) = self.song().and_then(|s| s.tracks.get(track_index)) else {
            return;
        };
        match Preview::spawn(track, self.settings.bpm()) {
            Ok(preview) => self.preview = Some(preview),
            Err(e) => warn!("Failed to start preview of track {}: {}", track_index, e),
        }
    }

    fn stop_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.cancel();
        }
    }

    fn pump_preview(&mut self) {
        let Some(preview) = self.preview.as_ref() else {
            return;
        };
        let finished = !preview.is_running();
        let pitches = preview.drain();
        for pitch in pitches {
            self.play_pitch(pitch);
        }
        if finished {
            self.preview = None;
        }
    }

    fn play_pitch(&mut self, pitch: u8) {
        if let Some(cue) = self.cue_cache.request_cue(pitch, self.audio.as_ref()) {
            self.audio.play_cue(&cue);
        }
    }
}

const _: () = assert!(LANES == input::ALL_LANES.len());
