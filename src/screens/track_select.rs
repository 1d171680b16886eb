use crate::core::input::Command;
use crate::game::settings::Settings;
use crate::game::song::SongData;
use crate::screens::{Screen, ScreenAction};
use log::info;

pub struct State {
    pub cursor: usize,
}

pub fn init() -> State {
    State { cursor: 0 }
}

pub fn handle_command(
    state: &mut State,
    command: Command,
    song: &mut SongData,
    settings: &mut Settings,
) -> ScreenAction {
    let track_count = song.tracks.len();
    match command {
        Command::Up | Command::Down => {
            if track_count > 0 {
                let delta: isize = if command == Command::Up { -1 } else { 1 };
                let n = track_count as isize;
                let cur = state.cursor.min(track_count - 1) as isize;
                state.cursor = ((cur + delta + n) % n) as usize;
            }
            ScreenAction::None
        }
        Command::Toggle => {
            if let Some(selected) = song.toggle_track(state.cursor) {
                info!(
                    "Track {} '{}' {}.",
                    state.cursor,
                    song.tracks[state.cursor].name,
                    if selected { "selected" } else { "deselected" }
                );
            }
            ScreenAction::None
        }
        Command::Preview if state.cursor < track_count => ScreenAction::StartPreview(state.cursor),
        Command::SpeedUp => {
            settings.increase_speed();
            ScreenAction::None
        }
        Command::SpeedDown => {
            settings.decrease_speed();
            ScreenAction::None
        }
        Command::BpmUp => {
            settings.increase_bpm();
            ScreenAction::None
        }
        Command::BpmDown => {
            settings.decrease_bpm();
            ScreenAction::None
        }
        Command::Confirm => ScreenAction::Navigate(Screen::Playing),
        Command::Back => ScreenAction::Navigate(Screen::Menu),
        _ => ScreenAction::None,
    }
}
