// src/screens/menu.rs
use crate::core::input::Command;
use crate::screens::{Screen, ScreenAction};

pub struct State {
    pub selected_index: usize,
}

pub fn init() -> State {
    State { selected_index: 0 }
}

pub fn handle_command(state: &mut State, command: Command, song_count: usize) -> ScreenAction {
    match command {
        Command::Confirm => {
            if song_count == 0 {
                return ScreenAction::None;
            }
            ScreenAction::Navigate(Screen::TrackSelect)
        }
        Command::Back => ScreenAction::Exit,
        Command::Up | Command::Down => {
            if song_count > 0 {
                let delta: isize = if command == Command::Up { -1 } else { 1 };
                let n = song_count as isize;
                let cur = state.selected_index.min(song_count - 1) as isize;
                state.selected_index = ((cur + delta + n) % n) as usize;
            }
            ScreenAction::None
        }
        _ => ScreenAction::None,
    }
}
