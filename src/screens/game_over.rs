use crate::core::input::Command;
use crate::game::session::Session;
use crate::screens::{Screen, ScreenAction};

pub struct State {
    pub song_title: String,
    pub summary: Session,
}

pub fn init(song_title: String, summary: Session) -> State {
    State { song_title, summary }
}

pub fn handle_command(_state: &mut State, command: Command) -> ScreenAction {
    match command {
        Command::Confirm | Command::Back => ScreenAction::Navigate(Screen::Menu),
        _ => ScreenAction::None,
    }
}
