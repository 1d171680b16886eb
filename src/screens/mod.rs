pub mod game_over;
pub mod gameplay;
pub mod menu;
pub mod track_select;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    None,
    Navigate(Screen),
    /// Audition the track at this index on the track-select screen.
    StartPreview(usize),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    TrackSelect,
    Playing,
    Paused,
    GameOver,
}
