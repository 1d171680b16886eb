// Playing and Paused share this state: pausing only stops the clock.
use crate::core::input::{Command, Lane};
use crate::game::judgment::{self, Outcome};
use crate::game::note::TimelineNote;
use crate::game::scroll::ScrollWindow;
use crate::game::session::Session;
use crate::game::settings::Settings;
use crate::screens::{Screen, ScreenAction};
use log::info;
use std::collections::VecDeque;

pub const PAUSE_OPTIONS: [&str; 3] = ["RESUME", "TRACKS", "MENU"];
const HEARTBEAT_SECONDS: f32 = 1.0;

pub struct State {
    pub timeline: Vec<TimelineNote>,
    pub window: ScrollWindow,
    pub session: Session,
    pub pause_index: usize,
    pending_lanes: VecDeque<Lane>,
    log_timer: f32,
}

pub fn init(timeline: Vec<TimelineNote>) -> State {
    info!("Initializing gameplay with {} notes.", timeline.len());
    State {
        session: Session::new(timeline.len()),
        timeline,
        window: ScrollWindow::new(),
        pause_index: 0,
        pending_lanes: VecDeque::new(),
        log_timer: 0.0,
    }
}

pub fn handle_command(state: &mut State, command: Command) -> ScreenAction {
    match command {
        Command::Lane(lane) => {
            state.pending_lanes.push_back(lane);
            ScreenAction::None
        }
        Command::Back => {
            state.pending_lanes.clear();
            state.pause_index = 0;
            ScreenAction::Navigate(Screen::Paused)
        }
        _ => ScreenAction::None,
    }
}

pub fn handle_paused_command(state: &mut State, command: Command, settings: &mut Settings) -> ScreenAction {
    match command {
        Command::Up | Command::Down => {
            let n = PAUSE_OPTIONS.len();
            state.pause_index = if command == Command::Up {
                (state.pause_index + n - 1) % n
            } else {
                (state.pause_index + 1) % n
            };
            ScreenAction::None
        }
        Command::Confirm => match state.pause_index {
            0 => ScreenAction::Navigate(Screen::Playing),
            1 => ScreenAction::Navigate(Screen::TrackSelect),
            _ => ScreenAction::Navigate(Screen::Menu),
        },
        Command::Back => ScreenAction::Navigate(Screen::Playing),
        Command::SpeedUp => {
            settings.increase_speed();
            ScreenAction::None
        }
        Command::SpeedDown => {
            settings.decrease_speed();
            ScreenAction::None
        }
        // Takes effect on the next timeline build.
        Command::BpmUp => {
            settings.increase_bpm();
            ScreenAction::None
        }
        Command::BpmDown => {
            settings.decrease_bpm();
            ScreenAction::None
        }
        _ => ScreenAction::None,
    }
}

/// One Playing tick: advance the clock, refresh the scroll window, then judge
/// presses queued since the last tick against the refreshed window.
/// Returns the judged outcomes so the caller can play cues for hits.
pub fn update(state: &mut State, delta_time: f32, scroll_speed: f32) -> (ScreenAction, Vec<Outcome>) {
    state.session.play_time += delta_time.max(0.0);
    let play_time = state.session.play_time;

    state.window.update(&state.timeline, play_time, scroll_speed);

    let mut outcomes = Vec::with_capacity(state.pending_lanes.len());
    while let Some(lane) = state.pending_lanes.pop_front() {
        let outcome = judgment::judge(lane, state.window.active(), &mut state.timeline);
        state.session.apply(&outcome);
        outcomes.push(outcome);
    }

    state.log_timer += delta_time;
    if state.log_timer >= HEARTBEAT_SECONDS {
        info!(
            "Time: {:.2}, Score: {}, Hits: {}, Misses: {}, Active Notes: {}",
            play_time,
            state.session.score,
            state.session.hits,
            state.session.misses,
            state.window.active().len()
        );
        state.log_timer -= HEARTBEAT_SECONDS;
    }

    if state.window.is_exhausted(state.timeline.len()) {
        info!("Timeline exhausted at {:.2}s. Transitioning to game over.", play_time);
        return (ScreenAction::Navigate(Screen::GameOver), outcomes);
    }
    (ScreenAction::None, outcomes)
}
