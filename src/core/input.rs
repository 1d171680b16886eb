use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Lane {
    First = 0,
    Second = 1,
    Third = 2,
    Fourth = 3,
}

pub const ALL_LANES: [Lane; 4] = [Lane::First, Lane::Second, Lane::Third, Lane::Fourth];

impl Lane {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn from_index(index: usize) -> Option<Lane> {
        ALL_LANES.get(index).copied()
    }

    pub const fn key_name(self) -> &'static str {
        match self {
            Lane::First => "Q",
            Lane::Second => "W",
            Lane::Third => "E",
            Lane::Fourth => "R",
        }
    }
}

/// Abstract input delivered to the state machine. What a command means
/// depends on the current screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Lane(Lane),
    Up,
    Down,
    Confirm,
    /// Escape: back out of a screen, or pause/resume while playing.
    Back,
    Toggle,
    Preview,
    SpeedUp,
    SpeedDown,
    BpmUp,
    BpmDown,
}

#[inline(always)]
pub fn lane_from_keycode(code: KeyCode) -> Option<Lane> {
    match code {
        KeyCode::KeyQ => Some(Lane::First),
        KeyCode::KeyW => Some(Lane::Second),
        KeyCode::KeyE => Some(Lane::Third),
        KeyCode::KeyR => Some(Lane::Fourth),
        _ => None,
    }
}

pub fn command_from_keycode(code: KeyCode) -> Option<Command> {
    if let Some(lane) = lane_from_keycode(code) {
        return Some(Command::Lane(lane));
    }
    match code {
        KeyCode::ArrowUp => Some(Command::Up),
        KeyCode::ArrowDown => Some(Command::Down),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Command::Confirm),
        KeyCode::Escape => Some(Command::Back),
        KeyCode::Space => Some(Command::Toggle),
        KeyCode::KeyP => Some(Command::Preview),
        KeyCode::ArrowRight => Some(Command::SpeedUp),
        KeyCode::ArrowLeft => Some(Command::SpeedDown),
        KeyCode::BracketRight => Some(Command::BpmUp),
        KeyCode::BracketLeft => Some(Command::BpmDown),
        _ => None,
    }
}

/// Adapter for a windowing layer that forwards raw winit key events.
/// Only fresh presses count; releases and auto-repeat are dropped.
pub fn command_from_key_event(event: &KeyEvent) -> Option<Command> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match event.physical_key {
        PhysicalKey::Code(code) => command_from_keycode(code),
        PhysicalKey::Unidentified(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_keys_follow_qwer_layout() {
        assert_eq!(lane_from_keycode(KeyCode::KeyQ), Some(Lane::First));
        assert_eq!(lane_from_keycode(KeyCode::KeyR), Some(Lane::Fourth));
        assert_eq!(lane_from_keycode(KeyCode::KeyT), None);
        assert_eq!(
            command_from_keycode(KeyCode::KeyE),
            Some(Command::Lane(Lane::Third))
        );
    }

    #[test]
    fn lane_index_round_trips() {
        for lane in ALL_LANES {
            assert_eq!(Lane::from_index(lane.index()), Some(lane));
        }
        assert_eq!(Lane::from_index(4), None);
    }
}
