//! Key bindings and the single-slot input buffer.

use crate::piece::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the app should do with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Command(Command),
    Quit,
}

/// Map a key event to an action. Arrows or vim keys move and rotate;
/// P or Space toggles pause; Q or Esc quits.
pub fn key_to_action(key: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('p' | ' ') => Some(Action::Command(Command::TogglePause)),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Command(Command::MoveLeft)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Command(Command::MoveRight)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Command(Command::MoveDown)),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Command(Command::RotateClockwise)),
        _ => None,
    }
}

/// At most one pending command between frames; a new key press overwrites
/// any unconsumed prior command rather than queueing behind it.
#[derive(Debug, Default)]
pub struct InputBuffer {
    pending: Option<Command>,
}

impl InputBuffer {
    pub fn store(&mut self, command: Command) {
        self.pending = Some(command);
    }

    pub fn take(&mut self) -> Option<Command> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_the_closed_command_set() {
        assert_eq!(
            key_to_action(KeyEvent::from(KeyCode::Left)),
            Some(Action::Command(Command::MoveLeft))
        );
        assert_eq!(
            key_to_action(KeyEvent::from(KeyCode::Right)),
            Some(Action::Command(Command::MoveRight))
        );
        assert_eq!(
            key_to_action(KeyEvent::from(KeyCode::Up)),
            Some(Action::Command(Command::RotateClockwise))
        );
        assert_eq!(
            key_to_action(KeyEvent::from(KeyCode::Down)),
            Some(Action::Command(Command::MoveDown))
        );
        assert_eq!(
            key_to_action(KeyEvent::from(KeyCode::Char(' '))),
            Some(Action::Command(Command::TogglePause))
        );
        assert_eq!(
            key_to_action(KeyEvent::from(KeyCode::Esc)),
            Some(Action::Quit)
        );
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn buffer_keeps_only_the_last_command() {
        let mut buffer = InputBuffer::default();
        buffer.store(Command::MoveLeft);
        buffer.store(Command::MoveRight);
        assert_eq!(buffer.take(), Some(Command::MoveRight));
        assert_eq!(buffer.take(), None);
    }
}
