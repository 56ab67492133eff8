//! Key mapping from terminal events to puzzle actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::{Direction, SessionCommand};

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Lifecycle command, applied as-is
    Command(SessionCommand),
    /// Pause while playing, resume while paused
    TogglePause,
    /// Slide the tile next to the blank in this direction
    Slide(Direction),
    /// Switch between slide and jigsaw
    ToggleGameType,
    /// One more row and column
    Harder,
    Easier,
}

/// Map keyboard input to puzzle actions.
///
/// Arrow keys name the direction the tile travels: `Left` moves the tile to
/// the right of the blank into it.
pub fn handle_key_event(key: KeyEvent) -> Option<InputAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(InputAction::Slide(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(InputAction::Slide(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(InputAction::Slide(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(InputAction::Slide(Direction::Down))
        }

        KeyCode::Enter => Some(InputAction::Command(SessionCommand::Start)),
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
            Some(InputAction::TogglePause)
        }
        KeyCode::Char('x') | KeyCode::Char('X') => Some(InputAction::Command(SessionCommand::Stop)),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            Some(InputAction::Command(SessionCommand::PlayAgain))
        }
        KeyCode::Esc => Some(InputAction::Command(SessionCommand::Close)),

        KeyCode::Char('t') | KeyCode::Char('T') => Some(InputAction::ToggleGameType),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(InputAction::Harder),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(InputAction::Easier),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn test_slide_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(InputAction::Slide(Direction::Left))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('J'))),
            Some(InputAction::Slide(Direction::Down))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('k'))),
            Some(InputAction::Slide(Direction::Up))
        );
    }

    #[test]
    fn test_lifecycle_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(InputAction::Command(SessionCommand::Start))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(InputAction::TogglePause)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(InputAction::Command(SessionCommand::PlayAgain))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Esc)),
            Some(InputAction::Command(SessionCommand::Close))
        );
    }

    #[test]
    fn test_setup_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('t'))),
            Some(InputAction::ToggleGameType)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('='))),
            Some(InputAction::Harder)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('-'))),
            Some(InputAction::Easier)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let key = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key_event(key), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
