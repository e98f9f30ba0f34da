//! Terminal input: key bindings plus DAS/ARR resolution.
//!
//! The engine consumes the `core::InputSource` trait; everything about raw
//! key events, auto-repeat timing, and missing key-release events stays here.

pub mod handler;

pub use handler::InputHandler;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::Action;

/// Map a key code to its bound action, if any
pub fn map_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::SoftDrop),
        KeyCode::Char(' ') => Some(Action::HardDrop),
        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('X') => Some(Action::RotateCw),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Action::RotateCcw),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Hold),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Pause),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        _ => None,
    }
}

/// Ctrl-C quits regardless of bindings
pub fn is_quit_combo(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_bindings() {
        assert_eq!(map_key(KeyCode::Left), Some(Action::MoveLeft));
        assert_eq!(map_key(KeyCode::Right), Some(Action::MoveRight));
        assert_eq!(map_key(KeyCode::Down), Some(Action::SoftDrop));
        assert_eq!(map_key(KeyCode::Up), Some(Action::RotateCw));
        assert_eq!(map_key(KeyCode::Char(' ')), Some(Action::HardDrop));
    }

    #[test]
    fn test_unbound_key_maps_to_nothing() {
        assert_eq!(map_key(KeyCode::Tab), None);
        assert_eq!(map_key(KeyCode::Char('m')), None);
    }

    #[test]
    fn test_ctrl_c_is_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit_combo(key));
        let plain = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!is_quit_combo(plain));
    }
}
