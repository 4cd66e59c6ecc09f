//! Key and mouse mapping from terminal events to puzzle input.

use crate::types::PuzzleAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Left-button gesture in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { col: u16, row: u16 },
    Drag { col: u16, row: u16 },
    Up { col: u16, row: u16 },
}

impl PointerEvent {
    pub fn cell(&self) -> (u16, u16) {
        match *self {
            PointerEvent::Down { col, row }
            | PointerEvent::Drag { col, row }
            | PointerEvent::Up { col, row } => (col, row),
        }
    }
}

/// Map keyboard input to puzzle actions.
pub fn handle_key_event(key: KeyEvent) -> Option<PuzzleAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('h') | KeyCode::Char('H') => Some(PuzzleAction::AutoSolveOne),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(PuzzleAction::ShuffleRemaining),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(PuzzleAction::Save),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(PuzzleAction::Reset),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(PuzzleAction::ToggleSample),
        _ => None,
    }
}

/// Map left-button mouse input to pointer events. Other buttons, scrolling and
/// plain motion are ignored.
pub fn handle_mouse_event(mouse: MouseEvent) -> Option<PointerEvent> {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down { col, row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Drag { col, row }),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up { col, row }),
        _ => None,
    }
}

/// Escape aborts a drag in progress.
pub fn is_cancel(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('h'))),
            Some(PuzzleAction::AutoSolveOne)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('S'))),
            Some(PuzzleAction::ShuffleRemaining)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('w'))),
            Some(PuzzleAction::Save)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(PuzzleAction::Reset)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('t'))),
            Some(PuzzleAction::ToggleSample)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_control_chords_are_not_actions() {
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_left_button_gestures() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 4, 2)),
            Some(PointerEvent::Down { col: 4, row: 2 })
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 3)),
            Some(PointerEvent::Drag { col: 5, row: 3 })
        );
        let up = handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 6, 1)).unwrap();
        assert_eq!(up.cell(), (6, 1));
    }

    #[test]
    fn test_other_mouse_input_ignored() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)),
            None
        );
        assert_eq!(handle_mouse_event(mouse(MouseEventKind::Moved, 0, 0)), None);
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollUp, 0, 0)),
            None
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert!(is_cancel(KeyEvent::from(KeyCode::Esc)));
    }
}
