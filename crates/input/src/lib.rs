//! Terminal input module (session-facing).
//!
//! Maps `crossterm` key events into [`crate::types::PuzzleAction`] and mouse
//! events into [`PointerEvent`]s in terminal cell coordinates. Converting cells
//! to surface pixels is the view's job, since only it knows the layout.

pub mod map;

pub use tui_jigsaw_types as types;

pub use map::{handle_key_event, handle_mouse_event, is_cancel, should_quit, PointerEvent};
