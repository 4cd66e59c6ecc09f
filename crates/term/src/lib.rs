//! Terminal "puzzle renderer" module.
//!
//! A small rendering layer for terminal play. It avoids widget/layout
//! libraries and renders into a framebuffer that is diffed and flushed to
//! the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Show the actual image: half-block glyphs give two pixels per cell
//! - Own the cell-to-pixel mapping so pointer input lands on the right slot

pub mod fb;
pub mod puzzle_view;
pub mod renderer;

pub use tui_jigsaw_core as core;
pub use tui_jigsaw_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb, HALF_BLOCK};
pub use puzzle_view::{BoardLayout, PuzzleView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
