//! TUI Jigsaw (workspace facade crate).
//!
//! Exposes `tui_jigsaw::{core,adapter,term,input,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use tui_jigsaw_adapter as adapter;
pub use tui_jigsaw_core as core;
pub use tui_jigsaw_input as input;
pub use tui_jigsaw_term as term;
pub use tui_jigsaw_types as types;
