//! Adapter layer - everything outside the pure puzzle model
//!
//! - [`config`]: environment-driven application settings
//! - [`loader`]: asynchronous image decoding on a tokio runtime, with
//!   generation tokens so superseded loads are dropped
//! - [`store`]: JSON save files, one per level
//!
//! # Environment Variables
//!
//! - `JIGSAW_IMAGE`: image file to slice (default: procedural demo image)
//! - `JIGSAW_LEVEL`: level number, drives the grid size (default: 1)
//! - `JIGSAW_DIFFICULTY`: easy | normal | hard | insane (default: normal)
//! - `JIGSAW_GRID_SIZE`: override the level's grid size, clamped to 2..=11
//! - `JIGSAW_SAVE_DIR`: save directory (default: `.jigsaw-saves`, empty disables)
//! - `JIGSAW_SEED`: shuffle seed (default: time based)
//! - `JIGSAW_LOG`: write tracing output to this file
//!
//! # Save format
//!
//! ```text
//! {"level":1,"timestamp":1700000000000,"gridSize":5,
//!  "positions":[{"correctRow":0,"correctCol":0,"pixelX":200.0,"pixelY":0.0,"locked":false},...],
//!  "connections":[{"aRow":0,"aCol":0,"bRow":0,"bCol":1},...]}
//! ```

pub mod config;
pub mod loader;
pub mod store;

pub use tui_jigsaw_core as core;
pub use tui_jigsaw_types as types;

pub use config::{AppConfig, DEFAULT_SAVE_DIR};
pub use loader::{demo_image, ImageLoader, ImageSource, LoadedImage, DEMO_IMAGE_SIDE};
pub use store::SaveStore;
