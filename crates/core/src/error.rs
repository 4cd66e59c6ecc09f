//! Error types for fallible puzzle entry points.
//!
//! Ignored gestures are not errors; they are reported through `bool`/`Option`
//! returns on the session. Only configuration problems and unusable save
//! records surface here.

use thiserror::Error;

use crate::types::{MAX_GRID_SIZE, MIN_GRID_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("grid size {0} is outside {min}..={max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    InvalidGridSize(u8),
    #[error("rendering surface of {surface}px cannot hold a {grid_size}x{grid_size} grid")]
    ZeroSurface { surface: u32, grid_size: u8 },
    #[error("image {width}x{height} is too small for a {grid_size}x{grid_size} grid")]
    ImageTooSmall {
        width: u32,
        height: u32,
        grid_size: u8,
    },
    #[error("arrangement is not a permutation of the {grid_size}x{grid_size} grid")]
    InvalidArrangement { grid_size: u8 },
    #[error("save record is for a {found}x{found} grid, session has {expected}x{expected}")]
    GridSizeMismatch { expected: u8, found: u8 },
    #[error("save record is for level {found}, session is level {expected}")]
    LevelMismatch { expected: u32, found: u32 },
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
