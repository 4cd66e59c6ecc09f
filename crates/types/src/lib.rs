//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, persistence).
//!
//! # Grid Dimensions
//!
//! Puzzles are square N×N grids. The size grows with the level number:
//!
//! | Levels | Grid |
//! |--------|------|
//! | 1-10 | 5×5 |
//! | 11-20 | 6×6 |
//! | 21-30 | 7×7 |
//! | ... | ... |
//! | 61+ | 11×11 (cap) |
//!
//! # Difficulty Presets
//!
//! | Mode | Sample | Auto-lock | Separate | Auto-connect | Dim locked |
//! |------|--------|-----------|----------|--------------|------------|
//! | Easy | yes | yes | no | yes | yes |
//! | Normal | yes | no | no | yes | no |
//! | Hard | no | no | yes | yes | no |
//! | Insane | no | no | yes | no | no |
//!
//! # Examples
//!
//! ```
//! use tui_jigsaw_types::{grid_size_for_level, Difficulty, PuzzleAction, PuzzleConfig};
//!
//! // Parse from string (case-insensitive)
//! let difficulty = Difficulty::from_str("EASY").unwrap();
//! assert_eq!(difficulty, Difficulty::Easy);
//!
//! // Presets
//! let config = PuzzleConfig::preset(difficulty, grid_size_for_level(1));
//! assert_eq!(config.grid_size, 5);
//! assert!(config.auto_lock_correct_pieces);
//!
//! // Parse an action
//! assert_eq!(PuzzleAction::from_str("hint"), Some(PuzzleAction::AutoSolveOne));
//! ```

/// Smallest grid the core accepts (2×2)
pub const MIN_GRID_SIZE: u8 = 2;

/// Largest grid the core accepts (11×11)
pub const MAX_GRID_SIZE: u8 = 11;

/// Grid size for level 1
pub const BASE_GRID_SIZE: u8 = 5;

/// Number of levels played before the grid grows by one row and column
pub const LEVELS_PER_GRID_STEP: u32 = 10;

/// Grid size used for a given level number (levels start at 1).
///
/// # Examples
///
/// ```
/// use tui_jigsaw_types::grid_size_for_level;
///
/// assert_eq!(grid_size_for_level(1), 5);
/// assert_eq!(grid_size_for_level(10), 5);
/// assert_eq!(grid_size_for_level(11), 6);
/// assert_eq!(grid_size_for_level(500), 11);
/// ```
pub fn grid_size_for_level(level: u32) -> u8 {
    let step = level.saturating_sub(1) / LEVELS_PER_GRID_STEP;
    let size = (BASE_GRID_SIZE as u32).saturating_add(step);
    size.min(MAX_GRID_SIZE as u32) as u8
}

/// A `(row, col)` grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Difficulty mode selecting one of the four canonical policy presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    /// Parse difficulty from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_jigsaw_types::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
    /// assert_eq!(Difficulty::from_str("Insane"), Some(Difficulty::Insane));
    /// assert_eq!(Difficulty::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        }
    }
}

/// Immutable per-session policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleConfig {
    pub grid_size: u8,
    pub show_sample: bool,
    pub auto_lock_correct_pieces: bool,
    pub can_separate_connected_pieces: bool,
    pub auto_connect_correct_pieces: bool,
    pub dim_locked_pieces: bool,
}

impl PuzzleConfig {
    /// Build the canonical preset for a difficulty at the given grid size.
    pub fn preset(difficulty: Difficulty, grid_size: u8) -> Self {
        let (show_sample, auto_lock, can_separate, auto_connect, dim_locked) = match difficulty {
            Difficulty::Easy => (true, true, false, true, true),
            Difficulty::Normal => (true, false, false, true, false),
            Difficulty::Hard => (false, false, true, true, false),
            Difficulty::Insane => (false, false, true, false, false),
        };
        Self {
            grid_size,
            show_sample,
            auto_lock_correct_pieces: auto_lock,
            can_separate_connected_pieces: can_separate,
            auto_connect_correct_pieces: auto_connect,
            dim_locked_pieces: dim_locked,
        }
    }

    /// Total number of pieces (`grid_size²`)
    pub fn piece_count(&self) -> usize {
        (self.grid_size as usize) * (self.grid_size as usize)
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self::preset(Difficulty::Normal, BASE_GRID_SIZE)
    }
}

/// Non-gesture actions that can be applied to a puzzle session
///
/// Gestures (pick/drag/drop) travel as pointer events; everything else the
/// player can trigger is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleAction {
    /// Place and lock one misplaced piece
    AutoSolveOne,
    /// Re-shuffle every unlocked piece among the unlocked slots
    ShuffleRemaining,
    /// Persist the current state
    Save,
    /// Clear locks and reshuffle the whole puzzle
    Reset,
    /// Show or hide the sample image
    ToggleSample,
}

impl PuzzleAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_jigsaw_types::PuzzleAction;
    ///
    /// assert_eq!(PuzzleAction::from_str("autoSolveOne"), Some(PuzzleAction::AutoSolveOne));
    /// assert_eq!(PuzzleAction::from_str("shuffle"), Some(PuzzleAction::ShuffleRemaining));
    /// assert_eq!(PuzzleAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "autosolveone" | "hint" => Some(PuzzleAction::AutoSolveOne),
            "shuffleremaining" | "shuffle" => Some(PuzzleAction::ShuffleRemaining),
            "save" => Some(PuzzleAction::Save),
            "reset" => Some(PuzzleAction::Reset),
            "togglesample" | "sample" => Some(PuzzleAction::ToggleSample),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleAction::AutoSolveOne => "autoSolveOne",
            PuzzleAction::ShuffleRemaining => "shuffleRemaining",
            PuzzleAction::Save => "save",
            PuzzleAction::Reset => "reset",
            PuzzleAction::ToggleSample => "toggleSample",
        }
    }
}

/// Core-side notification produced by a grid mutation.
///
/// Queued by the session and drained by observers (score, UI) in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleEvent {
    /// The mutation formed at least one new connection; `piece` is the moved piece's
    /// correct coordinates.
    PieceConnected { piece: Coord, connections: u8 },
    /// Every slot now holds its correct piece.
    PuzzleCompleted,
    /// Progress after a mutation that did not complete the puzzle.
    ProgressChanged { correct: u32, locked: u32, total: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_difficulty_table() {
        let easy = PuzzleConfig::preset(Difficulty::Easy, 5);
        assert!(easy.show_sample);
        assert!(easy.auto_lock_correct_pieces);
        assert!(!easy.can_separate_connected_pieces);
        assert!(easy.auto_connect_correct_pieces);
        assert!(easy.dim_locked_pieces);

        let normal = PuzzleConfig::preset(Difficulty::Normal, 5);
        assert!(normal.show_sample);
        assert!(!normal.auto_lock_correct_pieces);
        assert!(!normal.can_separate_connected_pieces);
        assert!(normal.auto_connect_correct_pieces);
        assert!(!normal.dim_locked_pieces);

        let hard = PuzzleConfig::preset(Difficulty::Hard, 5);
        assert!(!hard.show_sample);
        assert!(!hard.auto_lock_correct_pieces);
        assert!(hard.can_separate_connected_pieces);
        assert!(hard.auto_connect_correct_pieces);

        let insane = PuzzleConfig::preset(Difficulty::Insane, 5);
        assert!(insane.can_separate_connected_pieces);
        assert!(!insane.auto_connect_correct_pieces);
        assert!(!insane.show_sample);
    }

    #[test]
    fn grid_size_grows_with_level_and_caps() {
        assert_eq!(grid_size_for_level(0), BASE_GRID_SIZE);
        assert_eq!(grid_size_for_level(21), 7);
        assert_eq!(grid_size_for_level(61), MAX_GRID_SIZE);
        assert_eq!(grid_size_for_level(u32::MAX), MAX_GRID_SIZE);
    }

    #[test]
    fn difficulty_round_trips_through_str() {
        for d in [
            Difficulty::Easy,
            Difficulty::Normal,
            Difficulty::Hard,
            Difficulty::Insane,
        ] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
    }
}
