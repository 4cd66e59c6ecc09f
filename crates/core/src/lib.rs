//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate contains the puzzle grid state machine: the piece/grid data
//! model, the connectivity (grouping) algorithm, the drag-move-swap protocol,
//! auto-lock/auto-connect policy, completion detection, and save/restore.
//! It has no dependencies on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces the same scramble
//! - **Testable**: Every rule is reachable from plain function calls
//! - **Portable**: Runs in the terminal front-end or headless
//!
//! # Module Structure
//!
//! - [`pieces`]: piece arena with symmetric connection sets
//! - [`grid`]: N×N slot array (always a permutation of the pieces)
//! - [`connectivity`]: connection rebuild and connected groups
//! - [`controller`]: pick → drag → drop state machine
//! - [`lock`]: auto-lock of correctly placed pieces
//! - [`completion`]: completion check and progress counters
//! - [`save`]: position-addressed save records and restore
//! - [`session`]: [`PuzzleSession`], the single owner of one puzzle
//!
//! # Example
//!
//! ```
//! use tui_jigsaw_core::{Bitmap, PuzzleSession, SessionOptions};
//! use tui_jigsaw_types::{Difficulty, PuzzleConfig};
//!
//! let image = Bitmap::from_fn(300, 300, |x, y| [x as u8, y as u8, 128]);
//! let config = PuzzleConfig::preset(Difficulty::Easy, 5);
//! let mut session = PuzzleSession::new(&image, config, SessionOptions::default()).unwrap();
//!
//! // Solve one piece with the hint power-up.
//! if session.auto_solve_one_piece() {
//!     assert!(session.locked_pieces_count() >= 1);
//! }
//! assert!(session.grid().is_permutation());
//! ```

pub mod bitmap;
pub mod completion;
pub mod connectivity;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod lock;
pub mod pieces;
pub mod rng;
pub mod save;
pub mod session;
pub mod snapshot;

pub use tui_jigsaw_types as types;

// Re-export commonly used types for convenience
pub use bitmap::Bitmap;
pub use controller::{can_move_group, DragSession, DragState, MoveController, MoveResult};
pub use error::PuzzleError;
pub use geometry::Geometry;
pub use grid::Grid;
pub use pieces::{Piece, PieceId, PieceSet};
pub use rng::SimpleRng;
pub use save::{ConnectionEntry, PositionEntry, RestoreReport, SaveRecord};
pub use session::{init_puzzle, DropOutcome, PuzzleObserver, PuzzleSession, SessionOptions};
pub use snapshot::{
    DragSnapshot, PuzzleSnapshot, SlotSnapshot, DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP,
};
