//! Puzzle session - the single owner of one puzzle's state
//!
//! This module ties together all core components: pieces, grid, connectivity,
//! the move controller, the lock engine, completion and save/restore. Every
//! mutation runs the same pipeline: mutate the grid, rebuild connections,
//! apply auto-lock, check completion, queue events for observers.
//!
//! A session is created when a puzzle starts and dropped when it ends; dropping
//! it releases every piece image.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::bitmap::Bitmap;
use crate::completion;
use crate::connectivity::{self, connected_group};
use crate::controller::{DragSession, MoveController, MoveResult};
use crate::error::{PuzzleError, Result};
use crate::geometry::Geometry;
use crate::grid::Grid;
use crate::lock::apply_auto_lock;
use crate::pieces::{Piece, PieceId, PieceSet};
use crate::rng::SimpleRng;
use crate::save::{self, RestoreReport, SaveRecord};
use crate::snapshot::{
    DragSnapshot, PuzzleSnapshot, SlotSnapshot, DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP,
};
use crate::types::{Coord, PuzzleConfig, PuzzleEvent, MAX_GRID_SIZE, MIN_GRID_SIZE};

/// Session parameters that are not gameplay policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub level: u32,
    /// Side of the square rendering surface in pixels
    pub surface: u32,
    pub seed: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            level: 1,
            surface: 1000,
            seed: 1,
        }
    }
}

/// Receiver of session events. Every method defaults to a no-op.
pub trait PuzzleObserver {
    fn on_piece_connected(&mut self, _piece: Coord, _connections: u8) {}
    fn on_puzzle_completed(&mut self) {}
    fn on_progress_changed(&mut self, _correct: u32, _locked: u32, _total: u32) {}
}

/// Result of a drop that changed the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOutcome {
    pub moved: MoveResult,
    pub newly_locked: usize,
    /// The drop formed at least one new connection
    pub connected: bool,
    pub completed: bool,
}

/// Slice `image` into `config.grid_size²` pieces, shuffle them and return a
/// ready session.
pub fn init_puzzle(image: &Bitmap, config: PuzzleConfig, options: SessionOptions) -> Result<PuzzleSession> {
    PuzzleSession::new(image, config, options)
}

#[derive(Debug, Clone)]
pub struct PuzzleSession {
    config: PuzzleConfig,
    level: u32,
    geometry: Geometry,
    grid: Grid,
    pieces: PieceSet,
    controller: MoveController,
    rng: SimpleRng,
    events: Vec<PuzzleEvent>,
}

impl PuzzleSession {
    /// Build a session from a decoded image.
    ///
    /// The centered square of the image is cut into `floor(side / grid_size)`
    /// tiles; pieces are created row-major and then uniformly shuffled.
    pub fn new(image: &Bitmap, config: PuzzleConfig, options: SessionOptions) -> Result<Self> {
        let size = config.grid_size;
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(PuzzleError::InvalidGridSize(size));
        }
        let geometry = Geometry::new(options.surface, size)?;

        let side = image.width().min(image.height());
        let tile = side / size as u32;
        if tile == 0 {
            return Err(PuzzleError::ImageTooSmall {
                width: image.width(),
                height: image.height(),
                grid_size: size,
            });
        }
        let x0 = (image.width() - side) / 2;
        let y0 = (image.height() - side) / 2;

        let mut pieces = PieceSet::new();
        for row in 0..size {
            for col in 0..size {
                let tile_image = image.crop(x0 + col as u32 * tile, y0 + row as u32 * tile, tile, tile);
                pieces.push(Piece::new(tile_image, Coord::new(row, col)));
            }
        }

        let mut rng = SimpleRng::new(options.seed);
        let mut grid = Grid::solved(size);
        grid.shuffle(&mut rng);

        let mut session = Self {
            config,
            level: options.level,
            geometry,
            grid,
            pieces,
            controller: MoveController::new(),
            rng,
            events: Vec::new(),
        };
        session.refresh();
        info!(level = session.level, grid_size = size, seed = options.seed, "puzzle initialized");
        Ok(session)
    }

    /// Build a session around an explicit arrangement (row-major list of the
    /// correct coordinates found in each slot). Used by tests and tools.
    pub fn from_arrangement(
        config: PuzzleConfig,
        options: SessionOptions,
        arrangement: &[Coord],
    ) -> Result<Self> {
        let size = config.grid_size;
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(PuzzleError::InvalidGridSize(size));
        }
        let geometry = Geometry::new(options.surface, size)?;
        let mut pieces = PieceSet::new();
        for row in 0..size {
            for col in 0..size {
                let shade = [row.wrapping_mul(23), col.wrapping_mul(23), 128];
                pieces.push(Piece::new(Bitmap::from_fn(1, 1, |_, _| shade), Coord::new(row, col)));
            }
        }
        let slots = arrangement
            .iter()
            .filter(|c| c.row < size && c.col < size)
            .map(|c| PieceId(c.row as usize * size as usize + c.col as usize))
            .collect();
        let grid = Grid::from_slots(size, slots).ok_or(PuzzleError::InvalidArrangement { grid_size: size })?;
        let mut session = Self {
            config,
            level: options.level,
            geometry,
            grid,
            pieces,
            controller: MoveController::new(),
            rng: SimpleRng::new(options.seed),
            events: Vec::new(),
        };
        session.refresh();
        Ok(session)
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pieces(&self) -> &PieceSet {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    /// Piece whose correct coordinates are `correct`
    pub fn piece_by_correct(&self, correct: Coord) -> Option<PieceId> {
        self.pieces.find_by_correct(correct)
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.controller.session()
    }

    pub fn connected_group(&self, piece: PieceId) -> Vec<PieceId> {
        connected_group(&self.pieces, piece)
    }

    // ============== Gestures ==============

    /// Pointer-down at surface pixel `(x, y)`. Returns whether a drag started.
    ///
    /// Locked pieces, points outside the grid and finished puzzles are ignored.
    pub fn pick(&mut self, x: f32, y: f32) -> bool {
        if self.is_complete() {
            return false;
        }
        self.controller
            .pick(&self.grid, &self.pieces, &self.geometry, x, y)
    }

    /// Pointer-move while dragging.
    pub fn drag(&mut self, x: f32, y: f32) -> bool {
        self.controller.drag(x, y)
    }

    /// Pointer-up. Returns `None` when the gesture changed nothing.
    pub fn drop(&mut self, x: f32, y: f32) -> Option<DropOutcome> {
        let moved = self
            .controller
            .drop(&mut self.grid, &mut self.pieces, &self.geometry, x, y)?;
        debug!(
            from = ?moved.from,
            to = ?moved.to,
            group_size = moved.group_size,
            group_broken = moved.group_broken,
            "piece dropped"
        );

        let newly_locked = self.refresh();
        let displaced = self.grid.at(moved.from);
        let connected = match self.first_connected([Some(moved.piece), displaced]) {
            Some(id) => {
                self.push_connected(id);
                true
            }
            None => false,
        };
        let completed = self.push_progress();
        Some(DropOutcome {
            moved,
            newly_locked,
            connected,
            completed,
        })
    }

    /// Abandon an in-flight drag without touching the grid.
    pub fn cancel_drag(&mut self) {
        self.controller.cancel();
    }

    // ============== Queries ==============

    pub fn total_pieces_count(&self) -> usize {
        self.grid.len()
    }

    pub fn correct_pieces_count(&self) -> usize {
        completion::correct_count(&self.grid, &self.pieces)
    }

    pub fn locked_pieces_count(&self) -> usize {
        self.pieces.locked_count()
    }

    pub fn remaining_pieces_count(&self) -> usize {
        self.total_pieces_count() - self.correct_pieces_count()
    }

    pub fn is_complete(&self) -> bool {
        completion::is_complete(&self.grid, &self.pieces)
    }

    // ============== Power-ups ==============

    /// Move one misplaced, unlocked piece into its correct slot and lock it.
    ///
    /// Scans slots row-major. Returns false if no such piece exists.
    pub fn auto_solve_one_piece(&mut self) -> bool {
        let candidate = self.grid.iter().find_map(|(slot, id)| {
            let piece = self.pieces.get(id)?;
            if piece.is_locked() || piece.correct() == slot {
                return None;
            }
            let occupant = self.grid.at(piece.correct())?;
            if self.pieces.is_locked(occupant) {
                return None;
            }
            Some((id, slot, piece.correct()))
        });
        let Some((id, from, to)) = candidate else {
            return false;
        };

        self.controller.cancel();
        self.grid.swap(from, to);
        self.pieces.lock(id);
        debug!(?from, ?to, "auto-solved piece");

        self.refresh();
        let displaced = self.grid.at(from);
        if let Some(connected) = self.first_connected([Some(id), displaced]) {
            self.push_connected(connected);
        }
        self.push_progress();
        true
    }

    /// Re-shuffle the unlocked pieces among the unlocked slots.
    ///
    /// Returns false, changing nothing, when every piece is locked.
    pub fn shuffle_remaining_pieces(&mut self) -> bool {
        let movable: Vec<Coord> = self
            .grid
            .iter()
            .filter(|&(_, id)| !self.pieces.is_locked(id))
            .map(|(slot, _)| slot)
            .collect();
        if movable.is_empty() {
            return false;
        }

        self.controller.cancel();
        self.grid.shuffle_subset(&movable, &mut self.rng);
        debug!(pieces = movable.len(), "shuffled remaining pieces");
        self.refresh();
        self.push_progress();
        true
    }

    /// Clear every lock and reshuffle the whole puzzle.
    pub fn reset(&mut self) {
        self.controller.cancel();
        self.pieces.unlock_all();
        self.grid.shuffle(&mut self.rng);
        info!(level = self.level, "puzzle reset");
        self.refresh();
        self.push_progress();
    }

    // ============== Save / restore ==============

    pub fn save(&self) -> SaveRecord {
        self.save_at(now_ms())
    }

    pub fn save_at(&self, timestamp: i64) -> SaveRecord {
        save::save(&self.grid, &self.pieces, &self.geometry, self.level, timestamp)
    }

    /// Re-seat pieces from a record and recompute connections from scratch.
    ///
    /// A record for another level or grid size is refused outright; bad entries
    /// inside a matching record are skipped and counted in the report.
    pub fn restore(&mut self, record: &SaveRecord) -> Result<RestoreReport> {
        if record.level != self.level {
            return Err(PuzzleError::LevelMismatch {
                expected: self.level,
                found: record.level,
            });
        }
        if record.grid_size != 0 && record.grid_size != self.grid.size() {
            return Err(PuzzleError::GridSizeMismatch {
                expected: self.grid.size(),
                found: record.grid_size,
            });
        }

        self.controller.cancel();
        let report = save::restore(record, &mut self.grid, &mut self.pieces, &self.geometry);
        if report.is_partial() {
            info!(
                restored = report.restored,
                skipped = report.skipped,
                locks_cleared = report.locks_cleared,
                "partial restore"
            );
        }
        self.refresh();
        self.push_progress();
        Ok(report)
    }

    // ============== Events ==============

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deliver queued events to an observer.
    pub fn notify(&mut self, observer: &mut impl PuzzleObserver) {
        for event in self.events.drain(..) {
            match event {
                PuzzleEvent::PieceConnected { piece, connections } => {
                    observer.on_piece_connected(piece, connections)
                }
                PuzzleEvent::PuzzleCompleted => observer.on_puzzle_completed(),
                PuzzleEvent::ProgressChanged {
                    correct,
                    locked,
                    total,
                } => observer.on_progress_changed(correct, locked, total),
            }
        }
    }

    // ============== Snapshot ==============

    pub fn snapshot_into(&self, out: &mut PuzzleSnapshot) {
        let size = self.grid.size();
        out.clear();
        out.grid_size = size;
        out.level = self.level;
        out.geometry = Some(self.geometry);
        out.dim_locked = self.config.dim_locked_pieces;

        for (slot, id) in self.grid.iter() {
            let Some(piece) = self.pieces.get(id) else {
                continue;
            };
            let linked = |neighbor: Option<Coord>| {
                neighbor
                    .and_then(|n| self.grid.at(n))
                    .map(|other| piece.is_connected_to(other))
                    .unwrap_or(false)
            };
            let mut links = [false; 4];
            links[DIR_UP] = linked(slot.row.checked_sub(1).map(|r| Coord::new(r, slot.col)));
            links[DIR_RIGHT] = linked(self.grid.right_of(slot));
            links[DIR_DOWN] = linked(self.grid.below(slot));
            links[DIR_LEFT] = linked(slot.col.checked_sub(1).map(|c| Coord::new(slot.row, c)));
            out.slots.push(SlotSnapshot {
                piece: id,
                correct: piece.correct(),
                locked: piece.is_locked(),
                links,
            });
        }

        out.drag = self.controller.session().map(|s| {
            let (x, y) = s.piece_origin();
            DragSnapshot {
                piece: s.piece,
                origin: s.origin,
                x,
                y,
            }
        });
        out.correct = self.correct_pieces_count() as u32;
        out.locked = self.locked_pieces_count() as u32;
        out.total = self.total_pieces_count() as u32;
        out.complete = out.correct == out.total;
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        let mut s = PuzzleSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    // ============== Pipeline ==============

    /// Rebuild connections and apply auto-lock. Returns how many pieces locked.
    fn refresh(&mut self) -> usize {
        connectivity::recompute(
            &self.grid,
            &mut self.pieces,
            self.config.auto_connect_correct_pieces,
        );
        if !self.config.auto_lock_correct_pieces {
            return 0;
        }
        let locked = apply_auto_lock(&self.grid, &mut self.pieces);
        if !locked.is_empty() {
            debug!(count = locked.len(), "auto-locked pieces");
        }
        locked.len()
    }

    /// First of the just-swapped pieces that has any connection. Connections
    /// are positional, so every edge a moved piece has after a swap is new.
    fn first_connected(&self, moved: [Option<PieceId>; 2]) -> Option<PieceId> {
        moved.into_iter().flatten().find(|&id| {
            self.pieces
                .get(id)
                .is_some_and(|p| !p.connections().is_empty())
        })
    }

    fn push_connected(&mut self, id: PieceId) {
        if let Some(piece) = self.pieces.get(id) {
            self.events.push(PuzzleEvent::PieceConnected {
                piece: piece.correct(),
                connections: piece.connections().len() as u8,
            });
        }
    }

    /// Queue the completion or progress event. Returns whether the puzzle is complete.
    fn push_progress(&mut self) -> bool {
        if self.is_complete() {
            info!(level = self.level, "puzzle completed");
            self.events.push(PuzzleEvent::PuzzleCompleted);
            return true;
        }
        self.events.push(PuzzleEvent::ProgressChanged {
            correct: self.correct_pieces_count() as u32,
            locked: self.locked_pieces_count() as u32,
            total: self.total_pieces_count() as u32,
        });
        false
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    fn image(side: u32) -> Bitmap {
        Bitmap::from_fn(side, side, |x, y| [x as u8, y as u8, 0])
    }

    #[test]
    fn new_rejects_bad_grid_sizes() {
        let cfg = PuzzleConfig::preset(Difficulty::Normal, 1);
        assert_eq!(
            PuzzleSession::new(&image(30), cfg, SessionOptions::default()).unwrap_err(),
            PuzzleError::InvalidGridSize(1)
        );
        let cfg = PuzzleConfig::preset(Difficulty::Normal, 12);
        assert!(PuzzleSession::new(&image(30), cfg, SessionOptions::default()).is_err());
    }

    #[test]
    fn new_rejects_zero_surface() {
        let cfg = PuzzleConfig::preset(Difficulty::Normal, 3);
        let options = SessionOptions {
            surface: 0,
            ..SessionOptions::default()
        };
        assert!(matches!(
            PuzzleSession::new(&image(30), cfg, options),
            Err(PuzzleError::ZeroSurface { .. })
        ));
    }

    #[test]
    fn new_rejects_tiny_images() {
        let cfg = PuzzleConfig::preset(Difficulty::Normal, 4);
        assert!(matches!(
            PuzzleSession::new(&image(3), cfg, SessionOptions::default()),
            Err(PuzzleError::ImageTooSmall { .. })
        ));
    }

    #[test]
    fn new_slices_centered_square_tiles() {
        let wide = Bitmap::from_fn(40, 30, |x, y| [x as u8, y as u8, 0]);
        let cfg = PuzzleConfig::preset(Difficulty::Hard, 3);
        let session = PuzzleSession::new(&wide, cfg, SessionOptions::default()).unwrap();
        let id = session.piece_by_correct(Coord::new(1, 2)).unwrap();
        let tile = session.piece(id).unwrap().image();
        assert_eq!((tile.width(), tile.height()), (10, 10));
        // Square starts at x=5; column 2 starts at 5 + 20.
        assert_eq!(tile.get(0, 0), Some([25, 10, 0]));
    }

    #[test]
    fn same_seed_same_shuffle() {
        let cfg = PuzzleConfig::preset(Difficulty::Hard, 5);
        let a = PuzzleSession::new(&image(50), cfg, SessionOptions::default()).unwrap();
        let b = PuzzleSession::new(&image(50), cfg, SessionOptions::default()).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert!(a.grid().is_permutation());
    }

    #[test]
    fn snapshot_reports_links_and_counts() {
        let cfg = PuzzleConfig::preset(Difficulty::Normal, 2);
        let solved = [
            Coord::new(0, 0),
            Coord::new(0, 1),
            Coord::new(1, 0),
            Coord::new(1, 1),
        ];
        let session = PuzzleSession::from_arrangement(cfg, SessionOptions::default(), &solved).unwrap();
        let snap = session.snapshot();
        assert!(snap.complete);
        assert_eq!(snap.total, 4);
        let top_left = snap.slot(Coord::new(0, 0)).unwrap();
        assert_eq!(top_left.links, [false, true, true, false]);
    }

    #[test]
    fn cancel_drag_leaves_grid_untouched() {
        let cfg = PuzzleConfig::preset(Difficulty::Normal, 2);
        let swapped = [
            Coord::new(0, 1),
            Coord::new(0, 0),
            Coord::new(1, 0),
            Coord::new(1, 1),
        ];
        let mut session =
            PuzzleSession::from_arrangement(cfg, SessionOptions::default(), &swapped).unwrap();
        let before = session.grid().clone();

        assert!(session.pick(250.0, 250.0));
        assert!(session.drag(700.0, 250.0));
        assert!(session.drag_session().is_some());

        session.cancel_drag();
        assert!(session.drag_session().is_none());
        assert_eq!(session.grid(), &before);
        assert_eq!(session.drop(700.0, 250.0), None);
    }
}
