//! Save/restore serializer.
//!
//! A [`SaveRecord`] is keyed by each piece's correct coordinates, not by its
//! current slot, and carries the slot's pixel position. Restoring maps the
//! pixels back to slots through the session geometry. The connection list is
//! written for compatibility but never replayed: connections are always
//! recomputed after a restore.

use tracing::debug;

use crate::geometry::Geometry;
use crate::grid::Grid;
use crate::pieces::{PieceId, PieceSet};
use crate::types::Coord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionEntry {
    pub correct_row: i32,
    pub correct_col: i32,
    pub pixel_x: f32,
    pub pixel_y: f32,
    pub locked: bool,
}

/// One undirected edge, both ends addressed by correct coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionEntry {
    pub a_row: i32,
    pub a_col: i32,
    pub b_row: i32,
    pub b_col: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaveRecord {
    pub level: u32,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// 0 when unknown; restore then skips the size check
    pub grid_size: u8,
    pub positions: Vec<PositionEntry>,
    pub connections: Vec<ConnectionEntry>,
}

/// Outcome of a restore that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreReport {
    /// Entries that placed a piece
    pub restored: usize,
    /// Entries ignored as malformed, unknown, out of range or conflicting
    pub skipped: usize,
    /// Saved lock flags ignored because the piece is not in its correct slot
    pub locks_cleared: usize,
}

impl RestoreReport {
    pub fn is_partial(&self) -> bool {
        self.skipped > 0 || self.locks_cleared > 0
    }
}

/// Flatten grid and lock state into a record.
pub fn save(
    grid: &Grid,
    pieces: &PieceSet,
    geometry: &Geometry,
    level: u32,
    timestamp: i64,
) -> SaveRecord {
    let mut positions = Vec::with_capacity(grid.len());
    grid.for_each(|slot, id| {
        let Some(piece) = pieces.get(id) else {
            return;
        };
        let (pixel_x, pixel_y) = geometry.slot_origin(slot);
        positions.push(PositionEntry {
            correct_row: piece.correct().row as i32,
            correct_col: piece.correct().col as i32,
            pixel_x,
            pixel_y,
            locked: piece.is_locked(),
        });
    });

    let mut connections = Vec::new();
    for (id, piece) in pieces.iter() {
        for &other in piece.connections() {
            if other <= id {
                continue;
            }
            let Some(b) = pieces.get(other) else {
                continue;
            };
            connections.push(ConnectionEntry {
                a_row: piece.correct().row as i32,
                a_col: piece.correct().col as i32,
                b_row: b.correct().row as i32,
                b_col: b.correct().col as i32,
            });
        }
    }

    SaveRecord {
        level,
        timestamp,
        grid_size: grid.size(),
        positions,
        connections,
    }
}

fn entry_coord(row: i32, col: i32) -> Option<Coord> {
    let row = u8::try_from(row).ok()?;
    let col = u8::try_from(col).ok()?;
    Some(Coord::new(row, col))
}

/// Re-seat pieces according to `record`.
///
/// Bad entries are skipped one by one. Pieces left without a usable entry keep
/// their current slot when it is still free, otherwise they fill the remaining
/// free slots in row-major order, so the grid stays a permutation. Connections
/// are cleared; the caller recomputes them.
pub fn restore(
    record: &SaveRecord,
    grid: &mut Grid,
    pieces: &mut PieceSet,
    geometry: &Geometry,
) -> RestoreReport {
    let n = grid.len();
    let size = grid.size() as usize;
    let mut report = RestoreReport::default();
    let mut slot_owner: Vec<Option<PieceId>> = vec![None; n];
    let mut placed: Vec<Option<(usize, bool)>> = vec![None; pieces.len()];

    for entry in &record.positions {
        let Some(piece) = entry_coord(entry.correct_row, entry.correct_col)
            .and_then(|c| pieces.find_by_correct(c))
        else {
            debug!(row = entry.correct_row, col = entry.correct_col, "restore: unknown piece");
            report.skipped += 1;
            continue;
        };
        let Some(slot) = geometry
            .nearest_slot(entry.pixel_x, entry.pixel_y)
            .filter(|s| grid.contains(*s))
        else {
            debug!(x = entry.pixel_x, y = entry.pixel_y, "restore: position outside grid");
            report.skipped += 1;
            continue;
        };
        let idx = slot.row as usize * size + slot.col as usize;
        if placed[piece.0].is_some() || slot_owner[idx].is_some() {
            debug!(?slot, "restore: conflicting entry");
            report.skipped += 1;
            continue;
        }
        slot_owner[idx] = Some(piece);
        placed[piece.0] = Some((idx, entry.locked));
        report.restored += 1;
    }

    // Leftovers: keep the current slot if nobody claimed it.
    let mut leftovers = Vec::new();
    for (slot, id) in grid.iter() {
        if placed[id.0].is_some() {
            continue;
        }
        let idx = slot.row as usize * size + slot.col as usize;
        if slot_owner[idx].is_none() {
            slot_owner[idx] = Some(id);
            placed[id.0] = Some((idx, pieces.is_locked(id)));
        } else {
            leftovers.push(id);
        }
    }
    let mut leftovers = leftovers.into_iter();
    for idx in 0..n {
        if slot_owner[idx].is_none() {
            if let Some(id) = leftovers.next() {
                slot_owner[idx] = Some(id);
                placed[id.0] = Some((idx, false));
            }
        }
    }

    for (idx, owner) in slot_owner.iter().enumerate() {
        if let Some(id) = owner {
            grid.set((idx / size) as u8, (idx % size) as u8, *id);
        }
    }

    pieces.clear_connections();
    for (i, entry) in placed.iter().enumerate() {
        let id = PieceId(i);
        let Some((idx, locked)) = *entry else {
            continue;
        };
        let slot = Coord::new((idx / size) as u8, (idx % size) as u8);
        let in_place = pieces.get(id).map(|p| p.correct() == slot).unwrap_or(false);
        if locked && !in_place {
            report.locks_cleared += 1;
        }
        pieces.set_locked(id, locked && in_place);
    }

    report
}
