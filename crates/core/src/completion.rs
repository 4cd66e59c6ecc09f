//! Completion detector and progress counters.

use crate::grid::Grid;
use crate::pieces::PieceSet;

/// True iff every slot holds the piece whose correct coordinates are that slot.
pub fn is_complete(grid: &Grid, pieces: &PieceSet) -> bool {
    grid.iter()
        .all(|(slot, id)| pieces.get(id).map(|p| p.correct() == slot).unwrap_or(false))
}

/// Number of slots holding their correct piece.
pub fn correct_count(grid: &Grid, pieces: &PieceSet) -> usize {
    grid.iter()
        .filter(|&(slot, id)| pieces.get(id).map(|p| p.correct() == slot).unwrap_or(false))
        .count()
}
